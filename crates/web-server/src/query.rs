use crate::error::AppError;
use chrono::NaiveDate;
use core_types::Dimension;
use pages::{Control, FilterPanel, FilterSelection};
use serde::Deserialize;

/// Filter parameters shared by the HTML form and the JSON API.
///
/// Multi-selects repeat their key once per value (`broker=JPM&broker=UBS`). A
/// dimension with no values falls back to "everything" unless `submitted` is set,
/// which is how the form says "the user cleared every box".
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(default)]
    pub broker: Vec<String>,
    #[serde(default)]
    pub region: Vec<String>,
    #[serde(default)]
    pub sector: Vec<String>,
    #[serde(default)]
    pub instrument: Vec<String>,
    #[serde(default)]
    pub side: Vec<String>,
    #[serde(default)]
    pub asset_class: Vec<String>,
    pub submitted: Option<String>,
}

fn parse_date(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => NaiveDate::parse_from_str(v, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("'{name}' must be a YYYY-MM-DD date, got '{v}'"))),
    }
}

impl FilterQuery {
    fn values(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::Broker => &self.broker,
            Dimension::Region => &self.region,
            Dimension::Sector => &self.sector,
            Dimension::Instrument => &self.instrument,
            Dimension::Side => &self.side,
            Dimension::AssetClass => &self.asset_class,
        }
    }

    fn submitted(&self) -> bool {
        self.submitted.as_deref().is_some_and(|v| !v.is_empty())
    }

    /// Builds the selection for the multi-selects `panel` actually has.
    pub fn selection(&self, panel: &FilterPanel) -> Result<FilterSelection, AppError> {
        let mut selection = FilterSelection::new();
        selection.from = parse_date("from", self.from.as_deref())?;
        selection.to = parse_date("to", self.to.as_deref())?;

        for control in &panel.controls {
            if let Control::MultiSelect { dimension, .. } = control {
                let values = self.values(*dimension);
                if !values.is_empty() || self.submitted() {
                    selection = selection.select(*dimension, values.iter().cloned());
                }
            }
        }
        Ok(selection)
    }
}
