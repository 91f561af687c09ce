use analytics::FilterState;
use chrono::NaiveDate;
use core_types::{Dataset, Dimension, Record};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where a page shows its filter controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Sidebar,
    /// An expanded section at the top of the page body.
    Inline,
}

/// One user-facing filter control.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum Control {
    /// A two-ended date slider bounded by `min` and `max`; defaults to the full range.
    DateRange {
        key: String,
        label: String,
        min: NaiveDate,
        max: NaiveDate,
    },
    /// A multi-select over the canonical values of a dimension; defaults to all of them.
    MultiSelect {
        key: String,
        label: String,
        dimension: Dimension,
        options: Vec<String>,
    },
}

impl Control {
    /// The query-string name of the control. Date ranges use `from` and `to` instead.
    pub fn key(&self) -> &str {
        match self {
            Control::DateRange { key, .. } | Control::MultiSelect { key, .. } => key,
        }
    }

    /// A date slider spanning the dataset's calendar. `None` for a dataset without dates.
    pub fn date_range<R: Record>(label: &str, dataset: &Dataset<R>) -> Option<Self> {
        dataset.date_bounds().map(|(min, max)| Control::DateRange {
            key: "date".to_string(),
            label: label.to_string(),
            min,
            max,
        })
    }

    /// A multi-select over the dataset's canonical values for `dimension`.
    pub fn multi_select<R: Record>(label: &str, dimension: Dimension, dataset: &Dataset<R>) -> Self {
        Control::MultiSelect {
            key: dimension.key().to_string(),
            label: label.to_string(),
            dimension,
            options: dataset.categories(dimension).to_vec(),
        }
    }
}

/// The raw user input for a page's filters.
///
/// A dimension missing from `selections` means "use the control's default"; an
/// explicitly empty list means "nothing selected".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub selections: BTreeMap<Dimension, Vec<String>>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dates(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn select<S: Into<String>>(mut self, dimension: Dimension, values: impl IntoIterator<Item = S>) -> Self {
        self.selections
            .insert(dimension, values.into_iter().map(Into::into).collect());
        self
    }
}

/// The effective filter values after defaults have been applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedFilters {
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    /// Selected values per multi-select, in the order the user gave them.
    pub selected: BTreeMap<Dimension, Vec<String>>,
    #[serde(skip)]
    pub state: FilterState,
}

impl ResolvedFilters {
    pub fn selected(&self, dimension: Dimension) -> &[String] {
        self.selected.get(&dimension).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `order` restricted to the selected values of `dimension`, keeping `order`'s sequence.
    pub fn selected_in_order(&self, dimension: Dimension, order: &[String]) -> Vec<String> {
        let selected = self.selected(dimension);
        order
            .iter()
            .filter(|v| selected.contains(v))
            .cloned()
            .collect()
    }
}

/// A page's filter controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterPanel {
    pub header: String,
    pub placement: Placement,
    pub controls: Vec<Control>,
}

impl FilterPanel {
    pub fn new(placement: Placement) -> Self {
        Self {
            header: "Filters".to_string(),
            placement,
            controls: Vec::new(),
        }
    }

    pub fn control(mut self, control: Option<Control>) -> Self {
        self.controls.extend(control);
        self
    }

    /// Turns raw input into predicates. Never fails.
    ///
    /// Dates are clamped to the slider bounds; a reversed range is kept as given and
    /// matches nothing. Values that are not options of their control are dropped.
    pub fn resolve(&self, selection: &FilterSelection) -> ResolvedFilters {
        let mut state = FilterState::new();
        let mut date_range = None;
        let mut selected = BTreeMap::new();

        for control in &self.controls {
            match control {
                Control::DateRange { min, max, .. } => {
                    let from = selection.from.unwrap_or(*min).clamp(*min, *max);
                    let to = selection.to.unwrap_or(*max).clamp(*min, *max);
                    state = state.date_range(from, to);
                    date_range = Some((from, to));
                }
                Control::MultiSelect {
                    dimension, options, ..
                } => {
                    let values: Vec<String> = match selection.selections.get(dimension) {
                        None => options.clone(),
                        Some(requested) => {
                            let mut values: Vec<String> = Vec::with_capacity(requested.len());
                            for value in requested {
                                if !options.contains(value) {
                                    tracing::warn!(%dimension, %value, "Ignoring unknown filter value.");
                                } else if !values.contains(value) {
                                    values.push(value.clone());
                                }
                            }
                            values
                        }
                    };
                    state = state.one_of(*dimension, values.iter().cloned());
                    selected.insert(*dimension, values);
                }
            }
        }

        ResolvedFilters {
            date_range,
            selected,
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::QuoteRecord;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn dataset() -> Dataset<QuoteRecord> {
        let rows = vec![
            QuoteRecord::new(day(2), "A", "US", dec!(100), dec!(105)),
            QuoteRecord::new(day(5), "B", "EMEA", dec!(100), dec!(95)),
        ];
        Dataset::new(rows, vec![day(2), day(3), day(4), day(5)])
            .with_categories(Dimension::Broker, ["A", "B"])
            .with_categories(Dimension::Region, ["US", "EMEA"])
    }

    fn panel(dataset: &Dataset<QuoteRecord>) -> FilterPanel {
        FilterPanel::new(Placement::Sidebar)
            .control(Control::date_range("Select date range", dataset))
            .control(Some(Control::multi_select("Select broker(s)", Dimension::Broker, dataset)))
    }

    #[test]
    fn test_defaults_select_everything() {
        let dataset = dataset();
        let resolved = panel(&dataset).resolve(&FilterSelection::new());
        assert_eq!(resolved.date_range, Some((day(2), day(5))));
        assert_eq!(resolved.selected(Dimension::Broker), ["A", "B"]);
        assert_eq!(resolved.state.apply(&dataset.rows).len(), dataset.len());
    }

    #[test]
    fn test_explicit_empty_selection_matches_nothing() {
        let dataset = dataset();
        let none: [&str; 0] = [];
        let selection = FilterSelection::new().select(Dimension::Broker, none);
        let resolved = panel(&dataset).resolve(&selection);
        assert!(resolved.selected(Dimension::Broker).is_empty());
        assert!(resolved.state.apply(&dataset.rows).is_empty());
    }

    #[test]
    fn test_unknown_and_duplicate_values_are_dropped() {
        let dataset = dataset();
        let selection = FilterSelection::new().select(Dimension::Broker, ["B", "Z", "B"]);
        let resolved = panel(&dataset).resolve(&selection);
        assert_eq!(resolved.selected(Dimension::Broker), ["B"]);
    }

    #[test]
    fn test_dates_are_clamped_to_the_slider() {
        let dataset = dataset();
        let selection = FilterSelection::new().dates(day(1), day(31));
        let resolved = panel(&dataset).resolve(&selection);
        assert_eq!(resolved.date_range, Some((day(2), day(5))));
    }

    #[test]
    fn test_selection_order_is_preserved() {
        let dataset = dataset();
        let selection = FilterSelection::new().select(Dimension::Broker, ["B", "A"]);
        let resolved = panel(&dataset).resolve(&selection);
        assert_eq!(resolved.selected(Dimension::Broker), ["B", "A"]);
        let canonical = dataset.categories(Dimension::Broker);
        assert_eq!(resolved.selected_in_order(Dimension::Broker, canonical), vec!["A", "B"]);
    }
}
