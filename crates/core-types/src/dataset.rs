use crate::enums::Dimension;
use crate::structs::Record;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// An in-memory table of records plus the domain it was generated over.
///
/// The category lists keep the order the values were declared in, which is the
/// canonical order for pivots and chart axes. `dates` is the calendar the rows were
/// drawn from and bounds the date filter.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset<R> {
    pub rows: Vec<R>,
    pub categories: BTreeMap<Dimension, Vec<String>>,
    pub dates: Vec<NaiveDate>,
}

impl<R: Record> Dataset<R> {
    pub fn new(rows: Vec<R>, dates: Vec<NaiveDate>) -> Self {
        Self {
            rows,
            categories: BTreeMap::new(),
            dates,
        }
    }

    /// Declares the canonical values of a dimension.
    pub fn with_categories<S: Into<String>>(
        mut self,
        dimension: Dimension,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        self.categories
            .insert(dimension, values.into_iter().map(Into::into).collect());
        self
    }

    /// The canonical values of a dimension, or an empty slice if it was never declared.
    pub fn categories(&self, dimension: Dimension) -> &[String] {
        self.categories
            .get(&dimension)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// First and last calendar date, falling back to the rows when no calendar was given.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let dates = self
            .dates
            .iter()
            .copied()
            .chain(self.rows.iter().map(Record::date));
        dates.fold(None, |bounds, date| match bounds {
            None => Some((date, date)),
            Some((lo, hi)) => Some((lo.min(date), hi.max(date))),
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
