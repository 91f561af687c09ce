use chrono::NaiveDate;
use core_types::{Dimension, Record};
use serde::Serialize;
use std::collections::BTreeSet;

/// A boolean condition on one column of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// `from <= date <= to`. A reversed range matches nothing.
    DateRange { from: NaiveDate, to: NaiveDate },
    /// The dimension's value is one of `values`. An empty set matches nothing.
    OneOf {
        dimension: Dimension,
        values: BTreeSet<String>,
    },
    /// The dimension's value equals `value`.
    Equals { dimension: Dimension, value: String },
}

impl Predicate {
    /// Rows that do not carry the predicate's dimension never match.
    pub fn matches<R: Record>(&self, row: &R) -> bool {
        match self {
            Predicate::DateRange { from, to } => {
                let date = row.date();
                *from <= date && date <= *to
            }
            Predicate::OneOf { dimension, values } => row
                .dimension(*dimension)
                .is_some_and(|v| values.contains(v)),
            Predicate::Equals { dimension, value } => {
                row.dimension(*dimension) == Some(value.as_str())
            }
        }
    }
}

/// The conjunction of the active predicates.
///
/// An empty state matches every row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    predicates: Vec<Predicate>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date_range(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.predicates.push(Predicate::DateRange { from, to });
        self
    }

    pub fn one_of<S: Into<String>>(
        mut self,
        dimension: Dimension,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        self.predicates.push(Predicate::OneOf {
            dimension,
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn equals(mut self, dimension: Dimension, value: impl Into<String>) -> Self {
        self.predicates.push(Predicate::Equals {
            dimension,
            value: value.into(),
        });
        self
    }

    pub fn matches<R: Record>(&self, row: &R) -> bool {
        self.predicates.iter().all(|p| p.matches(row))
    }

    /// Returns the rows satisfying every predicate, in their original order.
    pub fn apply<'a, R: Record>(&self, rows: &'a [R]) -> Vec<&'a R> {
        let filtered: Vec<&R> = rows.iter().filter(|r| self.matches(*r)).collect();
        tracing::debug!(
            total = rows.len(),
            kept = filtered.len(),
            predicates = self.predicates.len(),
            "Applied filters."
        );
        filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use configuration::DatasetSettings;
    use core_types::{FillRecord, QuoteRecord, Side};
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn two_quotes() -> Vec<QuoteRecord> {
        vec![
            QuoteRecord::new(day(2), "A", "US", dec!(100), dec!(105)),
            QuoteRecord::new(day(3), "B", "US", dec!(100), dec!(95)),
        ]
    }

    #[test]
    fn test_filter_to_single_broker() {
        let rows = two_quotes();
        let filtered = FilterState::new().one_of(Dimension::Broker, ["A"]).apply(&rows);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].broker, "A");
        assert_eq!(filtered[0].slippage, dec!(5));
    }

    #[test]
    fn test_empty_selection_yields_empty_result() {
        let rows = two_quotes();
        let none: [&str; 0] = [];
        assert!(FilterState::new().one_of(Dimension::Broker, none).apply(&rows).is_empty());
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let rows = two_quotes();
        assert_eq!(FilterState::new().date_range(day(2), day(2)).apply(&rows).len(), 1);
        assert_eq!(FilterState::new().date_range(day(2), day(3)).apply(&rows).len(), 2);
        assert!(FilterState::new().date_range(day(3), day(2)).apply(&rows).is_empty());
    }

    #[test]
    fn test_missing_dimension_never_matches() {
        let rows = two_quotes();
        let state = FilterState::new().one_of(Dimension::Instrument, ["Inst1"]);
        assert!(state.apply(&rows).is_empty());

        let fill = FillRecord::new(day(2), "A", None, "Inst1", Side::Buy, 1, dec!(1), dec!(1));
        assert!(!FilterState::new().equals(Dimension::AssetClass, "Equity").matches(&fill));
    }

    #[test]
    fn test_predicates_are_conjunctive() {
        let rows = two_quotes();
        let state = FilterState::new()
            .one_of(Dimension::Broker, ["A", "B"])
            .equals(Dimension::Region, "US")
            .date_range(day(3), day(31));
        let filtered = state.apply(&rows);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].broker, "B");
    }

    #[test]
    fn test_filtered_rows_are_a_subset_honoring_every_predicate() {
        let dataset = generator::cds_quotes(&DatasetSettings::default().best_brokers).unwrap();
        let state = FilterState::new()
            .date_range(day(15), NaiveDate::from_ymd_opt(2024, 4, 30).unwrap())
            .one_of(Dimension::Broker, ["JPM", "UBS"])
            .one_of(Dimension::Region, ["Europe"]);

        let filtered = state.apply(&dataset.rows);
        assert!(!filtered.is_empty());
        assert!(filtered.len() <= dataset.len());
        for row in &filtered {
            assert!(row.broker == "JPM" || row.broker == "UBS");
            assert_eq!(row.region, "Europe");
            assert!(row.date >= day(15) && row.date <= NaiveDate::from_ymd_opt(2024, 4, 30).unwrap());
        }
        let expected = dataset.rows.iter().filter(|r| state.matches(*r)).count();
        assert_eq!(filtered.len(), expected);
    }
}
