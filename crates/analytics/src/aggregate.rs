use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;

/// Count and sum of a numeric column over a group of rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub count: usize,
    pub sum: Decimal,
}

impl Stats {
    pub fn push(&mut self, value: Decimal) {
        self.count += 1;
        self.sum += value;
    }

    /// `None` for an empty group.
    pub fn mean(&self) -> Option<Decimal> {
        (self.count > 0).then(|| self.sum / Decimal::from(self.count))
    }

    pub fn measure(&self, measure: Measure) -> Option<Decimal> {
        match measure {
            Measure::Sum => Some(self.sum),
            Measure::Mean => self.mean(),
            Measure::Count => Some(Decimal::from(self.count)),
        }
    }
}

impl FromIterator<Decimal> for Stats {
    fn from_iter<I: IntoIterator<Item = Decimal>>(iter: I) -> Self {
        let mut stats = Stats::default();
        for value in iter {
            stats.push(value);
        }
        stats
    }
}

/// The reduction applied to each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Sum,
    Mean,
    Count,
}

/// Partitions rows by key. Each row lands in exactly one group.
pub fn group_by<'a, R: 'a, K: Ord>(
    rows: impl IntoIterator<Item = &'a R>,
    key: impl Fn(&R) -> K,
) -> BTreeMap<K, Vec<&'a R>> {
    let mut groups: BTreeMap<K, Vec<&'a R>> = BTreeMap::new();
    for row in rows {
        groups.entry(key(row)).or_default().push(row);
    }
    groups
}

/// Groups rows by key and summarises one numeric column per group.
pub fn summarize<'a, R: 'a, K: Ord>(
    rows: impl IntoIterator<Item = &'a R>,
    key: impl Fn(&R) -> K,
    value: impl Fn(&R) -> Decimal,
) -> BTreeMap<K, Stats> {
    let mut groups: BTreeMap<K, Stats> = BTreeMap::new();
    for row in rows {
        groups.entry(key(row)).or_default().push(value(row));
    }
    groups
}

/// Reindexes a one-key grouping by `order`. Keys absent from the grouping yield `None`.
pub fn ordered<K: Ord + Borrow<str>>(
    groups: &BTreeMap<K, Stats>,
    order: &[String],
    measure: Measure,
) -> Vec<(String, Option<Decimal>)> {
    order
        .iter()
        .map(|name| {
            let value = groups
                .get(name.as_str())
                .and_then(|stats| stats.measure(measure));
            (name.clone(), value)
        })
        .collect()
}

/// A dense two-dimensional table of aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matrix {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    /// `values[r][c]` for `rows[r]` and `columns[c]`.
    pub values: Vec<Vec<Decimal>>,
}

impl Matrix {
    pub fn column(&self, index: usize) -> Vec<Decimal> {
        self.values.iter().map(|row| row[index]).collect()
    }
}

/// Pivots a two-key grouping into a matrix indexed by the given orders.
///
/// Missing cells are filled with zero.
pub fn pivot(
    groups: &BTreeMap<(String, String), Stats>,
    rows: &[String],
    columns: &[String],
    measure: Measure,
) -> Matrix {
    let values = rows
        .iter()
        .map(|r| {
            columns
                .iter()
                .map(|c| {
                    groups
                        .get(&(r.clone(), c.clone()))
                        .and_then(|stats| stats.measure(measure))
                        .unwrap_or(Decimal::ZERO)
                })
                .collect()
        })
        .collect();
    Matrix {
        rows: rows.to_vec(),
        columns: columns.to_vec(),
        values,
    }
}

/// Granularity for time-ordered charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBucket {
    Day,
    Month,
}

impl TimeBucket {
    /// The first date of the bucket containing `date`. Sorting by it is chronological.
    pub fn start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            TimeBucket::Day => date,
            TimeBucket::Month => date.with_day(1).unwrap_or(date),
        }
    }

    pub fn label(&self, date: NaiveDate) -> String {
        match self {
            TimeBucket::Day => date.format("%Y-%m-%d").to_string(),
            TimeBucket::Month => date.format("%Y-%m").to_string(),
        }
    }
}
