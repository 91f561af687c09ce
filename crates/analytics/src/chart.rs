use crate::aggregate::Matrix;
use crate::distribution::BoxStats;
use crate::error::AnalyticsError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// One value in a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Date(NaiveDate),
    Int(i64),
    Decimal(Decimal),
    Empty,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Cell::Int(i) => write!(f, "{i}"),
            Cell::Decimal(d) => write!(f, "{d:.2}"),
            Cell::Empty => Ok(()),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Cell::Date(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<u32> for Cell {
    fn from(value: u32) -> Self {
        Cell::Int(i64::from(value))
    }
}

impl From<usize> for Cell {
    fn from(value: usize) -> Self {
        Cell::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<Decimal> for Cell {
    fn from(value: Decimal) -> Self {
        Cell::Decimal(value)
    }
}

impl From<Option<Decimal>> for Cell {
    fn from(value: Option<Decimal>) -> Self {
        value.map_or(Cell::Empty, Cell::Decimal)
    }
}

/// A titled grid of cells. Every row has one cell per column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<S: Into<String>>(title: impl Into<String>, columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            title: title.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<(), AnalyticsError> {
        if row.len() != self.columns.len() {
            return Err(AnalyticsError::ShapeMismatch {
                what: format!("row of table '{}'", self.title),
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Renders a matrix with its row labels in the first column.
    ///
    /// A matrix without columns yields a table without rows.
    pub fn from_matrix(title: impl Into<String>, corner: &str, matrix: &Matrix) -> Self {
        let mut columns = vec![corner.to_string()];
        columns.extend(matrix.columns.iter().cloned());
        let labels = if matrix.columns.is_empty() {
            &[][..]
        } else {
            matrix.rows.as_slice()
        };
        let rows = labels
            .iter()
            .zip(&matrix.values)
            .map(|(label, values)| {
                std::iter::once(Cell::from(label.as_str()))
                    .chain(values.iter().map(|v| Cell::Decimal(*v)))
                    .collect()
            })
            .collect();
        Self {
            title: title.into(),
            columns,
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Line,
}

/// One named line or bar group. `values[i]` belongs to the chart's `categories[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<Option<Decimal>>,
}

/// A bar or line chart over a categorical (or time-ordered) x axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryChart {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub categories: Vec<String>,
    pub series: Vec<Series>,
}

impl CategoryChart {
    pub fn new(kind: ChartKind, title: impl Into<String>, categories: Vec<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            categories,
            series: Vec::new(),
        }
    }

    pub fn labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_label = x.into();
        self.y_label = y.into();
        self
    }

    pub fn push_series(
        &mut self,
        name: impl Into<String>,
        values: Vec<Option<Decimal>>,
    ) -> Result<(), AnalyticsError> {
        let name = name.into();
        if values.len() != self.categories.len() {
            return Err(AnalyticsError::ShapeMismatch {
                what: format!("series '{name}' of chart '{}'", self.title),
                expected: self.categories.len(),
                actual: values.len(),
            });
        }
        self.series.push(Series { name, values });
        Ok(())
    }

    /// A single-series chart from `(category, value)` pairs.
    pub fn from_pairs(
        kind: ChartKind,
        title: impl Into<String>,
        series_name: impl Into<String>,
        pairs: Vec<(String, Option<Decimal>)>,
    ) -> Self {
        let (categories, values): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
        let mut chart = Self::new(kind, title, categories);
        chart.series.push(Series {
            name: series_name.into(),
            values,
        });
        chart
    }

    /// Matrix rows become categories and each matrix column becomes a series.
    pub fn from_matrix(kind: ChartKind, title: impl Into<String>, matrix: &Matrix) -> Self {
        let mut chart = Self::new(kind, title, matrix.rows.clone());
        chart.series = matrix
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| Series {
                name: name.clone(),
                values: matrix.column(i).into_iter().map(Some).collect(),
            })
            .collect();
        chart
    }

    /// No category carries a value.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
            || self
                .series
                .iter()
                .all(|s| s.values.iter().all(Option::is_none))
    }

    /// Smallest and largest value across all series, if any.
    pub fn value_range(&self) -> Option<(Decimal, Decimal)> {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().flatten())
            .fold(None, |range, v| match range {
                None => Some((*v, *v)),
                Some((lo, hi)) => Some((lo.min(*v), hi.max(*v))),
            })
    }
}

/// A slice of a pie. `value` is a magnitude; `negative` records the sign of the
/// total it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: Decimal,
    /// Percentage of the whole pie, one decimal place.
    pub share: Decimal,
    pub negative: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    /// Builds a pie from signed totals by taking magnitudes.
    ///
    /// Zero-magnitude slices are dropped; if every total is zero the pie is empty.
    pub fn from_totals(title: impl Into<String>, totals: Vec<(String, Decimal)>) -> Self {
        let whole: Decimal = totals.iter().map(|(_, v)| v.abs()).sum();
        let slices = if whole.is_zero() {
            Vec::new()
        } else {
            totals
                .into_iter()
                .filter(|(_, v)| !v.is_zero())
                .map(|(label, v)| PieSlice {
                    label,
                    value: v.abs(),
                    share: (v.abs() / whole * Decimal::ONE_HUNDRED).round_dp(1),
                    negative: v.is_sign_negative(),
                })
                .collect()
        };
        Self {
            title: title.into(),
            slices,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

/// Box-and-whisker distributions, one box per group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxPlot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub groups: Vec<BoxStats>,
}

impl BoxPlot {
    /// Empty groups are skipped.
    pub fn from_groups(
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
        groups: impl IntoIterator<Item = (String, Vec<Decimal>)>,
    ) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            groups: groups
                .into_iter()
                .filter_map(|(label, values)| BoxStats::compute(label, values))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Lowest and highest point drawn, outliers included.
    pub fn value_range(&self) -> Option<(Decimal, Decimal)> {
        let lo = self.groups.iter().map(|g| g.min).min()?;
        let hi = self.groups.iter().map(|g| g.max).max()?;
        Some((lo, hi))
    }
}

/// Anything a page can present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "visual", rename_all = "snake_case")]
pub enum Visual {
    Table(Table),
    Chart(CategoryChart),
    Pie(PieChart),
    BoxPlot(BoxPlot),
}

impl Visual {
    pub fn title(&self) -> &str {
        match self {
            Visual::Table(t) => &t.title,
            Visual::Chart(c) => &c.title,
            Visual::Pie(p) => &p.title,
            Visual::BoxPlot(b) => &b.title,
        }
    }

    /// Renderers show an empty-state message instead of an empty visual.
    pub fn is_empty(&self) -> bool {
        match self {
            Visual::Table(t) => t.is_empty(),
            Visual::Chart(c) => c.is_empty(),
            Visual::Pie(p) => p.is_empty(),
            Visual::BoxPlot(b) => b.is_empty(),
        }
    }
}

impl From<Table> for Visual {
    fn from(value: Table) -> Self {
        Visual::Table(value)
    }
}

impl From<CategoryChart> for Visual {
    fn from(value: CategoryChart) -> Self {
        Visual::Chart(value)
    }
}

impl From<PieChart> for Visual {
    fn from(value: PieChart) -> Self {
        Visual::Pie(value)
    }
}

impl From<BoxPlot> for Visual {
    fn from(value: BoxPlot) -> Self {
        Visual::BoxPlot(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cell_formatting() {
        assert_eq!(Cell::from(dec!(5)).to_string(), "5.00");
        assert_eq!(Cell::from(dec!(-1.234)).to_string(), "-1.23");
        assert_eq!(Cell::from(None::<Decimal>).to_string(), "");
        assert_eq!(Cell::from(7_u32).to_string(), "7");
        assert_eq!(
            Cell::from(NaiveDate::from_ymd_opt(2024, 2, 9).unwrap()).to_string(),
            "2024-02-09"
        );
    }

    #[test]
    fn test_table_rejects_ragged_rows() {
        let mut table = Table::new("T", ["a", "b"]);
        assert!(table.push_row(vec![Cell::from("x"), Cell::from(1_i64)]).is_ok());
        assert!(matches!(
            table.push_row(vec![Cell::Empty]),
            Err(AnalyticsError::ShapeMismatch { expected: 2, actual: 1, .. })
        ));
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_pie_uses_magnitudes_and_keeps_sign() {
        let pie = PieChart::from_totals(
            "P",
            vec![
                ("A".to_string(), dec!(30)),
                ("B".to_string(), dec!(-10)),
                ("C".to_string(), dec!(0)),
            ],
        );
        assert_eq!(pie.slices.len(), 2);
        assert_eq!(pie.slices[0].share, dec!(75.0));
        assert_eq!(pie.slices[1].value, dec!(10));
        assert!(pie.slices[1].negative);
        assert!(!pie.slices[0].negative);
    }

    #[test]
    fn test_all_zero_pie_is_empty() {
        let pie = PieChart::from_totals("P", vec![("A".to_string(), dec!(0))]);
        assert!(pie.is_empty());
        assert!(Visual::from(pie).is_empty());
    }

    #[test]
    fn test_chart_empty_state_and_range() {
        let chart = CategoryChart::from_pairs(
            ChartKind::Bar,
            "C",
            "Slippage",
            vec![("JPM".to_string(), None), ("MS".to_string(), None)],
        );
        assert!(chart.is_empty());
        assert_eq!(chart.value_range(), None);

        let mut chart = CategoryChart::new(ChartKind::Line, "L", vec!["a".into(), "b".into()]);
        chart.push_series("s", vec![Some(dec!(-2)), Some(dec!(3))]).unwrap();
        assert!(!chart.is_empty());
        assert_eq!(chart.value_range(), Some((dec!(-2), dec!(3))));
        assert!(chart.push_series("t", vec![None]).is_err());
    }

    #[test]
    fn test_matrix_conversions() {
        let matrix = Matrix {
            rows: vec!["JPM".into(), "MS".into()],
            columns: vec!["Energy".into()],
            values: vec![vec![dec!(1)], vec![dec!(2)]],
        };
        let chart = CategoryChart::from_matrix(ChartKind::Bar, "M", &matrix);
        assert_eq!(chart.categories, vec!["JPM", "MS"]);
        assert_eq!(chart.series[0].name, "Energy");
        assert_eq!(chart.series[0].values, vec![Some(dec!(1)), Some(dec!(2))]);

        let table = Table::from_matrix("M", "Bank", &matrix);
        assert_eq!(table.columns, vec!["Bank", "Energy"]);
        assert_eq!(table.rows[1][1].to_string(), "2.00");
    }

    #[test]
    fn test_box_plot_skips_empty_groups() {
        let plot = BoxPlot::from_groups(
            "B",
            "Broker",
            "Slippage",
            vec![("JPM".to_string(), vec![dec!(1), dec!(2)]), ("MS".to_string(), vec![])],
        );
        assert_eq!(plot.groups.len(), 1);
        assert_eq!(plot.value_range(), Some((dec!(1), dec!(2))));
    }
}
