use rust_decimal::Decimal;
use serde::Serialize;

/// Five-number summary of one group, Tukey style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub label: String,
    pub count: usize,
    pub min: Decimal,
    pub q1: Decimal,
    pub median: Decimal,
    pub q3: Decimal,
    pub max: Decimal,
    pub mean: Decimal,
    /// Most extreme observation no further than 1.5 × IQR below `q1`.
    pub whisker_low: Decimal,
    /// Most extreme observation no further than 1.5 × IQR above `q3`.
    pub whisker_high: Decimal,
    /// Observations beyond the whiskers, ascending.
    pub outliers: Vec<Decimal>,
}

impl BoxStats {
    /// Returns `None` for an empty group.
    pub fn compute(label: impl Into<String>, mut values: Vec<Decimal>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort();

        let q1 = quartile(&values, 1);
        let median = quartile(&values, 2);
        let q3 = quartile(&values, 3);
        let fence = (q3 - q1) * Decimal::new(15, 1);
        let low_fence = q1 - fence;
        let high_fence = q3 + fence;

        let inside = values.iter().filter(|v| **v >= low_fence && **v <= high_fence);
        let whisker_low = inside.clone().next().copied().unwrap_or(q1);
        let whisker_high = inside.last().copied().unwrap_or(q3);
        let outliers = values
            .iter()
            .filter(|v| **v < low_fence || **v > high_fence)
            .copied()
            .collect();

        let count = values.len();
        let sum: Decimal = values.iter().sum();
        Some(Self {
            label: label.into(),
            count,
            min: values[0],
            q1,
            median,
            q3,
            max: values[count - 1],
            mean: sum / Decimal::from(count),
            whisker_low,
            whisker_high,
            outliers,
        })
    }
}

/// The `k`-th quartile of sorted, non-empty data, interpolating linearly between
/// the two closest ranks.
fn quartile(sorted: &[Decimal], k: usize) -> Decimal {
    let scaled = k * (sorted.len() - 1);
    let lo = scaled / 4;
    let remainder = scaled % 4;
    if remainder == 0 {
        return sorted[lo];
    }
    let fraction = Decimal::from(remainder) / Decimal::from(4);
    sorted[lo] + (sorted[lo + 1] - sorted[lo]) * fraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quartiles_interpolate() {
        let stats = BoxStats::compute("A", vec![dec!(4), dec!(1), dec!(3), dec!(2)]).unwrap();
        assert_eq!(stats.q1, dec!(1.75));
        assert_eq!(stats.median, dec!(2.5));
        assert_eq!(stats.q3, dec!(3.25));
        assert_eq!(stats.min, dec!(1));
        assert_eq!(stats.max, dec!(4));
        assert_eq!(stats.mean, dec!(2.5));
        assert!(stats.outliers.is_empty());
        assert_eq!(stats.whisker_low, dec!(1));
        assert_eq!(stats.whisker_high, dec!(4));
    }

    #[test]
    fn test_outliers_fall_outside_whiskers() {
        let values = vec![dec!(1), dec!(2), dec!(3), dec!(4), dec!(5), dec!(100)];
        let stats = BoxStats::compute("B", values).unwrap();
        // q1 = 2.25, q3 = 4.75, IQR = 2.5, fences at -1.5 and 8.5.
        assert_eq!(stats.outliers, vec![dec!(100)]);
        assert_eq!(stats.whisker_high, dec!(5));
        assert_eq!(stats.whisker_low, dec!(1));
        assert_eq!(stats.max, dec!(100));
    }

    #[test]
    fn test_single_value_group() {
        let stats = BoxStats::compute("C", vec![dec!(-3.5)]).unwrap();
        assert_eq!(stats.q1, dec!(-3.5));
        assert_eq!(stats.q3, dec!(-3.5));
        assert_eq!(stats.whisker_low, dec!(-3.5));
        assert_eq!(stats.count, 1);
    }

    #[test]
    fn test_empty_group_has_no_summary() {
        assert!(BoxStats::compute("D", Vec::new()).is_none());
    }
}
