use crate::features::TARGET;
use core_types::FillRecord;
use polars::prelude::*;

/// Labels each fill as a winner or not.
///
/// # Returns
/// A new Series named `target` containing:
/// - `1`: the fill beat its sample price (lower for a buy, higher for a sell).
/// - `0`: it did not.
pub fn label_winners(fills: &[FillRecord]) -> Series {
    let labels: Vec<i32> = fills.iter().map(|f| i32::from(f.is_winner())).collect();
    Series::new(TARGET, labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::Side;
    use rust_decimal_macros::dec;

    #[test]
    fn test_labels_follow_side() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let fills = vec![
            FillRecord::new(date, "JPM", None, "Inst1", Side::Buy, 1, dec!(99), dec!(100)),
            FillRecord::new(date, "JPM", None, "Inst1", Side::Sell, 1, dec!(99), dec!(100)),
            FillRecord::new(date, "JPM", None, "Inst1", Side::Sell, 1, dec!(100), dec!(100)),
        ];
        let labels: Vec<i32> = label_winners(&fills).i32().unwrap().into_no_null_iter().collect();
        assert_eq!(labels, vec![1, 0, 0]);
    }
}
