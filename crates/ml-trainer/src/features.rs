use crate::error::TrainerError;
use core_types::{FillRecord, Side};
use polars::prelude::*;
use rust_decimal::prelude::*;

/// Name of the label column every training frame carries.
pub const TARGET: &str = "target";

/// Builds the feature columns for a slice of fills.
///
/// - `quantity`, `avg_fill`, `sample_price`: the raw trade values.
/// - `is_buy`: 1.0 for buys, 0.0 for sells.
///
/// Nothing derived from the winning-fill label goes in here.
pub fn generate_features(fills: &[FillRecord]) -> Result<DataFrame, TrainerError> {
    let mut quantity = Vec::with_capacity(fills.len());
    let mut avg_fill = Vec::with_capacity(fills.len());
    let mut sample_price = Vec::with_capacity(fills.len());
    let mut is_buy = Vec::with_capacity(fills.len());

    for fill in fills {
        quantity.push(f64::from(fill.quantity));
        avg_fill.push(fill.avg_fill.to_f64().unwrap_or(f64::NAN));
        sample_price.push(fill.sample_price.to_f64().unwrap_or(f64::NAN));
        is_buy.push(if fill.side == Side::Buy { 1.0 } else { 0.0 });
    }

    let df = DataFrame::new(vec![
        Series::new("quantity", quantity),
        Series::new("avg_fill", avg_fill),
        Series::new("sample_price", sample_price),
        Series::new("is_buy", is_buy),
    ])?;

    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_feature_columns() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let fills = vec![
            FillRecord::new(date, "JPM", None, "Inst1", Side::Buy, 2, dec!(99), dec!(100.5)),
            FillRecord::new(date, "MS", None, "Inst2", Side::Sell, 4, dec!(99), dec!(100.5)),
        ];
        let df = generate_features(&fills).unwrap();

        assert_eq!(df.get_column_names(), vec!["quantity", "avg_fill", "sample_price", "is_buy"]);
        let quantity: Vec<f64> = df.column("quantity").unwrap().f64().unwrap().into_no_null_iter().collect();
        assert_eq!(quantity, vec![2.0, 4.0]);
        let is_buy: Vec<f64> = df.column("is_buy").unwrap().f64().unwrap().into_no_null_iter().collect();
        assert_eq!(is_buy, vec![1.0, 0.0]);
    }
}
