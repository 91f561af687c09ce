use crate::enums::{Dimension, Side};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of decimal places prices and slippage are held at.
pub const PRICE_DP: u32 = 2;

/// A row that the filter engine and the aggregations can operate on.
pub trait Record {
    /// The trade (or bucket) date of the row.
    fn date(&self) -> NaiveDate;

    /// The value of a categorical column, or `None` if this record type has no such column.
    fn dimension(&self, dimension: Dimension) -> Option<&str>;
}

/// Weekly equity flow attributed to one bank and one sector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRecord {
    pub date: NaiveDate,
    pub bank: String,
    pub sector: String,
    pub asset_class: String,
    pub flow: i64,
}

impl Record for FlowRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn dimension(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Broker => Some(&self.bank),
            Dimension::Sector => Some(&self.sector),
            Dimension::AssetClass => Some(&self.asset_class),
            _ => None,
        }
    }
}

/// A CDS quote from a broker together with the price the trade actually executed at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub date: NaiveDate,
    pub broker: String,
    pub region: String,
    pub quote: Decimal,
    pub execution: Decimal,
    pub slippage: Decimal,
}

impl QuoteRecord {
    /// Builds a record, deriving `slippage = execution - quote` at two decimal places.
    pub fn new(
        date: NaiveDate,
        broker: impl Into<String>,
        region: impl Into<String>,
        quote: Decimal,
        execution: Decimal,
    ) -> Self {
        Self {
            date,
            broker: broker.into(),
            region: region.into(),
            quote,
            execution,
            slippage: (execution - quote).round_dp(PRICE_DP),
        }
    }
}

impl Record for QuoteRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn dimension(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Broker => Some(&self.broker),
            Dimension::Region => Some(&self.region),
            _ => None,
        }
    }
}

/// A filled order measured against a sampled reference price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillRecord {
    pub date: NaiveDate,
    pub broker: String,
    /// Only populated on datasets that break fills down by asset type.
    pub asset_type: Option<String>,
    pub instrument: String,
    pub side: Side,
    pub quantity: u32,
    pub avg_fill: Decimal,
    pub sample_price: Decimal,
    pub slippage: Decimal,
}

impl FillRecord {
    /// Builds a record, deriving `slippage = (avg_fill - sample_price) * quantity`
    /// at two decimal places.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        date: NaiveDate,
        broker: impl Into<String>,
        asset_type: Option<String>,
        instrument: impl Into<String>,
        side: Side,
        quantity: u32,
        avg_fill: Decimal,
        sample_price: Decimal,
    ) -> Self {
        let slippage = ((avg_fill - sample_price) * Decimal::from(quantity)).round_dp(PRICE_DP);
        Self {
            date,
            broker: broker.into(),
            asset_type,
            instrument: instrument.into(),
            side,
            quantity,
            avg_fill,
            sample_price,
            slippage,
        }
    }

    /// Price improvement per unit in the trader's favour: positive when a buy filled
    /// below the sample price or a sell filled above it.
    pub fn edge(&self) -> Decimal {
        match self.side {
            Side::Buy => self.sample_price - self.avg_fill,
            Side::Sell => self.avg_fill - self.sample_price,
        }
    }

    /// A winning fill beat the sample price for its side.
    pub fn is_winner(&self) -> bool {
        self.edge() > Decimal::ZERO
    }

    /// Total price improvement across the filled quantity.
    pub fn pnl(&self) -> Decimal {
        (self.edge() * Decimal::from(self.quantity)).round_dp(PRICE_DP)
    }
}

impl Record for FillRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn dimension(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Broker => Some(&self.broker),
            Dimension::Instrument => Some(&self.instrument),
            Dimension::Side => Some(self.side.as_str()),
            Dimension::AssetClass => self.asset_type.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_quote_slippage_is_execution_minus_quote() {
        let record = QuoteRecord::new(day(2), "JPM", "US", dec!(100.00), dec!(105.00));
        assert_eq!(record.slippage, dec!(5.00));

        let record = QuoteRecord::new(day(2), "MS", "US", dec!(100.10), dec!(95.35));
        assert_eq!(record.slippage, dec!(-4.75));
    }

    #[test]
    fn test_fill_slippage_scales_with_quantity() {
        let record = FillRecord::new(day(3), "UBS", None, "Inst1", Side::Buy, 3, dec!(101), dec!(99.37));
        assert_eq!(record.slippage, dec!(4.89));
        assert_eq!(record.edge(), dec!(-1.63));
        assert!(!record.is_winner());
        assert_eq!(record.pnl(), dec!(-4.89));
    }

    #[test]
    fn test_sell_fill_above_sample_is_a_winner() {
        let record = FillRecord::new(day(3), "UBS", None, "Inst2", Side::Sell, 2, dec!(102), dec!(100.50));
        assert!(record.is_winner());
        assert_eq!(record.pnl(), dec!(3.00));
    }

    #[test]
    fn test_records_expose_only_their_dimensions() {
        let flow = FlowRecord {
            date: day(7),
            bank: "JPM".to_string(),
            sector: "Energy".to_string(),
            asset_class: "Equities".to_string(),
            flow: 10,
        };
        assert_eq!(flow.dimension(Dimension::Broker), Some("JPM"));
        assert_eq!(flow.dimension(Dimension::Region), None);

        let fill = FillRecord::new(day(3), "MS", None, "Inst4", Side::Sell, 1, dec!(100), dec!(100));
        assert_eq!(fill.dimension(Dimension::Side), Some("Sell"));
        assert_eq!(fill.dimension(Dimension::AssetClass), None);
    }
}
