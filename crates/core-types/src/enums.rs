use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Buy, Side::Sell];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "Buy",
            Side::Sell => "Sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            _ => Err(CoreError::InvalidInput("side".to_string(), s.to_string())),
        }
    }
}

/// A categorical column that rows can be filtered and grouped on.
///
/// Each record type decides which dimensions it carries; asking a record for a
/// dimension it does not have yields `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Broker,
    Region,
    Sector,
    Instrument,
    Side,
    AssetClass,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Broker,
        Dimension::Region,
        Dimension::Sector,
        Dimension::Instrument,
        Dimension::Side,
        Dimension::AssetClass,
    ];

    /// The stable key used in query strings and on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            Dimension::Broker => "broker",
            Dimension::Region => "region",
            Dimension::Sector => "sector",
            Dimension::Instrument => "instrument",
            Dimension::Side => "side",
            Dimension::AssetClass => "asset_class",
        }
    }

    /// Column heading used in tables.
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Broker => "Broker",
            Dimension::Region => "Region",
            Dimension::Sector => "Sector",
            Dimension::Instrument => "Instrument",
            Dimension::Side => "Side",
            Dimension::AssetClass => "Asset_Type",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Dimension {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "broker" | "bank" => Ok(Dimension::Broker),
            "region" => Ok(Dimension::Region),
            "sector" => Ok(Dimension::Sector),
            "instrument" => Ok(Dimension::Instrument),
            "side" => Ok(Dimension::Side),
            "asset_class" | "asset_type" => Ok(Dimension::AssetClass),
            _ => Err(CoreError::InvalidInput("dimension".to_string(), s.to_string())),
        }
    }
}
