//! Canonical category values. The order here is the order pivots and charts use.

pub const BROKERS: [&str; 5] = ["JPM", "MS", "Societe Generale", "Barclays", "UBS"];
pub const REGIONS: [&str; 3] = ["US", "Europe", "EMEA"];
pub const SECTORS: [&str; 5] = ["Technology", "Healthcare", "Finance", "Energy", "Consumer"];
pub const INSTRUMENTS: [&str; 4] = ["Inst1", "Inst2", "Inst3", "Inst4"];
pub const ASSET_TYPES: [&str; 3] = ["Equity", "Credit", "Rates"];

/// Asset class stamped on every broker-flow row.
pub const EQUITIES: &str = "Equities";
