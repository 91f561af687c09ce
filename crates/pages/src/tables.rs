//! Tables shared by several pages.

use analytics::{AnalyticsError, Cell, Measure, Stats, Table, group_by};
use core_types::{Dimension, FillRecord, FlowRecord, PRICE_DP, QuoteRecord, Record};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

pub const RAW_DATA: &str = "Raw Data";

pub fn raw_flows(rows: &[&FlowRecord]) -> Result<Table, AnalyticsError> {
    let mut table = Table::new(RAW_DATA, ["Date", "Bank", "Sector", "Asset_Class", "Flow"]);
    for row in rows {
        table.push_row(vec![
            row.date.into(),
            row.bank.as_str().into(),
            row.sector.as_str().into(),
            row.asset_class.as_str().into(),
            row.flow.into(),
        ])?;
    }
    Ok(table)
}

pub fn raw_quotes(rows: &[&QuoteRecord]) -> Result<Table, AnalyticsError> {
    let mut table = Table::new(
        RAW_DATA,
        ["Date", "Broker", "Region", "Quote", "Execution", "Slippage"],
    );
    for row in rows {
        table.push_row(vec![
            row.date.into(),
            row.broker.as_str().into(),
            row.region.as_str().into(),
            row.quote.into(),
            row.execution.into(),
            row.slippage.into(),
        ])?;
    }
    Ok(table)
}

/// The asset type column is only present when the fills carry one.
pub fn raw_fills(rows: &[&FillRecord], with_asset_type: bool) -> Result<Table, AnalyticsError> {
    let mut columns = vec!["Date", "Broker"];
    if with_asset_type {
        columns.push(Dimension::AssetClass.label());
    }
    columns.extend([
        "Instrument",
        "Side",
        "Quantity",
        "avgFill",
        "samplePrice",
        "Slippage",
    ]);

    let mut table = Table::new(RAW_DATA, columns);
    for row in rows {
        let mut cells: Vec<Cell> = vec![row.date.into(), row.broker.as_str().into()];
        if with_asset_type {
            cells.push(row.asset_type.clone().map_or(Cell::Empty, Cell::Text));
        }
        cells.extend([
            row.instrument.as_str().into(),
            row.side.as_str().into(),
            row.quantity.into(),
            row.avg_fill.into(),
            row.sample_price.into(),
            row.slippage.into(),
        ]);
        table.push_row(cells)?;
    }
    Ok(table)
}

/// Trade count, total quantity and slippage per combination of `keys`.
///
/// Groups are sorted by their key values; decimals are rounded to two places.
pub fn fill_aggregate(
    title: &str,
    rows: &[&FillRecord],
    keys: &[Dimension],
) -> Result<Table, AnalyticsError> {
    let groups = group_by(rows.iter().copied(), |row| {
        keys.iter()
            .map(|d| row.dimension(*d).unwrap_or_default().to_string())
            .collect::<Vec<_>>()
    });

    let mut columns: Vec<String> = keys.iter().map(|d| d.label().to_string()).collect();
    columns.extend(
        ["Trades", "Total_Quantity", "Avg_Slippage", "Total_Slippage"].map(String::from),
    );
    let mut table = Table::new(title, columns);

    for (key, members) in groups {
        let slippage: Stats = members.iter().map(|r| r.slippage).collect();
        let quantity: u64 = members.iter().map(|r| u64::from(r.quantity)).sum();
        let mut cells: Vec<Cell> = key.into_iter().map(Cell::Text).collect();
        cells.extend([
            slippage.count.into(),
            Cell::Int(quantity as i64),
            slippage.mean().map(|m| m.round_dp(PRICE_DP)).into(),
            slippage.sum.round_dp(PRICE_DP).into(),
        ]);
        table.push_row(cells)?;
    }
    Ok(table)
}

/// Rounds an optional aggregate for display.
pub(crate) fn round(value: Option<Decimal>) -> Option<Decimal> {
    value.map(|v| v.round_dp(PRICE_DP))
}

/// One-key groups as chart points, in key order.
pub(crate) fn points<K>(
    groups: BTreeMap<K, Stats>,
    label: impl Fn(K) -> String,
    measure: Measure,
) -> Vec<(String, Option<Decimal>)> {
    groups
        .into_iter()
        .map(|(key, stats)| (label(key), round(stats.measure(measure))))
        .collect()
}
