use crate::calendar;
use crate::catalog::{BROKERS, EQUITIES, SECTORS};
use crate::error::GeneratorError;
use crate::sampler::Sampler;
use chrono::Weekday;
use configuration::DatasetParams;
use core_types::{Dataset, Dimension, FlowRecord};

/// Builds the weekly bank × sector flow table.
///
/// Every (bank, sector, week) combination appears exactly once, bank-major, with a
/// flow drawn uniformly from `1..=100`. `params.rows` is ignored: the row count is
/// fixed by the Cartesian product.
pub fn broker_flow(params: &DatasetParams) -> Result<Dataset<FlowRecord>, GeneratorError> {
    let dates = calendar::weekly(params.start, params.end, Weekday::Sun);
    if dates.is_empty() {
        return Err(GeneratorError::EmptyCalendar {
            dataset: "broker_flow",
            start: params.start,
            end: params.end,
        });
    }

    let mut sampler = Sampler::seeded(params.seed);
    let mut rows = Vec::with_capacity(BROKERS.len() * SECTORS.len() * dates.len());
    for bank in BROKERS {
        for sector in SECTORS {
            for date in &dates {
                rows.push(FlowRecord {
                    date: *date,
                    bank: bank.to_string(),
                    sector: sector.to_string(),
                    asset_class: EQUITIES.to_string(),
                    flow: sampler.int(1..=100),
                });
            }
        }
    }
    tracing::debug!(rows = rows.len(), seed = params.seed, "Generated broker flow dataset.");

    Ok(Dataset::new(rows, dates)
        .with_categories(Dimension::Broker, BROKERS)
        .with_categories(Dimension::Sector, SECTORS)
        .with_categories(Dimension::AssetClass, [EQUITIES]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use configuration::DatasetSettings;
    use std::collections::HashSet;

    #[test]
    fn test_full_cartesian_product() {
        let params = DatasetSettings::default().broker_flow;
        let dataset = broker_flow(&params).unwrap();

        assert_eq!(dataset.len(), 5 * 5 * 52);
        let combos: HashSet<_> = dataset
            .rows
            .iter()
            .map(|r| (r.bank.clone(), r.sector.clone(), r.date))
            .collect();
        assert_eq!(combos.len(), dataset.len());
        assert!(dataset.rows.iter().all(|r| (1..=100).contains(&r.flow)));
        assert!(dataset.rows.iter().all(|r| r.asset_class == "Equities"));
    }

    #[test]
    fn test_rows_are_bank_major() {
        let dataset = broker_flow(&DatasetSettings::default().broker_flow).unwrap();
        assert_eq!(dataset.rows[0].bank, "JPM");
        assert_eq!(dataset.rows[0].sector, "Technology");
        assert_eq!(dataset.rows[52].sector, "Healthcare");
        assert_eq!(dataset.rows[5 * 52].bank, "MS");
    }

    #[test]
    fn test_generation_is_deterministic() {
        let params = DatasetSettings::default().broker_flow;
        assert_eq!(broker_flow(&params).unwrap().rows, broker_flow(&params).unwrap().rows);
    }
}
