use crate::calendar;
use crate::catalog::{BROKERS, REGIONS};
use crate::error::GeneratorError;
use crate::sampler::Sampler;
use configuration::DatasetParams;
use core_types::{Dataset, Dimension, QuoteRecord};
use rand_distr::Normal;

const QUOTE_MEAN: f64 = 100.0;
const QUOTE_STD_DEV: f64 = 10.0;
const EXECUTION_MEAN: f64 = 100.0;
const EXECUTION_STD_DEV: f64 = 12.0;

/// Builds the CDS quote-versus-execution table.
///
/// Each row picks a business day, broker and region uniformly, then draws quote
/// and execution prices independently.
pub fn cds_quotes(params: &DatasetParams) -> Result<Dataset<QuoteRecord>, GeneratorError> {
    let dates = calendar::business_days(params.start, params.end);
    if dates.is_empty() {
        return Err(GeneratorError::EmptyCalendar {
            dataset: "cds_quotes",
            start: params.start,
            end: params.end,
        });
    }

    let quote_dist = Normal::new(QUOTE_MEAN, QUOTE_STD_DEV)?;
    let execution_dist = Normal::new(EXECUTION_MEAN, EXECUTION_STD_DEV)?;
    let mut sampler = Sampler::seeded(params.seed);

    let rows = (0..params.rows)
        .map(|_| {
            let date = *sampler.choose("dates", &dates)?;
            let broker = *sampler.choose("brokers", &BROKERS)?;
            let region = *sampler.choose("regions", &REGIONS)?;
            let quote = sampler.price(&quote_dist)?;
            let execution = sampler.price(&execution_dist)?;
            Ok(QuoteRecord::new(date, broker, region, quote, execution))
        })
        .collect::<Result<Vec<_>, GeneratorError>>()?;
    tracing::debug!(rows = rows.len(), seed = params.seed, "Generated CDS quote dataset.");

    Ok(Dataset::new(rows, dates)
        .with_categories(Dimension::Broker, BROKERS)
        .with_categories(Dimension::Region, REGIONS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Weekday};
    use configuration::DatasetSettings;

    #[test]
    fn test_rows_and_slippage() {
        let params = DatasetSettings::default().best_brokers;
        let dataset = cds_quotes(&params).unwrap();

        assert_eq!(dataset.len(), 1000);
        for row in &dataset.rows {
            assert_eq!(row.slippage, row.execution - row.quote);
            assert!(!matches!(row.date.weekday(), Weekday::Sat | Weekday::Sun));
            assert!(row.date >= params.start && row.date <= params.end);
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut params = DatasetSettings::default().best_brokers;
        let first = cds_quotes(&params).unwrap();
        params.seed += 1;
        let second = cds_quotes(&params).unwrap();
        assert_ne!(first.rows, second.rows);
    }

    #[test]
    fn test_weekend_only_range_is_an_error() {
        let mut params = DatasetSettings::default().best_brokers;
        params.start = chrono::NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        params.end = chrono::NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        assert!(matches!(
            cds_quotes(&params),
            Err(GeneratorError::EmptyCalendar { .. })
        ));
    }
}
