use crate::calendar;
use crate::catalog::{ASSET_TYPES, BROKERS, INSTRUMENTS};
use crate::error::GeneratorError;
use crate::sampler::Sampler;
use configuration::DatasetParams;
use core_types::{Dataset, Dimension, FillRecord, Side};
use rand_distr::Normal;
use rust_decimal::Decimal;

/// Shape of the fill dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct FillModel {
    /// Adds an asset-type column drawn from Equity, Credit and Rates.
    pub with_asset_type: bool,
    pub sample_price_mean: f64,
    pub sample_price_std_dev: f64,
}

impl FillModel {
    /// The reporting pages' model. The wide sample-price dispersion is deliberate:
    /// the CDS reports were built against it.
    pub fn report() -> Self {
        Self {
            with_asset_type: false,
            sample_price_mean: 98.0,
            sample_price_std_dev: 102.0,
        }
    }

    /// Sample prices centred on the fill range, so roughly half the fills win.
    pub fn tight() -> Self {
        Self {
            with_asset_type: false,
            sample_price_mean: 99.5,
            sample_price_std_dev: 2.5,
        }
    }

    pub fn with_asset_type(mut self) -> Self {
        self.with_asset_type = true;
        self
    }
}

impl Default for FillModel {
    fn default() -> Self {
        Self::report()
    }
}

/// Builds a table of fills measured against a sampled reference price.
///
/// Quantities are drawn from `1..=9` and average fills are whole prices in
/// `95..=104`.
pub fn fills(params: &DatasetParams, model: &FillModel) -> Result<Dataset<FillRecord>, GeneratorError> {
    let dates = calendar::business_days(params.start, params.end);
    if dates.is_empty() {
        return Err(GeneratorError::EmptyCalendar {
            dataset: "fills",
            start: params.start,
            end: params.end,
        });
    }

    let price_dist = Normal::new(model.sample_price_mean, model.sample_price_std_dev)?;
    let mut sampler = Sampler::seeded(params.seed);

    let rows = (0..params.rows)
        .map(|_| {
            let date = *sampler.choose("dates", &dates)?;
            let broker = *sampler.choose("brokers", &BROKERS)?;
            let asset_type = if model.with_asset_type {
                Some(sampler.choose("asset types", &ASSET_TYPES)?.to_string())
            } else {
                None
            };
            let instrument = *sampler.choose("instruments", &INSTRUMENTS)?;
            let side = *sampler.choose("sides", &Side::ALL)?;
            let quantity: u32 = sampler.int(1..=9);
            let avg_fill = Decimal::from(sampler.int(95..=104_i64));
            let sample_price = sampler.price(&price_dist)?;
            Ok(FillRecord::new(
                date,
                broker,
                asset_type,
                instrument,
                side,
                quantity,
                avg_fill,
                sample_price,
            ))
        })
        .collect::<Result<Vec<_>, GeneratorError>>()?;
    tracing::debug!(
        rows = rows.len(),
        seed = params.seed,
        with_asset_type = model.with_asset_type,
        "Generated fill dataset."
    );

    let mut dataset = Dataset::new(rows, dates)
        .with_categories(Dimension::Broker, BROKERS)
        .with_categories(Dimension::Instrument, INSTRUMENTS)
        .with_categories(Dimension::Side, Side::ALL.map(|s| s.as_str()));
    if model.with_asset_type {
        dataset = dataset.with_categories(Dimension::AssetClass, ASSET_TYPES);
    }
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use configuration::DatasetSettings;
    use rust_decimal_macros::dec;

    #[test]
    fn test_slippage_is_scaled_by_quantity() {
        let dataset = fills(&DatasetSettings::default().full_report, &FillModel::report()).unwrap();
        assert_eq!(dataset.len(), 1000);
        for row in &dataset.rows {
            assert!((1..=9).contains(&row.quantity));
            assert!(row.avg_fill >= dec!(95) && row.avg_fill <= dec!(104));
            assert_eq!(
                row.slippage,
                (row.avg_fill - row.sample_price) * Decimal::from(row.quantity)
            );
            assert!(row.asset_type.is_none());
        }
    }

    #[test]
    fn test_asset_type_column_is_optional() {
        let params = DatasetSettings::default().counterparty_flows;
        let dataset = fills(&params, &FillModel::report().with_asset_type()).unwrap();
        assert!(dataset.rows.iter().all(|r| {
            r.asset_type
                .as_deref()
                .is_some_and(|a| ASSET_TYPES.contains(&a))
        }));
        assert_eq!(dataset.categories(Dimension::AssetClass), ASSET_TYPES);
    }

    #[test]
    fn test_tight_model_produces_winners_and_losers() {
        let params = DatasetSettings::default().winning_trades;
        let dataset = fills(&params, &FillModel::tight()).unwrap();
        let winners = dataset.rows.iter().filter(|r| r.is_winner()).count();
        assert!(winners > 100 && winners < 900, "winners = {winners}");
    }

    #[test]
    fn test_negative_dispersion_is_rejected() {
        let model = FillModel {
            sample_price_std_dev: -1.0,
            ..FillModel::report()
        };
        assert!(matches!(
            fills(&DatasetSettings::default().full_report, &model),
            Err(GeneratorError::InvalidDistribution(_))
        ));
    }
}
