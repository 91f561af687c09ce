use crate::error::TrainerError;
use crate::features::TARGET;
use crate::scaler::FeatureScaler;
use configuration::TrainingSettings;
use ndarray::Array2;
use polars::prelude::*;
use serde::Serialize;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::logistic_regression::{LogisticRegression, LogisticRegressionParameters};
use smartcore::metrics::accuracy;
use smartcore::model_selection::train_test_split;
use std::collections::BTreeMap;

/// Outcome of a training run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingReport {
    /// Share of held-out rows predicted correctly, in `[0, 1]`.
    pub accuracy: f64,
    pub train_rows: usize,
    pub test_rows: usize,
    pub features: Vec<String>,
    pub class_distribution: BTreeMap<i32, usize>,
}

/// Fits a logistic regression on every column except `target` and scores it on a
/// held-out split.
///
/// Features are cast to `f64` and standardised; rows with nulls are dropped. The
/// split is shuffled with the configured seed, so repeated runs agree.
pub fn train_model(df: &DataFrame, settings: &TrainingSettings) -> Result<TrainingReport, TrainerError> {
    if !df.get_column_names().contains(&TARGET) {
        return Err(TrainerError::MissingTarget);
    }
    let df = df.drop_nulls::<String>(None)?;

    let x_df = df.drop(TARGET)?;
    let features: Vec<String> = x_df.get_column_names().iter().map(|s| s.to_string()).collect();
    if features.is_empty() {
        return Err(TrainerError::NoFeatures);
    }

    let rows = df.height();
    let test_rows = (rows as f32 * settings.test_size) as usize;
    let train_rows = rows.saturating_sub(test_rows);
    if test_rows == 0 || train_rows < 2 {
        return Err(TrainerError::NotEnoughRows(rows));
    }

    let target = df.column(TARGET)?.cast(&DataType::Int32)?;
    let y: Vec<i32> = target.i32()?.into_no_null_iter().collect();
    let mut class_distribution = BTreeMap::new();
    for label in &y {
        *class_distribution.entry(*label).or_insert(0) += 1;
    }
    if class_distribution.len() < 2 {
        return Err(TrainerError::SingleClass);
    }
    tracing::debug!(rows, ?class_distribution, "Prepared training data.");

    let x_ndarray: Array2<f64> = x_df.to_ndarray::<Float64Type>(IndexOrder::C)?;
    let scaler = FeatureScaler::fit(&x_ndarray);
    let x_scaled = scaler.transform(&x_ndarray);
    let x_matrix = DenseMatrix::new(
        x_scaled.nrows(),
        x_scaled.ncols(),
        x_scaled.iter().copied().collect(),
        false,
    )?;

    let (x_train, x_test, y_train, y_test) =
        train_test_split(&x_matrix, &y, settings.test_size, true, Some(settings.seed));

    let model = LogisticRegression::fit(&x_train, &y_train, LogisticRegressionParameters::default())?;
    let predictions = model.predict(&x_test)?;
    let accuracy = accuracy(&y_test, &predictions);
    tracing::info!(accuracy, train = y_train.len(), test = y_test.len(), "Model trained.");

    Ok(TrainingReport {
        accuracy,
        train_rows: y_train.len(),
        test_rows: y_test.len(),
        features,
        class_distribution,
    })
}
