//! # Model Training
//!
//! Thin wrappers for loading a tabular file and fitting a basic classifier on it,
//! plus a generator for the labelled sample file the Winning Trades page trains on.

use configuration::DatasetParams;
use generator::FillModel;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

pub mod error;
pub mod features;
pub mod labeling;
pub mod model;
pub mod scaler;

pub use error::TrainerError;
pub use features::TARGET;
pub use model::{TrainingReport, train_model};

/// Reads a CSV file with a header row into a DataFrame.
pub fn load_data(path: &Path) -> Result<DataFrame, TrainerError> {
    let df = CsvReader::from_path(path)?.has_header(true).finish()?;
    tracing::debug!(file = %path.display(), shape = ?df.shape(), "Loaded dataset.");
    Ok(df)
}

/// Builds a labelled dataset of synthetic fills.
///
/// Features come from [`features::generate_features`]; `target` is 1 for winning fills.
pub fn build_dataset(params: &DatasetParams) -> Result<DataFrame, TrainerError> {
    let dataset = generator::fills(params, &FillModel::tight())?;
    let mut df = features::generate_features(&dataset.rows)?;
    df.with_column(labeling::label_winners(&dataset.rows))?;
    Ok(df)
}

/// Builds the labelled dataset and writes it as CSV, creating parent directories.
pub fn generate_dataset(params: &DatasetParams, output: &Path) -> Result<DataFrame, TrainerError> {
    let mut df = build_dataset(params)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = File::create(output)?;
    CsvWriter::new(&mut file).finish(&mut df)?;
    tracing::info!(file = %output.display(), shape = ?df.shape(), "Sample dataset written.");
    Ok(df)
}
