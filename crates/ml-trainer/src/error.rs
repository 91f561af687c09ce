use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrainerError {
    #[error("Failed to read or write the dataset file: {0}")]
    Io(#[from] std::io::Error),

    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("Model error: {0}")]
    Model(#[from] smartcore::error::Failed),

    #[error("Failed to generate the sample dataset: {0}")]
    Generator(#[from] generator::GeneratorError),

    #[error("The dataset has no 'target' column")]
    MissingTarget,

    #[error("The dataset has no feature columns besides 'target'")]
    NoFeatures,

    #[error("Not enough rows to split into train and test sets: {0}")]
    NotEnoughRows(usize),

    #[error("The target column contains a single class")]
    SingleClass,
}
