use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("The calendar for dataset '{dataset}' between {start} and {end} has no dates")]
    EmptyCalendar {
        dataset: &'static str,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Invalid distribution parameters: {0}")]
    InvalidDistribution(#[from] rand_distr::NormalError),

    #[error("Sampled a value that cannot be represented as a price: {0}")]
    NonFinitePrice(f64),

    #[error("Cannot sample from an empty list of {0}")]
    EmptyCategory(&'static str),
}
