use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Shape mismatch in {what}: expected {expected} values, got {actual}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },
}
