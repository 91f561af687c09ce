use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Page error: {0}")]
    Page(#[from] pages::PageError),
    #[error("Chart rendering failed: {0}")]
    Chart(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Page(page_err) => {
                tracing::error!(error = ?page_err, "Page error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while building the page".to_string(),
                )
            }
            AppError::Chart(message) => {
                tracing::error!(error = %message, "Chart rendering error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while drawing a chart".to_string(),
                )
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
