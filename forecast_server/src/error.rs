//! Request error taxonomy and its HTTP mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Body of the invalid-input response
pub const INVALID_DATE_MESSAGE: &str = "Invalid date format. Use YYYY-MM-DD";

/// Body of the insufficient-data response, kept byte-for-byte compatible
/// with existing clients
pub const INSUFFICIENT_DATA_MESSAGE: &str =
    "No hay suficientes datos para realizar la predicción";

/// The three request failure kinds, in the order they are checked.
///
/// Variants are never conflated: a malformed date can never surface as a
/// server error, and a data-access failure can never surface as a client
/// error.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed date string, detected before any I/O
    #[error("{}", INVALID_DATE_MESSAGE)]
    InvalidDate,

    /// Valid input and query, but too few observations to fit a model
    #[error("{}", INSUFFICIENT_DATA_MESSAGE)]
    InsufficientData,

    /// Any unexpected failure: data access, fitting, forecasting
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidDate => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": INVALID_DATE_MESSAGE })),
            )
                .into_response(),
            ApiError::InsufficientData => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "msg": INSUFFICIENT_DATA_MESSAGE })),
            )
                .into_response(),
            ApiError::Internal(message) => {
                error!(%message, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": message })),
                )
                    .into_response()
            }
        }
    }
}
