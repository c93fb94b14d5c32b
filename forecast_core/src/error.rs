//! Error types for the forecast_core crate

use thiserror::Error;

/// Custom error types for the forecast_core crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to data validation or processing
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Error from invalid model parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Not enough observations to fit the requested model
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Error raised during fitting or forecasting
    #[error("Model error: {0}")]
    ModelError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
