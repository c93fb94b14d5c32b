//! Runtime configuration, built once at startup and passed into the pipeline

use std::env;
use std::net::SocketAddr;

use forecast_core::models::sarima::{SarimaOrder, SeasonalOrder};
use thiserror::Error;

/// Configuration errors reported at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is missing
    #[error("{0} must be set")]
    MissingVar(&'static str),

    /// An environment variable holds an unusable value
    #[error("Invalid value for {name}: {reason}")]
    InvalidVar { name: &'static str, reason: String },
}

/// Identifiers of the transaction history relation
#[derive(Debug, Clone)]
pub struct HistoryQueryConfig {
    /// Table holding raw transactions
    pub table: String,
    /// Date column, one calendar date per row
    pub date_column: String,
    /// Numeric amount column averaged per date
    pub amount_column: String,
}

/// Fixed forecasting constants.
///
/// The orders, the 30-day seasonal period, the 90-day horizon and the
/// 60-observation minimum are preserved from the original deployment.
#[derive(Debug, Clone, Copy)]
pub struct ModelConfig {
    /// Non-seasonal SARIMA order
    pub order: SarimaOrder,
    /// Seasonal SARIMA order and period
    pub seasonal: SeasonalOrder,
    /// Number of future days to forecast
    pub horizon: usize,
    /// Minimum observation count before fitting is attempted
    pub min_observations: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            order: SarimaOrder { p: 1, d: 1, q: 1 },
            seasonal: SeasonalOrder {
                p: 1,
                d: 1,
                q: 1,
                period: 30,
            },
            horizon: 90,
            min_observations: 60,
        }
    }
}

/// Immutable process configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection URI
    pub database_url: String,
    /// Listen address for the HTTP transport
    pub bind_addr: SocketAddr,
    /// History query identifiers
    pub history: HistoryQueryConfig,
    /// Forecasting constants
    pub model: ModelConfig,
}

impl Config {
    /// Build the configuration from the environment.
    ///
    /// `DATABASE_URL` is required; `HOST`/`PORT` default to 0.0.0.0:8080.
    /// Table and column names default to the original schema's casing and
    /// can be overridden with `HISTORY_TABLE`, `HISTORY_DATE_COLUMN` and
    /// `HISTORY_AMOUNT_COLUMN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?;

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
        let bind_addr = format!("{}:{}", host, port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidVar {
                name: "HOST/PORT",
                reason: e.to_string(),
            })?;

        let history = HistoryQueryConfig {
            table: identifier_var("HISTORY_TABLE", "Transactions")?,
            date_column: identifier_var("HISTORY_DATE_COLUMN", "DATE")?,
            amount_column: identifier_var("HISTORY_AMOUNT_COLUMN", "Amount")?,
        };

        Ok(Self {
            database_url,
            bind_addr,
            history,
            model: ModelConfig::default(),
        })
    }
}

/// Read an identifier from the environment, falling back to `default`.
///
/// These names are interpolated into SQL (values never are), so they are
/// restricted to alphanumerics and underscore.
fn identifier_var(name: &'static str, default: &str) -> Result<String, ConfigError> {
    let value = env::var(name).unwrap_or_else(|_| default.to_string());
    validate_identifier(&value).map_err(|reason| ConfigError::InvalidVar { name, reason })?;
    Ok(value)
}

fn validate_identifier(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("identifier is empty".to_string());
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(format!("'{}' is not a plain SQL identifier", value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_config_matches_deployment_constants() {
        let model = ModelConfig::default();

        assert_eq!(model.order, SarimaOrder { p: 1, d: 1, q: 1 });
        assert_eq!(
            model.seasonal,
            SeasonalOrder {
                p: 1,
                d: 1,
                q: 1,
                period: 30
            }
        );
        assert_eq!(model.horizon, 90);
        assert_eq!(model.min_observations, 60);
    }

    #[test]
    fn identifiers_are_restricted_to_plain_names() {
        assert!(validate_identifier("Transactions").is_ok());
        assert!(validate_identifier("DATE").is_ok());
        assert!(validate_identifier("amount_usd").is_ok());

        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("Transactions\"; DROP TABLE x; --").is_err());
        assert!(validate_identifier("two words").is_err());
    }
}
