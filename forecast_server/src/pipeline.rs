//! The per-request pipeline: validate, load, gate, fit, forecast, shape.
//!
//! Every stage returns a typed error and short-circuits the request; there
//! are no retries and no partial results.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use forecast_core::models::sarima::SarimaModel;
use forecast_core::models::{ForecastModel, TrainedForecastModel};
use forecast_core::series::DailySeries;

use crate::config::ModelConfig;
use crate::error::ApiError;
use crate::history::HistoryStore;

/// Wire format for dates, both in and out
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wire format of a successful forecast: two parallel arrays
#[derive(Debug, Clone, Serialize)]
pub struct ForecastResponse {
    /// ISO-formatted forecast dates, ascending
    pub date: Vec<String>,
    /// Predicted daily average amounts, same length and order
    pub y_pred: Vec<f64>,
}

/// Parse a strict `YYYY-MM-DD` calendar date
pub fn parse_date(value: &str) -> Result<NaiveDate, ApiError> {
    // chrono tolerates unpadded fields, so pin the length as well
    if value.len() != 10 {
        return Err(ApiError::InvalidDate);
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| ApiError::InvalidDate)
}

/// Run one forecast request end to end
pub async fn run(
    model: &ModelConfig,
    store: &dyn HistoryStore,
    from: &str,
    to: &str,
) -> Result<ForecastResponse, ApiError> {
    let from = parse_date(from)?;
    let to = parse_date(to)?;

    let observations = store
        .load_daily_averages(from, to)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    debug!(count = observations.len(), %from, %to, "history loaded");

    if observations.len() < model.min_observations {
        return Err(ApiError::InsufficientData);
    }

    let series = DailySeries::new(observations).map_err(|e| ApiError::Internal(e.to_string()))?;

    let sarima = SarimaModel::new(model.order, model.seasonal)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let trained = sarima
        .train(&series)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let forecast = trained
        .forecast(model.horizon)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    info!(
        model = sarima.name(),
        points = forecast.len(),
        "forecast produced"
    );

    Ok(ForecastResponse {
        date: forecast
            .dates()
            .iter()
            .map(|d| d.format(DATE_FORMAT).to_string())
            .collect(),
        y_pred: forecast.values().to_vec(),
    })
}
