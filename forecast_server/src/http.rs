//! HTTP transport: router, state and handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use crate::config::ModelConfig;
use crate::error::ApiError;
use crate::history::HistoryStore;
use crate::pipeline::{self, ForecastResponse};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Forecasting constants
    pub model: ModelConfig,
    /// History source
    pub store: Arc<dyn HistoryStore>,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/sarima/:from_date/:to_date", get(sarima_forecast))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// The forecast endpoint: two date path parameters in, parallel
/// date/prediction arrays out
async fn sarima_forecast(
    State(state): State<AppState>,
    Path((from_date, to_date)): Path<(String, String)>,
) -> Result<Json<ForecastResponse>, ApiError> {
    let response = pipeline::run(&state.model, state.store.as_ref(), &from_date, &to_date).await?;
    Ok(Json(response))
}
