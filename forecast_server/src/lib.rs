//! # Forecast Server
//!
//! Single-endpoint HTTP service: given a historical date range, load the
//! daily average transaction amounts from Postgres, fit a seasonal ARIMA
//! model and return the next 90 days of predicted values.
//!
//! Request flow is strictly linear: validate dates, load history, check
//! sufficiency, fit, forecast, respond. Every failure is terminal for the
//! request.

pub mod config;
pub mod error;
pub mod history;
pub mod http;
pub mod pipeline;

pub use crate::config::Config;
pub use crate::error::ApiError;
pub use crate::history::{HistoryStore, PgHistoryStore};
