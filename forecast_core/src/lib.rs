//! # Forecast Core
//!
//! A Rust library for forecasting daily transaction amount series.
//!
//! ## Features
//!
//! - Daily time series container with strict date ordering
//! - Seasonal ARIMA model with relaxed coefficient constraints
//! - Multi-step mean forecasts with calendar-day future dates
//!
//! ## Quick Start
//!
//! ```rust
//! use forecast_core::models::sarima::{SarimaModel, SarimaOrder, SeasonalOrder};
//! use forecast_core::models::{ForecastModel, TrainedForecastModel};
//! use forecast_core::series::{DailySeries, Observation};
//! use chrono::NaiveDate;
//!
//! let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
//! let observations: Vec<Observation> = (0..120)
//!     .map(|i| Observation {
//!         date: start + chrono::Days::new(i),
//!         amount: 100.0 + i as f64,
//!     })
//!     .collect();
//! let series = DailySeries::new(observations).unwrap();
//!
//! let model = SarimaModel::new(
//!     SarimaOrder { p: 1, d: 1, q: 1 },
//!     SeasonalOrder { p: 1, d: 1, q: 1, period: 30 },
//! )
//! .unwrap();
//! let trained = model.train(&series).unwrap();
//! let forecast = trained.forecast(90).unwrap();
//! assert_eq!(forecast.len(), 90);
//! ```

pub mod error;
pub mod models;
pub mod series;

// Re-export commonly used types
pub use crate::error::ForecastError;
pub use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
pub use crate::series::{DailySeries, Observation};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
