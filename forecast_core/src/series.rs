//! Daily time series handling for forecasting

use crate::error::{ForecastError, Result};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// One aggregated observation: the average amount recorded on a calendar date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Calendar date of the observation
    pub date: NaiveDate,
    /// Average amount for that date
    pub amount: f64,
}

/// An ordered sequence of daily observations, strictly increasing by date.
///
/// Gaps between dates are allowed; the series only guarantees ordering and
/// finite amounts.
#[derive(Debug, Clone)]
pub struct DailySeries {
    observations: Vec<Observation>,
}

impl DailySeries {
    /// Create a new series, validating ordering and amounts
    pub fn new(observations: Vec<Observation>) -> Result<Self> {
        for pair in observations.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(ForecastError::InvalidData(format!(
                    "Observations must be strictly increasing by date: {} followed by {}",
                    pair[0].date, pair[1].date
                )));
            }
        }

        if let Some(bad) = observations.iter().find(|o| !o.amount.is_finite()) {
            return Err(ForecastError::InvalidData(format!(
                "Non-finite amount on {}",
                bad.date
            )));
        }

        Ok(Self { observations })
    }

    /// Get the observations
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Get the amounts as a vector
    pub fn amounts(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.amount).collect()
    }

    /// Get the last observed date, if any
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.date)
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Get the length of the series
    pub fn len(&self) -> usize {
        self.observations.len()
    }
}

/// Create future calendar dates for forecasting.
///
/// Returns `horizon` consecutive days starting the day after `last`,
/// regardless of the sampling of the observed series.
pub fn future_dates(last: NaiveDate, horizon: usize) -> Vec<NaiveDate> {
    (1..=horizon as u64).map(|d| last + Days::new(d)).collect()
}
