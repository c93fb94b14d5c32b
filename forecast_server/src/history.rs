//! History loading from the relational store

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use thiserror::Error;
use tracing::debug;

use forecast_core::series::Observation;

use crate::config::HistoryQueryConfig;

/// Data-access failure: connectivity, malformed connection string or query
/// errors, carried as the underlying error's description
#[derive(Debug, Error)]
#[error("{0}")]
pub struct HistoryError(pub String);

/// Source of aggregated historical observations
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Average amount per distinct date within `[from, to]`, ascending by
    /// date
    async fn load_daily_averages(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Observation>, HistoryError>;
}

/// Postgres-backed history store
pub struct PgHistoryStore {
    pool: PgPool,
    query: String,
}

impl PgHistoryStore {
    /// Build a store over an existing pool.
    ///
    /// Identifiers come from startup-validated configuration; the date
    /// bounds are always bound parameters.
    pub fn new(pool: PgPool, config: &HistoryQueryConfig) -> Self {
        let query = format!(
            r#"SELECT "{date}" AS date, AVG("{amount}")::FLOAT8 AS amount
               FROM "{table}"
               WHERE "{date}" >= $1 AND "{date}" <= $2
               GROUP BY "{date}"
               ORDER BY "{date}" ASC"#,
            date = config.date_column,
            amount = config.amount_column,
            table = config.table,
        );
        Self { pool, query }
    }

    /// Create a lazily connecting pool for the given connection URI
    pub fn connect(database_url: &str, config: &HistoryQueryConfig) -> Result<Self, HistoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_lazy(database_url)
            .map_err(|e| HistoryError(e.to_string()))?;
        Ok(Self::new(pool, config))
    }
}

#[async_trait]
impl HistoryStore for PgHistoryStore {
    async fn load_daily_averages(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Observation>, HistoryError> {
        debug!(%from, %to, "loading daily average amounts");

        // The pooled connection is scoped to this future and returns to the
        // pool when the fetch completes or fails
        let rows = sqlx::query(&self.query)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| HistoryError(e.to_string()))?;

        let mut observations = Vec::with_capacity(rows.len());
        for row in rows {
            let date: NaiveDate = row
                .try_get("date")
                .map_err(|e| HistoryError(e.to_string()))?;
            let amount: f64 = row
                .try_get("amount")
                .map_err(|e| HistoryError(e.to_string()))?;
            observations.push(Observation { date, amount });
        }

        debug!(count = observations.len(), "history loaded");
        Ok(observations)
    }
}
