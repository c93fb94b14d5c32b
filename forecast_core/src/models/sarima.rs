//! Seasonal ARIMA models for daily series
//!
//! A multiplicative SARIMA(p,d,q)(P,D,Q,s) model: the series is seasonally
//! differenced D times at lag `s` and regularly differenced d times, then an
//! autoregressive/moving-average structure is estimated on the differenced
//! scale from autocorrelations. Coefficient estimates are clamped to the open
//! unit interval instead of being rejected, so near-unit-root and
//! near-non-invertible fits still converge.

use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use crate::series::{future_dates, DailySeries};
use chrono::NaiveDate;

/// Bound applied to every estimated coefficient for stability
const COEFF_BOUND: f64 = 0.99;

/// Non-seasonal order (p, d, q)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SarimaOrder {
    /// AR order
    pub p: usize,
    /// Differencing order
    pub d: usize,
    /// MA order
    pub q: usize,
}

/// Seasonal order (P, D, Q) with its period `s`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonalOrder {
    /// Seasonal AR order
    pub p: usize,
    /// Seasonal differencing order
    pub d: usize,
    /// Seasonal MA order
    pub q: usize,
    /// Number of steps after which the seasonal pattern recurs
    pub period: usize,
}

impl SeasonalOrder {
    fn is_active(&self) -> bool {
        self.p > 0 || self.d > 0 || self.q > 0
    }
}

/// Seasonal ARIMA model
#[derive(Debug, Clone)]
pub struct SarimaModel {
    /// Name of the model
    name: String,
    /// Non-seasonal order
    order: SarimaOrder,
    /// Seasonal order
    seasonal: SeasonalOrder,
}

/// Trained seasonal ARIMA model
#[derive(Debug, Clone)]
pub struct TrainedSarimaModel {
    /// Name of the model
    name: String,
    /// Non-seasonal order
    order: SarimaOrder,
    /// Seasonal order
    seasonal: SeasonalOrder,
    /// Fitted AR coefficients
    ar_coeffs: Vec<f64>,
    /// Fitted MA coefficients
    ma_coeffs: Vec<f64>,
    /// Fitted seasonal AR coefficient
    sar_coeff: f64,
    /// Fitted seasonal MA coefficient
    sma_coeff: f64,
    /// Mean of the fully differenced series
    mean: f64,
    /// Original series (for inverse seasonal differencing)
    original: Vec<f64>,
    /// Seasonally differenced series (for inverse regular differencing)
    seasonal_differenced: Vec<f64>,
    /// Fully differenced series
    differenced: Vec<f64>,
    /// Residuals from the AR fit on the differenced scale
    residuals: Vec<f64>,
    /// Last observed date
    last_date: NaiveDate,
}

impl SarimaModel {
    /// Create a new seasonal ARIMA model with the given orders
    ///
    /// Seasonal AR/MA orders above 1 are not supported; the seasonal period
    /// must be at least 2 whenever any seasonal component is active.
    pub fn new(order: SarimaOrder, seasonal: SeasonalOrder) -> Result<Self> {
        if order.p > 10 {
            return Err(ForecastError::InvalidParameter(
                "AR order must be <= 10".to_string(),
            ));
        }
        if order.d > 2 {
            return Err(ForecastError::InvalidParameter(
                "Differencing order must be <= 2".to_string(),
            ));
        }
        if order.q > 10 {
            return Err(ForecastError::InvalidParameter(
                "MA order must be <= 10".to_string(),
            ));
        }
        if seasonal.p > 1 || seasonal.q > 1 {
            return Err(ForecastError::InvalidParameter(
                "Seasonal AR/MA orders must be <= 1".to_string(),
            ));
        }
        if seasonal.d > 1 {
            return Err(ForecastError::InvalidParameter(
                "Seasonal differencing order must be <= 1".to_string(),
            ));
        }
        if seasonal.is_active() && seasonal.period < 2 {
            return Err(ForecastError::InvalidParameter(
                "Seasonal period must be >= 2".to_string(),
            ));
        }

        Ok(Self {
            name: format!(
                "SARIMA({},{},{})({},{},{},{})",
                order.p, order.d, order.q, seasonal.p, seasonal.d, seasonal.q, seasonal.period
            ),
            order,
            seasonal,
        })
    }

    /// Minimum number of observations needed to fit this model
    pub fn min_observations(&self) -> usize {
        let differencing = self.order.d + self.seasonal.d * self.seasonal.period;
        differencing + self.order.p.max(self.order.q).max(1) + 2
    }
}

/// Apply regular differencing `order` times
fn difference(data: &[f64], order: usize) -> Vec<f64> {
    let mut result = data.to_vec();
    for _ in 0..order {
        let mut differenced = Vec::with_capacity(result.len().saturating_sub(1));
        for i in 1..result.len() {
            differenced.push(result[i] - result[i - 1]);
        }
        result = differenced;
    }
    result
}

/// Apply seasonal differencing at lag `period`, `order` times
fn seasonal_difference(data: &[f64], order: usize, period: usize) -> Vec<f64> {
    let mut result = data.to_vec();
    for _ in 0..order {
        let mut differenced = Vec::with_capacity(result.len().saturating_sub(period));
        for i in period..result.len() {
            differenced.push(result[i] - result[i - period]);
        }
        result = differenced;
    }
    result
}

/// Autocovariance of a centered series at the given lag
fn autocovariance(centered: &[f64], lag: usize) -> f64 {
    let n = centered.len();
    if n == 0 || lag >= n {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in lag..n {
        sum += centered[i] * centered[i - lag];
    }
    sum / n as f64
}

/// Solve the Yule-Walker equations with the Levinson-Durbin recursion
fn levinson_durbin(autocov: &[f64], p: usize) -> Vec<f64> {
    let mut coeffs = vec![0.0; p];
    if p == 0 || autocov[0].abs() <= 1e-10 {
        return coeffs;
    }

    coeffs[0] = autocov[1] / autocov[0];
    for k in 1..p {
        let mut sum = autocov[k + 1];
        for j in 0..k {
            sum -= coeffs[j] * autocov[k - j];
        }

        let mut denom = autocov[0];
        for j in 0..k {
            denom -= coeffs[j] * autocov[j + 1];
        }

        if denom.abs() > 1e-10 {
            let new_coeff = sum / denom;
            let old_coeffs = coeffs.clone();
            coeffs[k] = new_coeff;
            for j in 0..k {
                coeffs[j] = old_coeffs[j] - new_coeff * old_coeffs[k - 1 - j];
            }
        }
    }

    for c in &mut coeffs {
        *c = c.clamp(-COEFF_BOUND, COEFF_BOUND);
    }
    coeffs
}

impl ForecastModel for SarimaModel {
    type Trained = TrainedSarimaModel;

    fn train(&self, data: &DailySeries) -> Result<TrainedSarimaModel> {
        let values = data.amounts();
        let required = self.min_observations();
        if values.len() < required {
            return Err(ForecastError::InsufficientData {
                required,
                actual: values.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::InvalidData(
                "Series contains NaN or infinite values".to_string(),
            ));
        }
        let last_date = data.last_date().ok_or_else(|| {
            ForecastError::InvalidData("Series has no observations".to_string())
        })?;

        let s = self.seasonal.period.max(1);
        let seasonal_differenced = seasonal_difference(&values, self.seasonal.d, s);
        let differenced = difference(&seasonal_differenced, self.order.d);

        let n = differenced.len();
        let mean: f64 = differenced.iter().sum::<f64>() / n as f64;
        let centered: Vec<f64> = differenced.iter().map(|v| v - mean).collect();

        // AR part from the Yule-Walker equations
        let mut autocov = Vec::with_capacity(self.order.p + 1);
        for lag in 0..=self.order.p {
            autocov.push(autocovariance(&centered, lag));
        }
        let ar_coeffs = levinson_durbin(&autocov, self.order.p);

        // Seasonal AR from the lag-s autocorrelation; series too short for
        // the seasonal lag leaves the coefficient at zero
        let variance = autocov[0];
        let sar_coeff = if self.seasonal.p == 1 && variance.abs() > 1e-10 {
            (autocovariance(&centered, s) / variance).clamp(-COEFF_BOUND, COEFF_BOUND)
        } else {
            0.0
        };

        // Residuals of the AR fit
        let mut residuals = vec![0.0; n];
        for t in self.order.p..n {
            let mut prediction = 0.0;
            for (j, phi) in ar_coeffs.iter().enumerate() {
                prediction += phi * centered[t - 1 - j];
            }
            if t >= s {
                prediction += sar_coeff * centered[t - s];
                for (j, phi) in ar_coeffs.iter().enumerate() {
                    if t >= s + 1 + j {
                        prediction -= sar_coeff * phi * centered[t - s - 1 - j];
                    }
                }
            }
            residuals[t] = centered[t] - prediction;
        }

        // MA part from residual autocorrelations
        let residual_var: f64 = residuals.iter().map(|e| e * e).sum::<f64>() / n as f64;
        let mut ma_coeffs = vec![0.0; self.order.q];
        let mut sma_coeff = 0.0;
        if residual_var.abs() > 1e-10 {
            for (k, theta) in ma_coeffs.iter_mut().enumerate() {
                let mut sum = 0.0;
                for i in (k + 1)..n {
                    sum += residuals[i] * residuals[i - k - 1];
                }
                *theta = ((sum / n as f64) / residual_var).clamp(-COEFF_BOUND, COEFF_BOUND);
            }
            if self.seasonal.q == 1 && n > s {
                let mut sum = 0.0;
                for i in s..n {
                    sum += residuals[i] * residuals[i - s];
                }
                sma_coeff = ((sum / n as f64) / residual_var).clamp(-COEFF_BOUND, COEFF_BOUND);
            }
        }

        let estimates_finite = mean.is_finite()
            && sar_coeff.is_finite()
            && sma_coeff.is_finite()
            && ar_coeffs.iter().all(|c| c.is_finite())
            && ma_coeffs.iter().all(|c| c.is_finite());
        if !estimates_finite {
            return Err(ForecastError::ModelError(
                "Coefficient estimation produced non-finite values".to_string(),
            ));
        }

        Ok(TrainedSarimaModel {
            name: self.name.clone(),
            order: self.order,
            seasonal: self.seasonal,
            ar_coeffs,
            ma_coeffs,
            sar_coeff,
            sma_coeff,
            mean,
            original: values,
            seasonal_differenced,
            differenced,
            residuals,
            last_date,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedSarimaModel {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        if horizon == 0 {
            return ForecastResult::new(Vec::new(), Vec::new());
        }

        let s = self.seasonal.period.max(1);
        let n = self.differenced.len();
        let mut extended = self.differenced.clone();
        let mut shocks = self.residuals.clone();

        // Multi-step mean forecast on the differenced scale; future shocks
        // are zero
        for _ in 0..horizon {
            let t = extended.len();
            let mut forecast = self.mean;

            for (j, phi) in self.ar_coeffs.iter().enumerate() {
                if t > j {
                    forecast += phi * (extended[t - 1 - j] - self.mean);
                }
            }
            if t >= s {
                forecast += self.sar_coeff * (extended[t - s] - self.mean);
                for (j, phi) in self.ar_coeffs.iter().enumerate() {
                    if t >= s + 1 + j {
                        forecast -= self.sar_coeff * phi * (extended[t - s - 1 - j] - self.mean);
                    }
                }
            }
            for (k, theta) in self.ma_coeffs.iter().enumerate() {
                if t > k {
                    forecast += theta * shocks[t - 1 - k];
                }
            }
            if t >= s {
                forecast += self.sma_coeff * shocks[t - s];
                for (k, theta) in self.ma_coeffs.iter().enumerate() {
                    if t >= s + 1 + k {
                        forecast += self.sma_coeff * theta * shocks[t - s - 1 - k];
                    }
                }
            }

            extended.push(forecast);
            shocks.push(0.0);
        }

        let differenced_forecasts = extended[n..].to_vec();
        let seasonal_scale = self.undifference(&differenced_forecasts);
        let values = self.unseasonal(&seasonal_scale);

        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::ModelError(
                "Forecast produced non-finite values".to_string(),
            ));
        }

        let dates = future_dates(self.last_date, horizon);
        ForecastResult::new(dates, values)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedSarimaModel {
    /// Reverse regular differencing onto the seasonally differenced scale
    fn undifference(&self, forecasts: &[f64]) -> Vec<f64> {
        if self.order.d == 0 {
            return forecasts.to_vec();
        }

        // Differencing levels of the seasonally differenced series; level k
        // holds diff^k, whose last value anchors the inversion of level k+1
        let mut levels = vec![self.seasonal_differenced.clone()];
        for k in 0..self.order.d - 1 {
            let next = difference(&levels[k], 1);
            levels.push(next);
        }

        let mut result = forecasts.to_vec();
        for level in levels.iter().rev() {
            let mut acc = level.last().copied().unwrap_or(0.0);
            for v in result.iter_mut() {
                acc += *v;
                *v = acc;
            }
        }
        result
    }

    /// Reverse seasonal differencing onto the original scale
    fn unseasonal(&self, forecasts: &[f64]) -> Vec<f64> {
        if self.seasonal.d == 0 {
            return forecasts.to_vec();
        }

        let s = self.seasonal.period;
        let mut extended = self.original.clone();
        let mut result = Vec::with_capacity(forecasts.len());
        for &f in forecasts {
            let value = f + extended[extended.len() - s];
            extended.push(value);
            result.push(value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Observation;
    use chrono::Days;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn series_from(values: Vec<f64>) -> DailySeries {
        let start: NaiveDate = "2023-01-01".parse().unwrap();
        let observations = values
            .into_iter()
            .enumerate()
            .map(|(i, amount)| Observation {
                date: start + Days::new(i as u64),
                amount,
            })
            .collect();
        DailySeries::new(observations).unwrap()
    }

    fn default_model() -> SarimaModel {
        SarimaModel::new(
            SarimaOrder { p: 1, d: 1, q: 1 },
            SeasonalOrder {
                p: 1,
                d: 1,
                q: 1,
                period: 30,
            },
        )
        .unwrap()
    }

    #[test]
    fn creation_validates_orders() {
        assert!(SarimaModel::new(
            SarimaOrder { p: 1, d: 1, q: 1 },
            SeasonalOrder {
                p: 1,
                d: 1,
                q: 1,
                period: 30
            }
        )
        .is_ok());

        assert!(SarimaModel::new(
            SarimaOrder { p: 11, d: 0, q: 0 },
            SeasonalOrder {
                p: 0,
                d: 0,
                q: 0,
                period: 0
            }
        )
        .is_err());

        assert!(SarimaModel::new(
            SarimaOrder { p: 1, d: 3, q: 1 },
            SeasonalOrder {
                p: 0,
                d: 0,
                q: 0,
                period: 0
            }
        )
        .is_err());

        assert!(SarimaModel::new(
            SarimaOrder { p: 1, d: 1, q: 1 },
            SeasonalOrder {
                p: 2,
                d: 1,
                q: 1,
                period: 30
            }
        )
        .is_err());

        assert!(SarimaModel::new(
            SarimaOrder { p: 1, d: 1, q: 1 },
            SeasonalOrder {
                p: 1,
                d: 1,
                q: 1,
                period: 1
            }
        )
        .is_err());
    }

    #[test]
    fn model_name_includes_orders() {
        assert_eq!(default_model().name(), "SARIMA(1,1,1)(1,1,1,30)");
    }

    #[test]
    fn train_rejects_short_series() {
        let model = default_model();
        let data = series_from((0..20).map(|i| i as f64).collect());

        let result = model.train(&data);
        match result {
            Err(ForecastError::InsufficientData { required, actual }) => {
                assert_eq!(actual, 20);
                assert!(required > 20);
            }
            other => panic!("Expected InsufficientData, got {:?}", other),
        }
    }

    #[test]
    fn train_fits_with_sixty_observations() {
        let model = default_model();
        let data = series_from((0..60).map(|i| 100.0 + (i as f64) * 0.5).collect());

        let trained = model.train(&data).unwrap();
        let forecast = trained.forecast(90).unwrap();
        assert_eq!(forecast.len(), 90);
    }

    #[rstest]
    #[case(1)]
    #[case(30)]
    #[case(90)]
    fn forecast_has_requested_horizon(#[case] horizon: usize) {
        let model = default_model();
        let data = series_from(
            (0..120)
                .map(|i| 100.0 + (i as f64) * 0.2 + ((i % 30) as f64).sin())
                .collect(),
        );

        let trained = model.train(&data).unwrap();
        let forecast = trained.forecast(horizon).unwrap();

        assert_eq!(forecast.len(), horizon);
        assert_eq!(forecast.dates().len(), horizon);
        assert!(forecast.values().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn forecast_dates_follow_last_observation() {
        let model = default_model();
        let data = series_from((0..100).map(|i| 50.0 + i as f64).collect());

        let trained = model.train(&data).unwrap();
        let forecast = trained.forecast(5).unwrap();

        // Series starts 2023-01-01 with 100 points, so it ends 2023-04-10
        let expected: NaiveDate = "2023-04-11".parse().unwrap();
        assert_eq!(forecast.dates()[0], expected);
    }

    #[test]
    fn linear_trend_is_continued() {
        let model = default_model();
        let data = series_from((0..120).map(|i| 10.0 + 2.0 * i as f64).collect());

        let trained = model.train(&data).unwrap();
        let forecast = trained.forecast(90).unwrap();
        let values = forecast.values();

        assert!(values[89] > values[0]);
        // Differencing removes a linear trend exactly, so the continuation
        // stays close to the true line
        assert_approx_eq::assert_approx_eq!(values[0], 10.0 + 2.0 * 120.0, 1e-6);
        assert_approx_eq::assert_approx_eq!(values[89], 10.0 + 2.0 * 209.0, 1e-6);
    }

    #[test]
    fn pure_seasonal_pattern_is_repeated() {
        let model = default_model();
        let pattern: Vec<f64> = (0..120)
            .map(|i| 100.0 + (2.0 * std::f64::consts::PI * (i % 30) as f64 / 30.0).sin())
            .collect();
        let data = series_from(pattern.clone());

        let trained = model.train(&data).unwrap();
        let forecast = trained.forecast(60).unwrap();

        for (i, value) in forecast.values().iter().enumerate() {
            let expected = pattern[120 - 30 + (i % 30)];
            assert_approx_eq::assert_approx_eq!(*value, expected, 1e-6);
        }
    }

    #[test]
    fn forecasts_are_deterministic() {
        let model = default_model();
        let data = series_from(
            (0..150)
                .map(|i| 200.0 + (i as f64 * 0.3).sin() * 15.0 + i as f64 * 0.1)
                .collect(),
        );

        let first = model.train(&data).unwrap().forecast(90).unwrap();
        let second = model.train(&data).unwrap().forecast(90).unwrap();

        assert_eq!(first.values(), second.values());
        assert_eq!(first.dates(), second.dates());
    }

    #[test]
    fn zero_horizon_yields_empty_forecast() {
        let model = default_model();
        let data = series_from((0..100).map(|i| i as f64).collect());

        let trained = model.train(&data).unwrap();
        let forecast = trained.forecast(0).unwrap();
        assert!(forecast.is_empty());
    }

    #[test]
    fn constant_series_forecasts_the_constant() {
        let model = default_model();
        let data = series_from(vec![42.0; 100]);

        let trained = model.train(&data).unwrap();
        let forecast = trained.forecast(30).unwrap();
        for value in forecast.values() {
            assert_approx_eq::assert_approx_eq!(*value, 42.0, 1e-9);
        }
    }
}
