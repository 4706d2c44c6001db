//! Ensembles over the base predictors.
//!
//! - **Simple**: element-wise mean of every member's forecast.
//! - **Weighted**: backtest each member on all but the last `test_window` points,
//!   weight it by inverse Mean Absolute Error on the held-out tail, then combine
//!   the members' forecasts over the *full* series with those weights. A member is
//!   never scored on data it was fitted on.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::algorithm::Algorithm;
use crate::forecaster::Forecaster;
use crate::history::ConsumptionSeries;
use crate::metrics::{mae, rmse};

/// Floor applied to a member's MAE before inverting it, so a perfect backtest
/// cannot divide by zero.
pub const MIN_ERROR: f64 = 1e-6;

/// Backtest score of one ensemble member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyReport {
    pub algorithm: Algorithm,
    pub mae: f64,
    pub rmse: f64,
    pub weight: f64,
}

/// Weighted ensemble output plus the evidence behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedForecast {
    pub predictions: Vec<f64>,
    /// Empty when the ensemble fell back to the simple mean.
    pub accuracy: Vec<AccuracyReport>,
    pub backtested: bool,
}

/// Element-wise mean of `forecasts`; zeros when there are none.
pub fn combine_mean(forecasts: &[Vec<f64>], horizon: usize) -> Vec<f64> {
    if forecasts.is_empty() {
        return vec![0.0; horizon];
    }
    let k = forecasts.len() as f64;
    (0..horizon)
        .map(|step| {
            forecasts
                .iter()
                .map(|f| f.get(step).copied().unwrap_or(0.0))
                .sum::<f64>()
                / k
        })
        .collect()
}

/// Normalized inverse-error weights: `(1/max(e_i, ε)) / Σ (1/max(e_j, ε))`.
///
/// `None` when any error is undefined (`NaN`) or there are no errors at all.
pub fn inverse_error_weights(errors: &[f64]) -> Option<Vec<f64>> {
    if errors.is_empty() || errors.iter().any(|e| e.is_nan()) {
        return None;
    }
    let inverse: Vec<f64> = errors.iter().map(|e| 1.0 / e.max(MIN_ERROR)).collect();
    let total: f64 = inverse.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return None;
    }
    Some(inverse.into_iter().map(|w| w / total).collect())
}

/// Weighted element-wise combination; `weights` must line up with `forecasts`.
pub fn combine_weighted(forecasts: &[Vec<f64>], weights: &[f64], horizon: usize) -> Vec<f64> {
    (0..horizon)
        .map(|step| {
            forecasts
                .iter()
                .zip(weights)
                .map(|(f, w)| w * f.get(step).copied().unwrap_or(0.0))
                .sum()
        })
        .collect()
}

impl Forecaster {
    /// Mean of every configured member's forecast.
    pub fn simple_ensemble(&self, series: &ConsumptionSeries, horizon: usize) -> Vec<f64> {
        let forecasts = self.member_forecasts(series, horizon);
        combine_mean(&forecasts, horizon)
    }

    pub fn weighted_ensemble(&self, series: &ConsumptionSeries, horizon: usize) -> Vec<f64> {
        self.weighted_ensemble_report(series, horizon).predictions
    }

    /// Weighted ensemble with per-member backtest scores.
    ///
    /// Falls back to [`Forecaster::simple_ensemble`] when the series is not longer
    /// than `test_window + horizon`.
    pub fn weighted_ensemble_report(
        &self,
        series: &ConsumptionSeries,
        horizon: usize,
    ) -> WeightedForecast {
        let test_window = self.config().test_window;
        let n = series.len();

        if n <= test_window + horizon {
            warn!(
                points = n,
                test_window, horizon, "history too short for backtesting; using simple ensemble"
            );
            return self.simple_fallback(series, horizon);
        }

        let train = series.head(n - test_window);
        let actual = &series.values()[n - test_window..];
        let members = &self.config().ensemble_members;

        let scores: Vec<(f64, f64)> = members
            .iter()
            .map(|&member| {
                let backtest = self.forecast(&train, test_window, member);
                (mae(actual, &backtest), rmse(actual, &backtest))
            })
            .collect();

        let maes: Vec<f64> = scores.iter().map(|(m, _)| *m).collect();
        let Some(weights) = inverse_error_weights(&maes) else {
            warn!(points = n, "backtest produced undefined errors; using simple ensemble");
            return self.simple_fallback(series, horizon);
        };

        let accuracy: Vec<AccuracyReport> = members
            .iter()
            .zip(scores)
            .zip(&weights)
            .map(|((&algorithm, (mae, rmse)), &weight)| {
                debug!(%algorithm, mae, rmse, weight, "ensemble member backtested");
                AccuracyReport {
                    algorithm,
                    mae,
                    rmse,
                    weight,
                }
            })
            .collect();

        let forecasts = self.member_forecasts(series, horizon);
        WeightedForecast {
            predictions: combine_weighted(&forecasts, &weights, horizon),
            accuracy,
            backtested: true,
        }
    }

    fn simple_fallback(&self, series: &ConsumptionSeries, horizon: usize) -> WeightedForecast {
        WeightedForecast {
            predictions: self.simple_ensemble(series, horizon),
            accuracy: Vec::new(),
            backtested: false,
        }
    }

    fn member_forecasts(&self, series: &ConsumptionSeries, horizon: usize) -> Vec<Vec<f64>> {
        self.config()
            .ensemble_members
            .iter()
            .map(|&member| self.forecast(series, horizon, member))
            .collect()
    }
}
