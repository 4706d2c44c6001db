use serde::{Deserialize, Serialize};

use crate::algorithm::Algorithm;
use crate::error::ForecastError;

/// Tunables for the predictors and the ensembles.
///
/// Defaults: moving-average window 3, smoothing alpha 0.6, AR order 2, MA order 2,
/// seasonal period 12, outlier cut-off 2.5σ, backtest window 6, all six base
/// predictors as ensemble members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub moving_average_window: usize,
    pub smoothing_alpha: f64,
    /// Number of lagged values averaged by the AR/MA-like model.
    pub ar_order: usize,
    /// Number of trailing one-step errors averaged by the AR/MA-like model.
    pub ma_order: usize,
    pub seasonal_period: usize,
    /// Residuals further than this many standard deviations are dropped before the trend fit.
    pub outlier_threshold: f64,
    /// Trailing points held out when backtesting the weighted ensemble.
    pub test_window: usize,
    pub ensemble_members: Vec<Algorithm>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            moving_average_window: 3,
            smoothing_alpha: 0.6,
            ar_order: 2,
            ma_order: 2,
            seasonal_period: 12,
            outlier_threshold: 2.5,
            test_window: 6,
            ensemble_members: Algorithm::BASE.to_vec(),
        }
    }
}

impl ForecastConfig {
    pub fn with_moving_average_window(mut self, window: usize) -> Self {
        self.moving_average_window = window;
        self
    }

    pub fn with_smoothing_alpha(mut self, alpha: f64) -> Self {
        self.smoothing_alpha = alpha;
        self
    }

    pub fn with_arima_orders(mut self, ar_order: usize, ma_order: usize) -> Self {
        self.ar_order = ar_order;
        self.ma_order = ma_order;
        self
    }

    pub fn with_seasonal_period(mut self, period: usize) -> Self {
        self.seasonal_period = period;
        self
    }

    pub fn with_outlier_threshold(mut self, threshold: f64) -> Self {
        self.outlier_threshold = threshold;
        self
    }

    pub fn with_test_window(mut self, test_window: usize) -> Self {
        self.test_window = test_window;
        self
    }

    pub fn with_ensemble_members(mut self, members: Vec<Algorithm>) -> Self {
        self.ensemble_members = members;
        self
    }

    pub fn validate(&self) -> Result<(), ForecastError> {
        if self.moving_average_window == 0 {
            return Err(ForecastError::InvalidConfig(
                "moving_average_window must be >= 1".to_string(),
            ));
        }
        if !(self.smoothing_alpha.is_finite()
            && self.smoothing_alpha > 0.0
            && self.smoothing_alpha <= 1.0)
        {
            return Err(ForecastError::InvalidConfig(
                "smoothing_alpha must be in (0, 1]".to_string(),
            ));
        }
        if self.ar_order == 0 {
            return Err(ForecastError::InvalidConfig(
                "ar_order must be >= 1".to_string(),
            ));
        }
        if self.seasonal_period < 2 {
            return Err(ForecastError::InvalidConfig(
                "seasonal_period must be >= 2".to_string(),
            ));
        }
        if !(self.outlier_threshold.is_finite() && self.outlier_threshold > 0.0) {
            return Err(ForecastError::InvalidConfig(
                "outlier_threshold must be a finite positive number".to_string(),
            ));
        }
        if self.test_window == 0 {
            return Err(ForecastError::InvalidConfig(
                "test_window must be >= 1".to_string(),
            ));
        }
        if self.ensemble_members.is_empty() {
            return Err(ForecastError::InvalidConfig(
                "ensemble_members cannot be empty".to_string(),
            ));
        }
        if let Some(nested) = self.ensemble_members.iter().find(|a| a.is_ensemble()) {
            return Err(ForecastError::InvalidConfig(format!(
                "ensemble_members cannot contain ensemble algorithm {nested}"
            )));
        }
        Ok(())
    }
}
