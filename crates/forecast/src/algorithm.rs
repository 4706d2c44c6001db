use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ForecastError;

/// Forecasting algorithm tag.
///
/// Six independent predictors plus two ensembles that combine them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    MovingAverage,
    LinearRegression,
    SeasonalTrend,
    SeasonalDecomposition,
    ExponentialSmoothing,
    Arima,
    Ensemble,
    WeightedEnsemble,
}

impl Algorithm {
    pub const ALL: [Algorithm; 8] = [
        Algorithm::MovingAverage,
        Algorithm::LinearRegression,
        Algorithm::SeasonalTrend,
        Algorithm::SeasonalDecomposition,
        Algorithm::ExponentialSmoothing,
        Algorithm::Arima,
        Algorithm::Ensemble,
        Algorithm::WeightedEnsemble,
    ];

    /// The independent predictors (everything except the ensembles).
    pub const BASE: [Algorithm; 6] = [
        Algorithm::MovingAverage,
        Algorithm::LinearRegression,
        Algorithm::SeasonalTrend,
        Algorithm::SeasonalDecomposition,
        Algorithm::ExponentialSmoothing,
        Algorithm::Arima,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::MovingAverage => "moving_average",
            Algorithm::LinearRegression => "linear_regression",
            Algorithm::SeasonalTrend => "seasonal_trend",
            Algorithm::SeasonalDecomposition => "seasonal_decomposition",
            Algorithm::ExponentialSmoothing => "exponential_smoothing",
            Algorithm::Arima => "arima",
            Algorithm::Ensemble => "ensemble",
            Algorithm::WeightedEnsemble => "weighted_ensemble",
        }
    }

    pub fn is_ensemble(&self) -> bool {
        matches!(self, Algorithm::Ensemble | Algorithm::WeightedEnsemble)
    }
}

impl core::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Algorithm::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(tag))
            .ok_or_else(|| ForecastError::UnknownAlgorithm(tag.to_string()))
    }
}
