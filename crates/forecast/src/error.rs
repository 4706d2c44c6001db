use thiserror::Error;

/// Errors raised while setting up forecasting.
///
/// Forecast computations themselves never fail; only configuration and
/// parsing of caller-provided tags can.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForecastError {
    #[error("invalid forecast configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown forecast algorithm: {0}")]
    UnknownAlgorithm(String),
}
