//! Engine-wide configuration.
//!
//! Callers typically keep this as JSON next to their other settings; any section or
//! field left out takes its default.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockwise_core::DomainError;
use stockwise_forecast::{ForecastConfig, ForecastError};

use crate::abc::AbcThresholds;
use crate::optimizer::OptimizerConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse engine configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub forecast: ForecastConfig,
    pub optimizer: OptimizerConfig,
    pub abc: AbcThresholds,
}

impl EngineConfig {
    /// Parse and validate in one step.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_forecast(mut self, forecast: ForecastConfig) -> Self {
        self.forecast = forecast;
        self
    }

    pub fn with_optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn with_abc(mut self, abc: AbcThresholds) -> Self {
        self.abc = abc;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.forecast.validate()?;
        self.optimizer.validate()?;
        self.abc.validate()?;
        Ok(())
    }
}
