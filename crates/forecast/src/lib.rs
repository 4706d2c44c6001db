//! `stockwise-forecast`
//!
//! **Responsibility:** turn monthly material consumption history into forward-looking
//! consumption forecasts.
//!
//! This crate is purely computational:
//! - It never reads or writes storage; callers supply [`ConsumptionRecord`]s.
//! - Every entry point is a pure function of its inputs (no shared mutable state),
//!   so callers may fan out across materials freely.
//! - Insufficient data degrades to a defined fallback instead of an error.

pub mod algorithm;
pub mod config;
pub mod ensemble;
pub mod error;
pub mod forecaster;
pub mod history;
pub mod metrics;
pub mod predictors;

pub use algorithm::Algorithm;
pub use config::ForecastConfig;
pub use ensemble::{AccuracyReport, WeightedForecast};
pub use error::ForecastError;
pub use forecaster::{ForecastPoint, Forecaster, MaterialForecast};
pub use history::{ConsumptionRecord, ConsumptionSeries, MaterialHistory, group_by_material};
pub use metrics::{mae, rmse};
