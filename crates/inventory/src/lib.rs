//! Inventory-control side of the engine.
//!
//! Deterministic calculations only (no IO, no storage): movement-based consumption
//! rates, days-to-stockout projection, EOQ policies, and ABC classification.
//! Inputs are read-only snapshots supplied by the caller.

pub mod abc;
pub mod config;
pub mod consumption_rate;
pub mod item;
pub mod optimizer;
pub mod projection;

pub use abc::{AbcClass, AbcClassification, AbcEntry, AbcItem, AbcThresholds, abc_items, classify_abc};
pub use config::{ConfigError, EngineConfig};
pub use consumption_rate::{
    ConsumptionRate, ConsumptionTrend, TimeRange, estimate_consumption_rate,
};
pub use item::{InventoryItemSnapshot, ItemKind, MovementEvent};
pub use optimizer::{
    EoqResult, InventoryRecommendation, OptimizationCandidate, OptimizerConfig,
    optimize_inventory, recommend,
};
pub use projection::{StockProjection, StockTier, StockoutForecast, prioritize, project_stockout};
