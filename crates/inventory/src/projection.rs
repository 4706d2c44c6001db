//! Days-to-stockout projection and urgency tiers.

use serde::{Deserialize, Serialize};

use stockwise_core::{ItemId, ValueObject};

use crate::item::InventoryItemSnapshot;

/// At or below this many days of cover an item is critical.
pub const CRITICAL_DAYS: f64 = 7.0;

/// Below this many days of cover an item needs restocking.
pub const RESTOCK_DAYS: f64 = 14.0;

/// Urgency tier, most urgent in-stock tier first.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockTier {
    Critical,
    NeedsRestock,
    Healthy,
    OutOfStock,
}

impl StockTier {
    /// Ordering rank used by [`prioritize`]: critical, needs restock, healthy, out of stock.
    fn rank(&self) -> u8 {
        match self {
            StockTier::Critical => 0,
            StockTier::NeedsRestock => 1,
            StockTier::Healthy => 2,
            StockTier::OutOfStock => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockProjection {
    /// `None` when nothing is being consumed (no stockout in sight).
    pub days_remaining: Option<f64>,
    pub tier: StockTier,
}

impl StockProjection {
    pub fn is_out_of_stock(&self) -> bool {
        self.tier == StockTier::OutOfStock
    }

    pub fn is_critical(&self) -> bool {
        self.tier == StockTier::Critical
    }

    /// Less than two weeks of cover left while still in stock (critical included).
    pub fn needs_restock(&self) -> bool {
        matches!(self.tier, StockTier::Critical | StockTier::NeedsRestock)
    }
}

impl ValueObject for StockProjection {}

/// Project days until stockout for `quantity` on hand consumed at `daily_rate` per day.
pub fn project_stockout(quantity: f64, daily_rate: f64) -> StockProjection {
    if quantity <= 0.0 {
        return StockProjection {
            days_remaining: Some(0.0),
            tier: StockTier::OutOfStock,
        };
    }
    if !(daily_rate.is_finite() && daily_rate > 0.0) {
        return StockProjection {
            days_remaining: None,
            tier: StockTier::Healthy,
        };
    }

    let days = quantity / daily_rate;
    let tier = if days <= CRITICAL_DAYS {
        StockTier::Critical
    } else if days < RESTOCK_DAYS {
        StockTier::NeedsRestock
    } else {
        StockTier::Healthy
    };
    StockProjection {
        days_remaining: Some(days),
        tier,
    }
}

/// Stockout projection for one inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockoutForecast {
    pub item_id: ItemId,
    pub code: String,
    pub name: String,
    pub quantity: f64,
    pub daily_rate: f64,
    pub projection: StockProjection,
}

impl StockoutForecast {
    pub fn new(item: &InventoryItemSnapshot, daily_rate: f64) -> Self {
        Self {
            item_id: item.id,
            code: item.code.clone(),
            name: item.name.clone(),
            quantity: item.quantity,
            daily_rate,
            projection: project_stockout(item.quantity, daily_rate),
        }
    }
}

/// Order forecasts by urgency: critical, needs restock, healthy, then out of stock;
/// within a tier by ascending days remaining (unknown last). Ties keep input order.
pub fn prioritize(mut forecasts: Vec<StockoutForecast>) -> Vec<StockoutForecast> {
    forecasts.sort_by(|a, b| {
        let days = |f: &StockoutForecast| f.projection.days_remaining.unwrap_or(f64::INFINITY);
        a.projection
            .tier
            .rank()
            .cmp(&b.projection.tier.rank())
            .then(days(a).total_cmp(&days(b)))
    });
    forecasts
}
