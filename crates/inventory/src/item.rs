use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockwise_core::{ItemId, ValueObject};

/// What kind of stock an item is.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    RawMaterial,
    FinishedProduct,
}

/// Read-only view of an inventory item at the time of the call.
///
/// Supplied by the data-access layer; the engine never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItemSnapshot {
    pub id: ItemId,
    pub code: String,
    pub name: String,
    pub quantity: f64,
    /// Current minimum-stock policy (reorder level) configured for the item.
    pub min_stock: f64,
    pub unit: String,
    pub unit_cost: f64,
    pub kind: ItemKind,
}

impl InventoryItemSnapshot {
    /// `quantity × unit_cost`.
    pub fn stock_value(&self) -> f64 {
        self.quantity * self.unit_cost
    }
}

impl ValueObject for InventoryItemSnapshot {}

/// A stock movement for one item. Negative quantity means consumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementEvent {
    pub item_id: ItemId,
    pub item_kind: ItemKind,
    pub quantity: f64,
    pub timestamp: DateTime<Utc>,
}

impl MovementEvent {
    pub fn is_consumption(&self) -> bool {
        self.quantity < 0.0
    }

    /// Consumed amount as a positive number (0 for receipts).
    pub fn consumed(&self) -> f64 {
        if self.is_consumption() { -self.quantity } else { 0.0 }
    }
}
