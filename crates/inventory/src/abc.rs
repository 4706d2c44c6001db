//! Pareto (ABC) classification of items by stock value.
//!
//! Items are ranked by value, descending, and classified by the share of total
//! value accumulated *before* them: below `a` is class A, below `b` is class B,
//! everything after is class C. The item that crosses a threshold still belongs
//! to the lower band, so class A may overshoot `a` by at most one item.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stockwise_core::{DomainError, DomainResult, ItemId, ValueObject};

use crate::item::InventoryItemSnapshot;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AbcClass {
    A,
    B,
    C,
}

/// Cumulative value fractions closing the A and B bands.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbcThresholds {
    pub a: f64,
    pub b: f64,
}

impl Default for AbcThresholds {
    fn default() -> Self {
        Self { a: 0.80, b: 0.95 }
    }
}

impl AbcThresholds {
    pub fn new(a: f64, b: f64) -> DomainResult<Self> {
        let thresholds = Self { a, b };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn with_a(mut self, a: f64) -> Self {
        self.a = a;
        self
    }

    pub fn with_b(mut self, b: f64) -> Self {
        self.b = b;
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        if !(self.a > 0.0 && self.a < self.b && self.b <= 1.0) {
            return Err(DomainError::validation(format!(
                "ABC thresholds must satisfy 0 < a < b <= 1 (a={}, b={})",
                self.a, self.b
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcItem {
    pub id: ItemId,
    pub value: f64,
}

/// One ranked item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcEntry {
    pub id: ItemId,
    pub value: f64,
    /// Fraction of total value.
    pub share: f64,
    /// Fraction of total value up to and including this item.
    pub cumulative_share: f64,
    pub class: AbcClass,
}

impl ValueObject for AbcEntry {}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AbcClassification {
    /// Descending by value; equal values keep input order.
    pub entries: Vec<AbcEntry>,
    pub total_value: f64,
}

impl AbcClassification {
    pub fn class_of(&self, id: ItemId) -> Option<AbcClass> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.class)
    }

    pub fn to_map(&self) -> BTreeMap<ItemId, AbcClass> {
        self.entries.iter().map(|e| (e.id, e.class)).collect()
    }

    pub fn count(&self, class: AbcClass) -> usize {
        self.entries.iter().filter(|e| e.class == class).count()
    }
}

/// Classify items by value. Items whose value is not strictly positive are left out.
pub fn classify_abc(items: &[AbcItem], thresholds: &AbcThresholds) -> AbcClassification {
    let mut ranked: Vec<AbcItem> = items
        .iter()
        .filter(|i| i.value.is_finite() && i.value > 0.0)
        .copied()
        .collect();
    // Stable: ties keep their input order.
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value));

    let total: f64 = ranked.iter().map(|i| i.value).sum();
    if total <= 0.0 {
        return AbcClassification::default();
    }

    let mut cumulative = 0.0;
    let entries = ranked
        .into_iter()
        .map(|item| {
            let before = cumulative / total;
            let class = if before < thresholds.a {
                AbcClass::A
            } else if before < thresholds.b {
                AbcClass::B
            } else {
                AbcClass::C
            };
            cumulative += item.value;
            AbcEntry {
                id: item.id,
                value: item.value,
                share: item.value / total,
                cumulative_share: cumulative / total,
                class,
            }
        })
        .collect();

    AbcClassification {
        entries,
        total_value: total,
    }
}

/// `quantity × unit_cost` per snapshot, keeping only positive values.
pub fn abc_items(snapshots: &[InventoryItemSnapshot]) -> Vec<AbcItem> {
    snapshots
        .iter()
        .map(|s| AbcItem {
            id: s.id,
            value: s.stock_value(),
        })
        .filter(|i| i.value.is_finite() && i.value > 0.0)
        .collect()
}
