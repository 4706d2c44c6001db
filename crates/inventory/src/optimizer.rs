//! EOQ / reorder-point / safety-stock policy and its cost against the current policy.
//!
//! The current policy's cost uses `min_stock` as a stand-in for the historical order
//! quantity: orders per year = `ceil(annual / min_stock)` and average inventory =
//! `min_stock + min_stock / 2`. No purchase-order history is consulted.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use stockwise_core::{DomainError, DomainResult, ItemId, ValueObject};

use crate::consumption_rate::ConsumptionRate;
use crate::item::InventoryItemSnapshot;

/// Cost model and policy parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Fixed cost per purchase order.
    pub order_cost: f64,
    /// Yearly holding cost as a fraction of unit cost (0.20 = 20%).
    pub holding_cost_rate: f64,
    pub lead_time_days: f64,
    pub safety_stock_days: f64,
    /// Items with fewer consumption data points get no recommendation.
    pub min_history_points: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            order_cost: 100.0,
            holding_cost_rate: 0.20,
            lead_time_days: 7.0,
            safety_stock_days: 3.0,
            min_history_points: 3,
        }
    }
}

impl OptimizerConfig {
    pub fn with_order_cost(mut self, order_cost: f64) -> Self {
        self.order_cost = order_cost;
        self
    }

    pub fn with_holding_cost_rate(mut self, rate: f64) -> Self {
        self.holding_cost_rate = rate;
        self
    }

    pub fn with_lead_time_days(mut self, days: f64) -> Self {
        self.lead_time_days = days;
        self
    }

    pub fn with_safety_stock_days(mut self, days: f64) -> Self {
        self.safety_stock_days = days;
        self
    }

    pub fn with_min_history_points(mut self, points: usize) -> Self {
        self.min_history_points = points;
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        let non_negative = [
            ("order_cost", self.order_cost),
            ("holding_cost_rate", self.holding_cost_rate),
            ("lead_time_days", self.lead_time_days),
            ("safety_stock_days", self.safety_stock_days),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(DomainError::validation(format!(
                    "{name} must be a finite non-negative number"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EoqResult {
    pub economic_order_quantity: f64,
    pub reorder_point: f64,
    pub safety_stock: f64,
    pub optimal_level: f64,
    /// Orders per year at the EOQ (0 when the EOQ is 0).
    pub optimal_order_frequency: f64,
    pub current_cost: f64,
    pub optimal_cost: f64,
    pub potential_savings: f64,
    pub savings_percentage: f64,
}

impl ValueObject for EoqResult {}

/// Compute the EOQ policy for one item.
///
/// A zero unit holding cost makes the EOQ undefined; it is reported as 0 with no
/// order frequency.
pub fn optimize_inventory(
    item: &InventoryItemSnapshot,
    annual_consumption: f64,
    daily_rate: f64,
    config: &OptimizerConfig,
) -> EoqResult {
    let unit_holding_cost = item.unit_cost * config.holding_cost_rate;

    let eoq = if unit_holding_cost > 0.0 && annual_consumption > 0.0 {
        (2.0 * annual_consumption * config.order_cost / unit_holding_cost).sqrt()
    } else {
        if unit_holding_cost <= 0.0 {
            warn!(item = %item.code, unit_cost = item.unit_cost, "zero holding cost; EOQ undefined");
        }
        0.0
    };

    let safety_stock = daily_rate * config.safety_stock_days;
    let reorder_point = daily_rate * config.lead_time_days + safety_stock;
    let optimal_level = reorder_point + eoq / 2.0;
    let optimal_order_frequency = if eoq > 0.0 {
        (annual_consumption / eoq).ceil()
    } else {
        0.0
    };

    let current_cost = if item.min_stock > 0.0 {
        let orders = (annual_consumption / item.min_stock).ceil();
        let average_inventory = item.min_stock + item.min_stock / 2.0;
        orders * config.order_cost + average_inventory * unit_holding_cost
    } else {
        0.0
    };
    let optimal_cost =
        optimal_order_frequency * config.order_cost + optimal_level * unit_holding_cost;

    let (potential_savings, savings_percentage) = if current_cost > 0.0 {
        let savings = current_cost - optimal_cost;
        (savings, savings / current_cost * 100.0)
    } else {
        (0.0, 0.0)
    };

    debug!(
        item = %item.code,
        eoq,
        reorder_point,
        current_cost,
        optimal_cost,
        "inventory policy computed"
    );

    EoqResult {
        economic_order_quantity: eoq,
        reorder_point,
        safety_stock,
        optimal_level,
        optimal_order_frequency,
        current_cost,
        optimal_cost,
        potential_savings,
        savings_percentage,
    }
}

/// One item's inputs to [`recommend`].
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationCandidate {
    pub item: InventoryItemSnapshot,
    pub annual_consumption: f64,
    pub daily_rate: f64,
    /// Consumption observations the rate was derived from.
    pub history_points: usize,
}

impl OptimizationCandidate {
    /// Annualize an estimated rate (`daily_rate × 365`).
    pub fn from_rate(item: InventoryItemSnapshot, rate: &ConsumptionRate) -> Self {
        Self {
            item,
            annual_consumption: rate.daily_rate * 365.0,
            daily_rate: rate.daily_rate,
            history_points: rate.movement_count,
        }
    }

    fn has_enough_data(&self, config: &OptimizerConfig) -> bool {
        self.history_points >= config.min_history_points
            && self.daily_rate.is_finite()
            && self.daily_rate > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecommendation {
    pub item_id: ItemId,
    pub code: String,
    pub name: String,
    pub result: EoqResult,
}

/// Policies for every candidate with enough data, largest potential savings first.
pub fn recommend(
    candidates: &[OptimizationCandidate],
    config: &OptimizerConfig,
) -> Vec<InventoryRecommendation> {
    let mut out: Vec<InventoryRecommendation> = candidates
        .iter()
        .filter(|c| {
            let enough = c.has_enough_data(config);
            if !enough {
                debug!(item = %c.item.code, points = c.history_points, "insufficient data; skipped");
            }
            enough
        })
        .map(|c| InventoryRecommendation {
            item_id: c.item.id,
            code: c.item.code.clone(),
            name: c.item.name.clone(),
            result: optimize_inventory(&c.item, c.annual_consumption, c.daily_rate, config),
        })
        .collect();

    out.sort_by(|a, b| {
        b.result
            .potential_savings
            .total_cmp(&a.result.potential_savings)
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumption_rate::ConsumptionTrend;
    use crate::item::ItemKind;
    use proptest::prelude::*;

    fn item(id: u64, unit_cost: f64, min_stock: f64) -> InventoryItemSnapshot {
        InventoryItemSnapshot {
            id: ItemId::new(id),
            code: format!("IT-{id}"),
            name: format!("Item {id}"),
            quantity: 100.0,
            min_stock,
            unit: "pcs".to_string(),
            unit_cost,
            kind: ItemKind::RawMaterial,
        }
    }

    fn candidate(id: u64, min_stock: f64, daily_rate: f64, points: usize) -> OptimizationCandidate {
        OptimizationCandidate {
            item: item(id, 10.0, min_stock),
            annual_consumption: daily_rate * 365.0,
            daily_rate,
            history_points: points,
        }
    }

    #[test]
    fn textbook_eoq() {
        // H = 10 * 0.2 = 2; EOQ = sqrt(2 * 1000 * 100 / 2) = sqrt(100000)
        let r = optimize_inventory(&item(1, 10.0, 50.0), 1000.0, 4.0, &OptimizerConfig::default());
        assert!((r.economic_order_quantity - 100_000f64.sqrt()).abs() < 1e-9);
        assert_eq!(r.safety_stock, 12.0);
        assert_eq!(r.reorder_point, 40.0);
        assert!((r.optimal_level - (40.0 + 100_000f64.sqrt() / 2.0)).abs() < 1e-9);
        // 1000 / 316.2 = 3.16 -> 4 orders
        assert_eq!(r.optimal_order_frequency, 4.0);
    }

    #[test]
    fn cost_comparison_uses_min_stock_proxy() {
        let cfg = OptimizerConfig::default();
        let r = optimize_inventory(&item(1, 10.0, 50.0), 1000.0, 4.0, &cfg);
        // current: 20 orders * 100 + 75 * 2 = 2150
        assert_eq!(r.current_cost, 2150.0);
        let expected_optimal = 4.0 * 100.0 + r.optimal_level * 2.0;
        assert!((r.optimal_cost - expected_optimal).abs() < 1e-9);
        assert!((r.potential_savings - (2150.0 - expected_optimal)).abs() < 1e-9);
        assert!((r.savings_percentage - r.potential_savings / 2150.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_holding_cost_yields_zero_eoq() {
        let r = optimize_inventory(&item(1, 0.0, 50.0), 1000.0, 4.0, &OptimizerConfig::default());
        assert_eq!(r.economic_order_quantity, 0.0);
        assert_eq!(r.optimal_order_frequency, 0.0);
        assert!(r.economic_order_quantity.is_finite());
    }

    #[test]
    fn no_min_stock_means_no_savings_claim() {
        let r = optimize_inventory(&item(1, 10.0, 0.0), 1000.0, 4.0, &OptimizerConfig::default());
        assert_eq!(r.current_cost, 0.0);
        assert_eq!(r.potential_savings, 0.0);
        assert_eq!(r.savings_percentage, 0.0);
    }

    #[test]
    fn config_is_adjustable() {
        let cfg = OptimizerConfig::default()
            .with_lead_time_days(14.0)
            .with_safety_stock_days(0.0);
        let r = optimize_inventory(&item(1, 10.0, 50.0), 1000.0, 2.0, &cfg);
        assert_eq!(r.safety_stock, 0.0);
        assert_eq!(r.reorder_point, 28.0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(OptimizerConfig::default().with_order_cost(-1.0).validate().is_err());
        assert!(OptimizerConfig::default().with_holding_cost_rate(f64::NAN).validate().is_err());
        OptimizerConfig::default().validate().unwrap();
    }

    #[test]
    fn recommend_skips_thin_history_and_sorts_by_savings() {
        let candidates = vec![
            candidate(1, 5.0, 3.0, 10),  // tiny min_stock: many orders, big savings
            candidate(2, 50.0, 3.0, 2),  // too few points
            candidate(3, 40.0, 0.0, 10), // no consumption
            candidate(4, 300.0, 3.0, 10),
        ];
        let recs = recommend(&candidates, &OptimizerConfig::default());
        let ids: Vec<u64> = recs.iter().map(|r| r.item_id.get()).collect();
        assert_eq!(ids, vec![1, 4]);
        assert!(recs[0].result.potential_savings >= recs[1].result.potential_savings);
    }

    #[test]
    fn candidate_from_rate_annualizes() {
        let rate = ConsumptionRate {
            daily_rate: 2.0,
            variability: 0.1,
            confidence: 0.5,
            trend: ConsumptionTrend::Flat,
            movement_count: 7,
            days_covered: 30,
        };
        let c = OptimizationCandidate::from_rate(item(1, 1.0, 1.0), &rate);
        assert_eq!(c.annual_consumption, 730.0);
        assert_eq!(c.history_points, 7);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: doubling annual consumption scales the EOQ by sqrt(2).
        #[test]
        fn eoq_scales_with_square_root_of_demand(
            annual in 1.0f64..1e7,
            unit_cost in 0.01f64..1e4,
            order_cost in 1.0f64..1e4,
        ) {
            let cfg = OptimizerConfig::default().with_order_cost(order_cost);
            let it = item(1, unit_cost, 10.0);
            let base = optimize_inventory(&it, annual, 1.0, &cfg).economic_order_quantity;
            let doubled = optimize_inventory(&it, annual * 2.0, 1.0, &cfg).economic_order_quantity;
            let ratio = doubled / base;
            prop_assert!((ratio - 2f64.sqrt()).abs() < 1e-9, "ratio {}", ratio);
        }
    }
}
