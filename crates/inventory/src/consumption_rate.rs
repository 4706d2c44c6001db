//! Recency-weighted consumption rate from raw movement events.
//!
//! Unlike the monthly forecasters, this works on individual movements:
//! - each consumption inside the look-back window is weighted by how recent it is,
//!   decaying linearly to 0 at the window edge;
//! - variability is the coefficient of variation of per-day totals;
//! - the trend compares the mean quantity of the older and newer halves of the events.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use stockwise_core::ValueObject;

use crate::item::MovementEvent;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Minimum number of consumption events before a trend is reported.
pub const MIN_TREND_EVENTS: usize = 5;

/// Relative change between halves that counts as a trend (±10%).
pub const TREND_THRESHOLD: f64 = 0.10;

/// Look-back window for rate estimation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    Week,
    Month,
    Quarter,
    Year,
}

impl TimeRange {
    pub fn days(&self) -> u32 {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::Quarter => 90,
            TimeRange::Year => 365,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumptionTrend {
    Increasing,
    Decreasing,
    Flat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRate {
    /// Units consumed per day.
    pub daily_rate: f64,
    /// Coefficient of variation of daily totals (0 = perfectly steady).
    pub variability: f64,
    /// In `[0, 1]`: grows with the number of events, shrinks with variability.
    pub confidence: f64,
    pub trend: ConsumptionTrend,
    /// Consumption events that fell inside the window.
    pub movement_count: usize,
    pub days_covered: u32,
}

impl ConsumptionRate {
    /// No usable consumption in the window.
    pub fn none() -> Self {
        Self {
            daily_rate: 0.0,
            variability: 0.0,
            confidence: 0.0,
            trend: ConsumptionTrend::Flat,
            movement_count: 0,
            days_covered: 0,
        }
    }
}

impl ValueObject for ConsumptionRate {}

/// Estimate one item's consumption rate as of `now`.
///
/// Only events with negative quantity are considered; events older than the
/// window are ignored, and events stamped after `now` count as happening now.
pub fn estimate_consumption_rate(
    movements: &[MovementEvent],
    range: TimeRange,
    now: DateTime<Utc>,
) -> ConsumptionRate {
    let max_days = range.days() as f64;

    let mut events: Vec<(DateTime<Utc>, f64)> = movements
        .iter()
        .filter(|m| m.is_consumption() && m.quantity.is_finite())
        .filter(|m| days_ago(m.timestamp, now) <= max_days)
        .map(|m| (m.timestamp, m.consumed()))
        .collect();

    if events.is_empty() {
        return ConsumptionRate::none();
    }
    events.sort_by_key(|(ts, _)| *ts);

    let oldest = days_ago(events[0].0, now);
    let days_covered = (oldest.ceil() as u32).clamp(1, range.days());

    let (weighted_sum, weight_total) =
        events
            .iter()
            .fold((0.0_f64, 0.0_f64), |(sum, total), (ts, qty)| {
                // Linear decay: 1 for "now", 0 at the window edge.
                let weight = ((max_days - days_ago(*ts, now)) / max_days).max(0.0);
                (sum + qty * weight, total + weight)
            });

    let daily_rate = if weight_total > 0.0 {
        (weighted_sum / weight_total) / days_covered as f64
    } else {
        0.0
    };

    let variability = daily_variability(&events);
    let rate = ConsumptionRate {
        daily_rate,
        variability,
        confidence: confidence(events.len(), variability),
        trend: trend(&events),
        movement_count: events.len(),
        days_covered,
    };

    debug!(
        range_days = range.days(),
        movements = rate.movement_count,
        daily_rate = rate.daily_rate,
        variability = rate.variability,
        trend = ?rate.trend,
        "consumption rate estimated"
    );
    rate
}

fn days_ago(ts: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    ((now - ts).num_milliseconds() as f64 / MILLIS_PER_DAY).max(0.0)
}

/// Coefficient of variation of per-calendar-day totals.
fn daily_variability(events: &[(DateTime<Utc>, f64)]) -> f64 {
    let mut per_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (ts, qty) in events {
        *per_day.entry(ts.date_naive()).or_default() += qty;
    }
    if per_day.len() < 2 {
        return 0.0;
    }

    let totals: Vec<f64> = per_day.into_values().collect();
    let n = totals.len() as f64;
    let mean = totals.iter().sum::<f64>() / n;
    if mean == 0.0 {
        return 0.0;
    }
    let var = totals.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / n;
    var.sqrt() / mean
}

/// `(1 - e^(-n/10)) / (1 + variability)`.
fn confidence(count: usize, variability: f64) -> f64 {
    let sample_factor = 1.0 - (-(count as f64) / 10.0).exp();
    sample_factor / (1.0 + variability.max(0.0))
}

fn trend(events: &[(DateTime<Utc>, f64)]) -> ConsumptionTrend {
    if events.len() < MIN_TREND_EVENTS {
        return ConsumptionTrend::Flat;
    }
    let (older, newer) = events.split_at(events.len() / 2);
    let mean =
        |xs: &[(DateTime<Utc>, f64)]| xs.iter().map(|(_, q)| q).sum::<f64>() / xs.len() as f64;
    let (before, after) = (mean(older), mean(newer));
    if before <= 0.0 {
        return ConsumptionTrend::Flat;
    }

    let change = (after - before) / before;
    if change > TREND_THRESHOLD {
        ConsumptionTrend::Increasing
    } else if change < -TREND_THRESHOLD {
        ConsumptionTrend::Decreasing
    } else {
        ConsumptionTrend::Flat
    }
}
