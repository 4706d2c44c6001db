//! Consumption history: the monthly input data model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use stockwise_core::{MaterialId, YearMonth};

/// One month of consumption for one material, as supplied by the persistence layer.
///
/// At most one record per `(material_id, month)` is expected; the engine does not
/// deduplicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    pub material_id: MaterialId,
    pub material_code: String,
    pub material_name: String,
    pub category: String,
    pub month: YearMonth,
    pub consumption_qty: f64,
}

/// A single material's consumption, ordered ascending by month.
///
/// Gaps between months are kept as-is; predictors treat the series as a plain
/// sequence of observations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConsumptionSeries {
    months: Vec<YearMonth>,
    values: Vec<f64>,
}

impl ConsumptionSeries {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ConsumptionRecord>,
    {
        Self::from_points(records.into_iter().map(|r| (r.month, r.consumption_qty)))
    }

    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (YearMonth, f64)>,
    {
        let mut points: Vec<(YearMonth, f64)> = points
            .into_iter()
            .map(|(month, qty)| (month, sanitize(month, qty)))
            .collect();
        points.sort_by_key(|(month, _)| *month);

        let (months, values) = points.into_iter().unzip();
        Self { months, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn months(&self) -> &[YearMonth] {
        &self.months
    }

    pub fn last_month(&self) -> Option<YearMonth> {
        self.months.last().copied()
    }

    /// The first `len` observations (used to carve out a backtest training set).
    pub fn head(&self, len: usize) -> Self {
        let len = len.min(self.len());
        Self {
            months: self.months[..len].to_vec(),
            values: self.values[..len].to_vec(),
        }
    }

    /// Calendar months of the `horizon` steps following the last observation.
    ///
    /// Empty when the series itself is empty.
    pub fn next_months(&self, horizon: usize) -> Vec<YearMonth> {
        match self.last_month() {
            Some(last) => (1..=horizon as u32).map(|i| last.plus_months(i)).collect(),
            None => Vec::new(),
        }
    }
}

fn sanitize(month: YearMonth, qty: f64) -> f64 {
    if qty.is_finite() && qty >= 0.0 {
        qty
    } else {
        warn!(%month, qty, "invalid consumption quantity replaced by 0");
        0.0
    }
}

/// One material's descriptive fields plus its consumption series.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialHistory {
    pub material_id: MaterialId,
    pub material_code: String,
    pub material_name: String,
    pub category: String,
    pub series: ConsumptionSeries,
}

/// Split a multi-material history into per-material series, ascending by id.
///
/// Descriptive fields are taken from the material's most recent record.
pub fn group_by_material(records: &[ConsumptionRecord]) -> Vec<MaterialHistory> {
    let mut grouped: BTreeMap<MaterialId, Vec<&ConsumptionRecord>> = BTreeMap::new();
    for record in records {
        grouped.entry(record.material_id).or_default().push(record);
    }

    grouped
        .into_iter()
        .filter_map(|(material_id, rows)| {
            let latest = rows.iter().max_by_key(|r| r.month)?;
            Some(MaterialHistory {
                material_id,
                material_code: latest.material_code.clone(),
                material_name: latest.material_name.clone(),
                category: latest.category.clone(),
                series: ConsumptionSeries::from_records(rows.iter().copied()),
            })
        })
        .collect()
}
