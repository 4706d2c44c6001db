use serde::{Deserialize, Serialize};
use tracing::debug;

use stockwise_core::{MaterialId, ValueObject, YearMonth};

use crate::algorithm::Algorithm;
use crate::config::ForecastConfig;
use crate::error::ForecastError;
use crate::history::{ConsumptionRecord, ConsumptionSeries, group_by_material};
use crate::predictors;

/// A single predicted month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub month: YearMonth,
    /// Always >= 0.
    pub predicted: f64,
    pub algorithm: Algorithm,
}

impl ValueObject for ForecastPoint {}

/// All forecast points produced for one material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialForecast {
    pub material_id: MaterialId,
    pub material_code: String,
    pub material_name: String,
    pub category: String,
    /// Grouped by algorithm (in request order), then ascending by month.
    pub points: Vec<ForecastPoint>,
}

/// Entry point for consumption forecasting.
///
/// Holds only a validated [`ForecastConfig`]; every method is a pure function of
/// its arguments, so one instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Forecaster {
    config: ForecastConfig,
}

impl Forecaster {
    pub fn new(config: ForecastConfig) -> Result<Self, ForecastError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecast `horizon` months from one material's monthly records.
    ///
    /// Records need not be sorted; they are ordered by month first.
    pub fn forecast_series(
        &self,
        history: &[ConsumptionRecord],
        horizon: usize,
        algorithm: Algorithm,
    ) -> Vec<f64> {
        self.forecast(&ConsumptionSeries::from_records(history), horizon, algorithm)
    }

    /// Dispatch on the algorithm tag. Always returns exactly `horizon` values.
    pub fn forecast(
        &self,
        series: &ConsumptionSeries,
        horizon: usize,
        algorithm: Algorithm,
    ) -> Vec<f64> {
        let cfg = &self.config;
        let values = series.values();
        match algorithm {
            Algorithm::MovingAverage => {
                predictors::moving_average(values, horizon, cfg.moving_average_window)
            }
            Algorithm::LinearRegression => predictors::linear_regression(values, horizon),
            Algorithm::SeasonalTrend => predictors::seasonal_trend(series, horizon),
            Algorithm::SeasonalDecomposition => predictors::seasonal_decomposition(
                series,
                horizon,
                cfg.seasonal_period,
                cfg.outlier_threshold,
            ),
            Algorithm::ExponentialSmoothing => {
                predictors::exponential_smoothing(values, horizon, cfg.smoothing_alpha)
            }
            Algorithm::Arima => predictors::arima(values, horizon, cfg.ar_order, cfg.ma_order),
            Algorithm::Ensemble => self.simple_ensemble(series, horizon),
            Algorithm::WeightedEnsemble => self.weighted_ensemble(series, horizon),
        }
    }

    /// Forecast every material in a multi-material history with each requested algorithm.
    ///
    /// `month_labels` name the forecast steps; steps beyond the given labels continue
    /// month by month from the last label, or from the material's last observed month
    /// when no labels are given. An empty `algorithms` list means the weighted ensemble.
    pub fn smart_forecast(
        &self,
        history: &[ConsumptionRecord],
        horizon: usize,
        month_labels: &[YearMonth],
        algorithms: &[Algorithm],
    ) -> Vec<MaterialForecast> {
        let algorithms: &[Algorithm] = if algorithms.is_empty() {
            &[Algorithm::WeightedEnsemble]
        } else {
            algorithms
        };

        let materials = group_by_material(history);
        debug!(
            materials = materials.len(),
            horizon,
            algorithms = algorithms.len(),
            "running consumption forecast"
        );

        materials
            .into_iter()
            .map(|material| {
                let labels = step_labels(month_labels, &material.series, horizon);
                let points = algorithms
                    .iter()
                    .flat_map(|&algorithm| {
                        self.forecast(&material.series, horizon, algorithm)
                            .into_iter()
                            .zip(labels.iter().copied())
                            .map(move |(predicted, month)| ForecastPoint {
                                month,
                                predicted: predicted.max(0.0),
                                algorithm,
                            })
                    })
                    .collect();

                MaterialForecast {
                    material_id: material.material_id,
                    material_code: material.material_code,
                    material_name: material.material_name,
                    category: material.category,
                    points,
                }
            })
            .collect()
    }
}

fn step_labels(given: &[YearMonth], series: &ConsumptionSeries, horizon: usize) -> Vec<YearMonth> {
    let mut labels: Vec<YearMonth> = given.iter().take(horizon).copied().collect();
    let anchor = labels.last().copied().or_else(|| series.last_month());
    if let Some(anchor) = anchor {
        let missing = horizon - labels.len();
        labels.extend((1..=missing as u32).map(|i| anchor.plus_months(i)));
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(id: u64, month: &str, qty: f64) -> ConsumptionRecord {
        ConsumptionRecord {
            material_id: MaterialId::new(id),
            material_code: format!("MAT-{id:03}"),
            material_name: format!("Material {id}"),
            category: "fasteners".to_string(),
            month: month.parse().unwrap(),
            consumption_qty: qty,
        }
    }

    fn scenario_history() -> Vec<ConsumptionRecord> {
        vec![
            record(1, "2024-01", 10.0),
            record(1, "2024-02", 20.0),
            record(1, "2024-03", 30.0),
        ]
    }

    fn ym(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    #[test]
    fn moving_average_scenario() {
        let f = Forecaster::default();
        assert_eq!(
            f.forecast_series(&scenario_history(), 1, Algorithm::MovingAverage),
            vec![20.0]
        );
    }

    #[test]
    fn linear_regression_scenario() {
        let f = Forecaster::default();
        assert_eq!(
            f.forecast_series(&scenario_history(), 1, Algorithm::LinearRegression),
            vec![40.0]
        );
    }

    #[test]
    fn unsorted_records_are_ordered_first() {
        let mut history = scenario_history();
        history.reverse();
        let f = Forecaster::default();
        assert_eq!(
            f.forecast_series(&history, 1, Algorithm::LinearRegression),
            vec![40.0]
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = Forecaster::new(ForecastConfig::default().with_moving_average_window(0))
            .unwrap_err();
        assert!(matches!(err, ForecastError::InvalidConfig(_)));
    }

    #[test]
    fn smart_forecast_labels_each_material() {
        let mut history = scenario_history();
        history.push(record(2, "2024-02", 5.0));
        history.push(record(2, "2024-03", 5.0));

        let f = Forecaster::default();
        let out = f.smart_forecast(
            &history,
            2,
            &[ym("2024-04"), ym("2024-05")],
            &[Algorithm::MovingAverage, Algorithm::ExponentialSmoothing],
        );

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].material_id, MaterialId::new(1));
        assert_eq!(out[0].material_code, "MAT-001");
        assert_eq!(out[0].points.len(), 4);
        assert_eq!(out[0].points[0].month, ym("2024-04"));
        assert_eq!(out[0].points[0].algorithm, Algorithm::MovingAverage);
        assert_eq!(out[0].points[0].predicted, 20.0);
        assert_eq!(out[0].points[3].month, ym("2024-05"));
        assert_eq!(out[0].points[3].algorithm, Algorithm::ExponentialSmoothing);

        assert!(out[1].points.iter().all(|p| p.predicted == 5.0));
    }

    #[test]
    fn smart_forecast_extends_missing_labels() {
        let f = Forecaster::default();
        let out = f.smart_forecast(&scenario_history(), 3, &[], &[Algorithm::SeasonalTrend]);
        let months: Vec<String> = out[0].points.iter().map(|p| p.month.to_string()).collect();
        assert_eq!(months, vec!["2024-04", "2024-05", "2024-06"]);

        let out = f.smart_forecast(&scenario_history(), 3, &[ym("2025-01")], &[Algorithm::Arima]);
        let months: Vec<String> = out[0].points.iter().map(|p| p.month.to_string()).collect();
        assert_eq!(months, vec!["2025-01", "2025-02", "2025-03"]);
    }

    #[test]
    fn smart_forecast_defaults_to_weighted_ensemble() {
        let f = Forecaster::default();
        let out = f.smart_forecast(&scenario_history(), 1, &[], &[]);
        assert_eq!(out[0].points.len(), 1);
        assert_eq!(out[0].points[0].algorithm, Algorithm::WeightedEnsemble);
    }

    #[test]
    fn smart_forecast_of_empty_history_is_empty() {
        let f = Forecaster::default();
        assert!(f.smart_forecast(&[], 3, &[], &Algorithm::ALL).is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: every algorithm returns exactly `horizon` values, deterministically.
        #[test]
        fn horizon_length_and_determinism(
            values in prop::collection::vec(0.0f64..1e5, 0..40),
            horizon in 0usize..24,
        ) {
            let start = ym("2019-06");
            let history: Vec<ConsumptionRecord> = values
                .iter()
                .enumerate()
                .map(|(i, v)| ConsumptionRecord {
                    month: start.plus_months(i as u32),
                    ..record(9, "2019-06", *v)
                })
                .collect();

            let f = Forecaster::default();
            for alg in Algorithm::ALL {
                let first = f.forecast_series(&history, horizon, alg);
                let second = f.forecast_series(&history, horizon, alg);
                prop_assert_eq!(first.len(), horizon);
                prop_assert_eq!(first, second);
            }
        }
    }
}
