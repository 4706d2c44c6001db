//! The independent predictors.
//!
//! Every predictor is a pure function of `(series, horizon, parameters)` returning
//! exactly `horizon` values. An empty series yields a flat zero forecast.
//!
//! The recursive models (moving average, AR/MA-like) feed their own predictions
//! back into a working buffer that lives only for the duration of the call.

use stockwise_core::YearMonth;

use crate::history::ConsumptionSeries;

/// Mean of the last `window` known values, recursively extended.
pub fn moving_average(values: &[f64], horizon: usize, window: usize) -> Vec<f64> {
    if values.is_empty() || window == 0 {
        return vec![0.0; horizon];
    }

    let mut working = values.to_vec();
    let mut out = Vec::with_capacity(horizon);
    for _ in 0..horizon {
        let take = window.min(working.len());
        let next = mean(&working[working.len() - take..]);
        working.push(next);
        out.push(next);
    }
    out
}

/// Least-squares line over `x = 1..=n`, extrapolated, rounded and clamped at 0.
pub fn linear_regression(values: &[f64], horizon: usize) -> Vec<f64> {
    if values.is_empty() {
        return vec![0.0; horizon];
    }

    let n = values.len();
    let xs: Vec<f64> = (1..=n).map(|x| x as f64).collect();
    let (slope, intercept) = fit_line(&xs, values);

    (1..=horizon)
        .map(|i| (slope * (n + i) as f64 + intercept).round().max(0.0))
        .collect()
}

/// Mean of every historical value recorded in the same calendar month as the target.
///
/// A calendar month never observed falls back to the overall mean.
pub fn seasonal_trend(series: &ConsumptionSeries, horizon: usize) -> Vec<f64> {
    if series.is_empty() {
        return vec![0.0; horizon];
    }

    let overall = mean(series.values());
    series
        .next_months(horizon)
        .into_iter()
        .map(|target| same_month_mean(series, target).unwrap_or(overall))
        .collect()
}

fn same_month_mean(series: &ConsumptionSeries, target: YearMonth) -> Option<f64> {
    let matches: Vec<f64> = series
        .months()
        .iter()
        .zip(series.values())
        .filter(|(m, _)| m.month() == target.month())
        .map(|(_, v)| *v)
        .collect();
    (!matches.is_empty()).then(|| mean(&matches))
}

/// Trend + seasonal decomposition with residual outlier filtering.
///
/// Needs at least two full periods; shorter series use [`seasonal_trend`].
///
/// Outliers are found against a robust fit: the trend slope is the median of the
/// slopes between same-phase points, and each phase level is the median of the
/// detrended values in that phase. Points whose residual lies beyond
/// `outlier_threshold` standard deviations are replaced by that robust fit.
///
/// The cleaned series is then decomposed: the trend is a centered moving average of
/// width `period`, seasonal offsets are per-phase means (phase = index mod `period`)
/// of the detrended values where the trend window is complete, centered on zero.
/// A line is fitted to the deseasonalized points and the forecast is that line
/// extended plus the phase offset.
pub fn seasonal_decomposition(
    series: &ConsumptionSeries,
    horizon: usize,
    period: usize,
    outlier_threshold: f64,
) -> Vec<f64> {
    let values = series.values();
    let n = values.len();
    if period == 0 || n < 2 * period {
        return seasonal_trend(series, horizon);
    }

    let cleaned = remove_outliers(values, period, outlier_threshold);

    let half = period / 2;
    let trend = centered_moving_average(&cleaned, period);
    let detrended: Vec<f64> = cleaned.iter().zip(&trend).map(|(y, t)| y - t).collect();
    let offsets = phase_offsets(&detrended, period, |i| i >= half && i + period - half <= n);

    let xs: Vec<f64> = (1..=n).map(|x| x as f64).collect();
    let ys: Vec<f64> = cleaned
        .iter()
        .enumerate()
        .map(|(i, y)| y - offsets[i % period])
        .collect();

    let (slope, intercept) = fit_line(&xs, &ys);
    (1..=horizon)
        .map(|h| {
            let idx = n + h - 1;
            (slope * (idx + 1) as f64 + intercept + offsets[idx % period]).max(0.0)
        })
        .collect()
}

/// Copy of `values` with residual outliers replaced by the robust trend + phase level.
///
/// Requires `values.len() >= 2 * period`, so every phase has at least two points.
fn remove_outliers(values: &[f64], period: usize, threshold: f64) -> Vec<f64> {
    let n = values.len();
    let slopes: Vec<f64> = (0..n)
        .flat_map(|i| {
            (i + period..n)
                .step_by(period)
                .map(move |j| (values[j] - values[i]) / (j - i) as f64)
        })
        .collect();
    let slope = median(&slopes);

    let detrended: Vec<f64> = values
        .iter()
        .enumerate()
        .map(|(i, y)| y - slope * i as f64)
        .collect();
    let in_phase = |phase: usize, keep: &dyn Fn(usize) -> bool| -> Vec<f64> {
        (phase..n)
            .step_by(period)
            .filter(|&i| keep(i))
            .map(|i| detrended[i])
            .collect()
    };
    let levels: Vec<f64> = (0..period)
        .map(|phase| median(&in_phase(phase, &|_: usize| true)))
        .collect();

    let residuals: Vec<f64> = detrended
        .iter()
        .enumerate()
        .map(|(i, d)| d - levels[i % period])
        .collect();
    let residual_mean = mean(&residuals);
    let residual_std = population_std(&residuals, residual_mean);
    if residual_std <= f64::EPSILON {
        return values.to_vec();
    }
    let kept: Vec<bool> = residuals
        .iter()
        .map(|r| (r - residual_mean).abs() <= threshold * residual_std)
        .collect();
    if kept.iter().all(|k| *k) {
        return values.to_vec();
    }

    // Levels from the kept points only; a phase with none left takes the overall level.
    let kept_detrended: Vec<f64> = detrended
        .iter()
        .zip(&kept)
        .filter(|(_, k)| **k)
        .map(|(d, _)| *d)
        .collect();
    let overall = median(&kept_detrended);
    let levels: Vec<f64> = (0..period)
        .map(|phase| {
            let points = in_phase(phase, &|i: usize| kept[i]);
            if points.is_empty() { overall } else { median(&points) }
        })
        .collect();

    values
        .iter()
        .enumerate()
        .map(|(i, y)| {
            if kept[i] {
                *y
            } else {
                slope * i as f64 + levels[i % period]
            }
        })
        .collect()
}

/// Per-phase means of `detrended` over the included indices, centered on zero.
/// A phase with no included point gets offset 0 before centering.
fn phase_offsets(detrended: &[f64], period: usize, include: impl Fn(usize) -> bool) -> Vec<f64> {
    let raw: Vec<f64> = (0..period)
        .map(|phase| {
            let in_phase: Vec<f64> = detrended
                .iter()
                .enumerate()
                .skip(phase)
                .step_by(period)
                .filter(|(i, _)| include(*i))
                .map(|(_, d)| *d)
                .collect();
            mean(&in_phase)
        })
        .collect();
    let center = mean(&raw);
    raw.into_iter().map(|o| o - center).collect()
}

/// Single exponential smoothing seeded with the first observation; flat forecast.
pub fn exponential_smoothing(values: &[f64], horizon: usize, alpha: f64) -> Vec<f64> {
    let Some((&first, rest)) = values.split_first() else {
        return vec![0.0; horizon];
    };

    // S_t = α·y_t + (1-α)·S_{t-1}, written so a constant series stays exact.
    let level = rest
        .iter()
        .fold(first, |level, &y| level + alpha * (y - level));
    vec![level; horizon]
}

/// AR/MA-like recursive model.
///
/// Each step predicts the mean of the last `ar_order` values (actual or predicted)
/// plus the mean of the last `ma_order` one-step errors, clamped at 0. In-sample
/// errors seed the error buffer; forecast steps append a zero innovation.
pub fn arima(values: &[f64], horizon: usize, ar_order: usize, ma_order: usize) -> Vec<f64> {
    if values.is_empty() || ar_order == 0 {
        return vec![0.0; horizon];
    }

    let mut working = values.to_vec();
    let mut errors: Vec<f64> = (1..values.len())
        .map(|i| values[i] - mean(&values[i.saturating_sub(ar_order)..i]))
        .collect();

    let mut out = Vec::with_capacity(horizon);
    for _ in 0..horizon {
        let ar = mean(&working[working.len().saturating_sub(ar_order)..]);
        let ma = if ma_order == 0 {
            0.0
        } else {
            mean(&errors[errors.len().saturating_sub(ma_order)..])
        };
        let next = (ar + ma).max(0.0);
        working.push(next);
        errors.push(0.0);
        out.push(next);
    }
    out
}

/// Least-squares `(slope, intercept)`.
///
/// A zero denominator (single distinct x) is replaced by 1.
pub(crate) fn fit_line(xs: &[f64], ys: &[f64]) -> (f64, f64) {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return (0.0, 0.0);
    }

    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0_f64, 0.0_f64, 0.0_f64, 0.0_f64);
    for (&x, &y) in xs.iter().zip(ys) {
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let nf = n as f64;
    let mut denominator = nf * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        denominator = 1.0;
    }
    let slope = (nf * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / nf;
    (slope, intercept)
}

fn centered_moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let half = window / 2;
    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = (i + window - half).min(n);
            mean(&values[lo..hi])
        })
        .collect()
}

fn median(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

pub(crate) fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / (xs.len() as f64)
}

fn population_std(xs: &[f64], mean: f64) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (xs.len() as f64);
    var.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use stockwise_core::YearMonth;

    fn series_from(start: &str, values: &[f64]) -> ConsumptionSeries {
        let start: YearMonth = start.parse().unwrap();
        ConsumptionSeries::from_points(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (start.plus_months(i as u32), *v)),
        )
    }

    #[test]
    fn moving_average_of_last_three() {
        assert_eq!(moving_average(&[10.0, 20.0, 30.0], 1, 3), vec![20.0]);
    }

    #[test]
    fn moving_average_feeds_predictions_back() {
        // 2nd step: mean(20, 30, 20) = 23.33..
        let out = moving_average(&[10.0, 20.0, 30.0], 2, 3);
        assert_eq!(out[0], 20.0);
        assert!((out[1] - 70.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn moving_average_with_short_history_uses_what_exists() {
        assert_eq!(moving_average(&[4.0, 8.0], 1, 3), vec![6.0]);
    }

    #[test]
    fn linear_regression_scenario() {
        assert_eq!(linear_regression(&[10.0, 20.0, 30.0], 1), vec![40.0]);
        assert_eq!(fit_line(&[1.0, 2.0, 3.0], &[10.0, 20.0, 30.0]), (10.0, 0.0));
    }

    #[test]
    fn linear_regression_single_point_is_flat() {
        assert_eq!(linear_regression(&[7.0], 3), vec![7.0, 7.0, 7.0]);
    }

    #[test]
    fn linear_regression_clamps_falling_trend() {
        assert_eq!(linear_regression(&[30.0, 20.0, 10.0], 3), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn seasonal_trend_matches_calendar_month() {
        // Two Januaries (10, 30), two Februaries (100, 300); history ends in 2023-12.
        let series = ConsumptionSeries::from_points(vec![
            ("2022-01".parse().unwrap(), 10.0),
            ("2022-02".parse().unwrap(), 100.0),
            ("2022-12".parse().unwrap(), 40.0),
            ("2023-01".parse().unwrap(), 30.0),
            ("2023-02".parse().unwrap(), 300.0),
            ("2023-12".parse().unwrap(), 60.0),
        ]);
        let out = seasonal_trend(&series, 3);
        // March was never seen: overall mean.
        assert_eq!(out, vec![20.0, 200.0, 90.0]);
    }

    #[test]
    fn decomposition_falls_back_below_two_periods() {
        let series = series_from("2024-01", &[5.0; 20]);
        assert_eq!(
            seasonal_decomposition(&series, 4, 12, 2.5),
            seasonal_trend(&series, 4)
        );
    }

    #[test]
    fn decomposition_reproduces_pure_seasonality() {
        let pattern = [10.0, 20.0, 30.0, 40.0];
        let values: Vec<f64> = pattern.iter().cycle().take(12).copied().collect();
        let series = series_from("2022-01", &values);
        let out = seasonal_decomposition(&series, 4, 4, 2.5);
        for (got, want) in out.iter().zip(pattern) {
            assert!((got - want).abs() < 1e-6, "got {got}, want {want}");
        }
    }

    #[test]
    fn decomposition_ignores_a_single_spike() {
        let clean: Vec<f64> = (0..36).map(|i| 100.0 + i as f64).collect();
        let mut spiked = clean.clone();
        spiked[20] = 10_000.0;

        let expected = seasonal_decomposition(&series_from("2021-01", &clean), 12, 12, 2.5);
        let out = seasonal_decomposition(&series_from("2021-01", &spiked), 12, 12, 2.5);
        for (step, (got, want)) in out.iter().zip(&expected).enumerate() {
            assert!((want - (136.0 + step as f64)).abs() < 1e-6, "clean step {step}: {want}");
            assert!((got - want).abs() < 1e-6, "step {step}: got {got}, want {want}");
        }
    }

    #[test]
    fn decomposition_spike_does_not_shift_other_phases() {
        // Trend + yearly cycle + a deterministic wobble, with one spike per run.
        let clean: Vec<f64> = (0..36)
            .map(|i| {
                let t = i as f64;
                300.0 + 2.0 * t + 40.0 * (t * std::f64::consts::TAU / 12.0).sin()
                    + ((i * 7919) % 23) as f64
            })
            .collect();
        let expected = seasonal_decomposition(&series_from("2021-01", &clean), 12, 12, 2.5);

        for position in [3, 20, 35] {
            let mut spiked = clean.clone();
            spiked[position] = 5_000.0;
            let out = seasonal_decomposition(&series_from("2021-01", &spiked), 12, 12, 2.5);
            for (step, (got, want)) in out.iter().zip(&expected).enumerate() {
                assert!(
                    (got - want).abs() <= 0.05 * want,
                    "spike at {position}, step {step}: got {got}, want {want}"
                );
            }
        }
    }

    #[test]
    fn exponential_smoothing_tracks_level() {
        // S = 10 -> 0.6*20 + 0.4*10 = 16
        assert_eq!(exponential_smoothing(&[10.0, 20.0], 2, 0.6), vec![16.0, 16.0]);
    }

    #[test]
    fn arima_on_constant_series_is_flat() {
        assert_eq!(arima(&[5.0, 5.0, 5.0, 5.0], 3, 2, 2), vec![5.0, 5.0, 5.0]);
    }

    #[test]
    fn arima_adds_recent_error_mean() {
        // errors: 20-10=10, 30-15=15; step 1 = mean(20,30) + mean(10,15) = 37.5
        let out = arima(&[10.0, 20.0, 30.0], 1, 2, 2);
        assert_eq!(out, vec![37.5]);
    }

    #[test]
    fn empty_series_gives_zeros() {
        let empty = ConsumptionSeries::default();
        assert_eq!(moving_average(&[], 2, 3), vec![0.0, 0.0]);
        assert_eq!(linear_regression(&[], 2), vec![0.0, 0.0]);
        assert_eq!(seasonal_trend(&empty, 2), vec![0.0, 0.0]);
        assert_eq!(seasonal_decomposition(&empty, 2, 12, 2.5), vec![0.0, 0.0]);
        assert_eq!(exponential_smoothing(&[], 2, 0.6), vec![0.0, 0.0]);
        assert_eq!(arima(&[], 2, 2, 2), vec![0.0, 0.0]);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: a constant series smooths to itself for any alpha.
        #[test]
        fn smoothing_constant_series_is_identity(
            c in 0.0f64..1e6,
            len in 1usize..40,
            alpha in 0.01f64..=1.0,
            horizon in 0usize..12,
        ) {
            let values = vec![c; len];
            prop_assert_eq!(exponential_smoothing(&values, horizon, alpha), vec![c; horizon]);
        }

        /// Property: window 1 repeats the last value.
        #[test]
        fn moving_average_window_one_repeats_last(
            values in prop::collection::vec(0.0f64..1e6, 1..40),
            horizon in 0usize..12,
        ) {
            let last = *values.last().unwrap();
            prop_assert_eq!(moving_average(&values, horizon, 1), vec![last; horizon]);
        }

        /// Property: clamped models never go negative.
        #[test]
        fn clamped_models_are_non_negative(
            values in prop::collection::vec(0.0f64..1e4, 0..40),
            horizon in 0usize..24,
        ) {
            prop_assert!(linear_regression(&values, horizon).iter().all(|v| *v >= 0.0));
            prop_assert!(arima(&values, horizon, 2, 2).iter().all(|v| *v >= 0.0));
        }
    }
}
