//! Summary Statistics Module
//! Slice-level helpers feeding the metric cards and charts.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::metrics::ratio_or_zero;

/// Assumed daily compounding factor of the scenario projection.
pub const PROJECTION_DAILY_GROWTH: f64 = 1.02;

/// Week layout of the day-of-week aggregation.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Largest value of an integer column (0 when empty).
pub fn max_count(values: &[i64]) -> i64 {
    values.iter().copied().max().unwrap_or(0)
}

/// Last value of an integer column (0 when empty).
pub fn latest_count(values: &[i64]) -> i64 {
    values.last().copied().unwrap_or(0)
}

/// Largest finite value of a float column (0 when empty).
pub fn max_value(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<f64>, v| {
            Some(match acc {
                Some(best) => best.max(v),
                None => v,
            })
        })
        .unwrap_or(0.0)
}

/// Last value of a float column (0 when empty).
pub fn latest_value(values: &[f64]) -> f64 {
    values.last().copied().unwrap_or(0.0)
}

/// Percent change of `current` against `baseline` (0 when the baseline is 0).
pub fn change_pct(current: f64, baseline: f64) -> f64 {
    ratio_or_zero(current - baseline, baseline) * 100.0
}

/// Mean of the trailing `window` values; the whole slice when shorter.
pub fn trailing_mean(values: &[f64], window: usize) -> f64 {
    if values.is_empty() || window == 0 {
        return 0.0;
    }
    let tail = &values[values.len().saturating_sub(window)..];
    tail.iter().sum::<f64>() / tail.len() as f64
}

/// Trailing moving average with a growing window at the head.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 {
        return values.to_vec();
    }
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let span = &values[start..=i];
            span.iter().sum::<f64>() / span.len() as f64
        })
        .collect()
}

/// Scenario projection: `daily_avg` compounded at 2% per day over `horizon`
/// days, starting at day 0.
pub fn project_cases(daily_avg: f64, horizon: usize) -> Vec<f64> {
    (0..horizon)
        .map(|i| daily_avg * PROJECTION_DAILY_GROWTH.powi(i as i32))
        .collect()
}

/// Mean of `values` per weekday, Monday first. Days with no samples are 0.
pub fn weekday_means(dates: &[NaiveDate], values: &[f64]) -> [(Weekday, f64); 7] {
    let mut sums = [0.0f64; 7];
    let mut counts = [0usize; 7];
    for (date, value) in dates.iter().zip(values) {
        let idx = date.weekday().num_days_from_monday() as usize;
        sums[idx] += value;
        counts[idx] += 1;
    }
    let mut out = [(Weekday::Mon, 0.0); 7];
    for (i, day) in WEEKDAYS.into_iter().enumerate() {
        let mean = if counts[i] > 0 {
            sums[i] / counts[i] as f64
        } else {
            0.0
        };
        out[i] = (day, mean);
    }
    out
}

/// Pearson correlation coefficient (0 when either side has no variance).
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }
    let xs = &xs[..n];
    let ys = &ys[..n];
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = xs[i] - mean_x;
        let dy = ys[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    ratio_or_zero(cov, (var_x * var_y).sqrt())
}

/// Pairwise correlation of the named series.
pub fn correlation_matrix(series: &[(&str, Vec<f64>)]) -> Vec<Vec<f64>> {
    series
        .iter()
        .map(|(_, xs)| series.iter().map(|(_, ys)| pearson(xs, ys)).collect())
        .collect()
}

/// One equal-width histogram bin.
#[derive(Debug, Clone, Copy)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram over the finite value range.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max <= min {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: finite.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in &finite {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + i as f64 * width,
            upper: min + (i + 1) as f64 * width,
            count,
        })
        .collect()
}

/// Growth phase of a single day, bucketed on the growth rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthPhase {
    Declining,
    Plateau,
    Growing,
    Surging,
}

impl GrowthPhase {
    pub const ALL: [GrowthPhase; 4] = [
        GrowthPhase::Declining,
        GrowthPhase::Plateau,
        GrowthPhase::Growing,
        GrowthPhase::Surging,
    ];

    pub fn classify(growth_rate: f64) -> Self {
        if growth_rate < 0.0 {
            GrowthPhase::Declining
        } else if growth_rate < 0.01 {
            GrowthPhase::Plateau
        } else if growth_rate < 0.05 {
            GrowthPhase::Growing
        } else {
            GrowthPhase::Surging
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GrowthPhase::Declining => "Declining",
            GrowthPhase::Plateau => "Plateau",
            GrowthPhase::Growing => "Growing",
            GrowthPhase::Surging => "Surging",
        }
    }
}

/// Per-phase descriptive row for the advanced view table.
#[derive(Debug, Clone)]
pub struct PhaseSummary {
    pub phase: GrowthPhase,
    pub days: usize,
    pub mean_daily_cases: f64,
    pub max_daily_cases: f64,
    pub mean_doubling_time: f64,
}

/// Descriptive statistics of the daily series per growth phase. Phases with
/// no days are omitted.
pub fn phase_summary(
    growth_rates: &[f64],
    daily_cases: &[f64],
    doubling_times: &[f64],
) -> Vec<PhaseSummary> {
    GrowthPhase::ALL
        .iter()
        .filter_map(|&phase| {
            let indices: Vec<usize> = growth_rates
                .iter()
                .enumerate()
                .filter(|(_, g)| GrowthPhase::classify(**g) == phase)
                .map(|(i, _)| i)
                .collect();
            if indices.is_empty() {
                return None;
            }
            let days = indices.len();
            let cases: Vec<f64> = indices
                .iter()
                .filter_map(|&i| daily_cases.get(i).copied())
                .collect();
            let doubling: Vec<f64> = indices
                .iter()
                .filter_map(|&i| doubling_times.get(i).copied())
                .collect();
            Some(PhaseSummary {
                phase,
                days,
                mean_daily_cases: trailing_mean(&cases, cases.len()),
                max_daily_cases: max_value(&cases),
                mean_doubling_time: trailing_mean(&doubling, doubling.len()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_follows_two_percent_compounding() {
        let projected = project_cases(100.0, 3);
        assert_eq!(projected.len(), 3);
        assert!((projected[0] - 100.0).abs() < 1e-9);
        assert!((projected[1] - 102.0).abs() < 1e-9);
        assert!((projected[2] - 104.04).abs() < 1e-9);
    }

    #[test]
    fn trailing_mean_uses_the_tail() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert!((trailing_mean(&values, 2) - 3.5).abs() < 1e-12);
        // Shorter than the window: whole slice.
        assert!((trailing_mean(&values, 10) - 2.5).abs() < 1e-12);
        assert_eq!(trailing_mean(&[], 7), 0.0);
    }

    #[test]
    fn moving_average_grows_at_the_head() {
        let values = [1.0, 3.0, 5.0];
        let ma = moving_average(&values, 2);
        assert_eq!(ma, vec![1.0, 2.0, 4.0]);
    }

    #[test]
    fn change_pct_saturates_on_zero_baseline() {
        assert!((change_pct(150.0, 100.0) - 50.0).abs() < 1e-12);
        assert_eq!(change_pct(150.0, 0.0), 0.0);
    }

    #[test]
    fn weekday_means_bucket_by_day() {
        // 2021-01-04 is a Monday.
        let dates = [
            NaiveDate::from_ymd_opt(2021, 1, 4).unwrap(),
            NaiveDate::from_ymd_opt(2021, 1, 11).unwrap(),
            NaiveDate::from_ymd_opt(2021, 1, 5).unwrap(),
        ];
        let values = [1.0, 3.0, 10.0];
        let means = weekday_means(&dates, &values);
        assert_eq!(means[0].0, Weekday::Mon);
        assert!((means[0].1 - 2.0).abs() < 1e-12);
        assert!((means[1].1 - 10.0).abs() < 1e-12);
        assert_eq!(means[2].1, 0.0);
    }

    #[test]
    fn pearson_handles_degenerate_series() {
        let xs = [1.0, 2.0, 3.0];
        let ys = [2.0, 4.0, 6.0];
        assert!((pearson(&xs, &ys) - 1.0).abs() < 1e-12);
        let flat = [5.0, 5.0, 5.0];
        assert_eq!(pearson(&xs, &flat), 0.0);
        assert_eq!(pearson(&[1.0], &[2.0]), 0.0);
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal() {
        let series = vec![
            ("a", vec![1.0, 2.0, 3.0, 4.0]),
            ("b", vec![4.0, 3.0, 2.0, 1.0]),
        ];
        let matrix = correlation_matrix(&series);
        assert!((matrix[0][0] - 1.0).abs() < 1e-12);
        assert!((matrix[0][1] - matrix[1][0]).abs() < 1e-12);
        assert!((matrix[0][1] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn histogram_counts_every_sample() {
        let values: Vec<f64> = (0..10).map(|v| v as f64).collect();
        let bins = histogram(&values, 5);
        assert_eq!(bins.len(), 5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 10);
        // Max lands in the last bin.
        assert_eq!(bins.last().unwrap().count, 2);
    }

    #[test]
    fn histogram_collapses_constant_values() {
        let bins = histogram(&[7.0, 7.0, 7.0], 4);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
    }

    #[test]
    fn phases_classify_on_growth_rate() {
        assert_eq!(GrowthPhase::classify(-0.1), GrowthPhase::Declining);
        assert_eq!(GrowthPhase::classify(0.0), GrowthPhase::Plateau);
        assert_eq!(GrowthPhase::classify(0.02), GrowthPhase::Growing);
        assert_eq!(GrowthPhase::classify(0.2), GrowthPhase::Surging);

        let summary = phase_summary(&[0.0, 0.02, 0.03], &[10.0, 20.0, 40.0], &[0.0, 35.0, 23.4]);
        assert_eq!(summary.len(), 2);
        let growing = summary
            .iter()
            .find(|row| row.phase == GrowthPhase::Growing)
            .unwrap();
        assert_eq!(growing.days, 2);
        assert!((growing.mean_daily_cases - 30.0).abs() < 1e-12);
        assert!((growing.max_daily_cases - 40.0).abs() < 1e-12);
    }
}
