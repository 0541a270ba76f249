//! Metric Derivation Module
//! Growth and outcome-rate columns computed from the normalized table.

use polars::prelude::*;

use crate::data::{count_values, COL_TOTAL_CASES, COL_TOTAL_DEATHS, COL_TOTAL_RECOVERED};

/// Derived column names.
pub const COL_DAILY_CHANGE: &str = "daily_change";
pub const COL_GROWTH_RATE: &str = "growth_rate";
pub const COL_GROWTH_RATE_PCT: &str = "growth_rate_pct";
pub const COL_DOUBLING_TIME: &str = "doubling_time_days";
pub const COL_CFR: &str = "cfr";
pub const COL_CFR_PCT: &str = "cfr_pct";
pub const COL_RECOVERY_RATE: &str = "recovery_rate";
pub const COL_RECOVERY_RATE_PCT: &str = "recovery_rate_pct";

/// Saturating ratio: 0 when the denominator is 0 or the quotient is not
/// finite.
pub fn ratio_or_zero(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        return 0.0;
    }
    let ratio = num / den;
    if ratio.is_finite() {
        ratio
    } else {
        0.0
    }
}

/// ln(2) / ln(1 + growth), zeroed when the base is non-positive or the
/// result is not finite.
fn doubling_time_days(growth: f64) -> f64 {
    let base = 1.0 + growth;
    if base <= 0.0 {
        return 0.0;
    }
    let days = std::f64::consts::LN_2 / base.ln();
    if days.is_finite() {
        days
    } else {
        0.0
    }
}

/// Append daily change, growth rate and doubling time columns. The first row
/// has no predecessor and gets zeros. The input table is left untouched.
pub fn with_growth_metrics(df: &DataFrame) -> PolarsResult<DataFrame> {
    let totals = count_values(df, COL_TOTAL_CASES);
    let n = totals.len();

    let mut daily_change = vec![0i64; n];
    let mut growth_rate = vec![0.0f64; n];
    let mut doubling_time = vec![0.0f64; n];
    for i in 1..n {
        let prev = totals[i - 1];
        daily_change[i] = totals[i] - prev;
        growth_rate[i] = ratio_or_zero((totals[i] - prev) as f64, prev as f64);
        doubling_time[i] = doubling_time_days(growth_rate[i]);
    }
    let growth_rate_pct: Vec<f64> = growth_rate.iter().map(|g| g * 100.0).collect();

    df.hstack(&[
        Column::new(COL_DAILY_CHANGE.into(), daily_change),
        Column::new(COL_GROWTH_RATE.into(), growth_rate),
        Column::new(COL_GROWTH_RATE_PCT.into(), growth_rate_pct),
        Column::new(COL_DOUBLING_TIME.into(), doubling_time),
    ])
}

/// Append case-fatality and recovery rate columns. Rows with no confirmed
/// cases get zeros. The input table is left untouched.
pub fn with_outcome_rates(df: &DataFrame) -> PolarsResult<DataFrame> {
    let totals = count_values(df, COL_TOTAL_CASES);
    let deaths = count_values(df, COL_TOTAL_DEATHS);
    let recovered = count_values(df, COL_TOTAL_RECOVERED);

    let cfr: Vec<f64> = totals
        .iter()
        .zip(&deaths)
        .map(|(&total, &dead)| ratio_or_zero(dead as f64, total as f64))
        .collect();
    let recovery: Vec<f64> = totals
        .iter()
        .zip(&recovered)
        .map(|(&total, &rec)| ratio_or_zero(rec as f64, total as f64))
        .collect();
    let cfr_pct: Vec<f64> = cfr.iter().map(|v| v * 100.0).collect();
    let recovery_pct: Vec<f64> = recovery.iter().map(|v| v * 100.0).collect();

    df.hstack(&[
        Column::new(COL_CFR.into(), cfr),
        Column::new(COL_CFR_PCT.into(), cfr_pct),
        Column::new(COL_RECOVERY_RATE.into(), recovery),
        Column::new(COL_RECOVERY_RATE_PCT.into(), recovery_pct),
    ])
}
