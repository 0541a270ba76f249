//! Data module - dataset loading, normalization and caching

mod cache;
mod loader;

pub use cache::TableCache;
pub use loader::{load_file, parse_records, DatasetError, LoadReport};

use chrono::NaiveDate;
use polars::prelude::*;

/// Canonical column names of the normalized table.
pub const COL_DATE: &str = "date";
pub const COL_TOTAL_CASES: &str = "total_confirmed_cases";
pub const COL_TOTAL_DEATHS: &str = "total_deaths";
pub const COL_TOTAL_RECOVERED: &str = "total_recovered";
pub const COL_ACTIVE: &str = "active_cases";
pub const COL_DAILY_CASES: &str = "daily_confirmed_cases";
pub const COL_DAILY_DEATHS: &str = "daily_deaths";

/// The six count columns, in table order.
pub const COUNT_COLUMNS: [&str; 6] = [
    COL_TOTAL_CASES,
    COL_TOTAL_DEATHS,
    COL_TOTAL_RECOVERED,
    COL_ACTIVE,
    COL_DAILY_CASES,
    COL_DAILY_DEATHS,
];

/// Dates of the normalized table, in row order.
pub fn date_values(df: &DataFrame) -> Vec<NaiveDate> {
    df.column(COL_DATE)
        .ok()
        .and_then(|col| col.as_materialized_series().date().ok().map(|ca| ca.as_date_iter().flatten().collect()))
        .unwrap_or_default()
}

/// An integer count column as a dense vector (nulls become 0, an absent
/// column yields an empty vector).
pub fn count_values(df: &DataFrame, name: &str) -> Vec<i64> {
    df.column(name)
        .ok()
        .and_then(|col| {
            col.i64()
                .ok()
                .map(|ca| ca.into_iter().map(|v| v.unwrap_or(0)).collect())
        })
        .unwrap_or_default()
}

/// Any numeric column cast to f64 (nulls become 0, an absent column yields
/// an empty vector).
pub fn float_values(df: &DataFrame, name: &str) -> Vec<f64> {
    df.column(name)
        .ok()
        .and_then(|col| col.cast(&DataType::Float64).ok())
        .and_then(|col| {
            col.f64()
                .ok()
                .map(|ca| ca.into_iter().map(|v| v.unwrap_or(0.0)).collect())
        })
        .unwrap_or_default()
}

/// The contiguous row range `[start, end]` as a new frame. Indices are
/// clamped to the table bounds.
pub fn slice_rows(df: &DataFrame, start: usize, end: usize) -> DataFrame {
    let height = df.height();
    if height == 0 {
        return df.clone();
    }
    let start = start.min(height - 1);
    let end = end.min(height - 1).max(start);
    df.slice(start as i64, end - start + 1)
}
