//! Dataset Loader Module
//! Parses the raw JSON dataset into the normalized daily table.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use polars::prelude::*;
use serde_json::Value;
use thiserror::Error;

use super::{COL_DATE, COUNT_COLUMNS};

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse dataset: {0}")]
    Json(#[from] serde_json::Error),
    #[error("dataset root must be a JSON array of records")]
    NotAnArray,
    #[error("record {0} is not a JSON object")]
    MalformedRecord(usize),
    #[error("date column not found in dataset")]
    MissingDateColumn,
    #[error("columns {sources:?} all map to '{canonical}'")]
    ConflictingAliases {
        canonical: String,
        sources: Vec<String>,
    },
    #[error("table error: {0}")]
    Polars(#[from] PolarsError),
}

/// Outcome counters from a successful load.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub rows_loaded: usize,
    pub rows_dropped: usize,
    pub duplicate_dates: usize,
}

/// Known source aliases for the canonical column names.
const COLUMN_ALIASES: [(&str, &str); 7] = [
    ("totalcases", super::COL_TOTAL_CASES),
    ("confirmed", super::COL_TOTAL_CASES),
    ("deaths", super::COL_TOTAL_DEATHS),
    ("recovered", super::COL_TOTAL_RECOVERED),
    ("active", super::COL_ACTIVE),
    ("new_cases", super::COL_DAILY_CASES),
    ("new_deaths", super::COL_DAILY_DEATHS),
];

/// Date formats accepted by the permissive parser, tried in order.
const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// Lowercase a raw column name and collapse every run of non-alphanumeric
/// characters into a single underscore. Idempotent.
fn normalize_column_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for ch in raw.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

fn canonical_name(normalized: &str) -> &str {
    COLUMN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(normalized)
}

fn parse_date_permissive(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    // Full datetime forms: retry with the calendar part only.
    let head = trimmed.split(['T', ' ']).next().unwrap_or(trimmed);
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date);
        }
        if let Ok(date) = NaiveDate::parse_from_str(head, fmt) {
            return Some(date);
        }
    }
    None
}

/// Coerce a raw count value: strip every non-digit character and parse.
/// Anything unparsable becomes 0.
fn coerce_count(value: &Value) -> i64 {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return 0,
    };
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        0
    } else {
        digits.parse::<i64>().unwrap_or(0)
    }
}

/// Parse a JSON dataset into the normalized table.
///
/// Column names are normalized and mapped through the alias table, the date
/// column is required, rows with unparsable dates are dropped, count columns
/// are digit-stripped and coerced (missing ones become zero columns), and
/// the result is sorted ascending by date with duplicate dates collapsed to
/// the last occurrence.
pub fn parse_records(text: &str) -> Result<(DataFrame, LoadReport), DatasetError> {
    let root: Value = serde_json::from_str(text)?;
    let records = root.as_array().ok_or(DatasetError::NotAnArray)?;

    // Canonicalize keys per record while collecting the dataset-wide mapping
    // so alias conflicts are caught before any row work.
    let mut canonical_rows: Vec<BTreeMap<String, &Value>> = Vec::with_capacity(records.len());
    let mut sources_by_canonical: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (idx, record) in records.iter().enumerate() {
        let map = record
            .as_object()
            .ok_or(DatasetError::MalformedRecord(idx))?;
        let mut row = BTreeMap::new();
        for (raw_key, value) in map {
            let normalized = normalize_column_name(raw_key);
            let canonical = canonical_name(&normalized).to_string();
            let sources = sources_by_canonical.entry(canonical.clone()).or_default();
            if !sources.contains(&normalized) {
                sources.push(normalized);
            }
            row.insert(canonical, value);
        }
        canonical_rows.push(row);
    }

    for (canonical, sources) in &sources_by_canonical {
        if sources.len() > 1 {
            return Err(DatasetError::ConflictingAliases {
                canonical: canonical.clone(),
                sources: sources.clone(),
            });
        }
    }
    if !sources_by_canonical.contains_key(COL_DATE) {
        return Err(DatasetError::MissingDateColumn);
    }

    let mut dated: Vec<(NaiveDate, [i64; 6])> = Vec::with_capacity(canonical_rows.len());
    let mut rows_dropped = 0usize;
    for row in &canonical_rows {
        let parsed = row
            .get(COL_DATE)
            .and_then(|v| v.as_str())
            .and_then(parse_date_permissive);
        let Some(date) = parsed else {
            rows_dropped += 1;
            continue;
        };
        let mut counts = [0i64; 6];
        for (slot, name) in counts.iter_mut().zip(COUNT_COLUMNS) {
            if let Some(value) = row.get(name) {
                *slot = coerce_count(value);
            }
        }
        dated.push((date, counts));
    }

    // Stable sort keeps file order within a date; the last report wins.
    dated.sort_by_key(|(date, _)| *date);
    let before = dated.len();
    let mut deduped: Vec<(NaiveDate, [i64; 6])> = Vec::with_capacity(before);
    for entry in dated {
        if let Some(last) = deduped.last_mut() {
            if last.0 == entry.0 {
                *last = entry;
                continue;
            }
        }
        deduped.push(entry);
    }
    let duplicate_dates = before - deduped.len();

    let dates: Vec<NaiveDate> = deduped.iter().map(|(date, _)| *date).collect();
    let mut columns = vec![Column::new(COL_DATE.into(), dates)];
    for (i, name) in COUNT_COLUMNS.iter().enumerate() {
        let values: Vec<i64> = deduped.iter().map(|(_, counts)| counts[i]).collect();
        columns.push(Column::new((*name).into(), values));
    }
    let df = DataFrame::new(columns)?;

    let report = LoadReport {
        rows_loaded: df.height(),
        rows_dropped,
        duplicate_dates,
    };
    tracing::info!(
        rows = report.rows_loaded,
        dropped = report.rows_dropped,
        duplicates = report.duplicate_dates,
        "dataset normalized"
    );
    Ok((df, report))
}

/// Load and normalize a dataset file.
pub fn load_file(path: &Path) -> Result<(DataFrame, LoadReport), DatasetError> {
    let text = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_records(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{count_values, date_values, COL_ACTIVE, COL_TOTAL_CASES, COL_TOTAL_DEATHS};

    fn sample_json() -> &'static str {
        r#"[
            {"Date":"2021-01-02","Confirmed":"150","Deaths":"3","Recovered":"70","Active":"77","New Cases":"50","New Deaths":"1"},
            {"Date":"2021-01-01","Confirmed":"100","Deaths":"2","Recovered":"50","Active":"48","New Cases":"100","New Deaths":"2"}
        ]"#
    }

    #[test]
    fn normalizes_and_sorts_ascending() {
        let (df, report) = parse_records(sample_json()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(report.rows_loaded, 2);
        assert_eq!(report.rows_dropped, 0);

        let dates = date_values(&df);
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(count_values(&df, COL_TOTAL_CASES), vec![100, 150]);
        assert_eq!(count_values(&df, COL_TOTAL_DEATHS), vec![2, 3]);
    }

    #[test]
    fn column_normalization_is_idempotent() {
        for raw in ["Total Cases!", "  New   Cases ", "total_confirmed_cases", "dAtE"] {
            let once = normalize_column_name(raw);
            assert_eq!(normalize_column_name(&once), once);
        }
        assert_eq!(normalize_column_name(" New Cases "), "new_cases");
        assert_eq!(normalize_column_name("TotalCases"), "totalcases");
        assert_eq!(normalize_column_name("Total-Confirmed//Cases"), "total_confirmed_cases");
    }

    #[test]
    fn strips_non_digits_from_counts() {
        let json = r#"[{"Date":"2021-01-01","Confirmed":"1,234 cases"}]"#;
        let (df, _) = parse_records(json).unwrap();
        assert_eq!(count_values(&df, COL_TOTAL_CASES), vec![1234]);
    }

    #[test]
    fn unparsable_counts_become_zero() {
        let json = r#"[{"Date":"2021-01-01","Confirmed":"unknown","Deaths":null,"Active":true}]"#;
        let (df, _) = parse_records(json).unwrap();
        assert_eq!(count_values(&df, COL_TOTAL_CASES), vec![0]);
        assert_eq!(count_values(&df, COL_TOTAL_DEATHS), vec![0]);
        assert_eq!(count_values(&df, COL_ACTIVE), vec![0]);
    }

    #[test]
    fn missing_count_columns_become_zero_columns() {
        let json = r#"[{"Date":"2021-01-01","Confirmed":"10"}]"#;
        let (df, _) = parse_records(json).unwrap();
        for name in COUNT_COLUMNS {
            assert_eq!(count_values(&df, name).len(), 1, "column {name} missing");
        }
        assert_eq!(count_values(&df, COL_TOTAL_DEATHS), vec![0]);
    }

    #[test]
    fn drops_rows_with_unparsable_dates() {
        let json = r#"[
            {"Date":"2021-01-01","Confirmed":"1"},
            {"Date":"not a date","Confirmed":"2"},
            {"Date":"2021-01-03","Confirmed":"3"}
        ]"#;
        let (df, report) = parse_records(json).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(report.rows_dropped, 1);
    }

    #[test]
    fn duplicate_dates_keep_the_last_report() {
        let json = r#"[
            {"Date":"2021-01-01","Confirmed":"100"},
            {"Date":"2021-01-01","Confirmed":"150"}
        ]"#;
        let (df, report) = parse_records(json).unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(report.duplicate_dates, 1);
        assert_eq!(count_values(&df, COL_TOTAL_CASES), vec![150]);
    }

    #[test]
    fn mixed_date_formats_parse() {
        let json = r#"[
            {"Date":"01/15/2021","Confirmed":"2"},
            {"Date":"2021-01-14","Confirmed":"1"},
            {"Date":"Jan 16, 2021","Confirmed":"3"},
            {"Date":"2021-01-17T08:30:00","Confirmed":"4"}
        ]"#;
        let (df, report) = parse_records(json).unwrap();
        assert_eq!(report.rows_dropped, 0);
        assert_eq!(count_values(&df, COL_TOTAL_CASES), vec![1, 2, 3, 4]);
    }

    #[test]
    fn missing_date_column_is_fatal() {
        let err = parse_records(r#"[{"Confirmed":"1"}]"#).unwrap_err();
        assert!(matches!(err, DatasetError::MissingDateColumn));
    }

    #[test]
    fn conflicting_aliases_are_fatal() {
        let json = r#"[{"Date":"2021-01-01","Confirmed":"1","TotalCases":"2"}]"#;
        let err = parse_records(json).unwrap_err();
        match err {
            DatasetError::ConflictingAliases { canonical, sources } => {
                assert_eq!(canonical, COL_TOTAL_CASES);
                assert_eq!(sources.len(), 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_array_root_is_fatal() {
        assert!(matches!(parse_records("{}").unwrap_err(), DatasetError::NotAnArray));
    }

    #[test]
    fn non_object_record_is_fatal() {
        let err = parse_records(r#"[1, 2]"#).unwrap_err();
        assert!(matches!(err, DatasetError::MalformedRecord(0)));
    }
}
