use std::fs;
use std::path::{Path, PathBuf};

use epiview::data::{self, load_file, parse_records, DatasetError, COUNT_COLUMNS};
use epiview::metrics::{
    with_growth_metrics, with_outcome_rates, COL_CFR_PCT, COL_DAILY_CHANGE, COL_DOUBLING_TIME,
    COL_GROWTH_RATE, COL_GROWTH_RATE_PCT, COL_RECOVERY_RATE_PCT,
};
use epiview::stats;

#[test]
fn pipeline_matches_the_worked_example() {
    let json = r#"[
        {"Date":"2021-01-01","Confirmed":"100","Deaths":"2","Recovered":"50"},
        {"Date":"2021-01-02","Confirmed":"150","Deaths":"3","Recovered":"70"}
    ]"#;
    let (df, report) = parse_records(json).expect("load succeeded");
    assert_eq!(report.rows_loaded, 2);

    let df = with_growth_metrics(&df).expect("growth derivation succeeded");
    let df = with_outcome_rates(&df).expect("rate derivation succeeded");

    let change = df.column(COL_DAILY_CHANGE).unwrap().i64().unwrap();
    assert_eq!(change.get(1), Some(50));

    let growth = df.column(COL_GROWTH_RATE).unwrap().f64().unwrap();
    assert_eq!(growth.get(0), Some(0.0));
    assert!((growth.get(1).unwrap() - 0.5).abs() < 1e-12);

    let growth_pct = df.column(COL_GROWTH_RATE_PCT).unwrap().f64().unwrap();
    assert!((growth_pct.get(1).unwrap() - 50.0).abs() < 1e-9);

    let doubling = df.column(COL_DOUBLING_TIME).unwrap().f64().unwrap();
    assert_eq!(doubling.get(0), Some(0.0));

    let cfr_pct = df.column(COL_CFR_PCT).unwrap().f64().unwrap();
    assert!((cfr_pct.get(1).unwrap() - 2.0).abs() < 1e-9);

    let recovery_pct = df.column(COL_RECOVERY_RATE_PCT).unwrap().f64().unwrap();
    assert!((recovery_pct.get(1).unwrap() - 100.0 * 70.0 / 150.0).abs() < 1e-9);
}

#[test]
fn messy_input_normalizes_to_a_clean_table() {
    let json = r#"[
        {"Date":"2021-01-03","Confirmed":"3,000 cases","Deaths":"n/a","Active":"120"},
        {"Date":"garbage","Confirmed":"999"},
        {"Date":"01/02/2021","Confirmed":"2000","Deaths":"25","Active":"80"},
        {"Date":"2021-01-01","Confirmed":"1000","Deaths":"10","Active":"40"},
        {"Date":"2021-01-01","Confirmed":"1100","Deaths":"11","Active":"44"}
    ]"#;
    let (df, report) = parse_records(json).expect("load succeeded");

    assert_eq!(report.rows_loaded, 3);
    assert_eq!(report.rows_dropped, 1);
    assert_eq!(report.duplicate_dates, 1);

    // Strictly ascending dates, no duplicates.
    let dates = data::date_values(&df);
    assert!(dates.windows(2).all(|w| w[0] < w[1]));

    // All six count columns exist and are non-negative.
    for name in COUNT_COLUMNS {
        let values = data::count_values(&df, name);
        assert_eq!(values.len(), 3, "column {name}");
        assert!(values.iter().all(|&v| v >= 0), "column {name}");
    }

    // Last report wins for the duplicated date; digit stripping applies.
    assert_eq!(
        data::count_values(&df, data::COL_TOTAL_CASES),
        vec![1100, 2000, 3000]
    );
    // "n/a" coerces to 0.
    assert_eq!(data::count_values(&df, data::COL_TOTAL_DEATHS), vec![11, 25, 0]);
}

#[test]
fn zero_baselines_never_propagate_division() {
    let json = r#"[
        {"Date":"2021-01-01","Confirmed":"0","Deaths":"0","Recovered":"0"},
        {"Date":"2021-01-02","Confirmed":"0","Deaths":"1","Recovered":"1"},
        {"Date":"2021-01-03","Confirmed":"10","Deaths":"1","Recovered":"2"}
    ]"#;
    let (df, _) = parse_records(json).expect("load succeeded");
    let df = with_growth_metrics(&df).expect("growth derivation succeeded");
    let df = with_outcome_rates(&df).expect("rate derivation succeeded");

    let growth = df.column(COL_GROWTH_RATE).unwrap().f64().unwrap();
    // Previous total is 0 on both rows after the first.
    assert_eq!(growth.get(1), Some(0.0));
    assert_eq!(growth.get(2), Some(0.0));

    let cfr_pct = df.column(COL_CFR_PCT).unwrap().f64().unwrap();
    assert_eq!(cfr_pct.get(0), Some(0.0));
    assert_eq!(cfr_pct.get(1), Some(0.0));
    assert!((cfr_pct.get(2).unwrap() - 10.0).abs() < 1e-9);

    let doubling = df.column(COL_DOUBLING_TIME).unwrap().f64().unwrap();
    for i in 0..3 {
        assert!(doubling.get(i).unwrap().is_finite());
    }
}

fn write_dataset(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("epiview-pipeline-{}-{name}.json", std::process::id()));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn load_file_reads_and_normalizes_a_dataset() {
    let path = write_dataset(
        "load",
        r#"[
            {"Date":"2021-01-02","Confirmed":"150"},
            {"Date":"2021-01-01","Confirmed":"100"}
        ]"#,
    );
    let (df, report) = load_file(&path).expect("load succeeded");
    assert_eq!(report.rows_loaded, 2);
    assert_eq!(
        data::count_values(&df, data::COL_TOTAL_CASES),
        vec![100, 150]
    );
    fs::remove_file(&path).ok();
}

#[test]
fn load_file_surfaces_io_and_parse_failures() {
    let err = load_file(Path::new("/nonexistent/epiview-pipeline.json")).unwrap_err();
    assert!(matches!(err, DatasetError::Io { .. }));

    let path = write_dataset("syntax", "{ not json");
    let err = load_file(&path).unwrap_err();
    assert!(matches!(err, DatasetError::Json(_)));
    fs::remove_file(&path).ok();
}

#[test]
fn projection_builds_on_the_trailing_week() {
    let json = r#"[
        {"Date":"2021-01-01","Confirmed":"100","New Cases":"100"},
        {"Date":"2021-01-02","Confirmed":"200","New Cases":"100"},
        {"Date":"2021-01-03","Confirmed":"300","New Cases":"100"}
    ]"#;
    let (df, _) = parse_records(json).expect("load succeeded");
    let daily = data::float_values(&df, data::COL_DAILY_CASES);

    let avg = stats::trailing_mean(&daily, 7);
    assert!((avg - 100.0).abs() < 1e-9);

    let projected = stats::project_cases(avg, 3);
    assert!((projected[0] - 100.0).abs() < 1e-9);
    assert!((projected[1] - 102.0).abs() < 1e-9);
    assert!((projected[2] - 104.04).abs() < 1e-9);
}
