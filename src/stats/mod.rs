//! Statistics module - scalar summaries and aggregations for the views

mod summary;

pub use summary::{
    change_pct, correlation_matrix, histogram, latest_count, latest_value, max_count, max_value,
    moving_average, pearson, phase_summary, project_cases, trailing_mean, weekday_means,
    GrowthPhase, HistogramBin, PhaseSummary, PROJECTION_DAILY_GROWTH, WEEKDAYS,
};
