//! Metrics module - derived epidemiological columns

mod derive;

pub use derive::{
    ratio_or_zero, with_growth_metrics, with_outcome_rates, COL_CFR, COL_CFR_PCT,
    COL_DAILY_CHANGE, COL_DOUBLING_TIME, COL_GROWTH_RATE, COL_GROWTH_RATE_PCT, COL_RECOVERY_RATE,
    COL_RECOVERY_RATE_PCT,
};
