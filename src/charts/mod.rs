//! Charts module - plot builders and painted widgets

mod plotter;

pub use plotter::{
    ChartPlotter, DateSeries, ACTIVE_COLOR, CASES_COLOR, DEATHS_COLOR, RECOVERED_COLOR,
};
