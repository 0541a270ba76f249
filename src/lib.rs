//! EpiView - COVID-19 Time-Series Analysis & Interactive Dashboard
//!
//! The library side of the application: dataset loading and normalization,
//! derived epidemiological metrics, summary statistics and the dashboard UI.

pub mod charts;
pub mod data;
pub mod gui;
pub mod metrics;
pub mod stats;
