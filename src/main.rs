//! EpiView - COVID-19 Time-Series Analysis & Interactive Dashboard
//!
//! Loads a daily COVID-19 dataset, derives epidemiological metrics and
//! renders them in a two-view interactive dashboard.

use std::path::PathBuf;

use anyhow::anyhow;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use epiview::gui::DashboardApp;

/// Dataset location: first CLI argument, then `EPIVIEW_DATA`, then the
/// default file next to the binary.
fn data_path() -> PathBuf {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("EPIVIEW_DATA").ok())
        .unwrap_or_else(|| "covid.json".to_string())
        .into()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = data_path();
    tracing::info!(path = %path.display(), "starting dashboard");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("EpiView"),
        ..Default::default()
    };

    eframe::run_native(
        "EpiView",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, path)))),
    )
    .map_err(|err| anyhow!("failed to start UI: {err}"))
}
