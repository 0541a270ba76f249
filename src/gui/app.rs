//! Main Application Window
//! Side panel with the control panel, central panel with the active view.

use std::path::PathBuf;
use std::sync::Arc;

use egui::{Color32, RichText, ScrollArea, SidePanel};
use polars::prelude::DataFrame;

use crate::data::{self, TableCache};

use super::advanced::AdvancedView;
use super::control_panel::{ControlPanel, ControlPanelAction, Section};
use super::explorer::ExplorerView;

/// Main application window.
pub struct DashboardApp {
    cache: TableCache,
    table: Option<Arc<DataFrame>>,
    load_error: Option<String>,
    panel: ControlPanel,
    explorer: ExplorerView,
    advanced: AdvancedView,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, data_path: PathBuf) -> Self {
        let mut app = Self {
            cache: TableCache::new(),
            table: None,
            load_error: None,
            panel: ControlPanel::new(),
            explorer: ExplorerView::new(),
            advanced: AdvancedView::new(),
        };
        app.panel.data_path = Some(data_path);
        app.load_data();
        app
    }

    /// (Re)load the dataset through the cache and refresh the filter state.
    fn load_data(&mut self) {
        let Some(path) = self.panel.data_path.clone() else {
            return;
        };
        match self.cache.load(&path) {
            Ok((frame, report)) => {
                let labels: Vec<String> = data::date_values(&frame)
                    .iter()
                    .map(|date| date.format("%Y-%m-%d").to_string())
                    .collect();
                self.panel.update_rows(labels);
                self.explorer.compare_idx = 0;
                self.panel.set_status(
                    &format!(
                        "Loaded {} rows ({} dropped, {} duplicate dates)",
                        report.rows_loaded, report.rows_dropped, report.duplicate_dates
                    ),
                    false,
                );
                self.table = Some(frame);
                self.load_error = None;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load dataset");
                self.table = None;
                self.load_error = Some(err.to_string());
                self.panel.set_status(&format!("Error: {err}"), true);
            }
        }
    }

    fn handle_browse(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON Files", &["json"])
            .pick_file()
        {
            self.panel.data_path = Some(path);
            self.cache.invalidate();
            self.load_data();
        }
    }

    fn handle_reload(&mut self) {
        self.cache.invalidate();
        self.load_data();
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                ScrollArea::vertical().show(ui, |ui| match self.panel.show(ui) {
                    ControlPanelAction::BrowseData => self.handle_browse(),
                    ControlPanelAction::ReloadData => self.handle_reload(),
                    ControlPanelAction::None => {}
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(table) = self.table.clone() {
                ScrollArea::vertical().show(ui, |ui| match self.panel.section {
                    Section::Explorer => self.explorer.show(
                        ui,
                        &table,
                        (self.panel.range_start, self.panel.range_end),
                    ),
                    Section::Advanced => self.advanced.show(ui, &table),
                });
            } else {
                ui.centered_and_justified(|ui| {
                    let message = self
                        .load_error
                        .clone()
                        .unwrap_or_else(|| "No dataset loaded".to_string());
                    ui.label(
                        RichText::new(message)
                            .size(16.0)
                            .color(Color32::from_rgb(220, 53, 69)),
                    );
                });
            }
        });
    }
}
