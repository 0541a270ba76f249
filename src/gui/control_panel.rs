//! Control Panel Widget
//! Left side panel with the data source, navigation, date filters and status.

use std::path::PathBuf;

use egui::{Color32, RichText};

/// Dashboard view selected in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Explorer,
    Advanced,
}

impl Default for Section {
    fn default() -> Self {
        Section::Explorer
    }
}

/// Actions triggered by the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPanelAction {
    None,
    BrowseData,
    ReloadData,
}

/// Left side control panel. Owns the date-range filter indices over the
/// sorted table; the indices are clamped so `start <= end` always holds.
pub struct ControlPanel {
    pub data_path: Option<PathBuf>,
    pub section: Section,
    pub range_start: usize,
    pub range_end: usize,
    status: String,
    status_is_error: bool,
    date_labels: Vec<String>,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            data_path: None,
            section: Section::default(),
            range_start: 0,
            range_end: 0,
            status: "Ready".to_string(),
            status_is_error: false,
            date_labels: Vec::new(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the date filter after a (re)load.
    pub fn update_rows(&mut self, date_labels: Vec<String>) {
        self.range_start = 0;
        self.range_end = date_labels.len().saturating_sub(1);
        self.date_labels = date_labels;
    }

    pub fn set_status(&mut self, status: &str, is_error: bool) {
        self.status = status.to_string();
        self.status_is_error = is_error;
    }

    /// Draw the panel and report the action the user took.
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("\u{1F9A0} EpiView")
                    .size(22.0)
                    .color(crate::charts::CASES_COLOR),
            );
            ui.label(
                RichText::new("COVID-19 Dashboard")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("\u{1F4C1} Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .data_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.data_path.is_some() {
                            ui.visuals().text_color()
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("\u{1F4C2} Browse").clicked() {
                            action = ControlPanelAction::BrowseData;
                        }
                        if ui.small_button("\u{21BB}").on_hover_text("Reload").clicked() {
                            action = ControlPanelAction::ReloadData;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Navigation Section =====
        ui.label(RichText::new("\u{1F9ED} Navigation").size(14.0).strong());
        ui.add_space(5.0);
        ui.radio_value(&mut self.section, Section::Explorer, "Interactive Explorer");
        ui.radio_value(&mut self.section, Section::Advanced, "Advanced Analytics");

        // ===== Date Filter Section =====
        if self.date_labels.len() > 1 {
            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.label(RichText::new("\u{1F4C5} Data Filters").size(14.0).strong());
            ui.add_space(5.0);

            let max_idx = self.date_labels.len() - 1;
            ui.horizontal(|ui| {
                ui.add_sized([40.0, 20.0], egui::Label::new("From:"));
                ui.add(egui::Slider::new(&mut self.range_start, 0..=max_idx).show_value(false));
            });
            ui.label(
                RichText::new(self.date_labels[self.range_start.min(max_idx)].as_str())
                    .size(11.0)
                    .color(Color32::GRAY),
            );
            ui.horizontal(|ui| {
                ui.add_sized([40.0, 20.0], egui::Label::new("To:"));
                ui.add(egui::Slider::new(&mut self.range_end, 0..=max_idx).show_value(false));
            });
            if self.range_end < self.range_start {
                self.range_end = self.range_start;
            }
            ui.label(
                RichText::new(self.date_labels[self.range_end.min(max_idx)].as_str())
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        ui.label(RichText::new("\u{1F4CA} Status").size(14.0).strong());
        ui.add_space(5.0);

        let status_color = if self.status_is_error {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Loaded") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}
