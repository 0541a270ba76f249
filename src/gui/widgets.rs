//! Shared view widgets: metric cards, tab strips, number formatting.

use egui::{Color32, RichText};

/// A boxed metric card with a title, a large value and an optional caption.
pub fn metric_card(ui: &mut egui::Ui, width: f32, title: &str, value: &str, caption: Option<&str>) {
    egui::Frame::none()
        .fill(ui.visuals().widgets.noninteractive.bg_fill)
        .rounding(8.0)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.set_width(width);
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(title).size(12.0).color(Color32::GRAY));
                ui.label(RichText::new(value).size(20.0).strong());
                if let Some(caption) = caption {
                    ui.label(RichText::new(caption).size(11.0).color(Color32::GRAY));
                }
            });
        });
}

/// Horizontal strip of selectable tabs.
pub fn tab_strip<T: PartialEq + Copy>(ui: &mut egui::Ui, current: &mut T, tabs: &[(T, &str)]) {
    ui.horizontal(|ui| {
        for &(value, label) in tabs {
            ui.selectable_value(current, value, label);
        }
    });
}

/// Section subheader in the accent color.
pub fn subheader(ui: &mut egui::Ui, text: &str) {
    ui.add_space(12.0);
    ui.label(
        RichText::new(text)
            .size(17.0)
            .strong()
            .color(crate::charts::RECOVERED_COLOR),
    );
    ui.add_space(6.0);
}

/// Format an integer with thousands separators.
pub fn format_count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0 {
        format!("-{out}")
    } else {
        out
    }
}
