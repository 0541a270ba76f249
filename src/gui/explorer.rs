//! Explorer View
//! Date-filtered metric cards, comparative analysis and distribution charts.

use egui::{Color32, RichText};
use polars::prelude::DataFrame;

use crate::charts::{
    ChartPlotter, DateSeries, ACTIVE_COLOR, CASES_COLOR, DEATHS_COLOR, RECOVERED_COLOR,
};
use crate::data::{
    self, COL_ACTIVE, COL_DAILY_CASES, COL_TOTAL_CASES, COL_TOTAL_DEATHS, COL_TOTAL_RECOVERED,
};
use crate::metrics::ratio_or_zero;
use crate::stats;

use super::widgets::{format_count, metric_card, subheader, tab_strip};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExplorerTab {
    Trends,
    Distribution,
}

/// The basic view: interactive exploration of the date-filtered table.
pub struct ExplorerView {
    tab: ExplorerTab,
    pub compare_idx: usize,
}

impl Default for ExplorerView {
    fn default() -> Self {
        Self {
            tab: ExplorerTab::Trends,
            compare_idx: 0,
        }
    }
}

impl ExplorerView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, df: &DataFrame, range: (usize, usize)) {
        ui.label(
            RichText::new("\u{1F9A0} COVID-19 Interactive Explorer")
                .size(24.0)
                .strong()
                .color(CASES_COLOR),
        );

        if df.height() == 0 {
            ui.add_space(10.0);
            ui.colored_label(Color32::GRAY, "The dataset contains no usable rows.");
            return;
        }

        let filtered = data::slice_rows(df, range.0, range.1);
        let dates = data::date_values(&filtered);
        let totals = data::count_values(&filtered, COL_TOTAL_CASES);
        let deaths = data::count_values(&filtered, COL_TOTAL_DEATHS);
        let recovered = data::count_values(&filtered, COL_TOTAL_RECOVERED);
        let active = data::count_values(&filtered, COL_ACTIVE);
        let daily_cases = data::float_values(&filtered, COL_DAILY_CASES);

        self.comparison_section(ui, df, &totals, &deaths, &active);

        // ===== Real-time Metrics =====
        subheader(ui, "\u{1F4CA} Real-time Metrics");
        let width = ui.available_width() / 4.0 - 14.0;
        ui.horizontal(|ui| {
            metric_card(ui, width, "Total Cases", &format_count(stats::max_count(&totals)), None);
            metric_card(ui, width, "Fatalities", &format_count(stats::max_count(&deaths)), None);
            metric_card(ui, width, "Active Cases", &format_count(stats::max_count(&active)), None);
            metric_card(ui, width, "Recoveries", &format_count(stats::max_count(&recovered)), None);
        });

        // ===== Visual Analysis =====
        subheader(ui, "\u{1F4C8} Visual Analysis");
        tab_strip(
            ui,
            &mut self.tab,
            &[
                (ExplorerTab::Trends, "Trends"),
                (ExplorerTab::Distribution, "Distribution"),
            ],
        );
        ui.add_space(8.0);

        match self.tab {
            ExplorerTab::Trends => {
                ui.columns(2, |columns| {
                    columns[0].label(RichText::new("Case Progression Timeline").strong());
                    let totals_f: Vec<f64> = totals.iter().map(|&v| v as f64).collect();
                    ChartPlotter::draw_time_lines(
                        &mut columns[0],
                        "explorer_total_cases",
                        &dates,
                        &[DateSeries {
                            name: "Total Cases",
                            values: &totals_f,
                            color: CASES_COLOR,
                        }],
                        false,
                        260.0,
                    );

                    columns[1].label(RichText::new("Daily Cases Area Chart").strong());
                    ChartPlotter::draw_time_area(
                        &mut columns[1],
                        "explorer_daily_cases",
                        &dates,
                        &[DateSeries {
                            name: "Daily New Cases",
                            values: &daily_cases,
                            color: ACTIVE_COLOR,
                        }],
                        None,
                        260.0,
                    );
                });
            }
            ExplorerTab::Distribution => {
                ui.columns(2, |columns| {
                    columns[0].label(RichText::new("Case Distribution").strong());
                    let slices = [
                        ("Active", stats::latest_count(&active) as f64, ACTIVE_COLOR),
                        (
                            "Recovered",
                            stats::latest_count(&recovered) as f64,
                            RECOVERED_COLOR,
                        ),
                        ("Deaths", stats::latest_count(&deaths) as f64, DEATHS_COLOR),
                    ];
                    columns[0].horizontal(|ui| {
                        ChartPlotter::draw_pie(ui, &slices, 190.0);
                        ui.vertical(|ui| ChartPlotter::pie_legend(ui, &slices));
                    });

                    columns[1].label(RichText::new("Average Daily Cases by Day").strong());
                    let means = stats::weekday_means(&dates, &daily_cases);
                    let labels: Vec<String> = means.iter().map(|(day, _)| day.to_string()).collect();
                    let values: Vec<f64> = means.iter().map(|(_, mean)| *mean).collect();
                    ChartPlotter::draw_label_bars(
                        &mut columns[1],
                        "explorer_weekday",
                        &labels,
                        &values,
                        CASES_COLOR,
                        240.0,
                    );
                });
            }
        }

        // ===== Outcome Analysis =====
        subheader(ui, "\u{1F4CA} Outcome Analysis");
        let cfr_pct = ratio_or_zero(
            stats::max_count(&deaths) as f64,
            stats::max_count(&totals) as f64,
        ) * 100.0;
        let recovery_pct = ratio_or_zero(
            stats::max_count(&recovered) as f64,
            stats::max_count(&totals) as f64,
        ) * 100.0;
        ui.columns(2, |columns| {
            columns[0].vertical_centered(|ui| {
                ChartPlotter::draw_gauge(ui, "Mortality Rate (%)", cfr_pct, DEATHS_COLOR, 220.0);
            });
            columns[1].vertical_centered(|ui| {
                ChartPlotter::draw_gauge(ui, "Recovery Rate (%)", recovery_pct, RECOVERED_COLOR, 220.0);
            });
        });
    }

    /// Metric cards comparing the filtered range against a single reference
    /// date picked over the whole table.
    fn comparison_section(
        &mut self,
        ui: &mut egui::Ui,
        df: &DataFrame,
        totals: &[i64],
        deaths: &[i64],
        active: &[i64],
    ) {
        subheader(ui, "Comparative Analysis");

        let full_dates = data::date_values(df);
        if full_dates.is_empty() {
            ui.colored_label(Color32::GRAY, "No data available for the comparison date.");
            return;
        }
        self.compare_idx = self.compare_idx.min(full_dates.len() - 1);

        egui::ComboBox::from_label("Comparison date")
            .selected_text(full_dates[self.compare_idx].format("%Y-%m-%d").to_string())
            .show_ui(ui, |ui| {
                for (i, date) in full_dates.iter().enumerate() {
                    ui.selectable_value(
                        &mut self.compare_idx,
                        i,
                        date.format("%Y-%m-%d").to_string(),
                    );
                }
            });
        ui.add_space(8.0);

        let base_totals = data::count_values(df, COL_TOTAL_CASES);
        let base_deaths = data::count_values(df, COL_TOTAL_DEATHS);
        let base_active = data::count_values(df, COL_ACTIVE);
        let idx = self.compare_idx;
        let compare_label = full_dates[idx].format("%Y-%m-%d").to_string();

        let cards = [
            (
                "Total Cases",
                stats::max_count(totals),
                base_totals.get(idx).copied().unwrap_or(0),
            ),
            (
                "Fatalities",
                stats::max_count(deaths),
                base_deaths.get(idx).copied().unwrap_or(0),
            ),
            (
                "Active Cases",
                stats::max_count(active),
                base_active.get(idx).copied().unwrap_or(0),
            ),
        ];
        let width = ui.available_width() / 3.0 - 14.0;
        ui.horizontal(|ui| {
            for (title, current, baseline) in cards {
                let change = stats::change_pct(current as f64, baseline as f64);
                let caption = format!("{change:+.2}% vs {compare_label}");
                metric_card(ui, width, title, &format_count(current), Some(&caption));
            }
        });
    }
}
