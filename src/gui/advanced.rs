//! Advanced Analytics View
//! Scenario projection, derived key metrics and the analysis tabs.

use chrono::Duration;
use egui::{Color32, RichText};
use polars::prelude::DataFrame;

use crate::charts::{ChartPlotter, DateSeries, CASES_COLOR, DEATHS_COLOR, RECOVERED_COLOR};
use crate::data::{
    self, COL_DAILY_CASES, COL_DAILY_DEATHS, COL_TOTAL_CASES, COL_TOTAL_DEATHS,
    COL_TOTAL_RECOVERED,
};
use crate::metrics::{
    with_growth_metrics, with_outcome_rates, COL_CFR_PCT, COL_DOUBLING_TIME, COL_GROWTH_RATE,
    COL_GROWTH_RATE_PCT, COL_RECOVERY_RATE_PCT,
};
use crate::stats;

use super::widgets::{format_count, metric_card, subheader, tab_strip};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdvancedTab {
    TrendAnalysis,
    PhaseBreakdown,
    AdvancedMetrics,
}

/// The advanced view: growth and outcome metrics over the whole table.
pub struct AdvancedView {
    tab: AdvancedTab,
    pub horizon_days: u32,
}

impl Default for AdvancedView {
    fn default() -> Self {
        Self {
            tab: AdvancedTab::TrendAnalysis,
            horizon_days: 30,
        }
    }
}

impl AdvancedView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, df: &DataFrame) {
        ui.label(
            RichText::new("\u{1F9EA} Advanced COVID-19 Analytics")
                .size(24.0)
                .strong()
                .color(CASES_COLOR),
        );

        if df.height() == 0 {
            ui.add_space(10.0);
            ui.colored_label(Color32::GRAY, "The dataset contains no usable rows.");
            return;
        }

        // Derived tables are recomputed on every pass, never cached.
        let derived = match with_growth_metrics(df).and_then(|frame| with_outcome_rates(&frame)) {
            Ok(frame) => frame,
            Err(err) => {
                ui.colored_label(
                    Color32::from_rgb(220, 53, 69),
                    format!("Failed to derive metrics: {err}"),
                );
                return;
            }
        };

        let dates = data::date_values(&derived);
        let daily_cases = data::float_values(&derived, COL_DAILY_CASES);
        let daily_deaths = data::float_values(&derived, COL_DAILY_DEATHS);
        let growth_rate = data::float_values(&derived, COL_GROWTH_RATE);
        let growth_pct = data::float_values(&derived, COL_GROWTH_RATE_PCT);
        let doubling = data::float_values(&derived, COL_DOUBLING_TIME);
        let cfr_pct = data::float_values(&derived, COL_CFR_PCT);
        let recovery_pct = data::float_values(&derived, COL_RECOVERY_RATE_PCT);

        // ===== Scenario Planning =====
        subheader(ui, "Scenario Planning");
        ui.add(egui::Slider::new(&mut self.horizon_days, 7..=60).text("Projection Horizon (Days)"));
        ui.add_space(6.0);

        let last_week_avg = stats::trailing_mean(&daily_cases, 7);
        let projected = stats::project_cases(last_week_avg, self.horizon_days as usize);
        if let Some(&last_date) = dates.last() {
            let projection_dates: Vec<_> = (0..projected.len())
                .map(|i| last_date + Duration::days(i as i64))
                .collect();
            ui.label(RichText::new("Projected Cases (Simple Model)").strong());
            ChartPlotter::draw_time_lines(
                ui,
                "advanced_projection",
                &projection_dates,
                &[DateSeries {
                    name: "Projected Cases",
                    values: &projected,
                    color: CASES_COLOR,
                }],
                false,
                240.0,
            );
        }

        // ===== Key Metrics =====
        subheader(ui, "Key Metrics");
        let width = ui.available_width() / 3.0 - 14.0;
        ui.horizontal(|ui| {
            metric_card(
                ui,
                width,
                "Peak Daily Cases",
                &format_count(stats::max_value(&daily_cases) as i64),
                None,
            );
            metric_card(
                ui,
                width,
                "Current CFR",
                &format!("{:.2}%", stats::latest_value(&cfr_pct)),
                None,
            );
            metric_card(
                ui,
                width,
                "Recovery Rate",
                &format!("{:.2}%", stats::latest_value(&recovery_pct)),
                None,
            );
        });

        // ===== Advanced Visualizations =====
        subheader(ui, "Advanced Visualizations");
        tab_strip(
            ui,
            &mut self.tab,
            &[
                (AdvancedTab::TrendAnalysis, "Trend Analysis"),
                (AdvancedTab::PhaseBreakdown, "Phase Breakdown"),
                (AdvancedTab::AdvancedMetrics, "Advanced Metrics"),
            ],
        );
        ui.add_space(8.0);

        match self.tab {
            AdvancedTab::TrendAnalysis => {
                ui.columns(2, |columns| {
                    columns[0].label(RichText::new("Cumulative Trends (Log Scale)").strong());
                    let totals = data::float_values(&derived, COL_TOTAL_CASES);
                    let deaths = data::float_values(&derived, COL_TOTAL_DEATHS);
                    let recovered = data::float_values(&derived, COL_TOTAL_RECOVERED);
                    ChartPlotter::draw_time_lines(
                        &mut columns[0],
                        "advanced_cumulative",
                        &dates,
                        &[
                            DateSeries {
                                name: "Total Cases",
                                values: &totals,
                                color: CASES_COLOR,
                            },
                            DateSeries {
                                name: "Deaths",
                                values: &deaths,
                                color: DEATHS_COLOR,
                            },
                            DateSeries {
                                name: "Recovered",
                                values: &recovered,
                                color: RECOVERED_COLOR,
                            },
                        ],
                        true,
                        280.0,
                    );

                    columns[1].label(
                        RichText::new("Daily Cases with 7-Day Moving Averages").strong(),
                    );
                    ChartPlotter::draw_time_area(
                        &mut columns[1],
                        "advanced_daily_ma",
                        &dates,
                        &[
                            DateSeries {
                                name: "Daily Cases",
                                values: &daily_cases,
                                color: CASES_COLOR,
                            },
                            DateSeries {
                                name: "Daily Deaths",
                                values: &daily_deaths,
                                color: DEATHS_COLOR,
                            },
                        ],
                        Some(7),
                        280.0,
                    );
                });
            }
            AdvancedTab::PhaseBreakdown => {
                ui.columns(2, |columns| {
                    columns[0].label(RichText::new("Growth Phase Analysis").strong());
                    ChartPlotter::draw_growth_scatter(
                        &mut columns[0],
                        "advanced_phase_scatter",
                        &dates,
                        &growth_pct,
                        &daily_cases,
                        280.0,
                    );

                    columns[1].label(RichText::new("Phase Summary Statistics").strong());
                    phase_table(&mut columns[1], &growth_rate, &daily_cases, &doubling);
                });
            }
            AdvancedTab::AdvancedMetrics => {
                ui.columns(2, |columns| {
                    columns[0].label(RichText::new("Distribution of Daily Cases & Deaths").strong());
                    ChartPlotter::draw_histograms(
                        &mut columns[0],
                        "advanced_distribution",
                        &[
                            ("Daily Cases", daily_cases.as_slice(), CASES_COLOR),
                            ("Daily Deaths", daily_deaths.as_slice(), DEATHS_COLOR),
                        ],
                        24,
                        280.0,
                    );

                    columns[1].label(
                        RichText::new("Correlation Matrix of Advanced Metrics").strong(),
                    );
                    let series = [
                        ("growth %", growth_pct.clone()),
                        ("doubling days", doubling.clone()),
                        ("cfr %", cfr_pct.clone()),
                        ("recovery %", recovery_pct.clone()),
                    ];
                    let matrix = stats::correlation_matrix(&series);
                    let labels = ["growth %", "doubling days", "cfr %", "recovery %"];
                    ChartPlotter::draw_heatmap(&mut columns[1], &labels, &matrix, 56.0);
                });
            }
        }
    }
}

fn phase_table(ui: &mut egui::Ui, growth_rate: &[f64], daily_cases: &[f64], doubling: &[f64]) {
    let rows = stats::phase_summary(growth_rate, daily_cases, doubling);
    if rows.is_empty() {
        ui.colored_label(Color32::GRAY, "No phase data.");
        return;
    }
    egui::Frame::none()
        .fill(ui.visuals().widgets.noninteractive.bg_fill)
        .rounding(5.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            egui::Grid::new("phase_summary_table")
                .striped(true)
                .min_col_width(70.0)
                .spacing([8.0, 4.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Phase").strong().size(11.0));
                    ui.label(RichText::new("Days").strong().size(11.0));
                    ui.label(RichText::new("Avg Daily").strong().size(11.0));
                    ui.label(RichText::new("Peak Daily").strong().size(11.0));
                    ui.label(RichText::new("Avg Doubling (d)").strong().size(11.0));
                    ui.end_row();

                    for row in rows {
                        ui.label(RichText::new(row.phase.label()).size(11.0));
                        ui.label(RichText::new(row.days.to_string()).size(11.0));
                        ui.label(RichText::new(format!("{:.1}", row.mean_daily_cases)).size(11.0));
                        ui.label(RichText::new(format!("{:.0}", row.max_daily_cases)).size(11.0));
                        ui.label(
                            RichText::new(format!("{:.1}", row.mean_doubling_time)).size(11.0),
                        );
                        ui.end_row();
                    }
                });
        });
}
