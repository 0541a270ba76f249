//! Chart Plotter Module
//! Interactive visualizations using egui_plot, plus painter-drawn widgets
//! (pie, gauge, heatmap) for chart types egui_plot has no primitive for.

use std::ops::RangeInclusive;

use chrono::{Duration, NaiveDate};
use egui::{Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Stroke, Vec2};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};

use crate::stats;

/// Series palette shared across every view.
pub const CASES_COLOR: Color32 = Color32::from_rgb(31, 119, 180); // Blue
pub const DEATHS_COLOR: Color32 = Color32::from_rgb(255, 127, 14); // Orange
pub const RECOVERED_COLOR: Color32 = Color32::from_rgb(44, 160, 44); // Green
pub const ACTIVE_COLOR: Color32 = Color32::from_rgb(214, 39, 40); // Red

/// A named series plotted against the shared date axis.
pub struct DateSeries<'a> {
    pub name: &'a str,
    pub values: &'a [f64],
    pub color: Color32,
}

fn day_offsets(base: NaiveDate, dates: &[NaiveDate]) -> Vec<f64> {
    dates.iter().map(|d| (*d - base).num_days() as f64).collect()
}

fn date_axis_formatter(base: NaiveDate) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        Duration::try_days(mark.value.round() as i64)
            .and_then(|offset| base.checked_add_signed(offset))
            .map(|date| date.format("%b %d").to_string())
            .unwrap_or_default()
    }
}

/// Creates the dashboard charts.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Line chart over dates. `log_scale` plots log10 of the values and
    /// relabels the y axis with the unscaled magnitudes.
    pub fn draw_time_lines(
        ui: &mut egui::Ui,
        id: &str,
        dates: &[NaiveDate],
        series: &[DateSeries],
        log_scale: bool,
        height: f32,
    ) {
        let Some(&base) = dates.first() else {
            ui.label(RichText::new("No data").color(Color32::GRAY));
            return;
        };
        let xs = day_offsets(base, dates);

        let mut plot = Plot::new(id.to_owned())
            .height(height)
            .allow_scroll(false)
            .legend(Legend::default())
            .x_axis_formatter(date_axis_formatter(base));
        if log_scale {
            plot = plot.y_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
                format!("{:.0}", 10f64.powf(mark.value))
            });
        }
        plot.show(ui, |plot_ui| {
            for s in series {
                let points: PlotPoints = xs
                    .iter()
                    .zip(s.values)
                    .map(|(&x, &y)| {
                        let y = if log_scale { y.max(1.0).log10() } else { y };
                        [x, y]
                    })
                    .collect();
                plot_ui.line(Line::new(points).color(s.color).width(1.8).name(s.name));
            }
        });
    }

    /// Area chart (filled to zero). With `ma_window` set, a trailing moving
    /// average line is overlaid per series.
    pub fn draw_time_area(
        ui: &mut egui::Ui,
        id: &str,
        dates: &[NaiveDate],
        series: &[DateSeries],
        ma_window: Option<usize>,
        height: f32,
    ) {
        let Some(&base) = dates.first() else {
            ui.label(RichText::new("No data").color(Color32::GRAY));
            return;
        };
        let xs = day_offsets(base, dates);

        Plot::new(id.to_owned())
            .height(height)
            .allow_scroll(false)
            .legend(Legend::default())
            .x_axis_formatter(date_axis_formatter(base))
            .show(ui, |plot_ui| {
                for s in series {
                    let points: PlotPoints =
                        xs.iter().zip(s.values).map(|(&x, &y)| [x, y]).collect();
                    plot_ui.line(
                        Line::new(points)
                            .color(s.color.gamma_multiply(0.55))
                            .fill(0.0)
                            .name(s.name),
                    );
                    if let Some(window) = ma_window {
                        let averaged = stats::moving_average(s.values, window);
                        let ma_points: PlotPoints =
                            xs.iter().zip(&averaged).map(|(&x, &y)| [x, y]).collect();
                        plot_ui.line(
                            Line::new(ma_points)
                                .color(s.color)
                                .width(2.0)
                                .name(format!("{} ({window}d avg)", s.name)),
                        );
                    }
                }
            });
    }

    /// Bar chart with categorical x labels.
    pub fn draw_label_bars(
        ui: &mut egui::Ui,
        id: &str,
        labels: &[String],
        values: &[f64],
        color: Color32,
        height: f32,
    ) {
        let x_labels = labels.to_vec();
        Plot::new(id.to_owned())
            .height(height)
            .allow_scroll(false)
            .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
                let idx = mark.value.round() as usize;
                if (mark.value - idx as f64).abs() < 0.3 {
                    x_labels.get(idx).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                let bars: Vec<Bar> = values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| Bar::new(i as f64, v).width(0.6))
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).color(color));
            });
    }

    /// Growth-rate scatter with the point radius scaled by daily cases.
    pub fn draw_growth_scatter(
        ui: &mut egui::Ui,
        id: &str,
        dates: &[NaiveDate],
        growth_pct: &[f64],
        daily_cases: &[f64],
        height: f32,
    ) {
        let Some(&base) = dates.first() else {
            ui.label(RichText::new("No data").color(Color32::GRAY));
            return;
        };
        let xs = day_offsets(base, dates);
        let max_daily = stats::max_value(daily_cases).max(1.0);

        Plot::new(id.to_owned())
            .height(height)
            .allow_scroll(false)
            .y_axis_label("Growth rate (%)")
            .x_axis_formatter(date_axis_formatter(base))
            .show(ui, |plot_ui| {
                for ((&x, &growth), &daily) in xs.iter().zip(growth_pct).zip(daily_cases) {
                    let scale = (daily.max(0.0) / max_daily).sqrt() as f32;
                    plot_ui.points(
                        Points::new(vec![[x, growth]])
                            .radius(1.5 + 5.0 * scale)
                            .color(CASES_COLOR.gamma_multiply(0.8)),
                    );
                }
            });
    }

    /// Overlaid equal-width histograms.
    pub fn draw_histograms(
        ui: &mut egui::Ui,
        id: &str,
        series: &[(&str, &[f64], Color32)],
        bins: usize,
        height: f32,
    ) {
        Plot::new(id.to_owned())
            .height(height)
            .allow_scroll(false)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                for &(name, values, color) in series {
                    let hist = stats::histogram(values, bins);
                    if hist.is_empty() {
                        continue;
                    }
                    let bars: Vec<Bar> = hist
                        .iter()
                        .map(|bin| {
                            let center = (bin.lower + bin.upper) / 2.0;
                            let width = (bin.upper - bin.lower) * 0.9;
                            let width = if width > 0.0 { width } else { 1.0 };
                            Bar::new(center, bin.count as f64).width(width)
                        })
                        .collect();
                    plot_ui.bar_chart(BarChart::new(bars).color(color.gamma_multiply(0.55)).name(name));
                }
            });
    }

    /// Donut chart, painter-drawn as a triangle fan per slice.
    pub fn draw_pie(ui: &mut egui::Ui, slices: &[(&str, f64, Color32)], size: f32) {
        let total: f64 = slices.iter().map(|(_, v, _)| v.max(0.0)).sum();
        let (rect, _) = ui.allocate_exact_size(Vec2::splat(size), Sense::hover());
        let painter = ui.painter_at(rect);
        let center = rect.center();
        let radius = size * 0.5 - 4.0;

        if total <= 0.0 {
            painter.text(
                center,
                Align2::CENTER_CENTER,
                "No data",
                FontId::proportional(14.0),
                Color32::GRAY,
            );
            return;
        }

        let mut angle = -std::f32::consts::FRAC_PI_2;
        for &(_, value, color) in slices {
            let frac = (value.max(0.0) / total) as f32;
            if frac <= 0.0 {
                continue;
            }
            let sweep = frac * std::f32::consts::TAU;
            let steps = ((sweep / 0.1).ceil() as usize).max(2);
            let mut prev = center + radius * Vec2::new(angle.cos(), angle.sin());
            for step in 1..=steps {
                let a = angle + sweep * step as f32 / steps as f32;
                let next = center + radius * Vec2::new(a.cos(), a.sin());
                painter.add(egui::Shape::convex_polygon(
                    vec![center, prev, next],
                    color,
                    Stroke::NONE,
                ));
                prev = next;
            }
            angle += sweep;
        }
        painter.circle_filled(center, radius * 0.45, ui.visuals().panel_fill);
    }

    /// Color-keyed legend for a pie chart, with counts and shares.
    pub fn pie_legend(ui: &mut egui::Ui, slices: &[(&str, f64, Color32)]) {
        let total: f64 = slices
            .iter()
            .map(|(_, v, _)| v.max(0.0))
            .sum::<f64>()
            .max(1.0);
        for &(label, value, color) in slices {
            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(Vec2::new(14.0, 14.0), Sense::hover());
                ui.painter().rect_filled(rect, 3.0, color);
                let share = 100.0 * value.max(0.0) / total;
                ui.label(RichText::new(format!("{label}: {value:.0} ({share:.1}%)")).size(12.0));
            });
        }
    }

    /// Semi-circular gauge for a percentage in [0, 100].
    pub fn draw_gauge(ui: &mut egui::Ui, label: &str, value_pct: f64, color: Color32, size: f32) {
        use std::f32::consts::PI;

        let (rect, _) = ui.allocate_exact_size(Vec2::new(size, size * 0.62), Sense::hover());
        let painter = ui.painter_at(rect);
        let center = Pos2::new(rect.center().x, rect.max.y - 18.0);
        let radius = size * 0.42;
        let clamped = value_pct.clamp(0.0, 100.0) as f32;

        let track = Stroke::new(9.0, ui.visuals().widgets.noninteractive.bg_fill);
        painter.add(egui::Shape::line(
            arc_points(center, radius, PI, 2.0 * PI, 48),
            track,
        ));
        if clamped > 0.0 {
            let end = PI + (clamped / 100.0) * PI;
            painter.add(egui::Shape::line(
                arc_points(center, radius, PI, end, 48),
                Stroke::new(9.0, color),
            ));
        }
        painter.text(
            center - Vec2::new(0.0, radius * 0.35),
            Align2::CENTER_CENTER,
            format!("{value_pct:.1}%"),
            FontId::proportional(17.0),
            color,
        );
        painter.text(
            Pos2::new(center.x, rect.max.y),
            Align2::CENTER_BOTTOM,
            label,
            FontId::proportional(12.0),
            ui.visuals().text_color(),
        );
    }

    /// Correlation heatmap painted as a colored grid with value labels.
    pub fn draw_heatmap(ui: &mut egui::Ui, labels: &[&str], matrix: &[Vec<f64>], cell: f32) {
        let n = labels.len().min(matrix.len());
        if n == 0 {
            ui.label(RichText::new("No data").color(Color32::GRAY));
            return;
        }
        let label_w = 120.0;
        let label_h = 18.0;
        let (rect, _) = ui.allocate_exact_size(
            Vec2::new(label_w + n as f32 * cell, n as f32 * cell + label_h),
            Sense::hover(),
        );
        let painter = ui.painter_at(rect);
        let text_color = ui.visuals().text_color();
        let origin = rect.min + Vec2::new(label_w, 0.0);

        for (r, row_label) in labels.iter().take(n).enumerate() {
            painter.text(
                Pos2::new(rect.min.x + label_w - 8.0, origin.y + (r as f32 + 0.5) * cell),
                Align2::RIGHT_CENTER,
                *row_label,
                FontId::proportional(11.0),
                text_color,
            );
            for c in 0..n {
                let v = matrix[r].get(c).copied().unwrap_or(0.0).clamp(-1.0, 1.0);
                let cell_rect = Rect::from_min_size(
                    origin + Vec2::new(c as f32 * cell, r as f32 * cell),
                    Vec2::splat(cell - 2.0),
                );
                painter.rect_filled(cell_rect, 2.0, heat_color(v));
                let value_color = if v.abs() > 0.55 {
                    Color32::WHITE
                } else {
                    text_color
                };
                painter.text(
                    cell_rect.center(),
                    Align2::CENTER_CENTER,
                    format!("{v:.2}"),
                    FontId::proportional(10.0),
                    value_color,
                );
            }
        }
        for (c, col_label) in labels.iter().take(n).enumerate() {
            painter.text(
                Pos2::new(origin.x + (c as f32 + 0.5) * cell, rect.max.y - 2.0),
                Align2::CENTER_BOTTOM,
                *col_label,
                FontId::proportional(10.0),
                text_color,
            );
        }
    }
}

fn arc_points(center: Pos2, radius: f32, from: f32, to: f32, steps: usize) -> Vec<Pos2> {
    (0..=steps)
        .map(|i| {
            let t = from + (to - from) * i as f32 / steps as f32;
            center + radius * Vec2::new(t.cos(), t.sin())
        })
        .collect()
}

/// Diverging blue-to-red ramp for correlations in [-1, 1].
fn heat_color(t: f64) -> Color32 {
    let t = t.clamp(-1.0, 1.0) as f32;
    let lerp = |a: u8, b: u8, f: f32| (a as f32 + (b as f32 - a as f32) * f).round() as u8;
    if t < 0.0 {
        let f = -t;
        Color32::from_rgb(lerp(245, 31, f), lerp(245, 119, f), lerp(245, 180, f))
    } else {
        Color32::from_rgb(lerp(245, 214, t), lerp(245, 39, t), lerp(245, 40, t))
    }
}
