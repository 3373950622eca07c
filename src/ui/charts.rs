use std::f32::consts::{FRAC_PI_2, TAU};
use std::ops::RangeInclusive;
use std::sync::Arc;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Shape, Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};

use crate::color::ColorMap;
use crate::data::aggregate::Aggregation;
use crate::data::model::{DayName, MonthName};
use crate::view::DashboardView;

const CHART_HEIGHT: f32 = 260.0;
const LINE_COLOR: Color32 = Color32::from_rgb(70, 130, 220);

// ---------------------------------------------------------------------------
// Revenue by customer segment (bar)
// ---------------------------------------------------------------------------

pub fn segment_bar_chart(ui: &mut Ui, view: &DashboardView, colors: &ColorMap) {
    ui.strong("Revenue by Customer Segment");
    if view.by_segment.is_empty() {
        no_data(ui);
        return;
    }

    let labels: Vec<String> = view.by_segment.keys().map(|k| k.to_string()).collect();
    let bars: Vec<Bar> = view
        .by_segment
        .series()
        .enumerate()
        .map(|(i, (segment, total))| {
            Bar::new(i as f64, total)
                .name(segment.to_string())
                .fill(colors.color_for(segment))
                .width(0.7)
        })
        .collect();

    Plot::new("segment_bar")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_formatter(category_axis(labels))
        .y_axis_label("Amount")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Amount"));
        });
}

// ---------------------------------------------------------------------------
// Weekly sales pattern (line)
// ---------------------------------------------------------------------------

pub fn weekday_line_chart(ui: &mut Ui, view: &DashboardView) {
    ui.strong("Weekly Sales Pattern");
    if view.by_weekday.is_empty() {
        no_data(ui);
        return;
    }

    let labels = DayName::ALL.iter().map(|d| d.to_string()).collect();
    let points = ordinal_points(&view.by_weekday, |d| d.ordinal());

    Plot::new("weekday_line")
        .height(CHART_HEIGHT)
        .x_axis_formatter(category_axis(labels))
        .y_axis_label("Amount")
        .include_x(-0.5)
        .include_x(6.5)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points))
                    .name("Amount")
                    .color(LINE_COLOR)
                    .width(2.0),
            );
        });
}

// ---------------------------------------------------------------------------
// Revenue share by industry (pie)
// ---------------------------------------------------------------------------

/// Slice shares of the positive totals; non-positive totals have no slice.
pub fn pie_slices(aggregation: &Aggregation<Arc<str>>) -> Vec<(Arc<str>, f64)> {
    let positive: Vec<(&Arc<str>, f64)> = aggregation.series().filter(|(_, v)| *v > 0.0).collect();
    let total: f64 = positive.iter().map(|(_, v)| v).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    positive
        .into_iter()
        .map(|(k, v)| (Arc::clone(k), v / total))
        .collect()
}

pub fn industry_pie(ui: &mut Ui, view: &DashboardView, colors: &ColorMap) {
    ui.strong("Revenue Share by Industry");
    let slices = pie_slices(&view.by_industry);
    if slices.is_empty() {
        no_data(ui);
        return;
    }

    let size = egui::vec2(ui.available_width(), CHART_HEIGHT);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let rect = response.rect;
    let radius = (rect.height().min(rect.width() * 0.5) / 2.0 - 8.0).max(10.0);
    let center = egui::pos2(rect.left() + radius + 8.0, rect.center().y);

    // Triangle fan per slice, starting at 12 o'clock, clockwise.
    let mut start = -FRAC_PI_2;
    for (label, share) in &slices {
        let sweep = *share as f32 * TAU;
        let steps = ((sweep / TAU) * 96.0).ceil().max(1.0) as usize;
        let color = colors.color_for(label);
        let mut prev = on_circle(center, radius, start);
        for s in 1..=steps {
            let next = on_circle(center, radius, start + sweep * s as f32 / steps as f32);
            painter.add(Shape::convex_polygon(vec![center, prev, next], color, Stroke::NONE));
            prev = next;
        }
        start += sweep;
    }

    // Legend to the right of the pie.
    let text_color = ui.visuals().text_color();
    let x = center.x + radius + 16.0;
    let mut y = rect.top() + 12.0;
    for (label, share) in &slices {
        let swatch = egui::Rect::from_min_size(egui::pos2(x, y - 5.0), egui::vec2(10.0, 10.0));
        painter.rect_filled(swatch, 2.0, colors.color_for(label));
        painter.text(
            egui::pos2(x + 16.0, y),
            Align2::LEFT_CENTER,
            format!("{label}  {:.1}%", share * 100.0),
            FontId::proportional(12.0),
            text_color,
        );
        y += 18.0;
    }
}

fn on_circle(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    center + radius * egui::vec2(angle.cos(), angle.sin())
}

// ---------------------------------------------------------------------------
// Monthly revenue trend (area with markers)
// ---------------------------------------------------------------------------

pub fn monthly_area_chart(ui: &mut Ui, view: &DashboardView) {
    ui.strong("Monthly Revenue Trend");
    if view.by_month.is_empty() {
        no_data(ui);
        return;
    }

    let labels = MonthName::ALL.iter().map(|m| m.to_string()).collect();
    let points = ordinal_points(&view.by_month, |m| m.ordinal());

    Plot::new("month_area")
        .height(CHART_HEIGHT)
        .x_axis_formatter(category_axis(labels))
        .y_axis_label("Amount")
        .include_x(-0.5)
        .include_x(11.5)
        .include_y(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .name("Amount")
                    .color(LINE_COLOR)
                    .fill(0.0_f32)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .color(LINE_COLOR)
                    .radius(4.0),
            );
        });
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Category keys plotted at their calendar position, so a missing category
/// does not shift the ones after it.
fn ordinal_points<K>(aggregation: &Aggregation<K>, ordinal: impl Fn(&K) -> usize) -> Vec<[f64; 2]> {
    aggregation
        .series()
        .map(|(k, v)| [ordinal(k) as f64, v])
        .collect()
}

/// X axis that prints `labels[i]` at integer positions and nothing in between.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

fn no_data(ui: &mut Ui) {
    ui.add_space(CHART_HEIGHT / 2.0 - 10.0);
    ui.vertical_centered(|ui: &mut Ui| {
        ui.weak("No data for the current selection");
    });
    ui.add_space(CHART_HEIGHT / 2.0 - 10.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::{by_industry, by_month};
    use crate::data::model::{RecordSet, TransactionRecord};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn record(m: u32, amount: i64, ind: &str) -> TransactionRecord {
        TransactionRecord::new(
            NaiveDate::from_ymd_opt(2023, m, 1).unwrap(),
            Decimal::from(amount),
            "Seg",
            ind,
        )
    }

    #[test]
    fn pie_shares_sum_to_one_and_skip_losses() {
        let set: RecordSet = vec![
            record(1, 300, "Tech"),
            record(1, 100, "Retail"),
            record(1, -50, "Food"),
        ]
        .into();
        let slices = pie_slices(&by_industry(&set));
        assert_eq!(slices.len(), 2);
        let total: f64 = slices.iter().map(|(_, s)| s).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(slices[0].0.as_ref(), "Retail");
        assert!((slices[0].1 - 0.25).abs() < 1e-9);
    }

    #[test]
    fn month_points_sit_at_calendar_positions() {
        let set: RecordSet = vec![record(11, 5, "X"), record(2, 7, "X")].into();
        let points = ordinal_points(&by_month(&set), |m| m.ordinal());
        assert_eq!(points, vec![[1.0, 7.0], [10.0, 5.0]]);
    }

    #[test]
    fn category_axis_labels_only_whole_positions() {
        let axis = category_axis(vec!["Mon".into(), "Tue".into()]);
        let range = 0.0..=1.0;
        let mark = |value| GridMark {
            value,
            step_size: 0.5,
        };
        assert_eq!(axis(mark(1.0), &range), "Tue");
        assert_eq!(axis(mark(0.5), &range), "");
        assert_eq!(axis(mark(5.0), &range), "");
        assert_eq!(axis(mark(-1.0), &range), "");
    }
}
