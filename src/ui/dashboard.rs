use eframe::egui::{self, Align, Layout, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;
use crate::ui::{charts, panels};
use crate::view::{table_cells, DashboardView, TABLE_COLUMNS};

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the dashboard body for the current view.
pub fn dashboard(ui: &mut Ui, state: &mut AppState) {
    if let Some(message) = state.load_error.clone() {
        panels::load_error(ui, state, &message);
        return;
    }

    let Some(view) = &state.view else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view transactions  (File → Open…)");
        });
        return;
    };

    ScrollArea::vertical()
        .id_salt("dashboard_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Customer Intelligence Dashboard");
            ui.label("Analyze customer behavior, spending trends, and segment performance interactively.");
            ui.add_space(8.0);

            kpi_row(ui, view);
            ui.separator();

            ui.columns(3, |cols| {
                charts::segment_bar_chart(&mut cols[0], view, &state.segment_colors);
                charts::weekday_line_chart(&mut cols[1], view);
                charts::industry_pie(&mut cols[2], view, &state.industry_colors);
            });
            ui.separator();

            ui.heading("Dynamic Data Table");
            ui.weak("This table updates automatically based on your selected filters.");
            data_table(ui, view);
            ui.separator();

            charts::monthly_area_chart(ui, view);
            ui.separator();

            ui.heading("Insight Summary");
            for line in view.insight_lines() {
                ui.label(format!("•  {line}"));
            }
        });
}

// ---------------------------------------------------------------------------
// KPI widgets
// ---------------------------------------------------------------------------

fn kpi_row(ui: &mut Ui, view: &DashboardView) {
    let metrics = view.metric_strings();
    ui.columns(3, |cols| {
        metric(&mut cols[0], "Total Revenue", &metrics.total_revenue);
        metric(&mut cols[1], "Active Segments", &metrics.active_segments);
        metric(&mut cols[2], "Avg Transaction", &metrics.avg_transaction);
    });
}

fn metric(ui: &mut Ui, label: &str, value: &str) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).size(28.0).strong());
    });
}

// ---------------------------------------------------------------------------
// Data table
// ---------------------------------------------------------------------------

fn data_table(ui: &mut Ui, view: &DashboardView) {
    let records = view.filtered.as_slice();
    let row_height = egui::TextStyle::Body.resolve(ui.style()).size + 6.0;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .vscroll(true)
        .max_scroll_height(320.0)
        .cell_layout(Layout::left_to_right(Align::Center))
        .columns(Column::auto().at_least(90.0), TABLE_COLUMNS.len() - 1)
        .column(Column::remainder())
        .header(22.0, |mut header| {
            for name in TABLE_COLUMNS {
                header.col(|ui: &mut Ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(row_height, records.len(), |mut row| {
                let record = &records[row.index()];
                for cell in table_cells(record) {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell.as_str());
                    });
                }
            });
        });
}
