use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::Dimension;
use crate::state::AppState;

const SUPPORTED_EXTENSIONS: &[&str] = &[
    "xlsx", "xlsm", "xlsb", "xls", "ods", "csv", "parquet", "pq", "json",
];

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// What the user clicked inside one multi-select.
enum Pick {
    All,
    None,
    Toggle(usize),
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Data");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    let options = state.options.clone();
    let mut picks: Vec<(Dimension, Pick)> = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if let Some(p) = multi_select(ui, "Select Year", &options.years, &state.selection.years, |_| None) {
                picks.push((Dimension::Year, p));
            }
            ui.separator();

            if let Some(p) = multi_select(
                ui,
                "Select Customer Segment",
                &options.segments,
                &state.selection.segments,
                |s| Some(state.segment_colors.color_for(s)),
            ) {
                picks.push((Dimension::Segment, p));
            }
            ui.separator();

            if let Some(p) = multi_select(
                ui,
                "Select Industry Type",
                &options.industries,
                &state.selection.industries,
                |s| Some(state.industry_colors.color_for(s)),
            ) {
                picks.push((Dimension::Industry, p));
            }
        });

    // Apply after drawing so the widgets above only borrow the state.
    for (dimension, pick) in picks {
        match pick {
            Pick::All => state.select_all(dimension),
            Pick::None => state.select_none(dimension),
            Pick::Toggle(i) => match dimension {
                Dimension::Year => state.toggle_year(options.years[i]),
                Dimension::Segment => state.toggle_label(dimension, &options.segments[i]),
                Dimension::Industry => state.toggle_label(dimension, &options.industries[i]),
            },
        }
    }
}

/// Collapsible checkbox list with All/None buttons.
fn multi_select<T: Ord + ToString>(
    ui: &mut Ui,
    title: &str,
    options: &[T],
    selected: &BTreeSet<T>,
    color: impl Fn(&T) -> Option<Color32>,
) -> Option<Pick> {
    let mut pick = None;

    // Show count of selected / total in the header
    let header_text = format!("{title}  ({}/{})", selected.len(), options.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    pick = Some(Pick::All);
                }
                if ui.small_button("None").clicked() {
                    pick = Some(Pick::None);
                }
            });

            for (i, val) in options.iter().enumerate() {
                let mut text = RichText::new(val.to_string());
                if let Some(c) = color(val) {
                    text = text.color(c);
                }
                let mut checked = selected.contains(val);
                if ui.checkbox(&mut checked, text).changed() {
                    pick = Some(Pick::Toggle(i));
                }
            }
        });

    pick
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Refresh").clicked() {
                state.refresh();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let visible = state.view.as_ref().map_or(0, |v| v.filtered.len());
            ui.label(format!(
                "{}: {} transactions loaded, {} visible",
                ds.source.display(),
                ds.records.len(),
                visible
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::from_rgb(230, 160, 40)));
        }
    });
}

// ---------------------------------------------------------------------------
// Blocking load error
// ---------------------------------------------------------------------------

/// Shown in place of the dashboard while no dataset could be loaded.
pub fn load_error(ui: &mut Ui, state: &mut AppState, message: &str) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(80.0);
        ui.heading("Could not load the dataset");
        ui.add_space(8.0);
        ui.label(RichText::new(message).color(Color32::RED));
        ui.label(format!("Source: {}", state.source().display()));
        ui.add_space(12.0);
        ui.horizontal(|ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
            }
            if ui.button("Retry").clicked() {
                state.refresh();
            }
        });
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open transaction data")
        .add_filter("Supported files", SUPPORTED_EXTENSIONS)
        .add_filter("Spreadsheets", &["xlsx", "xlsm", "xlsb", "xls", "ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening {}", path.display());
        state.open(path);
    }
}
