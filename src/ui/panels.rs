use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds.clone(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Industry multi-select ----
            let n_selected = state.filters.industries.len();
            let n_total = dataset.industries.len();
            ui.strong(format!("Industries  ({n_selected}/{n_total})"));
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all();
                }
                if ui.small_button("None").clicked() {
                    state.select_none();
                }
            });

            for industry in &dataset.industries {
                let mut checked = state.filters.industries.contains(industry);
                let text = RichText::new(industry).color(state.industry_colors.color_for(industry));
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_industry(industry);
                }
            }
            ui.separator();

            // ---- Year range ----
            if let Some((min_year, max_year)) = dataset.year_bounds {
                ui.strong("Year range");
                let mut from = *state.filters.years.start();
                let mut to = *state.filters.years.end();
                let from_changed = ui
                    .add(egui::Slider::new(&mut from, min_year..=max_year).text("from"))
                    .changed();
                let to_changed = ui
                    .add(egui::Slider::new(&mut to, min_year..=max_year).text("to"))
                    .changed();
                if from_changed || to_changed {
                    state.set_years(from, to);
                }
                ui.label(
                    RichText::new(decade_marks(min_year, max_year).join("  "))
                        .small()
                        .weak(),
                );
            }
            ui.separator();

            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });
}

/// Decade labels between the dataset bounds, starting at the decade of `min`.
pub fn decade_marks(min: i32, max: i32) -> Vec<String> {
    (min.div_euclid(10) * 10..=max)
        .step_by(10)
        .map(|y| y.to_string())
        .collect()
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
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} movies loaded, {} in selection",
                ds.len(),
                state.view.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open movie dataset")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
