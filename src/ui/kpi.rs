use eframe::egui::{self, RichText, Ui};
use egui_extras::{Size, StripBuilder};

use crate::data::aggregate::Kpis;

const KPI_HEIGHT: f32 = 64.0;

/// One KPI card: muted title above a large value.
fn kpi_card(ui: &mut Ui, title: &str, value: String) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new(title).small().weak());
        ui.label(RichText::new(value).heading().strong());
    });
}

/// Four evenly sized KPI cards across the available width.
pub fn kpi_row(ui: &mut Ui, kpis: &Kpis) {
    let cards = [
        ("Movies in selection", kpis.count_label()),
        ("Median rating", kpis.rating_label()),
        ("Median budget", kpis.budget_label()),
        ("Top genre", kpis.top_genre_label()),
    ];
    ui.allocate_ui(egui::vec2(ui.available_width(), KPI_HEIGHT), |ui: &mut Ui| {
        StripBuilder::new(ui)
            .sizes(Size::remainder(), cards.len())
            .horizontal(|mut strip| {
                for (title, value) in cards {
                    strip.cell(|ui: &mut Ui| kpi_card(ui, title, value));
                }
            });
    });
}
