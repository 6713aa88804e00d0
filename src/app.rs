use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::state::{AppState, Tab};
use crate::ui::{charts, kpi, panels};

const TABS: [(Tab, &str); 5] = [
    (Tab::Trend, "Budget vs Year"),
    (Tab::Scatter, "Budget vs Runtime"),
    (Tab::Box, "Rating Distributions"),
    (Tab::Genre, "Genre Explorer"),
    (Tab::Histograms, "Histograms"),
];

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct MovieInsightApp {
    pub state: AppState,
}

impl MovieInsightApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    fn dashboard(&mut self, ui: &mut Ui) {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.heading(RichText::new("Movie Insight Dashboard").strong());
            ui.label(
                RichText::new("Explore movie patterns across industries, decades, and genres")
                    .weak(),
            );
        });
        ui.add_space(8.0);

        if self.state.dataset.is_none() {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a dataset to begin  (File → Open…)");
            });
            return;
        }

        kpi::kpi_row(ui, &self.state.kpis);
        ui.add_space(8.0);

        ui.horizontal(|ui: &mut Ui| {
            for (tab, label) in TABS {
                ui.selectable_value(&mut self.state.active_tab, tab, label);
            }
        });
        ui.separator();

        let before = self.state.controls.clone();
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui: &mut Ui| match self.state.active_tab {
                Tab::Trend => charts::trend_tab(ui, &mut self.state),
                Tab::Scatter => charts::scatter_tab(ui, &mut self.state),
                Tab::Box => charts::box_tab(ui, &mut self.state),
                Tab::Genre => charts::genre_tab(ui, &mut self.state),
                Tab::Histograms => charts::histograms_tab(ui, &self.state),
            });
        // this frame drew stale chart data; draw again with the new inputs
        if self.state.sync_controls(&before) {
            ui.ctx().request_repaint();
        }
    }
}

impl eframe::App for MovieInsightApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: KPIs and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            self.dashboard(ui);
        });
    }
}
