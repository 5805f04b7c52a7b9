use std::sync::Arc;

use eframe::egui;

use crate::data::registry::TableRegistry;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CensusAiApp {
    pub state: AppState,
}

impl CensusAiApp {
    pub fn new(registry: Arc<TableRegistry>) -> Self {
        Self {
            state: AppState::new(registry),
        }
    }
}

impl eframe::App for CensusAiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title + dimension tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: selectors ----
        egui::SidePanel::left("filter_panel")
            .default_width(320.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: chart + table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::answer_chart(ui, &self.state);
        });
    }
}
