use eframe::egui;

use rusty_sql::AppConfig;

use crate::state::AppState;
use crate::ui::{panels, workspace};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustySqlApp {
    pub state: AppState,
}

impl RustySqlApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for RustySqlApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Pick up source changes from the previous frame before drawing.
        self.state.sync();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: instructions and file choice ----
        egui::SidePanel::left("source_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: description, query, results ----
        egui::CentralPanel::default().show(ctx, |ui| {
            workspace::workspace(ui, &mut self.state);
        });
    }
}
