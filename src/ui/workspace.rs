use eframe::egui::{self, Ui};

use crate::state::{AppState, Status};
use crate::ui::panels::{save_file_dialog, status_label};
use crate::ui::table::{data_table, description_table};

// ---------------------------------------------------------------------------
// Central panel – description, SQL editor, results
// ---------------------------------------------------------------------------

/// Render the central panel.
pub fn workspace(ui: &mut Ui, state: &mut AppState) {
    ui.heading("File Analysis and SQL");
    ui.add_space(4.0);

    if let Some(status) = &state.load_status {
        status_label(ui, status);
    }

    if !state.session.is_loaded() {
        ui.add_space(12.0);
        status_label(
            ui,
            &Status::Info("Please upload a file to get started.".to_string()),
        );
        return;
    }

    ui.add_space(8.0);
    ui.strong("Table Description");
    description_table(ui, &state.description);

    ui.add_space(8.0);
    ui.separator();
    ui.strong("Run SQL Query");
    ui.label("Write your SQL query (e.g., SELECT * FROM data)");
    ui.weak("Unquoted names are read in lower case; quote mixed-case columns: SELECT \"Name\" FROM data");
    ui.add(
        egui::TextEdit::multiline(&mut state.sql)
            .code_editor()
            .desired_rows(4)
            .desired_width(f32::INFINITY),
    );

    if ui.button("▶ Run Query").clicked() {
        state.run_query();
    }

    if let Some(status) = &state.query_status {
        status_label(ui, status);
    }

    if state.session.result().is_none() {
        return;
    }

    ui.add_space(8.0);
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Query Results:");
        if ui.button("💾 Export results as CSV").clicked() {
            save_file_dialog(state);
        }
    });

    if let Some(result) = state.session.result() {
        let height = (ui.available_height() - 8.0).max(120.0);
        data_table(ui, "results", result, height);
    }
}
