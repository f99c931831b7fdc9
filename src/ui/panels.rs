use eframe::egui::{self, Color32, RichText, Ui};

use rusty_sql::data::format::SUPPORTED_EXTENSIONS;
use rusty_sql::Upload;

use crate::state::{AppState, Status};

// ---------------------------------------------------------------------------
// Left side panel – instructions and source selection
// ---------------------------------------------------------------------------

/// Render the left panel: instructions, upload and repository selection.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Instructions");
    ui.separator();
    ui.label(RichText::new("1. Upload a file:").strong());
    ui.label("Select a CSV, Excel, Parquet, or JSON file.");
    ui.label(RichText::new("2. Analyze Data:").strong());
    ui.label("Column types are detected automatically.");
    ui.label(RichText::new("3. Run SQL Query:").strong());
    ui.label("Write SQL to query the table named data.");
    ui.label(RichText::new("4. Export Results:").strong());
    ui.label("Download the query result as a CSV file.");
    ui.add_space(4.0);
    ui.label(
        RichText::new("Tip: click 'Run Query' after writing your SQL query.")
            .italics()
            .color(Color32::LIGHT_BLUE),
    );

    ui.add_space(8.0);
    ui.separator();

    // ---- Upload ----
    ui.strong("Upload a file");
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Browse…").clicked() {
            open_file_dialog(state);
        }
        if let Some(upload) = &state.upload {
            ui.label(&upload.name);
        }
    });
    if state.upload.is_some() && ui.small_button("Clear upload").clicked() {
        state.clear_upload();
    }

    // ---- Repository selection (only without an upload) ----
    if !state.selection_offered() {
        return;
    }

    ui.add_space(8.0);
    ui.strong("Select a file from the repository");

    if state.candidates.is_empty() {
        let dir = state
            .repository
            .as_ref()
            .map(|r| r.dir().display().to_string())
            .unwrap_or_default();
        ui.label(format!("No files in {dir}"));
    } else {
        let current = state.selected.clone().unwrap_or_default();
        let mut picked = None;
        egui::ComboBox::from_id_salt("repository_file")
            .selected_text(&current)
            .width(ui.available_width() * 0.9)
            .show_ui(ui, |ui: &mut Ui| {
                for name in &state.candidates {
                    if ui.selectable_label(current == *name, name).clicked() {
                        picked = Some(name.clone());
                    }
                }
            });
        if let Some(name) = picked {
            state.select(&name);
        }
    }

    if ui.small_button("Refresh").clicked() {
        state.refresh_candidates();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Upload…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Refresh repository").clicked() {
                state.refresh_candidates();
                ui.close_menu();
            }
            let can_export = state.session.result().is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export results…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(name), Some(table)) = (state.session.source_name(), state.session.table()) {
            ui.label(format!(
                "{name}: {} rows, {} columns",
                table.num_rows(),
                table.num_columns()
            ));
        }
    });
}

/// Draw a status banner in the colour of its severity.
pub fn status_label(ui: &mut Ui, status: &Status) {
    let (icon, color) = match status {
        Status::Info(_) => ("ℹ", Color32::LIGHT_BLUE),
        Status::Success(_) => ("✔", Color32::from_rgb(90, 200, 120)),
        Status::Warning(_) => ("⚠", Color32::YELLOW),
        Status::Error(_) => ("✖", Color32::RED),
    };
    ui.label(RichText::new(format!("{icon} {}", status.message())).color(color));
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Upload a file")
        .add_filter("Supported files", &SUPPORTED_EXTENSIONS)
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx"])
        .add_filter("Parquet", &["parquet"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        match Upload::from_path(&path) {
            Ok(upload) => state.set_upload(upload),
            Err(e) => {
                log::error!("Failed to read {}: {e}", path.display());
                state.load_status = Some(Status::Error(format!(
                    "Error reading {}: {e}",
                    path.display()
                )));
            }
        }
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export results as CSV")
        .set_file_name(&state.config.export_file_name)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_results(&path);
    }
}
