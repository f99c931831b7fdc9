use eframe::egui::{self, Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};

use rusty_sql::{ColumnSummary, Table};

const ROW_HEIGHT: f32 = 18.0;
const HEADER_HEIGHT: f32 = 22.0;

// ---------------------------------------------------------------------------
// Table description – one row per column
// ---------------------------------------------------------------------------

/// Column name / data type listing of the loaded table.
pub fn description_table(ui: &mut Ui, columns: &[ColumnSummary]) {
    ui.push_id("description", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .column(Column::auto().at_least(160.0))
            .column(Column::auto().at_least(120.0))
            .column(Column::remainder())
            .max_scroll_height(180.0)
            .header(HEADER_HEIGHT, |mut header| {
                for title in ["Column Name", "Data Type", "Kind"] {
                    header.col(|ui: &mut Ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, columns.len(), |mut row| {
                    let col = &columns[row.index()];
                    row.col(|ui: &mut Ui| {
                        ui.label(&col.name);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.monospace(&col.data_type);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(col.kind.to_string());
                    });
                });
            });
    });
}

// ---------------------------------------------------------------------------
// Data grid – query results
// ---------------------------------------------------------------------------

/// Scrollable grid of every row in `table`. Rows are laid out lazily.
pub fn data_table(ui: &mut Ui, id: &str, table: &Table, max_height: f32) {
    let formatters = match table.formatters() {
        Ok(f) => f,
        Err(e) => {
            ui.colored_label(egui::Color32::RED, format!("Cannot display result: {e}"));
            return;
        }
    };
    let names = table.column_names();

    if names.is_empty() {
        ui.label("Statement returned no columns.");
        return;
    }

    ui.push_id(id, |ui: &mut Ui| {
        egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .cell_layout(Layout::left_to_right(Align::Center))
                .columns(Column::auto().at_least(80.0).clip(true), names.len())
                .max_scroll_height(max_height)
                .header(HEADER_HEIGHT, |mut header| {
                    for name in &names {
                        header.col(|ui: &mut Ui| {
                            ui.strong(*name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, table.num_rows(), |mut row| {
                        let idx = row.index();
                        for formatter in &formatters {
                            row.col(|ui: &mut Ui| {
                                let text = formatter
                                    .value(idx)
                                    .try_to_string()
                                    .unwrap_or_else(|e| format!("<{e}>"));
                                ui.label(text);
                            });
                        }
                    });
                });
        });
    });
}
