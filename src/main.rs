mod app;
mod state;
mod ui;

use anyhow::{anyhow, Context};
use app::RustySqlApp;
use eframe::egui;
use rusty_sql::AppConfig;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = AppConfig::load().context("loading configuration")?;
    log::info!("Repository directory: {}", config.data_dir.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty SQL – File Analysis and SQL",
        options,
        Box::new(|_cc| Ok(Box::new(RustySqlApp::new(config)))),
    )
    .map_err(|e| anyhow!("{e}"))
}
