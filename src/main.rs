mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::Context;
use app::CensusAiApp;
use config::AppConfig;
use data::registry::TableRegistry;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = AppConfig::load().context("loading configuration")?;
    log::info!(
        "Building tables from workbook {} and reference {}",
        config.workbook,
        config.reference
    );

    // No partial service: any pipeline failure ends the process here.
    let registry = match TableRegistry::load(&config) {
        Ok(registry) => Arc::new(registry),
        Err(e) => {
            log::error!("Startup aborted: {e}");
            return Err(e).context("building survey tables");
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "How are US Businesses Adopting AI?",
        options,
        Box::new(move |_cc| Ok(Box::new(CensusAiApp::new(registry)))),
    )
    .map_err(|e| anyhow::anyhow!("running viewer: {e}"))
}
