mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::PowerPulseApp;
use clap::Parser;
use config::Config;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();
    let config = Config::parse();
    log::info!(
        "Starting with store {} (table '{}')",
        config.db_path.display(),
        config.table
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "PowerPulse – Household Power Consumption",
        options,
        Box::new(move |_cc| Ok(Box::new(PowerPulseApp::new(&config)))),
    )
}
