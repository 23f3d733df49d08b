mod app;
mod config;
mod data;
mod error;
mod state;
mod store;
mod ui;

use app::RustySieveApp;
use config::Config;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = match Config::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e:#}");
            eprintln!("Error: {e:#}");
            eprintln!("Usage: rusty-sieve [--config FILE.json] [--export-dir DIR] [SOURCE]");
            std::process::exit(2);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Sieve – Spreadsheet Filter",
        options,
        Box::new(move |_cc| Ok(Box::new(RustySieveApp::new(config)))),
    )
}
