#![allow(dead_code)]

mod app;
mod chart;
mod config;
mod data;
mod gui;
mod log;

use std::path::PathBuf;

use app::SimviewApp;
use config::SimviewConfig;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    ::log::info!("Starting SIMPSON-view v{}", env!("CARGO_PKG_VERSION"));

    let config = SimviewConfig::load_or_default();
    // FID/SPE files given on the command line are loaded at start-up
    let files: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([600.0, 400.0])
            .with_title("SIMPSON-view")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "SIMPSON-view",
        options,
        Box::new(move |cc| Ok(Box::new(SimviewApp::new(cc, config, files)))),
    )
}
