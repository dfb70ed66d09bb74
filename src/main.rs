#![allow(dead_code)]

mod app;
mod data;
mod gui;
mod log;

use app::ScanApp;

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    ::log::info!("Starting Scan Analyser v{}", env!("CARGO_PKG_VERSION"));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1500.0, 900.0])
            .with_min_inner_size([800.0, 500.0])
            .with_title("Scan Analyser")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Scan Analyser",
        options,
        Box::new(|cc| Ok(Box::new(ScanApp::new(cc)))),
    )
}
