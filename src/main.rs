mod app;
mod ui;

use app::PackagerApp;
use eframe::egui;
use xcms_packager::config::AppConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::from_env();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([640.0, 400.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "XCMS Online Upload Packager",
        options,
        Box::new(|_cc| Ok(Box::new(PackagerApp::new(config)))),
    )
}
