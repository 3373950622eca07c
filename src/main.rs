use std::path::Path;

use customer_dashboard::app::DashboardApp;
use customer_dashboard::config::{DashboardConfig, CONFIG_FILE};
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE));
    let title = config.window_title.clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(&title)
            .with_inner_size(config.window_size)
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(config)))),
    )
}
