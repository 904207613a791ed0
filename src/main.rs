use std::path::PathBuf;

use anyhow::Context;
use eframe::egui;

use employee_dashboard::app::DashboardApp;
use employee_dashboard::config::DashboardConfig;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Optional first argument: path to a JSON config file.
    let explicit = std::env::args_os().nth(1).map(PathBuf::from);
    let config = DashboardConfig::resolve(explicit).context("loading dashboard config")?;
    log::info!(
        "Using data file {} ({})",
        config.data_path.display(),
        config.variant.export_file_name
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Employee Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))
}
