use eframe::egui;
use vehicle_explorer::app::VehicleExplorerApp;
use vehicle_explorer::config::AppConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e:#}");
            eprintln!("Invalid configuration: {e:#}");
            std::process::exit(2);
        }
    };
    log::info!("Data directory: {}", config.data_dir.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Vehicle Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(VehicleExplorerApp::new(config)))),
    )
}
