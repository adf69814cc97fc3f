//! Filacon - Extruder Control Panel
//!
//! Desktop front-end for a heated-filament extruder: pick a serial port,
//! connect, watch the live temperature, and adjust the running parameters.

use eframe::egui;

mod gui;

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Filacon v{}", env!("CARGO_PKG_VERSION"));

    let window = filacon_core::AppConfig::default().window;
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([window.width, window.height])
        .with_min_inner_size([360.0, 520.0])
        .with_title("Filacon");

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Filacon",
        native_options,
        Box::new(|cc| Ok(Box::new(gui::FilaconApp::new(cc)))),
    )
}
