//! Headless telemetry monitor
//!
//! Connects to an extruder and prints every telemetry update, optionally
//! logging the session to a file. Demonstrates driving the core without
//! the GUI.
//!
//! Usage:
//!   cargo run --example monitor -- /dev/ttyUSB0 [session.log]

use std::time::Duration;

use filacon_core::{DeviceController, LogFormat, TelemetryLogger, POLL_INTERVAL};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();

    let Some(port) = args.get(1) else {
        println!("Usage: monitor <port> [log_file]");
        println!("\nAvailable ports:");
        for entry in DeviceController::list_endpoints() {
            println!("  {entry}");
        }
        return Ok(());
    };

    let mut logger = match args.get(2) {
        Some(path) => Some(TelemetryLogger::create(path.as_ref(), LogFormat::Text)?),
        None => None,
    };

    let mut controller = DeviceController::new();
    controller.connect(port).await?;
    println!("Connected to {port}. Ctrl+C to exit.\n");

    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    let mut last: Option<f32> = None;
    let mut quiet = Duration::ZERO;

    loop {
        ticker.tick().await;
        controller.tick().await;

        if !controller.is_connected() {
            eprintln!("{}", controller.status());
            break;
        }

        let state = controller.device_state();
        if state.has_reading() && last != Some(state.temperature_c) {
            last = Some(state.temperature_c);
            quiet = Duration::ZERO;

            let line = format!(
                "{:7.2} °C  heater={} motor={} system={}  vel={:.2} target={:.2} engage={:.2}",
                state.temperature_c,
                u8::from(state.heater_on),
                u8::from(state.motor_on),
                u8::from(state.system_on),
                state.target_velocity,
                state.target_temp,
                state.motor_engage_temp,
            );
            println!("{line}");
            if let Some(logger) = logger.as_mut() {
                logger.log_rx(&line)?;
            }
        } else {
            quiet += POLL_INTERVAL;
            if quiet >= Duration::from_secs(10) {
                println!("(no telemetry for 10 s)");
                quiet = Duration::ZERO;
            }
        }
    }

    Ok(())
}
