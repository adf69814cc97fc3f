//! # Filacon Core Library
//!
//! Client-side core for remote-controlling a heated-filament extruder over
//! a serial link:
//!
//! - Serial port discovery with safe placeholder entries
//! - A two-state connection manager (no automatic reconnect)
//! - Line-based command encoding (`SET_VEL,40.00`) and telemetry decoding
//!   (`DATA,...` frames, legacy free-text temperature lines)
//! - A device controller owning the session, the last device snapshot, and
//!   the clamped client-side setpoints
//! - Cancellable scheduled repeat for held increment/decrement controls
//! - Optional timestamped telemetry logging
//!
//! The GUI binary is a thin shell over [`core::controller::DeviceController`];
//! any other front-end is expected to depend on the same type rather than
//! re-implementing the session logic.
//!
//! ## Example
//!
//! ```rust,no_run
//! use filacon_core::DeviceController;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let ports = DeviceController::list_endpoints();
//!     let mut controller = DeviceController::new();
//!     controller.connect(&ports[0]).await?;
//!
//!     controller.set_system(true).await;
//!     controller.tick().await; // drain telemetry
//!     println!("temperature: {:.2} °C", controller.device_state().temperature_c);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod core;

// Re-exports for convenience
pub use crate::config::AppConfig;
pub use crate::core::controller::{DeviceController, POLL_INTERVAL};
pub use crate::core::device::{
    ControlParameter, ControlParameters, DeviceState, Direction, ParamKind, UNKNOWN_TEMPERATURE,
};
pub use crate::core::discovery::{is_placeholder, list_endpoints, NO_PORTS_PLACEHOLDER};
pub use crate::core::logger::{LogFormat, TelemetryLogger};
pub use crate::core::protocol::{Command, LineAssembler, ParseError, TelemetryFrame};
pub use crate::core::repeat::RepeatHandle;
pub use crate::core::session::{ConnectError, LinkState, Session};
pub use crate::core::transport::{
    LoopbackHandle, LoopbackTransport, SerialConfig, SerialParity, SerialTransport, Transport,
    TransportError,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
