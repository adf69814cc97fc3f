//! Core module containing the main functionality of Filacon
//!
//! This module provides:
//! - Transport layer over the serial link (plus a loopback for tests)
//! - Port discovery with placeholder sentinels
//! - Session management with a two-state connection machine
//! - Command encoding and telemetry decoding for the line protocol
//! - The device controller that owns session, snapshot, and setpoints
//! - Cancellable scheduled repeat for held controls
//! - Timestamped telemetry logging

pub mod controller;
pub mod device;
pub mod discovery;
pub mod logger;
pub mod protocol;
pub mod repeat;
pub mod session;
pub mod transport;
