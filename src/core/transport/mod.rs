//! Transport layer for the device link
//!
//! One production transport (a `serialport`-backed serial line) and one
//! loopback transport used by tests and the headless demo. The trait is the
//! seam the session talks through, so everything above it can run against
//! either.

mod loopback;
mod serial;

pub use loopback::{LoopbackHandle, LoopbackTransport};
pub use serial::{list_ports, SerialConfig, SerialParity, SerialTransport};

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Transport error types
#[derive(Error, Debug)]
pub enum TransportError {
    /// Connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Port not found
    #[error("Port not found: {0}")]
    PortNotFound(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Port already in use
    #[error("Port already in use: {0}")]
    PortInUse(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Not connected
    #[error("Not connected")]
    NotConnected,

    /// Peer went away mid-session
    #[error("Disconnected")]
    Disconnected,
}

/// Byte pipe to the device.
///
/// `receive` is a non-blocking drain: it returns whatever is buffered right
/// now (possibly empty) and only errors when the link itself has failed.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open the underlying link.
    async fn open(&mut self) -> Result<(), TransportError>;

    /// Close the underlying link.
    async fn close(&mut self) -> Result<(), TransportError>;

    /// Whether the link is currently open.
    fn is_open(&self) -> bool;

    /// Write raw bytes; returns the number written.
    async fn send(&mut self, data: &[u8]) -> Result<usize, TransportError>;

    /// Drain buffered inbound bytes; empty when nothing is pending.
    async fn receive(&mut self) -> Result<Bytes, TransportError>;

    /// Human-readable description of the endpoint, for status lines.
    fn endpoint_info(&self) -> String;
}
