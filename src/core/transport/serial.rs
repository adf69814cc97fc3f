//! Serial port transport implementation

use super::{Transport, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{Read, Write};
use std::sync::Arc;
use std::time::Duration;

/// Baud rate the extruder firmware listens at.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Fixed read timeout so a silent device never wedges a poll step.
pub const READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Serial port parity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SerialParity {
    /// No parity
    #[default]
    None,
    /// Odd parity
    Odd,
    /// Even parity
    Even,
}

/// Serial port configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Port name (e.g., COM3, /dev/ttyUSB0)
    pub port: String,
    /// Baud rate
    pub baud_rate: u32,
    /// Data bits (5, 6, 7, 8)
    pub data_bits: u8,
    /// Stop bits (1, 2)
    pub stop_bits: u8,
    /// Parity
    pub parity: SerialParity,
}

impl SerialConfig {
    /// Create a configuration with the device defaults (8N1).
    pub fn new(port: &str, baud_rate: u32) -> Self {
        Self {
            port: port.to_string(),
            baud_rate,
            data_bits: 8,
            stop_bits: 1,
            parity: SerialParity::None,
        }
    }

    /// Same settings, different port.
    #[must_use]
    pub fn with_port(mut self, port: &str) -> Self {
        self.port = port.to_string();
        self
    }

    /// Set parity
    #[must_use]
    pub fn parity(mut self, parity: SerialParity) -> Self {
        self.parity = parity;
        self
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self::new("", DEFAULT_BAUD_RATE)
    }
}

/// Serial port transport
pub struct SerialTransport {
    config: SerialConfig,
    port: Arc<Mutex<Option<Box<dyn SerialPort>>>>,
}

impl SerialTransport {
    /// Create a transport for the given configuration (not yet open).
    pub fn new(config: SerialConfig) -> Self {
        Self {
            config,
            port: Arc::new(Mutex::new(None)),
        }
    }
}

fn map_open_error(port: &str, e: &serialport::Error) -> TransportError {
    match e.kind() {
        serialport::ErrorKind::NoDevice => TransportError::PortNotFound(port.to_string()),
        serialport::ErrorKind::Io(std::io::ErrorKind::PermissionDenied) => {
            TransportError::PermissionDenied(port.to_string())
        }
        _ => {
            // serialport reports a busy device with no dedicated kind
            if e.to_string().to_lowercase().contains("busy") {
                TransportError::PortInUse(port.to_string())
            } else {
                TransportError::ConnectionFailed(e.to_string())
            }
        }
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn open(&mut self) -> Result<(), TransportError> {
        let data_bits = match self.config.data_bits {
            5 => DataBits::Five,
            6 => DataBits::Six,
            7 => DataBits::Seven,
            _ => DataBits::Eight,
        };

        let stop_bits = match self.config.stop_bits {
            2 => StopBits::Two,
            _ => StopBits::One,
        };

        let parity = match self.config.parity {
            SerialParity::Odd => Parity::Odd,
            SerialParity::Even => Parity::Even,
            SerialParity::None => Parity::None,
        };

        let port = serialport::new(&self.config.port, self.config.baud_rate)
            .data_bits(data_bits)
            .stop_bits(stop_bits)
            .parity(parity)
            .flow_control(FlowControl::None)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|e| map_open_error(&self.config.port, &e))?;

        *self.port.lock() = Some(port);
        tracing::info!(port = %self.config.port, baud = self.config.baud_rate, "serial port opened");

        Ok(())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        *self.port.lock() = None;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.port.lock().is_some()
    }

    async fn send(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        let mut port_guard = self.port.lock();
        let port = port_guard.as_mut().ok_or(TransportError::NotConnected)?;

        let written = port.write(data).map_err(TransportError::IoError)?;
        port.flush().map_err(TransportError::IoError)?;

        Ok(written)
    }

    async fn receive(&mut self) -> Result<Bytes, TransportError> {
        let mut port_guard = self.port.lock();
        let port = port_guard.as_mut().ok_or(TransportError::NotConnected)?;

        // Drain only what is already buffered so a quiet line returns
        // immediately instead of sitting in the read timeout.
        let available = port.bytes_to_read().map_err(|e| {
            TransportError::IoError(std::io::Error::new(std::io::ErrorKind::Other, e))
        })?;
        if available == 0 {
            return Ok(Bytes::new());
        }

        let mut buffer = vec![0u8; (available as usize).min(4096)];
        match port.read(&mut buffer) {
            Ok(0) => Err(TransportError::Disconnected),
            Ok(n) => {
                buffer.truncate(n);
                Ok(Bytes::from(buffer))
            }
            Err(ref e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(Bytes::new()),
            Err(e) => Err(TransportError::IoError(e)),
        }
    }

    fn endpoint_info(&self) -> String {
        format!(
            "{} @ {} baud ({}{}{})",
            self.config.port,
            self.config.baud_rate,
            self.config.data_bits,
            match self.config.parity {
                SerialParity::None => "N",
                SerialParity::Odd => "O",
                SerialParity::Even => "E",
            },
            self.config.stop_bits,
        )
    }
}

/// List available serial ports
pub fn list_ports() -> Result<Vec<serialport::SerialPortInfo>, TransportError> {
    serialport::available_ports().map_err(|e| TransportError::IoError(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_device() {
        let cfg = SerialConfig::default();
        assert_eq!(cfg.baud_rate, DEFAULT_BAUD_RATE);
        assert_eq!(cfg.data_bits, 8);
        assert_eq!(cfg.stop_bits, 1);
        assert_eq!(cfg.parity, SerialParity::None);
    }

    #[test]
    fn test_endpoint_info_format() {
        let t = SerialTransport::new(SerialConfig::new("/dev/ttyUSB0", 9600));
        assert_eq!(t.endpoint_info(), "/dev/ttyUSB0 @ 9600 baud (8N1)");
    }
}
