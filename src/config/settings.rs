//! Application settings
//!
//! Runtime defaults only; nothing here is persisted across restarts.

use serde::{Deserialize, Serialize};

use crate::core::controller::POLL_INTERVAL;
use crate::core::transport::SerialConfig;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Serial link settings applied to every connection
    pub serial: SerialConfig,
    /// Poll/repeat tick in milliseconds
    pub poll_interval_ms: u64,
    /// Window settings
    pub window: WindowConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            serial: SerialConfig::default(),
            poll_interval_ms: POLL_INTERVAL.as_millis() as u64,
            window: WindowConfig::default(),
        }
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window width
    pub width: f32,
    /// Window height
    pub height: f32,
    /// Start with the dark theme
    pub dark_theme: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 420.0,
            height: 640.0,
            dark_theme: true,
        }
    }
}
