//! Telemetry session logging
//!
//! Optional bench aid: every line sent to or received from the device can
//! be appended to a log file with a local timestamp, as plain text or CSV.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// `HH:MM:SS.mmm dir line`
    #[default]
    Text,
    /// `timestamp,dir,line`
    Csv,
}

impl LogFormat {
    /// File extension for the format.
    pub fn extension(&self) -> &'static str {
        match self {
            LogFormat::Text => "txt",
            LogFormat::Csv => "csv",
        }
    }
}

/// Direction of a logged line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDirection {
    /// Client to device
    Tx,
    /// Device to client
    Rx,
}

impl LogDirection {
    fn tag(self) -> &'static str {
        match self {
            LogDirection::Tx => "TX",
            LogDirection::Rx => "RX",
        }
    }
}

/// Appends timestamped protocol lines to a file.
pub struct TelemetryLogger {
    format: LogFormat,
    path: PathBuf,
    writer: BufWriter<std::fs::File>,
    entries: u64,
}

impl TelemetryLogger {
    /// Create (or append to) a log file at `path`.
    pub fn create(path: &Path, format: LogFormat) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            format,
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            entries: 0,
        })
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines logged so far.
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Log an outbound line.
    pub fn log_tx(&mut self, line: &str) -> std::io::Result<()> {
        self.log(LogDirection::Tx, line)
    }

    /// Log an inbound line.
    pub fn log_rx(&mut self, line: &str) -> std::io::Result<()> {
        self.log(LogDirection::Rx, line)
    }

    /// Log one line with the given direction.
    pub fn log(&mut self, direction: LogDirection, line: &str) -> std::io::Result<()> {
        let now = Local::now();
        let line = line.trim_end();

        match self.format {
            LogFormat::Text => {
                writeln!(
                    self.writer,
                    "{} {} {}",
                    now.format("%H:%M:%S%.3f"),
                    direction.tag(),
                    line
                )?;
            }
            LogFormat::Csv => {
                // The payload is quoted since telemetry lines contain commas
                writeln!(
                    self.writer,
                    "{},{},\"{}\"",
                    now.format("%Y-%m-%dT%H:%M:%S%.3f"),
                    direction.tag(),
                    line.replace('"', "\"\"")
                )?;
            }
        }
        self.entries += 1;
        self.writer.flush()
    }
}
