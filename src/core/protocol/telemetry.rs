//! Inbound telemetry decoding
//!
//! The canonical frame is comma-delimited:
//!
//! ```text
//! DATA,<temp>,<heater>,<motor>,<sys>,<vel>,<targetTemp>,<motorEngageTemp>
//! ```
//!
//! Boolean fields are the literal `1` for on, anything else for off. A
//! frame either parses completely or is rejected whole; partial updates are
//! never applied.
//!
//! Older firmware emits a free-text temperature line instead
//! (`Temperatura: 45.50 °C`). That form is accepted read-only through
//! [`parse_legacy_temperature`] and only ever yields a temperature.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::core::device::DeviceState;

/// Leading token of a canonical telemetry frame.
pub const TELEMETRY_PREFIX: &str = "DATA";

/// Number of payload fields after the prefix.
pub const TELEMETRY_FIELDS: usize = 7;

/// Why a telemetry line was rejected.
///
/// These are logged at debug level and the line is dropped; they are never
/// surfaced to the user, to tolerate line noise and partial reads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The line does not start with `DATA,`
    #[error("not a telemetry frame")]
    MissingPrefix,
    /// Wrong number of comma-separated payload fields
    #[error("expected {TELEMETRY_FIELDS} fields, got {0}")]
    FieldCount(usize),
    /// A numeric field failed to parse
    #[error("field '{field}' is not a number: {value:?}")]
    InvalidNumber {
        /// Name of the offending field
        field: &'static str,
        /// Raw field text
        value: String,
    },
}

fn parse_float(field: &'static str, value: &str) -> Result<f32, ParseError> {
    value
        .trim()
        .parse::<f32>()
        .map_err(|_| ParseError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

/// Parse a canonical telemetry line into a full device snapshot.
pub fn parse_line(line: &str) -> Result<DeviceState, ParseError> {
    let line = line.trim();
    let mut parts = line.split(',');

    if parts.next() != Some(TELEMETRY_PREFIX) {
        return Err(ParseError::MissingPrefix);
    }

    let fields: Vec<&str> = parts.collect();
    if fields.len() != TELEMETRY_FIELDS {
        return Err(ParseError::FieldCount(fields.len()));
    }

    Ok(DeviceState {
        temperature_c: parse_float("temperature", fields[0])?,
        heater_on: fields[1] == "1",
        motor_on: fields[2] == "1",
        system_on: fields[3] == "1",
        target_velocity: parse_float("velocity", fields[4])?,
        target_temp: parse_float("targetTemp", fields[5])?,
        motor_engage_temp: parse_float("motorEngageTemp", fields[6])?,
    })
}

/// Lossy form of [`parse_line`] for callers that only care about success.
pub fn decode(line: &str) -> Option<DeviceState> {
    parse_line(line).ok()
}

fn legacy_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^Temperatura:\s*(-?[0-9]+(?:\.[0-9]+)?)\s*(?:°\s*C)?$")
            .expect("legacy telemetry regex is valid")
    })
}

/// Parse the legacy free-text temperature line.
///
/// Returns the temperature in °C, or `None` when the line is not in the
/// legacy format. This never produces a full [`DeviceState`]; the caller
/// applies it as a temperature-only update.
pub fn parse_legacy_temperature(line: &str) -> Option<f32> {
    let caps = legacy_regex().captures(line.trim())?;
    caps.get(1)?.as_str().parse::<f32>().ok()
}

/// A decoded inbound line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TelemetryFrame {
    /// Canonical frame: overwrites the whole device snapshot
    Full(DeviceState),
    /// Legacy free-text line: updates the temperature only
    Temperature(f32),
}

/// Classify one inbound line.
///
/// Returns `None` for lines that are neither format; the caller logs and
/// drops those.
pub fn classify(line: &str) -> Option<TelemetryFrame> {
    if let Ok(state) = parse_line(line) {
        return Some(TelemetryFrame::Full(state));
    }
    parse_legacy_temperature(line).map(TelemetryFrame::Temperature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_frame() {
        let state = parse_line("DATA,45.50,1,0,1,40.00,120.00,90.00").unwrap();
        assert_eq!(state.temperature_c, 45.50);
        assert!(state.heater_on);
        assert!(!state.motor_on);
        assert!(state.system_on);
        assert_eq!(state.target_velocity, 40.00);
        assert_eq!(state.target_temp, 120.00);
        assert_eq!(state.motor_engage_temp, 90.00);
    }

    #[test]
    fn test_wrong_field_count_rejected() {
        assert_eq!(parse_line("DATA,45.50,1,0"), Err(ParseError::FieldCount(3)));
        assert_eq!(
            parse_line("DATA,1,1,1,1,1,1,1,1"),
            Err(ParseError::FieldCount(8))
        );
        assert!(decode("DATA,45.50,1,0").is_none());
    }

    #[test]
    fn test_missing_prefix_rejected() {
        assert_eq!(
            parse_line("STATUS,45.50,1,0,1,40,120,90"),
            Err(ParseError::MissingPrefix)
        );
        assert_eq!(parse_line(""), Err(ParseError::MissingPrefix));
        assert_eq!(parse_line("garbage"), Err(ParseError::MissingPrefix));
    }

    #[test]
    fn test_non_numeric_field_rejects_whole_line() {
        let err = parse_line("DATA,hot,1,0,1,40,120,90").unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidNumber {
                field: "temperature",
                ..
            }
        ));

        let err = parse_line("DATA,45.5,1,0,1,40,120,x").unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidNumber {
                field: "motorEngageTemp",
                ..
            }
        ));
    }

    #[test]
    fn test_boolean_is_literal_one() {
        let state = parse_line("DATA,20.0,1,2,true,0,0,0").unwrap();
        assert!(state.heater_on);
        assert!(!state.motor_on);
        assert!(!state.system_on);
    }

    #[test]
    fn test_sentinel_temperature_passes_through() {
        let state = parse_line("DATA,-1.0,0,0,0,0,0,0").unwrap();
        assert!(!state.has_reading());
    }

    #[test]
    fn test_legacy_temperature_line() {
        assert_eq!(
            parse_legacy_temperature("Temperatura: 45.50 °C"),
            Some(45.50)
        );
        assert_eq!(parse_legacy_temperature("Temperatura:199.9"), Some(199.9));
        assert_eq!(parse_legacy_temperature("Temperature: 45.50"), None);
        assert_eq!(parse_legacy_temperature("Temperatura: hot"), None);
    }

    #[test]
    fn test_classify_prefers_full_frames() {
        assert!(matches!(
            classify("DATA,45.50,1,0,1,40.00,120.00,90.00"),
            Some(TelemetryFrame::Full(_))
        ));
        assert_eq!(
            classify("Temperatura: 45.50 °C"),
            Some(TelemetryFrame::Temperature(45.50))
        );
        assert_eq!(classify("noise!!"), None);
    }
}
