//! Serial endpoint discovery
//!
//! Synchronous enumeration of the ports a user can pick from. When nothing
//! can be enumerated the list still has one entry, a placeholder the UI can
//! display; placeholders are never valid connect targets and
//! [`crate::core::session::Session::open`] rejects them.

use crate::core::transport::list_ports;

/// Entry shown when enumeration succeeds but finds nothing.
pub const NO_PORTS_PLACEHOLDER: &str = "<no ports detected>";

/// Longest error description carried into a placeholder entry.
const ERROR_DESCRIPTION_MAX: usize = 48;

/// List selectable serial endpoints.
///
/// Never returns an empty list: with no ports it returns
/// [`NO_PORTS_PLACEHOLDER`], and on an enumeration error it returns one
/// `<error: …>` entry with the description truncated to a bounded length.
pub fn list_endpoints() -> Vec<String> {
    match list_ports() {
        Ok(ports) if ports.is_empty() => vec![NO_PORTS_PLACEHOLDER.to_string()],
        Ok(ports) => {
            let mut names: Vec<String> = ports.into_iter().map(|p| p.port_name).collect();
            names.sort();
            names
        }
        Err(e) => {
            tracing::warn!(error = %e, "serial port enumeration failed");
            let mut desc = e.to_string();
            desc.truncate(ERROR_DESCRIPTION_MAX);
            vec![format!("<error: {desc}>")]
        }
    }
}

/// Whether a listed entry is a placeholder rather than a real endpoint.
///
/// Real port names (`COM3`, `/dev/ttyUSB0`, `/dev/cu.usbmodem14101`) never
/// start with `<`.
pub fn is_placeholder(entry: &str) -> bool {
    entry.is_empty() || entry.starts_with('<')
}
