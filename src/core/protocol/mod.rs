//! Line-based command/telemetry protocol
//!
//! The extruder speaks newline-terminated ASCII in both directions:
//! outbound commands ([`Command`]) and inbound telemetry frames
//! ([`telemetry`]). [`LineAssembler`] sits between the byte transport and
//! the decoder, reassembling complete lines from arbitrary read chunks.

pub mod command;
pub mod telemetry;

pub use command::Command;
pub use telemetry::{ParseError, TelemetryFrame};

/// Upper bound on buffered bytes while waiting for a newline.
///
/// Telemetry lines are well under 100 bytes; anything growing past this is
/// line noise with no terminator and gets dropped rather than hoarded.
const MAX_PENDING: usize = 4096;

/// Reassembles newline-terminated lines from transport read chunks.
///
/// Tolerates CRLF, lines split across reads, and non-UTF-8 noise (decoded
/// lossily). Fail-soft: on overflow the pending buffer is discarded.
#[derive(Debug, Default)]
pub struct LineAssembler {
    pending: Vec<u8>,
}

impl LineAssembler {
    /// Create an empty assembler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes; returns every line completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();

        for &byte in chunk {
            if byte == b'\n' {
                let raw = std::mem::take(&mut self.pending);
                let line = String::from_utf8_lossy(&raw);
                lines.push(line.trim_end_matches('\r').to_string());
            } else {
                self.pending.push(byte);
                if self.pending.len() > MAX_PENDING {
                    tracing::debug!(
                        dropped = self.pending.len(),
                        "discarding unterminated input"
                    );
                    self.pending.clear();
                }
            }
        }

        lines
    }

    /// Bytes held back waiting for a terminator.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Drop any partial line (called when a session closes).
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_complete_line() {
        let mut asm = LineAssembler::new();
        assert_eq!(asm.push(b"DATA,1,0,0,0,0,0,0\n"), vec!["DATA,1,0,0,0,0,0,0"]);
        assert_eq!(asm.pending_len(), 0);
    }

    #[test]
    fn test_line_split_across_chunks() {
        let mut asm = LineAssembler::new();
        assert!(asm.push(b"DATA,45.5").is_empty());
        assert!(asm.push(b"0,1,0,1,40").is_empty());
        assert_eq!(
            asm.push(b",120,90\nDATA"),
            vec!["DATA,45.50,1,0,1,40,120,90"]
        );
        assert_eq!(asm.pending_len(), 4);
    }

    #[test]
    fn test_crlf_stripped() {
        let mut asm = LineAssembler::new();
        assert_eq!(asm.push(b"SET_VEL,40.00\r\n"), vec!["SET_VEL,40.00"]);
    }

    #[test]
    fn test_multiple_lines_in_one_chunk() {
        let mut asm = LineAssembler::new();
        let lines = asm.push(b"a\nb\nc\n");
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_overflow_discards_noise() {
        let mut asm = LineAssembler::new();
        asm.push(&vec![b'x'; MAX_PENDING + 1]);
        assert_eq!(asm.pending_len(), 0);

        // Still usable afterwards
        assert_eq!(asm.push(b"ok\n"), vec!["ok"]);
    }

    #[test]
    fn test_clear_drops_partial() {
        let mut asm = LineAssembler::new();
        asm.push(b"DATA,45");
        asm.clear();
        assert_eq!(asm.push(b".5\n"), vec![".5"]);
    }
}
