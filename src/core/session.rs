//! Connection manager: one session to one device endpoint
//!
//! The lifecycle is deliberately a two-state machine:
//!
//! ```text
//! Disconnected --open ok--> Connected
//! Connected --explicit close | any I/O error--> Disconnected
//! ```
//!
//! Every transport failure takes the same recovery path: the session flips
//! to Disconnected, records the error, and waits for the user to reconnect.
//! There is no automatic reconnect.

use bytes::Bytes;
use thiserror::Error;
use uuid::Uuid;

use crate::core::discovery;
use crate::core::protocol::telemetry::{self, TelemetryFrame};
use crate::core::protocol::{Command, LineAssembler};
use crate::core::transport::{SerialConfig, SerialTransport, Transport, TransportError};

/// Connection state; there are no other states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No open link
    Disconnected,
    /// Link open and usable
    Connected,
}

impl LinkState {
    /// Whether commands can be transmitted.
    pub fn is_connected(&self) -> bool {
        matches!(self, LinkState::Connected)
    }
}

/// Why an open attempt was refused.
#[derive(Error, Debug)]
pub enum ConnectError {
    /// The chosen entry is a discovery placeholder, not a port
    #[error("'{0}' is not a selectable port")]
    InvalidEndpoint(String),

    /// The transport rejected the open call
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// An open (or recently failed) connection to one endpoint.
pub struct Session {
    id: Uuid,
    endpoint: String,
    transport: Box<dyn Transport>,
    state: LinkState,
    assembler: LineAssembler,
    last_error: Option<String>,
}

impl Session {
    /// Open a serial session on `endpoint`.
    ///
    /// Placeholder entries from discovery are rejected before the transport
    /// is touched.
    pub async fn open(endpoint: &str, config: SerialConfig) -> Result<Self, ConnectError> {
        if discovery::is_placeholder(endpoint) {
            return Err(ConnectError::InvalidEndpoint(endpoint.to_string()));
        }
        let transport = SerialTransport::new(config.with_port(endpoint));
        Self::open_with(Box::new(transport), endpoint).await
    }

    /// Open a session over an already-constructed transport.
    ///
    /// This is the seam tests and the loopback demo use.
    pub async fn open_with(
        mut transport: Box<dyn Transport>,
        endpoint: &str,
    ) -> Result<Self, ConnectError> {
        if discovery::is_placeholder(endpoint) {
            return Err(ConnectError::InvalidEndpoint(endpoint.to_string()));
        }

        transport.open().await?;

        let session = Self {
            id: Uuid::new_v4(),
            endpoint: endpoint.to_string(),
            transport,
            state: LinkState::Connected,
            assembler: LineAssembler::new(),
            last_error: None,
        };
        tracing::info!(session = %session.id, endpoint, "session opened");
        Ok(session)
    }

    /// Unique id for log correlation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The endpoint this session was opened on.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Current state.
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Whether the link is usable.
    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// The error that closed the session, if one did.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Explicitly close the session.
    pub async fn close(&mut self) {
        if self.state.is_connected() {
            let _ = self.transport.close().await;
            self.state = LinkState::Disconnected;
            self.assembler.clear();
            tracing::info!(session = %self.id, "session closed");
        }
    }

    /// Transmit one command.
    ///
    /// Returns `Ok(false)` when the session is not connected: pressing a
    /// control while disconnected is a no-op, not an error. A write failure
    /// forces the Disconnected transition and is returned to the caller.
    pub async fn send(&mut self, command: &Command) -> Result<bool, TransportError> {
        if !self.state.is_connected() {
            tracing::debug!(command = %command, "dropping command, not connected");
            return Ok(false);
        }

        let line = command.encode();
        match self.transport.send(line.as_bytes()).await {
            Ok(_) => {
                tracing::debug!(session = %self.id, command = %command, "sent");
                Ok(true)
            }
            Err(e) => {
                self.force_disconnect(&e).await;
                Err(e)
            }
        }
    }

    /// Drain buffered inbound data and decode it into telemetry frames.
    ///
    /// Unrecognized lines are logged at debug level and dropped. A read
    /// failure forces the Disconnected transition and is returned.
    pub async fn drain(&mut self) -> Result<Vec<TelemetryFrame>, TransportError> {
        if !self.state.is_connected() {
            return Ok(Vec::new());
        }

        let mut frames = Vec::new();
        loop {
            let chunk: Bytes = match self.transport.receive().await {
                Ok(chunk) => chunk,
                Err(e) => {
                    self.force_disconnect(&e).await;
                    return Err(e);
                }
            };
            if chunk.is_empty() {
                break;
            }

            for line in self.assembler.push(&chunk) {
                match telemetry::classify(&line) {
                    Some(frame) => frames.push(frame),
                    None => {
                        tracing::debug!(session = %self.id, line, "ignoring unrecognized line");
                    }
                }
            }
        }

        Ok(frames)
    }

    async fn force_disconnect(&mut self, error: &TransportError) {
        tracing::warn!(session = %self.id, endpoint = %self.endpoint, %error, "link lost");
        let _ = self.transport.close().await;
        self.state = LinkState::Disconnected;
        self.assembler.clear();
        self.last_error = Some(error.to_string());
    }
}
