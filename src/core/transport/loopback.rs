//! Loopback transport for tests and the headless demo
//!
//! Behaves like a serial line with a scriptable device on the far end: the
//! [`LoopbackHandle`] feeds inbound bytes and inspects everything the
//! client wrote, and can be told to fail the next read or write to
//! exercise the forced-disconnect path.

use super::{Transport, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Inner {
    rx_queue: VecDeque<Bytes>,
    tx_log: Vec<u8>,
    fail_reads: bool,
    fail_writes: bool,
}

/// Far-end handle for driving a [`LoopbackTransport`].
#[derive(Clone)]
pub struct LoopbackHandle {
    inner: Arc<Mutex<Inner>>,
}

impl LoopbackHandle {
    /// Queue bytes for the client to receive.
    pub fn feed(&self, data: &[u8]) {
        self.inner
            .lock()
            .rx_queue
            .push_back(Bytes::copy_from_slice(data));
    }

    /// Queue a full line, appending the newline.
    pub fn feed_line(&self, line: &str) {
        self.feed(format!("{line}\n").as_bytes());
    }

    /// Everything the client has written so far.
    pub fn sent(&self) -> Vec<u8> {
        self.inner.lock().tx_log.clone()
    }

    /// The client's writes split into lines.
    pub fn sent_lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.sent())
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Make every subsequent read fail as a lost link.
    pub fn fail_reads(&self, fail: bool) {
        self.inner.lock().fail_reads = fail;
    }

    /// Make every subsequent write fail as a lost link.
    pub fn fail_writes(&self, fail: bool) {
        self.inner.lock().fail_writes = fail;
    }
}

/// In-memory transport with a scriptable far end.
pub struct LoopbackTransport {
    inner: Arc<Mutex<Inner>>,
    open: bool,
}

impl LoopbackTransport {
    /// Create a transport plus the handle that drives its far end.
    pub fn new() -> (Self, LoopbackHandle) {
        let inner = Arc::new(Mutex::new(Inner::default()));
        (
            Self {
                inner: inner.clone(),
                open: false,
            },
            LoopbackHandle { inner },
        )
    }
}

#[async_trait]
impl Transport for LoopbackTransport {
    async fn open(&mut self) -> Result<(), TransportError> {
        self.open = true;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    async fn send(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        if !self.open {
            return Err(TransportError::NotConnected);
        }
        let mut inner = self.inner.lock();
        if inner.fail_writes {
            return Err(TransportError::Disconnected);
        }
        inner.tx_log.extend_from_slice(data);
        Ok(data.len())
    }

    async fn receive(&mut self) -> Result<Bytes, TransportError> {
        if !self.open {
            return Err(TransportError::NotConnected);
        }
        let mut inner = self.inner.lock();
        if inner.fail_reads {
            return Err(TransportError::Disconnected);
        }
        Ok(inner.rx_queue.pop_front().unwrap_or_default())
    }

    fn endpoint_info(&self) -> String {
        "loopback".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip() {
        let (mut transport, handle) = LoopbackTransport::new();
        transport.open().await.unwrap();

        transport.send(b"SET_VEL,40.00\n").await.unwrap();
        assert_eq!(handle.sent_lines(), vec!["SET_VEL,40.00"]);

        handle.feed_line("DATA,1,0,0,0,0,0,0");
        let chunk = transport.receive().await.unwrap();
        assert_eq!(&chunk[..], b"DATA,1,0,0,0,0,0,0\n");

        // Queue drained
        assert!(transport.receive().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let (mut transport, handle) = LoopbackTransport::new();
        transport.open().await.unwrap();

        handle.fail_writes(true);
        assert!(matches!(
            transport.send(b"x").await,
            Err(TransportError::Disconnected)
        ));

        handle.fail_reads(true);
        assert!(matches!(
            transport.receive().await,
            Err(TransportError::Disconnected)
        ));
    }

    #[tokio::test]
    async fn test_closed_transport_refuses_io() {
        let (mut transport, _handle) = LoopbackTransport::new();
        assert!(matches!(
            transport.send(b"x").await,
            Err(TransportError::NotConnected)
        ));
    }
}
