use async_trait::async_trait;
use parley_core::ConnectionId;
use parley_server::{Transport, TransportError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::mpsc;

/// In-memory transport that captures everything the room sends.
pub struct MockTransport {
    id: ConnectionId,
    tx: mpsc::UnboundedSender<String>,
    closed: AtomicBool,
    /// When set, every send fails as if the socket were half-closed.
    broken: AtomicBool,
    close_calls: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let transport = Arc::new(Self {
            id: ConnectionId::new(),
            tx,
            closed: AtomicBool::new(false),
            broken: AtomicBool::new(false),
            close_calls: AtomicUsize::new(0),
        });
        (transport, rx)
    }

    pub fn break_sends(&self) {
        self.broken.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn id(&self) -> ConnectionId {
        self.id
    }

    async fn send(&self, text: String) -> Result<(), TransportError> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(TransportError::Io("broken pipe".into()));
        }
        if self.is_closed() {
            return Err(TransportError::Closed);
        }
        tracing::debug!("[MockTransport] {} <- {}", self.id, text);
        self.tx.send(text).map_err(|_| TransportError::Closed)
    }

    async fn close(&self) {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        self.closed.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_transport_captures_and_breaks() {
        let (transport, mut rx) = MockTransport::new();

        transport.send("one".into()).await.unwrap();
        assert_eq!(rx.recv().await.as_deref(), Some("one"));

        transport.break_sends();
        assert!(transport.send("two".into()).await.is_err());

        transport.close().await;
        transport.close().await;
        assert!(transport.is_closed());
        assert_eq!(transport.close_calls(), 2);
    }
}
