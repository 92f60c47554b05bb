use crate::transport::{Transport, TransportError};
use async_trait::async_trait;
use axum::extract::ws::Message;
use parley_core::ConnectionId;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;

/// Room-facing half of an accepted WebSocket.
///
/// Frames are queued on the socket's writer task, so `send` never blocks the room.
pub struct WsTransport {
    id: ConnectionId,
    tx: mpsc::UnboundedSender<Message>,
    closed: AtomicBool,
}

impl WsTransport {
    pub fn new(tx: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            id: ConnectionId::new(),
            tx,
            closed: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Transport for WsTransport {
    fn id(&self) -> ConnectionId {
        self.id
    }

    async fn send(&self, text: String) -> Result<(), TransportError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(TransportError::Closed);
        }
        self.tx
            .send(Message::Text(text.into()))
            .map_err(|_| TransportError::Closed)
    }

    async fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        let _ = self.tx.send(Message::Close(None));
    }
}
