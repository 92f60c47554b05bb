use async_trait::async_trait;
use parley_core::ConnectionId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport is closed")]
    Closed,

    #[error("transport i/o failure: {0}")]
    Io(String),
}

/// The send/close half of a bidirectional message transport.
///
/// Inbound traffic reaches the room as [`TransportEvent`](crate::TransportEvent)s;
/// the room only ever pushes serialized envelopes out and closes.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    fn id(&self) -> ConnectionId;

    async fn send(&self, text: String) -> Result<(), TransportError>;

    /// Must be idempotent.
    async fn close(&self);
}
