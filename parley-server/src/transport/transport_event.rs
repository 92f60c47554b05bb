use parley_core::ConnectionId;

/// Callbacks from the transport adapter, serialized into the owning room.
///
/// `Closed` and `Error` are terminal: an adapter emits exactly one of them per connection.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    Message(ConnectionId, String),
    Closed(ConnectionId),
    Error(ConnectionId, String),
}

impl TransportEvent {
    pub fn connection(&self) -> ConnectionId {
        match self {
            Self::Message(id, _) | Self::Closed(id) | Self::Error(id, _) => *id,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Message(..))
    }
}
