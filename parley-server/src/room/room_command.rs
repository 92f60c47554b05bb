use crate::transport::{Transport, TransportEvent};
use std::fmt;
use std::sync::Arc;

/// Everything a room reacts to, delivered through its queue one at a time.
pub enum RoomCommand {
    /// A freshly accepted transport. Not a participant until it sends `join`.
    Attach { transport: Arc<dyn Transport> },

    /// Message, close or error callback from an attached transport.
    Transport(TransportEvent),
}

impl fmt::Debug for RoomCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attach { transport } => f
                .debug_struct("Attach")
                .field("connection", &transport.id())
                .finish(),
            Self::Transport(event) => f.debug_tuple("Transport").field(event).finish(),
        }
    }
}
