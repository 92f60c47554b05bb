use thiserror::Error;

/// Faults reported back to the offending client as an `error` envelope.
///
/// The `Display` text is exactly what ends up in `error.data`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Invalid message format")]
    InvalidFormat,

    #[error("Unsupported message type: {0}")]
    Unsupported(String),

    #[error("Invalid join payload - missing from or role")]
    InvalidJoin,

    #[error("Not joined to room")]
    NotJoined,

    #[error("Room is full")]
    RoomFull,
}
