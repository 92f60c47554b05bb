mod connection;
mod envelope;
mod participant;
mod room;
mod server_message;

pub use connection::ConnectionId;
pub use envelope::{Inbound, SignalKind, forward};
pub use participant::{ParticipantId, RosterEntry};
pub use room::RoomId;
pub use server_message::{PresenceData, RoomStateData, ServerMessage};
