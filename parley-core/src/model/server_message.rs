use crate::error::ProtocolError;
use crate::model::participant::{ParticipantId, RosterEntry};
use serde::{Deserialize, Serialize};

/// Envelopes the relay emits on its own behalf.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    RoomState { data: RoomStateData },
    UserJoined { from: ParticipantId, data: PresenceData },
    UserLeft { from: ParticipantId, data: PresenceData },
    Error { data: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomStateData {
    pub users: Vec<RosterEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PresenceData {
    #[serde(rename = "userType")]
    pub user_type: String,
}

impl ServerMessage {
    pub fn room_state(users: Vec<RosterEntry>) -> Self {
        Self::RoomState {
            data: RoomStateData { users },
        }
    }

    pub fn user_joined(from: ParticipantId, role: impl Into<String>) -> Self {
        Self::UserJoined {
            from,
            data: PresenceData {
                user_type: role.into(),
            },
        }
    }

    pub fn user_left(from: ParticipantId, role: impl Into<String>) -> Self {
        Self::UserLeft {
            from,
            data: PresenceData {
                user_type: role.into(),
            },
        }
    }
}

impl From<&ProtocolError> for ServerMessage {
    fn from(err: &ProtocolError) -> Self {
        Self::Error {
            data: err.to_string(),
        }
    }
}
