use serde::{Deserialize, Serialize};
use std::fmt;

/// Client-chosen identifier, unique within one room.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[serde(transparent)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One element of a `room-state` snapshot.
#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
pub struct RosterEntry {
    pub id: ParticipantId,
    #[serde(rename = "userType")]
    pub user_type: String,
}
