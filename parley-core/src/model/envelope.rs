use crate::error::ProtocolError;
use crate::model::participant::ParticipantId;
use serde_json::{Map, Value};

/// Peer-to-peer negotiation frames the relay forwards without inspecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

impl SignalKind {
    /// `"ice"` is accepted as an alias of `"ice-candidate"`.
    pub fn from_wire(kind: &str) -> Option<Self> {
        match kind {
            "offer" => Some(Self::Offer),
            "answer" => Some(Self::Answer),
            "ice-candidate" | "ice" => Some(Self::IceCandidate),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offer => "offer",
            Self::Answer => "answer",
            Self::IceCandidate => "ice-candidate",
        }
    }
}

/// A client frame after shape validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Join {
        from: ParticipantId,
        role: String,
    },
    Leave,
    Signal {
        kind: SignalKind,
        to: Option<ParticipantId>,
        /// The frame exactly as received.
        body: Map<String, Value>,
    },
}

impl Inbound {
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        let Ok(Value::Object(body)) = serde_json::from_str::<Value>(raw) else {
            return Err(ProtocolError::InvalidFormat);
        };
        let Some(Value::String(kind)) = body.get("type") else {
            return Err(ProtocolError::InvalidFormat);
        };

        match kind.as_str() {
            "join" => Self::parse_join(&body),
            "leave" => Ok(Self::Leave),
            other => {
                let Some(kind) = SignalKind::from_wire(other) else {
                    return Err(ProtocolError::Unsupported(other.to_string()));
                };
                let to = match body.get("to") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) if s.is_empty() => None,
                    Some(Value::String(s)) => Some(ParticipantId::from(s.as_str())),
                    Some(_) => return Err(ProtocolError::InvalidFormat),
                };
                Ok(Self::Signal { kind, to, body })
            }
        }
    }

    fn parse_join(body: &Map<String, Value>) -> Result<Self, ProtocolError> {
        let from = body
            .get("from")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or(ProtocolError::InvalidJoin)?;

        // Older browser builds send `userType` instead of `role`.
        let data = body.get("data");
        let role = data
            .and_then(|d| d.get("role"))
            .or_else(|| data.and_then(|d| d.get("userType")))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or(ProtocolError::InvalidJoin)?;

        Ok(Self::Join {
            from: ParticipantId::from(from),
            role: role.to_string(),
        })
    }
}

/// Stamp a signal with the sender's registered id before it is relayed.
///
/// Whatever `from` the client supplied is overwritten and `type` is normalised;
/// every other field passes through untouched.
pub fn forward(kind: SignalKind, mut body: Map<String, Value>, from: &ParticipantId) -> Value {
    body.insert("type".into(), Value::String(kind.as_str().into()));
    body.insert("from".into(), Value::String(from.0.clone()));
    Value::Object(body)
}
