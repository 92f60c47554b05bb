use crate::transport::Transport;
use chrono::{DateTime, Utc};
use parley_core::{ConnectionId, ParticipantId, RosterEntry};
use std::collections::HashMap;
use std::sync::Arc;

/// A registered endpoint. Owns its transport handle.
pub struct Participant {
    pub id: ParticipantId,
    pub role: String,
    pub joined_at: DateTime<Utc>,
    seq: u64,
    transport: Arc<dyn Transport>,
}

impl Participant {
    pub fn connection(&self) -> ConnectionId {
        self.transport.id()
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn info(&self) -> ParticipantInfo {
        ParticipantInfo {
            id: self.id.clone(),
            role: self.role.clone(),
            joined_at: self.joined_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantInfo {
    pub id: ParticipantId,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

impl From<ParticipantInfo> for RosterEntry {
    fn from(info: ParticipantInfo) -> Self {
        RosterEntry {
            id: info.id,
            user_type: info.role,
        }
    }
}

/// Bijection between participant ids and transports for one room.
#[derive(Default)]
pub struct ConnectionRegistry {
    participants: HashMap<ParticipantId, Participant>,
    by_connection: HashMap<ConnectionId, ParticipantId>,
    next_seq: u64,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `id` on `transport`.
    ///
    /// If `id` is already held by another transport, that transport is closed and the
    /// displaced entry is returned. If `transport` was registered under a different id,
    /// that entry is dropped so the mapping stays one-to-one.
    pub async fn register(
        &mut self,
        id: ParticipantId,
        role: String,
        transport: Arc<dyn Transport>,
    ) -> Option<ParticipantInfo> {
        let connection = transport.id();

        if let Some(previous) = self.by_connection.get(&connection).cloned() {
            if previous != id {
                self.unregister(&previous);
            }
        }

        let displaced = match self.unregister(&id) {
            Some(old) if old.connection() != connection => {
                old.transport.close().await;
                Some(old.info())
            }
            _ => None,
        };

        self.next_seq += 1;
        self.by_connection.insert(connection, id.clone());
        self.participants.insert(
            id.clone(),
            Participant {
                id,
                role,
                joined_at: Utc::now(),
                seq: self.next_seq,
                transport,
            },
        );

        displaced
    }

    /// Safe on unknown ids.
    pub fn unregister(&mut self, id: &ParticipantId) -> Option<Participant> {
        let participant = self.participants.remove(id)?;
        let connection = participant.connection();
        if self.by_connection.get(&connection) == Some(id) {
            self.by_connection.remove(&connection);
        }
        Some(participant)
    }

    pub fn get(&self, id: &ParticipantId) -> Option<Arc<dyn Transport>> {
        self.participants.get(id).map(|p| Arc::clone(&p.transport))
    }

    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.get(id)
    }

    /// Who is speaking on `connection`, as far as the room is concerned.
    pub fn lookup(&self, connection: ConnectionId) -> Option<&ParticipantId> {
        self.by_connection.get(&connection)
    }

    /// Everyone except `exclude`, in join order.
    pub fn list_others(&self, exclude: Option<&ParticipantId>) -> Vec<ParticipantInfo> {
        self.ordered()
            .filter(|p| Some(&p.id) != exclude)
            .map(Participant::info)
            .collect()
    }

    /// Broadcast targets in join order, skipping the transport `exclude`.
    pub fn recipients(
        &self,
        exclude: Option<ConnectionId>,
    ) -> Vec<(ParticipantId, Arc<dyn Transport>)> {
        self.ordered()
            .filter(|p| Some(p.connection()) != exclude)
            .map(|p| (p.id.clone(), Arc::clone(&p.transport)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    fn ordered(&self) -> impl Iterator<Item = &Participant> {
        let mut all: Vec<&Participant> = self.participants.values().collect();
        all.sort_by_key(|p| p.seq);
        all.into_iter()
    }
}
