use crate::room::room::{Room, encode};
use parley_core::{
    ConnectionId, Inbound, ParticipantId, ProtocolError, RosterEntry, ServerMessage, SignalKind,
    forward,
};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

impl Room {
    /// Classify one raw frame from `connection` and dispatch it.
    pub(super) async fn handle_message(&mut self, connection: ConnectionId, raw: &str) {
        match Inbound::parse(raw) {
            Ok(Inbound::Join { from, role }) => self.handle_join(connection, from, role).await,
            Ok(Inbound::Leave) => self.handle_leave(connection).await,
            Ok(Inbound::Signal { kind, to, body }) => {
                self.handle_signal(connection, kind, to, body).await
            }
            Err(e) => {
                warn!(room = %self.id, %connection, "Rejected message: {}", e);
                self.reply(connection, &ServerMessage::from(&e)).await;
            }
        }
    }

    async fn handle_join(&mut self, connection: ConnectionId, from: ParticipantId, role: String) {
        let Some(transport) = self.attached.get(&connection).cloned() else {
            warn!(room = %self.id, %connection, "Join from unknown transport");
            return;
        };

        let previous = self.registry.lookup(connection).cloned();

        if let Some(max) = self.max_participants {
            let replacing = previous.is_some() || self.registry.participant(&from).is_some();
            if !replacing && self.registry.len() >= max {
                warn!(room = %self.id, participant = %from, max, "Room is full");
                self.reply(connection, &ServerMessage::from(&ProtocolError::RoomFull))
                    .await;
                return;
            }
        }

        // Same socket switching identity: drop the old one but keep the socket.
        if let Some(previous) = previous.filter(|p| p != &from) {
            if let Some(old) = self.registry.unregister(&previous) {
                let notice = ServerMessage::user_left(old.id, old.role);
                if let Some(payload) = encode(&notice) {
                    self.broadcast(&payload, Some(connection)).await;
                }
            }
        }

        // Last join wins: the stale session is torn down as if it had disconnected.
        let stale = self
            .registry
            .participant(&from)
            .is_some_and(|p| p.connection() != connection);
        if stale {
            info!(room = %self.id, participant = %from, "Replacing existing session");
            self.remove_participant(&from).await;
        }

        let users: Vec<RosterEntry> = self
            .registry
            .list_others(Some(&from))
            .into_iter()
            .map(RosterEntry::from)
            .collect();

        self.registry
            .register(from.clone(), role.clone(), transport)
            .await;

        info!(
            room = %self.id,
            participant = %from,
            %role,
            participants = self.registry.len(),
            "Participant joined"
        );

        if let Some(payload) = encode(&ServerMessage::user_joined(from, role)) {
            self.broadcast(&payload, Some(connection)).await;
        }
        self.reply(connection, &ServerMessage::room_state(users))
            .await;
    }

    async fn handle_leave(&mut self, connection: ConnectionId) {
        match self.registry.lookup(connection).cloned() {
            Some(id) => self.remove_participant(&id).await,
            None => debug!(room = %self.id, %connection, "Leave from transport that never joined"),
        }
    }

    async fn handle_signal(
        &mut self,
        connection: ConnectionId,
        kind: SignalKind,
        to: Option<ParticipantId>,
        body: Map<String, Value>,
    ) {
        // Identity comes from the transport, never from the frame.
        let Some(from) = self.registry.lookup(connection).cloned() else {
            warn!(room = %self.id, %connection, kind = kind.as_str(), "Signal before join");
            self.reply(connection, &ServerMessage::from(&ProtocolError::NotJoined))
                .await;
            return;
        };

        let Some(payload) = encode(&forward(kind, body, &from)) else {
            return;
        };

        match to {
            Some(target) => {
                debug!(room = %self.id, participant = %from, to = %target, kind = kind.as_str(), "Relaying");
                self.unicast(&target, payload).await;
            }
            None => {
                debug!(room = %self.id, participant = %from, kind = kind.as_str(), "Broadcasting");
                self.broadcast(&payload, Some(connection)).await;
            }
        }
    }
}
