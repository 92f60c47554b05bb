use crate::room::registry::ConnectionRegistry;
use crate::room::room_command::RoomCommand;
use crate::room::room_manager::{RoomHandle, RoomShared};
use crate::transport::{Transport, TransportEvent};
use dashmap::DashMap;
use parley_core::{ConnectionId, ParticipantId, RoomId, ServerMessage};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// The actor owning one room's state.
///
/// Every command is handled to completion before the next is read, so the registry
/// needs no locking. Rooms never share state with each other.
pub struct Room {
    pub(super) id: RoomId,

    /// Registered participants, each owning its transport.
    pub(super) registry: ConnectionRegistry,

    /// Every transport attached to this room and not yet terminated, joined or not.
    pub(super) attached: HashMap<ConnectionId, Arc<dyn Transport>>,

    pub(super) max_participants: Option<usize>,

    command_rx: mpsc::Receiver<RoomCommand>,
    shared: Arc<RoomShared>,
    rooms: Arc<DashMap<RoomId, RoomHandle>>,
}

impl Room {
    pub(crate) fn new(
        id: RoomId,
        command_rx: mpsc::Receiver<RoomCommand>,
        max_participants: Option<usize>,
        shared: Arc<RoomShared>,
        rooms: Arc<DashMap<RoomId, RoomHandle>>,
    ) -> Self {
        Self {
            id,
            registry: ConnectionRegistry::new(),
            attached: HashMap::new(),
            max_participants,
            command_rx,
            shared,
            rooms,
        }
    }

    /// Event loop. Spawned by the manager; returns once the room has evicted itself.
    pub async fn run(mut self) {
        info!(room = %self.id, "Room event loop started");

        while let Some(cmd) = self.command_rx.recv().await {
            let terminal = matches!(&cmd, RoomCommand::Transport(e) if e.is_terminal());

            self.handle_command(cmd).await;
            self.shared
                .participants
                .store(self.registry.len(), Ordering::Release);

            if terminal && self.try_evict() {
                info!(room = %self.id, "Room is empty, evicted");
                break;
            }
        }

        info!(room = %self.id, "Room event loop finished");
    }

    async fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Attach { transport } => {
                debug!(room = %self.id, connection = %transport.id(), "Transport attached");
                self.attached.insert(transport.id(), transport);
            }

            RoomCommand::Transport(TransportEvent::Message(connection, raw)) => {
                self.handle_message(connection, &raw).await;
            }

            RoomCommand::Transport(TransportEvent::Closed(connection)) => {
                debug!(room = %self.id, %connection, "Transport closed");
                self.handle_disconnect(connection).await;
            }

            RoomCommand::Transport(TransportEvent::Error(connection, reason)) => {
                warn!(room = %self.id, %connection, %reason, "Transport error");
                self.handle_disconnect(connection).await;
            }
        }
    }

    /// Terminal event for a connection: drop its identity and forget the transport.
    async fn handle_disconnect(&mut self, connection: ConnectionId) {
        if let Some(id) = self.registry.lookup(connection).cloned() {
            self.remove_participant(&id).await;
        }

        if let Some(transport) = self.attached.remove(&connection) {
            transport.close().await;
            self.shared.connections.fetch_sub(1, Ordering::AcqRel);
        }
    }

    fn try_evict(&self) -> bool {
        if !self.attached.is_empty() {
            return false;
        }

        self.rooms
            .remove_if(&self.id, |_, handle| {
                handle.same_room(&self.shared) && handle.connections() == 0
            })
            .is_some()
    }

    /// Unregister, close, and announce `user-left` to whoever remains.
    ///
    /// Recipients that fail while being told are removed the same way.
    pub(super) async fn remove_participant(&mut self, id: &ParticipantId) {
        let mut queue = vec![id.clone()];

        while let Some(id) = queue.pop() {
            let Some(participant) = self.registry.unregister(&id) else {
                continue;
            };

            info!(
                room = %self.id,
                participant = %participant.id,
                remaining = self.registry.len(),
                "Participant left"
            );
            participant.transport().close().await;

            let notice = ServerMessage::user_left(participant.id.clone(), participant.role.clone());
            if let Some(payload) = encode(&notice) {
                queue.extend(self.fan_out(&payload, None).await);
            }
        }
    }

    /// Send to every registered participant except the one on `exclude`.
    ///
    /// A failed recipient does not stop the fan-out; it is disconnected afterwards.
    pub(super) async fn broadcast(&mut self, payload: &str, exclude: Option<ConnectionId>) {
        for id in self.fan_out(payload, exclude).await {
            self.remove_participant(&id).await;
        }
    }

    /// Deliver to one participant. Unknown targets are dropped silently.
    pub(super) async fn unicast(&mut self, target: &ParticipantId, payload: String) {
        let Some(transport) = self.registry.get(target) else {
            debug!(room = %self.id, participant = %target, "Unicast target not connected, dropping");
            return;
        };

        if let Err(e) = transport.send(payload).await {
            warn!(room = %self.id, participant = %target, "Send failed: {}", e);
            self.remove_participant(target).await;
        }
    }

    /// Reply on a connection whether or not it has joined.
    pub(super) async fn reply(&mut self, connection: ConnectionId, msg: &ServerMessage) {
        let Some(transport) = self.attached.get(&connection).cloned() else {
            return;
        };
        let Some(payload) = encode(msg) else {
            return;
        };

        if let Err(e) = transport.send(payload).await {
            warn!(room = %self.id, %connection, "Reply failed: {}", e);
            match self.registry.lookup(connection).cloned() {
                Some(id) => self.remove_participant(&id).await,
                None => transport.close().await,
            }
        }
    }

    async fn fan_out(&self, payload: &str, exclude: Option<ConnectionId>) -> Vec<ParticipantId> {
        let mut failed = Vec::new();

        for (id, transport) in self.registry.recipients(exclude) {
            if let Err(e) = transport.send(payload.to_string()).await {
                warn!(room = %self.id, participant = %id, "Broadcast send failed: {}", e);
                failed.push(id);
            }
        }

        failed
    }
}

pub(super) fn encode<T: Serialize>(msg: &T) -> Option<String> {
    match serde_json::to_string(msg) {
        Ok(json) => Some(json),
        Err(e) => {
            error!("Failed to serialize envelope: {}", e);
            None
        }
    }
}
