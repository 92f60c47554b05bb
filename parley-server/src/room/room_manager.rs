use crate::config::RoomConfig;
use crate::room::{Room, RoomCommand};
use crate::transport::{Transport, TransportEvent};
use dashmap::DashMap;
use parley_core::{ConnectionId, RoomId};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Counters a room publishes for the manager.
#[derive(Default)]
pub(crate) struct RoomShared {
    /// Attached transports that have not delivered their terminal event yet.
    /// Incremented by the manager under the map entry lock, decremented by the room.
    pub(crate) connections: AtomicUsize,
    pub(crate) participants: AtomicUsize,
}

/// Sending side of one room's queue.
#[derive(Clone)]
pub struct RoomHandle {
    tx: mpsc::Sender<RoomCommand>,
    shared: Arc<RoomShared>,
}

impl RoomHandle {
    /// Returns `false` once the room has shut down.
    pub async fn dispatch(&self, event: TransportEvent) -> bool {
        self.tx.send(RoomCommand::Transport(event)).await.is_ok()
    }

    pub async fn message(&self, connection: ConnectionId, raw: impl Into<String>) -> bool {
        self.dispatch(TransportEvent::Message(connection, raw.into()))
            .await
    }

    pub async fn closed(&self, connection: ConnectionId) -> bool {
        self.dispatch(TransportEvent::Closed(connection)).await
    }

    pub async fn errored(&self, connection: ConnectionId, reason: impl Into<String>) -> bool {
        self.dispatch(TransportEvent::Error(connection, reason.into()))
            .await
    }

    pub fn participants(&self) -> usize {
        self.shared.participants.load(Ordering::Acquire)
    }

    pub fn connections(&self) -> usize {
        self.shared.connections.load(Ordering::Acquire)
    }

    pub(crate) fn same_room(&self, shared: &Arc<RoomShared>) -> bool {
        Arc::ptr_eq(&self.shared, shared)
    }
}

/// Snapshot served on `/stats`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RelayStats {
    pub rooms: usize,
    /// Joined participants across all rooms.
    pub clients: usize,
    /// Registered participants per room.
    pub details: BTreeMap<String, usize>,
}

/// Finds or lazily spawns the actor for a room id.
#[derive(Clone)]
pub struct RoomManager {
    rooms: Arc<DashMap<RoomId, RoomHandle>>,
    config: RoomConfig,
}

impl RoomManager {
    pub fn new(config: RoomConfig) -> Self {
        Self {
            rooms: Arc::new(DashMap::new()),
            config,
        }
    }

    /// Attach `transport` to the room named `room_id`, creating the room if needed.
    ///
    /// The returned handle is where the transport's callbacks must be delivered.
    pub async fn accept_connection(
        &self,
        room_id: impl Into<RoomId>,
        transport: Arc<dyn Transport>,
    ) -> RoomHandle {
        let room_id = room_id.into();
        let mut command = RoomCommand::Attach { transport };

        loop {
            let handle = {
                let entry = self
                    .rooms
                    .entry(room_id.clone())
                    .or_insert_with(|| self.spawn_room(&room_id));
                entry.shared.connections.fetch_add(1, Ordering::AcqRel);
                entry.clone()
            };

            match handle.tx.send(command).await {
                Ok(()) => return handle,
                Err(mpsc::error::SendError(returned)) => {
                    debug!(room = %room_id, "Room shut down during attach, retrying");
                    self.rooms
                        .remove_if(&room_id, |_, current| current.same_room(&handle.shared));
                    command = returned;
                }
            }
        }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn room(&self, room_id: &str) -> Option<RoomHandle> {
        self.rooms.get(room_id).map(|entry| entry.clone())
    }

    /// Attached sockets across all rooms, joined or not.
    pub fn connection_count(&self) -> usize {
        self.rooms.iter().map(|entry| entry.value().connections()).sum()
    }

    pub fn stats(&self) -> RelayStats {
        let mut details = BTreeMap::new();
        let mut clients = 0;

        for entry in self.rooms.iter() {
            let participants = entry.value().participants();
            clients += participants;
            details.insert(entry.key().to_string(), participants);
        }

        RelayStats {
            rooms: details.len(),
            clients,
            details,
        }
    }

    fn spawn_room(&self, room_id: &RoomId) -> RoomHandle {
        info!(room = %room_id, "Creating new room");

        let (tx, rx) = mpsc::channel(self.config.queue_capacity.max(1));
        let shared = Arc::new(RoomShared::default());

        let room = Room::new(
            room_id.clone(),
            rx,
            self.config.max_participants,
            Arc::clone(&shared),
            Arc::clone(&self.rooms),
        );
        tokio::spawn(room.run());

        RoomHandle { tx, shared }
    }
}
