use anyhow::{Result, bail};
use std::net::SocketAddr;

/// Per-room knobs, shared by every room the manager spawns.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// `None` means unlimited.
    pub max_participants: Option<usize>,
    /// Capacity of each room's command queue.
    pub queue_capacity: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            max_participants: None,
            queue_capacity: 256,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind: SocketAddr,
    /// Prefix of the WebSocket route; the room id is the next path segment.
    pub ws_path: String,
    /// `None` allows any origin.
    pub cors_origin: Option<String>,
    pub room: RoomConfig,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8888)),
            ws_path: "/ws".to_string(),
            cors_origin: None,
            room: RoomConfig::default(),
        }
    }
}

impl RelayConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.ws_path.starts_with('/') {
            bail!("ws path must start with '/': {}", self.ws_path);
        }
        if matches!(self.ws_path.trim_end_matches('/'), "/health" | "/stats") {
            bail!("ws path collides with a built-in route: {}", self.ws_path);
        }
        if self.room.queue_capacity == 0 {
            bail!("room queue capacity must be greater than zero");
        }
        if self.room.max_participants == Some(0) {
            bail!("max participants must be greater than zero");
        }
        Ok(())
    }
}
