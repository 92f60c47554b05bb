use crate::room::{RelayStats, RoomManager};
use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone)]
pub struct AppState {
    pub rooms: RoomManager,
}

impl AppState {
    pub fn new(rooms: RoomManager) -> Self {
        Self { rooms }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub time: DateTime<Utc>,
    pub rooms: usize,
    pub connections: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        time: Utc::now(),
        rooms: state.rooms.room_count(),
        connections: state.rooms.connection_count(),
    })
}

pub async fn stats(State(state): State<AppState>) -> Json<RelayStats> {
    Json(state.rooms.stats())
}
