//! Room HTTP endpoints
//!
//! Thin surface over the registry: create a room, read a snapshot. The
//! real-time traffic all goes over the WebSocket route.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Json,
};
use serde::Deserialize;

use roomcast_core::RoomSnapshot;

use crate::state::AppState;

/// Greeting page
pub async fn index() -> Html<&'static str> {
    Html("<h1>Roomcast</h1>")
}

#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    pub room: String,
    /// Sent by clients alongside the room id; creation does not use it.
    #[serde(default)]
    pub nickname: String,
}

/// Create a room if it does not already exist
pub async fn create_room(
    State(state): State<AppState>,
    Json(req): Json<CreateRoomRequest>,
) -> StatusCode {
    state.registry.ensure_room(&req.room).await;
    StatusCode::NO_CONTENT
}

/// Read a room's members and messages. Unknown rooms read as empty, never
/// as an error.
pub async fn get_room(State(state): State<AppState>, Path(id): Path<String>) -> Json<RoomSnapshot> {
    Json(state.registry.snapshot(&id).await)
}
