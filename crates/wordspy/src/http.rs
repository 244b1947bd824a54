//! The two plain-HTTP endpoints: room creation and room status.
//!
//! These are thin glue over the registry — all the interesting state
//! lives in the room actors.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use wordspy_protocol::RoomId;

use crate::server::AppState;

/// Body of `POST /create-room`.
#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    #[serde(rename = "numberOfRounds")]
    pub number_of_rounds: u32,
}

/// Response of `POST /create-room`.
#[derive(Debug, Serialize)]
pub struct CreateRoomResponse {
    pub room_id: RoomId,
}

/// `POST /create-room` — spawns a fresh room and returns its short id.
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateRoomRequest>,
) -> Json<CreateRoomResponse> {
    let room_id = state.registry.create(request.number_of_rounds).await;
    Json(CreateRoomResponse { room_id })
}

/// Status of a room as reported by `GET /room-status/{room_id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    Invalid,
    Started,
    Waiting,
}

/// Response of `GET /room-status/{room_id}`.
#[derive(Debug, Serialize)]
pub struct RoomStatusResponse {
    pub status: RoomStatus,
}

/// `GET /room-status/{room_id}` — whether the room exists and whether
/// its game has started.
pub async fn room_status(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Json<RoomStatusResponse> {
    let room_id = RoomId(room_id);
    let status = match state.registry.get(&room_id).await {
        None => RoomStatus::Invalid,
        Some(handle) => match handle.info().await {
            Ok(info) if info.phase.is_started() => RoomStatus::Started,
            Ok(_) => RoomStatus::Waiting,
            // The actor shut down between lookup and query.
            Err(_) => RoomStatus::Invalid,
        },
    };
    Json(RoomStatusResponse { status })
}
