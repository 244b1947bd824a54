//! Per-connection WebSocket handler: room validation, the identify
//! handshake, and the inbound event loop.
//!
//! Each accepted socket runs this flow:
//!   1. Validate the room id from the path — unknown rooms get an
//!      `INVALID_ROOM_ID` notification and the connection closes.
//!   2. The first frame must be `IDENTIFY` — anything else (or a frame
//!      that doesn't parse) closes the connection silently.
//!   3. The new player joins the room; a writer task starts draining
//!      the player's outbound channel into the socket.
//!   4. Loop: read frames, hand them to the room actor. Malformed JSON
//!      is a protocol violation and ends the loop.
//!   5. Any exit — clean close, transport error, violation — removes
//!      the player and lets the registry reap the room if it emptied.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::Response;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use wordspy_protocol::{
    ClientFrame, IdentifyPayload, Player, PlayerId, RoomId, ServerEvent, IDENTIFY,
};
use wordspy_words::NameGenerator;

use crate::config::DEFAULT_PLAYER_IMAGE;
use crate::server::AppState;

/// `GET /ws/game/{room_id}` — upgrades to a WebSocket and runs the
/// connection to completion.
pub async fn ws_upgrade(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, RoomId(room_id)))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, room_id: RoomId) {
    // --- Step 1: the room must exist ---
    let Some(room) = state.registry.get(&room_id).await else {
        tracing::info!(%room_id, "connection to unknown room");
        reject_invalid_room(socket).await;
        return;
    };

    let (mut sink, mut stream) = socket.split();

    // --- Step 2: identify ---
    let Some(player) = identify(&mut stream, &state.names).await else {
        tracing::info!(%room_id, "identify failed, closing");
        let _ = sink.close().await;
        return;
    };
    let player_id = player.player_id.clone();

    // --- Step 3: join and start the writer ---
    let (tx, rx) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_outbound(sink, rx, player_id.clone()));

    if room.join(player, tx).await.is_err() {
        // The room died between validation and join.
        writer.abort();
        return;
    }
    tracing::info!(%room_id, %player_id, "player connected");

    // --- Step 4: inbound loop ---
    read_inbound(&mut stream, &room, &player_id).await;

    // --- Step 5: cleanup ---
    tracing::info!(%room_id, %player_id, "connection closed");
    state.registry.leave(&room_id, &player_id).await;
    // The actor dropped our sender on leave; the writer drains what's
    // left and exits on its own.
}

/// Sends the invalid-room notification and closes. The one error a
/// client ever sees.
async fn reject_invalid_room(mut socket: WebSocket) {
    let event = ServerEvent::InvalidRoomId {
        message: "Invalid room id!".to_string(),
    };
    match event.encode() {
        Ok(text) => {
            let _ = socket.send(Message::Text(text)).await;
        }
        Err(e) => tracing::error!(error = %e, "failed to encode rejection"),
    }
    let _ = socket.close().await;
}

/// Runs the identify handshake: the first frame must be a well-formed
/// `IDENTIFY`. Returns the new player record, or `None` if the
/// connection should close without one.
async fn identify(
    stream: &mut SplitStream<WebSocket>,
    names: &NameGenerator,
) -> Option<Player> {
    let text = match stream.next().await? {
        Ok(Message::Text(text)) => text,
        _ => return None,
    };
    let frame = ClientFrame::parse(&text).ok()?;
    if frame.event != IDENTIFY {
        tracing::debug!(event = %frame.event, "first event was not IDENTIFY");
        return None;
    }
    let payload: IdentifyPayload = serde_json::from_value(frame.data).ok()?;

    let player_name = if payload.player_name.trim().is_empty() {
        names.generate()
    } else {
        payload.player_name
    };
    let player_image_url = payload
        .player_image_url
        .unwrap_or_else(|| DEFAULT_PLAYER_IMAGE.to_string());

    Some(Player::new(PlayerId::generate(), player_name, player_image_url))
}

/// Reads frames and forwards them to the room actor until the
/// connection ends or violates the protocol.
async fn read_inbound(
    stream: &mut SplitStream<WebSocket>,
    room: &wordspy_room::RoomHandle,
    player_id: &PlayerId,
) {
    while let Some(message) = stream.next().await {
        let text = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
            // Binary frames aren't part of the protocol; a close frame
            // or transport error ends the session either way.
            Ok(Message::Binary(_)) | Ok(Message::Close(_)) | Err(_) => break,
        };

        let frame = match ClientFrame::parse(&text) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "malformed frame, closing");
                break;
            }
        };

        if room.event(player_id.clone(), frame).await.is_err() {
            break;
        }
    }
}

/// Drains a player's outbound channel into their socket. A failed send
/// is logged and ends the writer; it never affects other players.
async fn write_outbound(
    mut sink: SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<ServerEvent>,
    player_id: PlayerId,
) {
    while let Some(event) = rx.recv().await {
        let text = match event.encode() {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(%player_id, error = %e, "failed to encode event");
                continue;
            }
        };
        if let Err(e) = sink.send(Message::Text(text)).await {
            tracing::warn!(%player_id, error = %e, "delivery failed");
            break;
        }
    }
    let _ = sink.close().await;
}
