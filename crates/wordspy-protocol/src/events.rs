//! The event catalog: inbound frames from clients and outbound events
//! to clients.
//!
//! Every message on the wire is a JSON text frame of the shape
//! `{"event": "...", "data": {...}}`. Inbound frames are parsed into
//! [`ClientFrame`] first (the event tag stays a string so unknown tags
//! can be logged and ignored instead of failing the whole frame), then
//! resolved to a [`ClientEvent`] by the dispatcher. Outbound events are
//! the typed [`ServerEvent`] enum, which serde serializes straight into
//! the frame shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Player, PlayerId, ProtocolError};

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// Tag of the one event that is valid before a player exists. The join
/// handshake handles it directly; it never reaches the dispatcher.
pub const IDENTIFY: &str = "IDENTIFY";

/// A raw inbound frame: `{event, data}`.
///
/// `data` defaults to JSON null when absent; each handler parses the
/// payload it expects and falls back to safe defaults for missing
/// fields.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientFrame {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl ClientFrame {
    /// Parses a text frame.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the text is not valid JSON
    /// or lacks the `event` field. The connection handler treats that
    /// as a protocol violation and closes the connection.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }
}

/// The recognized post-join event tags, resolved from the frame's
/// `event` string.
///
/// This is the static event registry: one tag per variant, built into
/// the binary. Unknown tags resolve to `None` and are logged and
/// ignored by the dispatcher — no error goes back to the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientEvent {
    SetReady,
    RemoveReady,
    SetName,
    EndTurn,
    SetVote,
    ResetRoom,
}

impl ClientEvent {
    /// Resolves an event tag to its handler variant.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "SET_READY" => Some(Self::SetReady),
            "REMOVE_READY" => Some(Self::RemoveReady),
            "SET_NAME" => Some(Self::SetName),
            "END_TURN" => Some(Self::EndTurn),
            "SET_VOTE" => Some(Self::SetVote),
            "RESET_ROOM" => Some(Self::ResetRoom),
            _ => None,
        }
    }

    /// The wire tag for this event.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::SetReady => "SET_READY",
            Self::RemoveReady => "REMOVE_READY",
            Self::SetName => "SET_NAME",
            Self::EndTurn => "END_TURN",
            Self::SetVote => "SET_VOTE",
            Self::ResetRoom => "RESET_ROOM",
        }
    }
}

/// Payload of the `IDENTIFY` handshake event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentifyPayload {
    #[serde(default)]
    pub player_name: String,
    #[serde(default)]
    pub player_image_url: Option<String>,
}

/// Payload of `SET_NAME`. A missing `new_name` leaves the player's name
/// unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetNamePayload {
    #[serde(default)]
    pub new_name: Option<String>,
}

/// Payload of `SET_VOTE`. A missing `voted` is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetVotePayload {
    #[serde(default)]
    pub voted: Option<PlayerId>,
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// Who won the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    /// Votes against the impostor carried a majority.
    Players,
    /// The impostor escaped detection.
    Impostor,
}

/// One entry of the final vote breakdown in `SHOW_IMPOSTOR`: the accused
/// player and the avatar of everyone who voted for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteTally {
    pub player_id: PlayerId,
    pub voted_this_guy: Vec<String>,
}

/// Every event the server sends to clients.
///
/// `#[serde(tag = "event", content = "data")]` produces the frame shape
/// directly: `{"event": "GAME_START", "data": {"is_impostor": false,
/// "word": "pizza"}}`. Empty-payload events serialize with `"data": {}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerEvent {
    /// The requested room does not exist. The only error ever surfaced
    /// to a client; the connection closes right after.
    InvalidRoomId { message: String },

    /// Full roster snapshot, sent to everyone after any membership or
    /// status change.
    UpdatedPlayersList { players: Vec<Player> },

    /// Private confirmation to a player who just joined, carrying their
    /// own record (including their server-assigned id).
    PlayerJoined { current_player: Player },

    /// All players are ready; the start countdown is running.
    CountdownStart {},

    /// The round has started. Everyone receives the secret word except
    /// the impostor, who receives the decoy clue in `word` — the payload
    /// shape is identical so the impostor's client can't tell by
    /// inspection.
    GameStart { is_impostor: bool, word: String },

    /// Private notification that it is this player's turn to speak.
    StartTurn {},

    /// Sent with no `votes` when all turns have ended and voting opens;
    /// sent with the current tally map (accused id → true) after each
    /// vote lands.
    VotingStart {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        votes: Option<BTreeMap<PlayerId, bool>>,
    },

    /// Round over: the impostor, the winner, the full vote breakdown,
    /// and the secret word.
    ShowImpostor {
        impostor: PlayerId,
        winner: Winner,
        votes: Vec<VoteTally>,
        word: String,
    },

    /// A player's connection dropped and they were removed.
    PlayerDisconnect { disconnected_user: PlayerId },
}

impl ServerEvent {
    /// Serializes the event into a text frame.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }
}

// =========================================================================
// Tests
// =========================================================================
