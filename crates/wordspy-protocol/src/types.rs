//! Core identity and player types that travel on the wire.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// Generated server-side at identify time — never supplied by the client.
/// The newtype wrapper keeps a `PlayerId` from being confused with a
/// `RoomId` or any other string in a signature.
///
/// `#[serde(transparent)]` makes it serialize as the bare string, so the
/// client sees `"d3b0c44a-..."`, not `{"0": "d3b0c44a-..."}`.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Generates a fresh random id (UUIDv4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A short, unique identifier for a room.
///
/// Eight hex characters of a UUIDv4 — short enough to share with friends,
/// unique enough among live rooms (the registry regenerates on the rare
/// collision).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    /// Generates a fresh short room code.
    pub fn generate() -> Self {
        let mut code = Uuid::new_v4().simple().to_string();
        code.truncate(8);
        Self(code)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// One participant's record inside a room.
///
/// This is exactly what gets broadcast in `UPDATED_PLAYERS_LIST` — the
/// connection handle is kept in a separate sender map by the room actor,
/// so serializing a `Player` never leaks transport internals.
///
/// The four booleans are per-round flags; all start false and are cleared
/// again by a room reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: PlayerId,
    pub player_name: String,
    pub player_image_url: String,
    pub is_ready: bool,
    pub turn_ended: bool,
    pub has_voted: bool,
    pub currently_discussing: bool,
}

impl Player {
    /// Creates a new player with all round flags false.
    pub fn new(
        player_id: PlayerId,
        player_name: impl Into<String>,
        player_image_url: impl Into<String>,
    ) -> Self {
        Self {
            player_id,
            player_name: player_name.into(),
            player_image_url: player_image_url.into(),
            is_ready: false,
            turn_ended: false,
            has_voted: false,
            currently_discussing: false,
        }
    }

    /// Clears every per-round flag (used by room reset).
    pub fn reset_flags(&mut self) {
        self.is_ready = false;
        self.turn_ended = false;
        self.has_voted = false;
        self.currently_discussing = false;
    }
}

// ---------------------------------------------------------------------------
// Recipient — who should receive a message?
// ---------------------------------------------------------------------------

/// Specifies who should receive an outbound event.
///
/// Room handlers produce `(Recipient, ServerEvent)` pairs; the broadcast
/// layer resolves each recipient to the concrete set of connections.
/// `AllExcept` is what keeps the impostor's payload distinct from
/// everyone else's during `GAME_START`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// Every player currently in the room.
    All,

    /// One specific player.
    Player(PlayerId),

    /// Everyone except the specified player.
    AllExcept(PlayerId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_serializes_as_plain_string() {
        // `#[serde(transparent)]` means PlayerId("abc") → `"abc"`,
        // not `{"0":"abc"}`. The client expects a plain string.
        let json = serde_json::to_string(&PlayerId::from("abc")).unwrap();
        assert_eq!(json, "\"abc\"");
    }

    #[test]
    fn test_player_id_deserializes_from_plain_string() {
        let pid: PlayerId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(pid, PlayerId::from("abc"));
    }

    #[test]
    fn test_player_id_generate_is_unique() {
        assert_ne!(PlayerId::generate(), PlayerId::generate());
    }

    #[test]
    fn test_room_id_generate_is_short() {
        let id = RoomId::generate();
        assert_eq!(id.0.len(), 8);
        assert!(id.0.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_room_id_generate_is_unique() {
        assert_ne!(RoomId::generate(), RoomId::generate());
    }

    #[test]
    fn test_new_player_has_all_flags_false() {
        let p = Player::new(PlayerId::from("p1"), "Ada", "http://img");
        assert!(!p.is_ready);
        assert!(!p.turn_ended);
        assert!(!p.has_voted);
        assert!(!p.currently_discussing);
    }

    #[test]
    fn test_reset_flags_clears_everything() {
        let mut p = Player::new(PlayerId::from("p1"), "Ada", "http://img");
        p.is_ready = true;
        p.turn_ended = true;
        p.has_voted = true;
        p.currently_discussing = true;

        p.reset_flags();

        assert!(!p.is_ready);
        assert!(!p.turn_ended);
        assert!(!p.has_voted);
        assert!(!p.currently_discussing);
    }

    #[test]
    fn test_player_round_trips_through_json() {
        let p = Player::new(PlayerId::from("p1"), "Ada", "http://img");
        let json = serde_json::to_string(&p).unwrap();
        let decoded: Player = serde_json::from_str(&json).unwrap();
        assert_eq!(p, decoded);
    }
}
