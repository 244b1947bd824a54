//! Server configuration.

use std::path::PathBuf;

use wordspy_room::RoomConfig;

/// Avatar assigned to players who identify without one.
pub const DEFAULT_PLAYER_IMAGE: &str =
    "https://blog.spoongraphics.co.uk/wp-content/uploads/2017/vector-characters/24.png";

/// Settings for a Wordspy server instance.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind. Use port 0 in tests to get an ephemeral port.
    pub bind_addr: String,

    /// Directory holding `word_list.json`, `adjectives.txt`, and
    /// `nouns.txt`.
    pub static_dir: PathBuf,

    /// The browser origin allowed by CORS.
    pub allowed_origin: String,

    /// Settings applied to every room.
    pub room: RoomConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            static_dir: PathBuf::from("static"),
            allowed_origin: "http://localhost:5173".to_string(),
            room: RoomConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Sets the bind address.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the static content directory.
    pub fn static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    /// Sets the room configuration.
    pub fn room(mut self, room: RoomConfig) -> Self {
        self.room = room;
        self
    }
}
