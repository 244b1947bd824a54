//! Room lifecycle, game rules, and broadcast for Wordspy.
//!
//! Each room runs as an isolated Tokio task (actor model) owning its
//! roster, phase, votes, and impostor assignment. The actor is the only
//! writer of room state, which gives the serializability the game rules
//! assume without a single lock around gameplay.
//!
//! # Key types
//!
//! - [`GameState`] — the pure state machine (roster, turns, votes,
//!   winner)
//! - [`RoomRegistry`] — creates rooms, routes lookups, reaps empty rooms
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`RoomPhase`] — lifecycle phases (`Waiting` → … → `Revealed`)
//! - [`RoomConfig`] — room settings (start countdown)

mod config;
mod error;
mod registry;
mod room;
mod state;

pub use config::{RoomConfig, RoomPhase};
pub use error::RoomError;
pub use registry::RoomRegistry;
pub use room::{PlayerSender, RoomHandle, RoomInfo};
pub use state::GameState;
