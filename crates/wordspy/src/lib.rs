//! # Wordspy
//!
//! A real-time impostor word-game backend. Players join a room over a
//! WebSocket, ready up, take turns describing a secret word — except
//! one of them, the impostor, who only knows a decoy clue — and then
//! vote on who the impostor is.
//!
//! This crate is the server shell: the HTTP endpoints for room
//! creation and status, the WebSocket endpoint and its per-connection
//! handler, CORS for the browser client, and process bootstrap. The
//! game itself lives in `wordspy-room`; the wire format in
//! `wordspy-protocol`; the word deck and name lists in `wordspy-words`.

mod config;
mod error;
pub mod handler;
pub mod http;
mod server;

pub use config::{ServerConfig, DEFAULT_PLAYER_IMAGE};
pub use error::ServerError;
pub use server::{AppState, WordspyServer};
