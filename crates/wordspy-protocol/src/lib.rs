//! Wire protocol for Wordspy.
//!
//! This crate defines the "language" that game clients and the server
//! speak:
//!
//! - **Identity** ([`PlayerId`], [`RoomId`]) — opaque ids that travel
//!   on the wire.
//! - **Types** ([`Player`], [`Recipient`]) — the player record that gets
//!   broadcast, and the addressing enum for outbound fan-out.
//! - **Events** ([`ClientFrame`], [`ClientEvent`], [`ServerEvent`]) —
//!   the `{event, data}` text frames exchanged over the connection.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while encoding
//!   or decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between the socket (raw text frames) and the
//! room layer (game state). It doesn't know about connections or rooms —
//! it only knows how to shape and parse messages.
//!
//! ```text
//! Socket (text) → Protocol (frames) → Room (game state)
//! ```

mod error;
mod events;
mod types;

pub use error::ProtocolError;
pub use events::{
    ClientEvent, ClientFrame, IdentifyPayload, ServerEvent, SetNamePayload,
    SetVotePayload, VoteTally, Winner, IDENTIFY,
};
pub use types::{Player, PlayerId, Recipient, RoomId};
