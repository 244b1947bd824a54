//! Room configuration and lifecycle phases.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Configuration shared by every room the registry spawns.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// Delay between the ready quorum and the actual round start.
    /// Tests shrink this; the shipped value is 3 seconds.
    pub countdown: Duration,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            countdown: Duration::from_secs(3),
        }
    }
}

// ---------------------------------------------------------------------------
// RoomPhase
// ---------------------------------------------------------------------------

/// The lifecycle phase of a room.
///
/// ```text
/// Waiting → Starting → InProgress → Voting → Revealed
///    ↑                                          │
///    └────────────────(reset)───────────────────┘
/// ```
///
/// - **Waiting**: pre-game, accepting ready toggles.
/// - **Starting**: ready quorum met, countdown running. The room counts
///   as started from here on, but no impostor or word exists yet.
/// - **InProgress**: impostor and word assigned, turns being taken.
/// - **Voting**: all turns ended, votes coming in.
/// - **Revealed**: impostor shown, round over.
///
/// A reset is valid from any phase and is the only way to play another
/// round in the same room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomPhase {
    Waiting,
    Starting,
    InProgress,
    Voting,
    Revealed,
}

impl RoomPhase {
    /// Returns `true` once the ready quorum has fired — every phase
    /// except `Waiting`.
    pub fn is_started(&self) -> bool {
        !matches!(self, Self::Waiting)
    }

    /// Returns `true` if the room is pre-game.
    pub fn is_waiting(&self) -> bool {
        matches!(self, Self::Waiting)
    }

    /// Returns `true` during the start countdown.
    pub fn is_starting(&self) -> bool {
        matches!(self, Self::Starting)
    }

    /// Returns `true` while turns are being taken.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress)
    }

    /// Returns `true` while votes are being collected.
    pub fn is_voting(&self) -> bool {
        matches!(self, Self::Voting)
    }
}

impl std::fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Waiting => write!(f, "Waiting"),
            Self::Starting => write!(f, "Starting"),
            Self::InProgress => write!(f, "InProgress"),
            Self::Voting => write!(f, "Voting"),
            Self::Revealed => write!(f, "Revealed"),
        }
    }
}
