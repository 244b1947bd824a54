//! Error types for the room layer.

use wordspy_protocol::RoomId;

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room's command channel is closed — the actor has shut down
    /// or its queue is gone.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}
