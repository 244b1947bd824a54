//! Room registry: creates, looks up, and reaps rooms.
//!
//! The registry is owned by the server state and passed by reference to
//! request handlers — there is no process-wide global. Internally it's
//! a mutex-guarded map of room handles; the rooms themselves run as
//! independent actor tasks.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use wordspy_protocol::{PlayerId, RoomId};
use wordspy_words::WordDeck;

use crate::room::spawn_room;
use crate::{RoomConfig, RoomHandle};

/// All live rooms, keyed by room id.
///
/// Rooms are created by the room-creation endpoint and removed when
/// their last player disconnects. Nothing is persisted — restart the
/// process and every room is gone.
pub struct RoomRegistry {
    rooms: Mutex<HashMap<RoomId, RoomHandle>>,
    deck: Arc<WordDeck>,
    config: RoomConfig,
}

impl RoomRegistry {
    /// Creates an empty registry. Every room it spawns shares the given
    /// deck and config.
    pub fn new(deck: Arc<WordDeck>, config: RoomConfig) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            deck,
            config,
        }
    }

    /// Creates a new room and returns its id.
    ///
    /// Ids are short, so a collision with a live room is possible in
    /// principle — the loop just draws again.
    pub async fn create(&self, rounds: u32) -> RoomId {
        let mut rooms = self.rooms.lock().await;
        loop {
            let room_id = RoomId::generate();
            if rooms.contains_key(&room_id) {
                continue;
            }
            let handle = spawn_room(
                room_id.clone(),
                rounds,
                self.config.clone(),
                Arc::clone(&self.deck),
            );
            rooms.insert(room_id.clone(), handle);
            tracing::info!(%room_id, rounds, "room created");
            return room_id;
        }
    }

    /// Looks up a live room.
    pub async fn get(&self, room_id: &RoomId) -> Option<RoomHandle> {
        self.rooms.lock().await.get(room_id).cloned()
    }

    /// Removes a player from a room; if that empties the room, removes
    /// the room itself and shuts its actor down (aborting any pending
    /// start countdown).
    pub async fn leave(&self, room_id: &RoomId, player_id: &PlayerId) {
        let Some(handle) = self.get(room_id).await else {
            return;
        };

        match handle.leave(player_id.clone()).await {
            Ok(0) => self.remove(room_id).await,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(%room_id, %player_id, error = %e, "leave failed");
            }
        }
    }

    /// Removes a room and shuts down its actor.
    pub async fn remove(&self, room_id: &RoomId) {
        let handle = self.rooms.lock().await.remove(room_id);
        if let Some(handle) = handle {
            let _ = handle.shutdown().await;
            tracing::info!(%room_id, "room removed");
        }
    }

    /// Number of live rooms.
    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }
}
