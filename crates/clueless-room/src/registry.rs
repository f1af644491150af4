//! Room registry: maps game ids to running rooms.

use std::collections::HashMap;
use std::sync::Arc;

use clueless_protocol::RoomId;
use tokio::sync::Mutex;

use crate::room::spawn_room;
use crate::{GameStore, RoomConfig, RoomError, RoomHandle};

#[derive(Default)]
struct Rooms {
    live: HashMap<RoomId, RoomHandle>,
    /// Evicted rooms whose actors may still be writing to the store.
    retiring: HashMap<RoomId, RoomHandle>,
}

/// Tracks every live room, keyed by game id.
///
/// Rooms are created on first use and live until evicted. Lookup and
/// creation happen under one lock acquisition, so concurrent first joins
/// for the same id always land in the same room. The lock is held only
/// for the map operation, never across a call into a room.
///
/// A room started for an id whose previous actor is stopping (evicted, or
/// stopped on its own) loads from the store only after that actor's
/// writes have landed.
pub struct RoomRegistry<S: GameStore> {
    rooms: Mutex<Rooms>,
    store: Arc<S>,
    config: RoomConfig,
}

impl<S: GameStore> RoomRegistry<S> {
    pub fn new(store: Arc<S>, config: RoomConfig) -> Self {
        Self {
            rooms: Mutex::new(Rooms::default()),
            store,
            config,
        }
    }

    /// The store rooms load from and write to.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Returns the room for `room_id`, starting it if it isn't running.
    ///
    /// A room whose actor has stopped is replaced by a fresh one, which
    /// reloads its state from the store.
    pub async fn get_or_create(&self, room_id: RoomId) -> RoomHandle {
        let mut rooms = self.rooms.lock().await;
        if let Some(handle) = rooms.live.get(&room_id) {
            if !handle.is_closed() {
                return handle.clone();
            }
            tracing::warn!(%room_id, "room actor had stopped, restarting");
        }

        let predecessor = match rooms.live.remove(&room_id) {
            Some(stopped) => Some(stopped),
            None => rooms.retiring.remove(&room_id),
        };
        let handle = spawn_room(
            room_id,
            self.config.clone(),
            Arc::clone(&self.store),
            predecessor,
        );
        rooms.live.insert(room_id, handle.clone());
        tracing::info!(%room_id, "room created");
        handle
    }

    pub async fn get(&self, room_id: RoomId) -> Option<RoomHandle> {
        self.rooms.lock().await.live.get(&room_id).cloned()
    }

    /// Stops a room and forgets it, returning once everything the room
    /// committed is in the store. Its stored rows are kept, so the next
    /// join brings it back where it left off.
    pub async fn evict(&self, room_id: RoomId) -> Result<(), RoomError> {
        let handle = {
            let mut rooms = self.rooms.lock().await;
            let handle = rooms
                .live
                .remove(&room_id)
                .ok_or(RoomError::NotFound(room_id))?;
            rooms.retiring.insert(room_id, handle.clone());
            handle
        };

        handle.shutdown().await;

        let mut rooms = self.rooms.lock().await;
        if rooms
            .retiring
            .get(&room_id)
            .is_some_and(|retiring| retiring.same_room(&handle))
        {
            rooms.retiring.remove(&room_id);
        }
        tracing::info!(%room_id, "room evicted");
        Ok(())
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.live.len()
    }

    pub async fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.lock().await.live.keys().copied().collect()
    }
}
