//! The persistence collaborator.
//!
//! Rooms don't own a database. They read their roster when they start and
//! push every accepted change through [`GameStore`]. Deployments with a real
//! database implement the trait over it; [`MemoryStore`] keeps everything in
//! process and is what the binary and the tests use.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use clueless_board::{Character, Space};
use clueless_protocol::{PlayerEntry, PlayerId, RoomId};
use clueless_session::Identity;
use tokio::sync::Mutex;

/// Errors reported by a [`GameStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("room {0} does not exist")]
    RoomNotFound(RoomId),

    #[error("player {0} does not exist")]
    PlayerNotFound(PlayerId),

    /// The backing store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A player's persisted row: one per identity per room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub username: String,
    /// `None` until the player picks a suspect.
    pub character: Option<Character>,
    /// `None` until a character (and so a starting space) is assigned.
    pub location: Option<Space>,
    /// Set by the first accepted move and never cleared.
    pub has_moved: bool,
    /// Position in the room's turn order, assigned by the room when the
    /// player first joins it. `None` for a row created by a join that never
    /// reached the room.
    pub seat: Option<u32>,
}

impl PlayerRecord {
    /// A fresh row: no character, no location.
    pub fn new(id: PlayerId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            character: None,
            location: None,
            has_moved: false,
            seat: None,
        }
    }

    /// The row as it appears in a `player_list` event.
    pub fn entry(&self) -> PlayerEntry {
        PlayerEntry {
            id: self.id,
            character: self.character.map(|c| c.name().to_string()),
            location: self.location.map(|s| s.name().to_string()),
            has_moved: self.has_moved,
            username: self.username.clone(),
        }
    }
}

/// Reads and writes room and player rows.
///
/// Rows may be listed in any order; the room orders its roster by
/// [`PlayerRecord::seat`].
pub trait GameStore: Send + Sync + 'static {
    fn get_or_create_room(
        &self,
        room_id: RoomId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Returns the identity's row in the room, creating an empty one on
    /// first join. The room must exist.
    fn get_or_create_player(
        &self,
        identity: &Identity,
        room_id: RoomId,
    ) -> impl Future<Output = Result<PlayerRecord, StoreError>> + Send;

    fn read_player(
        &self,
        identity: &Identity,
        room_id: RoomId,
    ) -> impl Future<Output = Result<Option<PlayerRecord>, StoreError>> + Send;

    /// Overwrites character, location, has-moved, and seat for an existing
    /// row.
    fn write_player(
        &self,
        room_id: RoomId,
        player: &PlayerRecord,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn read_turn_pointer(
        &self,
        room_id: RoomId,
    ) -> impl Future<Output = Result<Option<PlayerId>, StoreError>> + Send;

    fn write_turn_pointer(
        &self,
        room_id: RoomId,
        player_id: Option<PlayerId>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn list_players(
        &self,
        room_id: RoomId,
    ) -> impl Future<Output = Result<Vec<PlayerRecord>, StoreError>> + Send;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct StoredRoom {
    turn: Option<PlayerId>,
    players: Vec<PlayerRecord>,
}

/// A [`GameStore`] backed by a map in process memory.
///
/// Player ids are allocated from one counter for the whole store, so they
/// are unique across rooms and increase with creation order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rooms: Mutex<HashMap<RoomId, StoredRoom>>,
    next_player_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameStore for MemoryStore {
    async fn get_or_create_room(&self, room_id: RoomId) -> Result<(), StoreError> {
        self.rooms.lock().await.entry(room_id).or_default();
        Ok(())
    }

    async fn get_or_create_player(
        &self,
        identity: &Identity,
        room_id: RoomId,
    ) -> Result<PlayerRecord, StoreError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(&room_id)
            .ok_or(StoreError::RoomNotFound(room_id))?;

        if let Some(existing) = room
            .players
            .iter()
            .find(|p| p.username == identity.username)
        {
            return Ok(existing.clone());
        }

        let id = PlayerId(self.next_player_id.fetch_add(1, Ordering::Relaxed) + 1);
        let record = PlayerRecord::new(id, identity.username.clone());
        room.players.push(record.clone());
        Ok(record)
    }

    async fn read_player(
        &self,
        identity: &Identity,
        room_id: RoomId,
    ) -> Result<Option<PlayerRecord>, StoreError> {
        let rooms = self.rooms.lock().await;
        let room = rooms.get(&room_id).ok_or(StoreError::RoomNotFound(room_id))?;
        Ok(room
            .players
            .iter()
            .find(|p| p.username == identity.username)
            .cloned())
    }

    async fn write_player(
        &self,
        room_id: RoomId,
        player: &PlayerRecord,
    ) -> Result<(), StoreError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(&room_id)
            .ok_or(StoreError::RoomNotFound(room_id))?;
        let row = room
            .players
            .iter_mut()
            .find(|p| p.id == player.id)
            .ok_or(StoreError::PlayerNotFound(player.id))?;
        row.character = player.character;
        row.location = player.location;
        row.has_moved = player.has_moved;
        row.seat = player.seat;
        Ok(())
    }

    async fn read_turn_pointer(&self, room_id: RoomId) -> Result<Option<PlayerId>, StoreError> {
        let rooms = self.rooms.lock().await;
        let room = rooms.get(&room_id).ok_or(StoreError::RoomNotFound(room_id))?;
        Ok(room.turn)
    }

    async fn write_turn_pointer(
        &self,
        room_id: RoomId,
        player_id: Option<PlayerId>,
    ) -> Result<(), StoreError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(&room_id)
            .ok_or(StoreError::RoomNotFound(room_id))?;
        room.turn = player_id;
        Ok(())
    }

    async fn list_players(&self, room_id: RoomId) -> Result<Vec<PlayerRecord>, StoreError> {
        let rooms = self.rooms.lock().await;
        let room = rooms.get(&room_id).ok_or(StoreError::RoomNotFound(room_id))?;
        Ok(room.players.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_or_create_player_is_idempotent_per_identity() {
        let store = MemoryStore::new();
        store.get_or_create_room(RoomId(7)).await.unwrap();

        let alice = Identity::new("alice");
        let first = store.get_or_create_player(&alice, RoomId(7)).await.unwrap();
        let again = store.get_or_create_player(&alice, RoomId(7)).await.unwrap();
        assert_eq!(first, again);
        assert_eq!(store.list_players(RoomId(7)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_same_identity_gets_separate_rows_per_room() {
        let store = MemoryStore::new();
        store.get_or_create_room(RoomId(1)).await.unwrap();
        store.get_or_create_room(RoomId(2)).await.unwrap();

        let alice = Identity::new("alice");
        let in_one = store.get_or_create_player(&alice, RoomId(1)).await.unwrap();
        let in_two = store.get_or_create_player(&alice, RoomId(2)).await.unwrap();
        assert_ne!(in_one.id, in_two.id);
    }

    #[tokio::test]
    async fn test_player_requires_existing_room() {
        let store = MemoryStore::new();
        let result = store
            .get_or_create_player(&Identity::new("alice"), RoomId(9))
            .await;
        assert!(matches!(result, Err(StoreError::RoomNotFound(RoomId(9)))));
    }

    #[tokio::test]
    async fn test_list_players_preserves_creation_order() {
        let store = MemoryStore::new();
        store.get_or_create_room(RoomId(7)).await.unwrap();
        for name in ["carol", "alice", "bob"] {
            store
                .get_or_create_player(&Identity::new(name), RoomId(7))
                .await
                .unwrap();
        }
        let names: Vec<String> = store
            .list_players(RoomId(7))
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.username)
            .collect();
        assert_eq!(names, ["carol", "alice", "bob"]);
    }

    #[tokio::test]
    async fn test_write_player_and_turn_pointer_are_read_back() {
        let store = MemoryStore::new();
        store.get_or_create_room(RoomId(7)).await.unwrap();
        let alice = Identity::new("alice");
        let mut record = store.get_or_create_player(&alice, RoomId(7)).await.unwrap();

        record.character = Some(Character::MissScarlet);
        record.location = Some(Space::Lounge);
        record.has_moved = true;
        record.seat = Some(0);
        store.write_player(RoomId(7), &record).await.unwrap();
        store
            .write_turn_pointer(RoomId(7), Some(record.id))
            .await
            .unwrap();

        let read = store.read_player(&alice, RoomId(7)).await.unwrap();
        assert_eq!(read, Some(record.clone()));
        assert_eq!(
            store.read_turn_pointer(RoomId(7)).await.unwrap(),
            Some(record.id)
        );
        assert_eq!(
            store.read_player(&Identity::new("bob"), RoomId(7)).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_write_unknown_player_fails() {
        let store = MemoryStore::new();
        store.get_or_create_room(RoomId(7)).await.unwrap();
        let ghost = PlayerRecord::new(PlayerId(99), "ghost");
        let result = store.write_player(RoomId(7), &ghost).await;
        assert!(matches!(result, Err(StoreError::PlayerNotFound(PlayerId(99)))));
    }

    #[test]
    fn test_entry_uses_display_names() {
        let mut record = PlayerRecord::new(PlayerId(1), "alice");
        record.character = Some(Character::MrsPeacock);
        record.location = Some(Space::BilliardRoom);
        let entry = record.entry();
        assert_eq!(entry.character.as_deref(), Some("Mrs. Peacock"));
        assert_eq!(entry.location.as_deref(), Some("Billiard Room"));
        assert_eq!(entry.username, "alice");
    }
}
