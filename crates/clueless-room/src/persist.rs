//! Loading a room from the store and writing its changes back.
//!
//! Reads happen once, before the room actor starts taking commands.
//! Writes are queued by the actor and applied by a separate task in the
//! order they were queued, so a slow store delays persistence but never a
//! player's turn.

use std::sync::Arc;

use clueless_protocol::{PlayerId, RoomId};
use tokio::sync::mpsc;

use crate::{GameStore, PlayerRecord};

/// A change the room has committed and the store has not yet seen.
#[derive(Debug)]
pub(crate) enum PersistOp {
    Player(PlayerRecord),
    Turn(Option<PlayerId>),
}

pub(crate) type PersistSender = mpsc::UnboundedSender<PersistOp>;

/// Reads the stored roster and turn pointer for `room_id`.
///
/// A store failure starts the room empty rather than not at all; players
/// who join afterwards are added as they arrive.
pub(crate) async fn hydrate<S: GameStore>(
    room_id: RoomId,
    store: &S,
) -> (Vec<PlayerRecord>, Option<PlayerId>) {
    let players = match store.list_players(room_id).await {
        Ok(players) => players,
        Err(e) => {
            tracing::error!(%room_id, error = %e, "failed to load players, starting empty");
            Vec::new()
        }
    };
    let turn = match store.read_turn_pointer(room_id).await {
        Ok(turn) => turn,
        Err(e) => {
            tracing::error!(%room_id, error = %e, "failed to load turn pointer");
            None
        }
    };
    (players, turn)
}

/// Applies queued writes until the room drops its sender.
pub(crate) async fn run_persister<S: GameStore>(
    room_id: RoomId,
    store: Arc<S>,
    mut queue: mpsc::UnboundedReceiver<PersistOp>,
) {
    while let Some(op) = queue.recv().await {
        let result = match &op {
            PersistOp::Player(record) => store.write_player(room_id, record).await,
            PersistOp::Turn(turn) => store.write_turn_pointer(room_id, *turn).await,
        };
        if let Err(e) = result {
            tracing::error!(%room_id, error = %e, ?op, "failed to persist room change");
        }
    }
    tracing::debug!(%room_id, "persister stopped");
}

#[cfg(test)]
mod tests {
    use clueless_board::{Character, Space};
    use clueless_session::Identity;

    use super::*;
    use crate::MemoryStore;

    #[tokio::test]
    async fn test_persister_applies_writes_in_order() {
        let store = Arc::new(MemoryStore::new());
        store.get_or_create_room(RoomId(3)).await.unwrap();
        let mut record = store
            .get_or_create_player(&Identity::new("alice"), RoomId(3))
            .await
            .unwrap();

        let (tx, rx) = mpsc::unbounded_channel();
        record.character = Some(Character::MissScarlet);
        record.location = Some(Space::H2);
        tx.send(PersistOp::Player(record.clone())).unwrap();
        record.location = Some(Space::Lounge);
        record.has_moved = true;
        tx.send(PersistOp::Player(record.clone())).unwrap();
        tx.send(PersistOp::Turn(Some(record.id))).unwrap();
        drop(tx);

        run_persister(RoomId(3), Arc::clone(&store), rx).await;

        let (players, turn) = hydrate(RoomId(3), store.as_ref()).await;
        assert_eq!(players, vec![record.clone()]);
        assert_eq!(turn, Some(record.id));
    }

    #[tokio::test]
    async fn test_hydrate_missing_room_starts_empty() {
        let store = MemoryStore::new();
        let (players, turn) = hydrate(RoomId(404), &store).await;
        assert!(players.is_empty());
        assert_eq!(turn, None);
    }
}
