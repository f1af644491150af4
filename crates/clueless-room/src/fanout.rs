//! Broadcast fanout: delivering room events to joined sessions.

use std::collections::HashMap;

use clueless_protocol::{PlayerId, RoomId, ServerEvent};
use clueless_session::SessionId;
use tokio::sync::mpsc;

/// Channel sender for delivering events to one session's connection task.
///
/// Unbounded so the room never waits on a slow client. Each channel is
/// FIFO and only the room actor writes to it, so a session sees events in
/// exactly the order the room published them.
pub type SessionSender = mpsc::UnboundedSender<ServerEvent>;

struct Member {
    player_id: PlayerId,
    sender: SessionSender,
}

/// The sessions currently joined to one room, and who each plays as.
pub(crate) struct Fanout {
    room_id: RoomId,
    members: HashMap<SessionId, Member>,
}

impl Fanout {
    pub(crate) fn new(room_id: RoomId) -> Self {
        Self {
            room_id,
            members: HashMap::new(),
        }
    }

    /// Registers a session. A session id joined twice keeps the newer
    /// sender.
    pub(crate) fn add(&mut self, session: SessionId, player_id: PlayerId, sender: SessionSender) {
        self.members.insert(session, Member { player_id, sender });
    }

    /// Removes a session and returns the player it acted for.
    pub(crate) fn remove(&mut self, session: SessionId) -> Option<PlayerId> {
        self.members.remove(&session).map(|m| m.player_id)
    }

    pub(crate) fn player_of(&self, session: SessionId) -> Option<PlayerId> {
        self.members.get(&session).map(|m| m.player_id)
    }

    /// `true` if any joined session acts for `player_id`.
    pub(crate) fn is_present(&self, player_id: PlayerId) -> bool {
        self.members.values().any(|m| m.player_id == player_id)
    }

    pub(crate) fn len(&self) -> usize {
        self.members.len()
    }

    /// Delivers `event` to every joined session. Sessions whose connection
    /// task has already gone are skipped; there is no retry.
    pub(crate) fn publish(&self, event: &ServerEvent) {
        for (session, member) in &self.members {
            if member.sender.send(event.clone()).is_err() {
                tracing::trace!(room_id = %self.room_id, %session, "dropping event for closed session");
            }
        }
    }

    /// Delivers `event` to one session only.
    pub(crate) fn send_to(&self, session: SessionId, event: ServerEvent) {
        if let Some(member) = self.members.get(&session) {
            let _ = member.sender.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice(text: &str) -> ServerEvent {
        ServerEvent::Notice {
            message: text.into(),
        }
    }

    #[test]
    fn test_publish_reaches_every_member_in_order() {
        let mut fanout = Fanout::new(RoomId(1));
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        fanout.add(SessionId::next(), PlayerId(1), tx_a);
        fanout.add(SessionId::next(), PlayerId(2), tx_b);

        fanout.publish(&notice("one"));
        fanout.publish(&notice("two"));

        for rx in [&mut rx_a, &mut rx_b] {
            assert_eq!(rx.try_recv().unwrap(), notice("one"));
            assert_eq!(rx.try_recv().unwrap(), notice("two"));
            assert!(rx.try_recv().is_err());
        }
    }

    #[test]
    fn test_send_to_reaches_only_target() {
        let mut fanout = Fanout::new(RoomId(1));
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        let a = SessionId::next();
        fanout.add(a, PlayerId(1), tx_a);
        fanout.add(SessionId::next(), PlayerId(2), tx_b);

        fanout.send_to(a, notice("just you"));

        assert_eq!(rx_a.try_recv().unwrap(), notice("just you"));
        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn test_closed_session_does_not_block_others() {
        let mut fanout = Fanout::new(RoomId(1));
        let (tx_gone, rx_gone) = mpsc::unbounded_channel();
        let (tx_live, mut rx_live) = mpsc::unbounded_channel();
        fanout.add(SessionId::next(), PlayerId(1), tx_gone);
        fanout.add(SessionId::next(), PlayerId(2), tx_live);
        drop(rx_gone);

        fanout.publish(&notice("still here"));
        assert_eq!(rx_live.try_recv().unwrap(), notice("still here"));
    }

    #[test]
    fn test_presence_tracks_all_sessions_of_a_player() {
        let mut fanout = Fanout::new(RoomId(1));
        let first = SessionId::next();
        let second = SessionId::next();
        fanout.add(first, PlayerId(1), mpsc::unbounded_channel().0);
        fanout.add(second, PlayerId(1), mpsc::unbounded_channel().0);

        assert_eq!(fanout.remove(first), Some(PlayerId(1)));
        assert!(fanout.is_present(PlayerId(1)));
        assert_eq!(fanout.player_of(second), Some(PlayerId(1)));
        assert_eq!(fanout.remove(second), Some(PlayerId(1)));
        assert!(!fanout.is_present(PlayerId(1)));
        assert_eq!(fanout.remove(second), None);
        assert_eq!(fanout.len(), 0);
    }
}
