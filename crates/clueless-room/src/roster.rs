//! The ordered player list of one room.

use std::collections::HashSet;

use clueless_board::{Character, Space};
use clueless_protocol::{PlayerEntry, PlayerId};

use crate::PlayerRecord;

/// Players in join order. Join order is turn order.
#[derive(Debug, Default)]
pub(crate) struct Roster {
    players: Vec<PlayerRecord>,
}

impl Roster {
    /// Builds a roster from stored rows, ordered by seat. Rows without a
    /// seat never joined and are left off. Duplicate ids keep the
    /// lowest seat.
    pub(crate) fn from_records(mut records: Vec<PlayerRecord>) -> Self {
        records.retain(|p| p.seat.is_some());
        records.sort_by_key(|p| (p.seat, p.id));
        let mut seen = HashSet::new();
        records.retain(|p| seen.insert(p.id));
        Self { players: records }
    }

    pub(crate) fn get(&self, id: PlayerId) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: PlayerId) -> Option<&mut PlayerRecord> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub(crate) fn contains(&self, id: PlayerId) -> bool {
        self.get(id).is_some()
    }

    /// Seats a player after everyone already here, unless one with the
    /// same id is already present. Returns the new row if it was added.
    pub(crate) fn add(&mut self, mut record: PlayerRecord) -> Option<&PlayerRecord> {
        if self.contains(record.id) {
            return None;
        }
        let next_seat = self.players.last().and_then(|p| p.seat).map_or(0, |s| s + 1);
        record.seat = Some(next_seat);
        self.players.push(record);
        self.players.last()
    }

    pub(crate) fn ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    pub(crate) fn first_id(&self) -> Option<PlayerId> {
        self.players.first().map(|p| p.id)
    }

    pub(crate) fn len(&self) -> usize {
        self.players.len()
    }

    pub(crate) fn holder_of(&self, character: Character) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.character == Some(character))
    }

    /// Spaces held by everyone except `player`.
    pub(crate) fn occupied_except(&self, player: PlayerId) -> HashSet<Space> {
        self.players
            .iter()
            .filter(|p| p.id != player)
            .filter_map(|p| p.location)
            .collect()
    }

    pub(crate) fn snapshot(&self) -> Vec<PlayerEntry> {
        self.players.iter().map(PlayerRecord::entry).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, name: &str) -> PlayerRecord {
        PlayerRecord::new(PlayerId(id), name)
    }

    fn seated(id: u64, name: &str, seat: u32) -> PlayerRecord {
        PlayerRecord {
            seat: Some(seat),
            ..record(id, name)
        }
    }

    #[test]
    fn test_from_records_orders_by_seat() {
        let roster = Roster::from_records(vec![
            seated(1, "alice", 1),
            seated(2, "bob", 0),
            record(3, "never joined"),
            seated(1, "alice again", 2),
        ]);
        assert_eq!(roster.ids(), vec![PlayerId(2), PlayerId(1)]);
        assert_eq!(roster.get(PlayerId(1)).unwrap().username, "alice");
    }

    #[test]
    fn test_add_is_idempotent_by_id() {
        let mut roster = Roster::default();
        assert!(roster.add(record(1, "alice")).is_some());
        assert!(roster.add(record(1, "alice")).is_none());
        assert!(roster.add(record(2, "bob")).is_some());
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.first_id(), Some(PlayerId(1)));
    }

    #[test]
    fn test_add_seats_after_reloaded_players() {
        let mut roster = Roster::from_records(vec![seated(5, "bob", 0), seated(4, "alice", 1)]);
        let carol = roster.add(record(6, "carol")).unwrap();
        assert_eq!(carol.seat, Some(2));
        assert_eq!(roster.ids(), vec![PlayerId(5), PlayerId(4), PlayerId(6)]);
    }

    #[test]
    fn test_occupied_except_excludes_self_and_unplaced() {
        let mut roster = Roster::default();
        let mut alice = record(1, "alice");
        alice.location = Some(Space::H2);
        let mut bob = record(2, "bob");
        bob.location = Some(Space::Lounge);
        roster.add(alice);
        roster.add(bob);
        roster.add(record(3, "carol"));

        let seen_by_alice = roster.occupied_except(PlayerId(1));
        assert_eq!(seen_by_alice, HashSet::from([Space::Lounge]));
    }

    #[test]
    fn test_holder_of_finds_character() {
        let mut roster = Roster::default();
        let mut alice = record(1, "alice");
        alice.character = Some(Character::MrGreen);
        roster.add(alice);
        assert_eq!(
            roster.holder_of(Character::MrGreen).map(|p| p.id),
            Some(PlayerId(1))
        );
        assert!(roster.holder_of(Character::MrsWhite).is_none());
    }
}
