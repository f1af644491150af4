//! Turn sequencing.

use clueless_protocol::PlayerId;

use crate::PlayerRecord;

/// Returns who plays after `current`, cycling through `roster` in order.
///
/// - empty roster → `None`
/// - no current player, or one no longer in the roster → the first entry
/// - otherwise the next entry, wrapping from the last back to the first
///   (a single player follows themselves)
pub fn advance(roster: &[PlayerId], current: Option<PlayerId>) -> Option<PlayerId> {
    let first = *roster.first()?;
    let Some(current) = current else {
        return Some(first);
    };
    match roster.iter().position(|&id| id == current) {
        Some(index) => Some(roster[(index + 1) % roster.len()]),
        None => Some(first),
    }
}

/// The text of a `{"turn": ...}` event for `player`.
pub fn announcement(player: &PlayerRecord) -> String {
    match player.character {
        Some(character) => format!("It's {}'s turn ({character})", player.username),
        None => format!("It's {}'s turn", player.username),
    }
}
