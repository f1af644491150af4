//! Move legality.

use std::collections::HashSet;

use crate::{BoardGraph, Space};

/// Returns `true` if a token may move from `from` to `to`.
///
/// `occupied` holds the spaces currently taken by the *other* tokens in
/// the room. A move is legal when `to` is adjacent to `from` and, if `to`
/// is a hallway, nobody else is standing in it. Rooms have no capacity
/// limit.
pub fn is_legal(
    board: &BoardGraph,
    occupied: &HashSet<Space>,
    from: Space,
    to: Space,
) -> bool {
    if !board.is_adjacent(from, to) {
        return false;
    }
    !(to.is_hallway() && occupied.contains(&to))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occupied(spaces: &[Space]) -> HashSet<Space> {
        spaces.iter().copied().collect()
    }

    #[test]
    fn test_adjacent_empty_room_is_legal() {
        let board = BoardGraph::classic();
        assert!(is_legal(board, &occupied(&[]), Space::H2, Space::Lounge));
    }

    #[test]
    fn test_non_adjacent_is_illegal() {
        let board = BoardGraph::classic();
        assert!(!is_legal(board, &occupied(&[]), Space::Lounge, Space::Kitchen));
        assert!(!is_legal(board, &occupied(&[]), Space::H2, Space::H2));
    }

    #[test]
    fn test_occupied_hallway_is_illegal() {
        let board = BoardGraph::classic();
        let others = occupied(&[Space::H5]);
        assert!(!is_legal(board, &others, Space::Lounge, Space::H5));
        assert!(is_legal(board, &others, Space::Lounge, Space::H2));
    }

    #[test]
    fn test_occupied_room_is_still_legal() {
        let board = BoardGraph::classic();
        let others = occupied(&[Space::Lounge, Space::Kitchen]);
        assert!(is_legal(board, &others, Space::H2, Space::Lounge));
        assert!(is_legal(board, &others, Space::Study, Space::Kitchen));
    }

    #[test]
    fn test_secret_passage_is_a_single_move() {
        let board = BoardGraph::classic();
        assert!(is_legal(board, &occupied(&[]), Space::Conservatory, Space::Lounge));
    }
}
