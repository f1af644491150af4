//! The adjacency table.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::Space;

/// Every hallway and the two rooms it joins.
const HALLWAYS: [(Space, Space, Space); 12] = [
    (Space::H1, Space::Study, Space::Hall),
    (Space::H2, Space::Hall, Space::Lounge),
    (Space::H3, Space::Study, Space::Library),
    (Space::H4, Space::Hall, Space::BilliardRoom),
    (Space::H5, Space::Lounge, Space::DiningRoom),
    (Space::H6, Space::Library, Space::BilliardRoom),
    (Space::H7, Space::BilliardRoom, Space::DiningRoom),
    (Space::H8, Space::Library, Space::Conservatory),
    (Space::H9, Space::BilliardRoom, Space::Ballroom),
    (Space::H10, Space::DiningRoom, Space::Kitchen),
    (Space::H11, Space::Conservatory, Space::Ballroom),
    (Space::H12, Space::Ballroom, Space::Kitchen),
];

/// Corner-to-corner shortcuts. Declared once, inserted both ways.
const SECRET_PASSAGES: [(Space, Space); 2] = [
    (Space::Study, Space::Kitchen),
    (Space::Lounge, Space::Conservatory),
];

static CLASSIC: OnceLock<BoardGraph> = OnceLock::new();

/// Maps each space to the spaces a token can reach from it in one move.
///
/// Built once from the edge lists above and never mutated. Every edge is
/// inserted in both directions, so adjacency is symmetric by construction.
#[derive(Debug, Clone)]
pub struct BoardGraph {
    adjacency: HashMap<Space, Vec<Space>>,
}

impl BoardGraph {
    /// The standard Clue-Less board, shared for the process lifetime.
    pub fn classic() -> &'static BoardGraph {
        CLASSIC.get_or_init(|| {
            let edges = HALLWAYS
                .iter()
                .flat_map(|&(hall, a, b)| [(hall, a), (hall, b)])
                .chain(SECRET_PASSAGES);
            BoardGraph::from_edges(edges)
        })
    }

    /// Builds a graph from undirected edges.
    pub fn from_edges(edges: impl IntoIterator<Item = (Space, Space)>) -> Self {
        let mut adjacency: HashMap<Space, Vec<Space>> = HashMap::new();
        for (a, b) in edges {
            let from_a = adjacency.entry(a).or_default();
            if !from_a.contains(&b) {
                from_a.push(b);
            }
            let from_b = adjacency.entry(b).or_default();
            if !from_b.contains(&a) {
                from_b.push(a);
            }
        }
        Self { adjacency }
    }

    /// Spaces reachable from `space` in one move, in declaration order.
    pub fn neighbors(&self, space: Space) -> &[Space] {
        self.adjacency.get(&space).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_adjacent(&self, from: Space, to: Space) -> bool {
        self.neighbors(from).contains(&to)
    }
}
