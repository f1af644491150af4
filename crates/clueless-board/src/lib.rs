//! The Clue-Less board: spaces, suspects, adjacency, and move legality.
//!
//! Everything in this crate is immutable, process-wide data plus pure
//! functions over it. Rooms consult it; nothing here holds game state.
//!
//! # Key types
//!
//! - [`Space`] / [`SpaceKind`] — the 21 board spaces and whether a space
//!   is an exclusive hallway or an unlimited room
//! - [`Character`] — the six suspects and their starting hallways
//! - [`BoardGraph`] — the adjacency table, including secret passages
//! - [`is_legal`] — the move validator

mod character;
mod error;
mod graph;
mod rules;
mod space;

pub use character::Character;
pub use error::BoardError;
pub use graph::BoardGraph;
pub use rules::is_legal;
pub use space::{Space, SpaceKind};
