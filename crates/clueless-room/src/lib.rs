//! Live game rooms for the Clue-Less server.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns its
//! roster, turn pointer, and the set of joined sessions. Every mutation
//! of a room goes through its command channel, so the actor loop is the
//! room's critical section: two players racing for the same hallway are
//! simply processed one after the other. Different rooms share nothing
//! and run in parallel.
//!
//! # Key types
//!
//! - [`RoomRegistry`] — maps a game id to its running room, creating on
//!   first use
//! - [`RoomHandle`] — join, leave, pick a character, move
//! - [`GameStore`] — the persistence collaborator; [`MemoryStore`] is the
//!   in-process implementation
//! - [`RoomConfig`] — per-room settings
//! - [`advance`] — the turn sequencer

mod config;
mod error;
mod fanout;
mod persist;
mod registry;
mod room;
mod roster;
mod store;
mod turn;

pub use config::RoomConfig;
pub use error::RoomError;
pub use fanout::SessionSender;
pub use registry::RoomRegistry;
pub use room::{RoomHandle, RoomInfo};
pub use store::{GameStore, MemoryStore, PlayerRecord, StoreError};
pub use turn::{advance, announcement};
