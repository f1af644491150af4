//! Wire protocol for the Clue-Less server.
//!
//! This crate defines what clients and the server say to each other:
//!
//! - **Types** ([`ClientMessage`], [`ServerEvent`], [`PlayerEntry`]) —
//!   the JSON shapes that travel over a connection.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those shapes are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while doing so.
//!
//! ```text
//! Transport (bytes) → Protocol (ClientMessage / ServerEvent) → Room
//! ```
//!
//! The protocol layer knows nothing about the board: characters and
//! spaces travel as their display names.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{ClientMessage, PlayerEntry, PlayerId, RoomId, ServerEvent};
