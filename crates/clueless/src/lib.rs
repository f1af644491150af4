//! # Clue-Less
//!
//! Server-side coordinator for browser games of Clue-Less: players join a
//! game over a WebSocket, claim a suspect, and take turns moving tokens
//! around the board while every client in the game sees the same state.
//!
//! The layers live in their own crates and are re-exported here:
//!
//! ```text
//! clueless-transport  bytes in, bytes out (WebSocket)
//! clueless-protocol   ClientMessage / ServerEvent JSON shapes
//! clueless-session    Authenticator, Identity, SessionId
//! clueless-board      spaces, suspects, adjacency, move legality
//! clueless-room       room actors, registry, turn order, GameStore
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use clueless::prelude::*;
//!
//! # async fn run() -> Result<(), CluelessError> {
//! let server = CluelessServerBuilder::new()
//!     .bind("0.0.0.0:8000")
//!     .build(UsernameAuthenticator, Arc::new(MemoryStore::new()))
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::CluelessError;
pub use server::{CluelessServer, CluelessServerBuilder};

/// Everything needed to embed the server, in one import.
pub mod prelude {
    pub use crate::{CluelessError, CluelessServer, CluelessServerBuilder};
    pub use clueless_board::{BoardGraph, Character, Space, is_legal};
    pub use clueless_protocol::{
        ClientMessage, Codec, JsonCodec, PlayerEntry, PlayerId, ProtocolError, RoomId, ServerEvent,
    };
    pub use clueless_room::{
        GameStore, MemoryStore, PlayerRecord, RoomConfig, RoomError, RoomHandle, RoomInfo,
        RoomRegistry, StoreError,
    };
    pub use clueless_session::{Authenticator, Identity, SessionError, UsernameAuthenticator};
    pub use clueless_transport::TransportError;
}
