//! Unified error type for the Clue-Less server.

use clueless_protocol::ProtocolError;
use clueless_room::{RoomError, StoreError};
use clueless_session::SessionError;
use clueless_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// Embedders deal with this one type instead of importing errors from
/// each layer. The `#[from]` variants let `?` convert automatically.
#[derive(Debug, thiserror::Error)]
pub enum CluelessError {
    /// Bind, accept, send, or receive failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A message could not be encoded or decoded, or arrived out of
    /// order.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The join token was rejected.
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Room(#[from] RoomError),

    /// Looking up the room or player row failed during join.
    #[error(transparent)]
    Store(#[from] StoreError),
}
