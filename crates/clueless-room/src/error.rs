//! Error types for the room layer.
//!
//! The `Display` text of each variant is exactly what the requesting
//! client sees in its `{"error": ...}` event, so keep it player-facing.

use clueless_board::{Character, Space};
use clueless_protocol::RoomId;
use clueless_session::SessionId;

use crate::StoreError;

/// Why a room refused a request.
///
/// Everything except `InternalFault` and `Unavailable` is a rule
/// violation: reported to the requester, room state untouched.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The first move must leave from the character's starting hallway
    /// for a space adjacent to it.
    #[error("your first move must go from {start} to an adjacent space, not {to}")]
    InvalidFirstMove { start: Space, to: String },

    /// Destination is not adjacent, not a space, or an occupied hallway.
    #[error("you cannot move from {from} to {to}")]
    InvalidMove { from: String, to: String },

    #[error("it is not your turn")]
    NotYourTurn,

    #[error("choose a character before moving")]
    CharacterNotSelected,

    /// Characters are assigned once per player.
    #[error("you are already playing {0}")]
    CharacterAlreadySelected(Character),

    #[error("{0} is already taken")]
    CharacterTaken(Character),

    #[error("unknown character: {0}")]
    UnknownCharacter(String),

    /// Another token moved onto the character's starting hallway before
    /// the character was chosen.
    #[error("{character} cannot enter play while {space} is occupied")]
    StartingSpaceOccupied { character: Character, space: Space },

    /// The session never joined this room, or already left it.
    #[error("session {0} is not in room {1}")]
    NotJoined(SessionId, RoomId),

    #[error("room {0} not found")]
    NotFound(RoomId),

    /// A collaborator failed. Details go to the log, not the client.
    #[error("internal error, please try again")]
    InternalFault(#[from] StoreError),

    /// The room's actor has stopped.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}
