//! Wire types: everything that is serialized onto a connection.
//!
//! Inbound messages are internally tagged by `action`. Outbound events are
//! flat JSON objects distinguished by which keys they carry, so a browser
//! client can dispatch on `"player_list" in msg`, `"turn" in msg`, etc.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Identifies a player row within the whole server.
///
/// Serialized as a plain number (`#[serde(transparent)]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// The external game identifier a room is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// Messages a client sends to the server.
///
/// `#[serde(tag = "action")]` gives the flat shape clients already use:
///
/// ```text
/// {"action": "join", "game_id": 7, "token": "alice"}
/// {"action": "select_character", "character": "Miss Scarlet"}
/// {"action": "move", "location": "Lounge"}
/// ```
///
/// Character and location are kept as raw strings here. Whether they name
/// a real suspect or space is a game rule, answered by the room with a
/// typed error rather than by the decoder with a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Must be the first message on a connection.
    Join {
        game_id: RoomId,
        #[serde(default)]
        token: Option<String>,
    },

    /// Claim a character for the rest of the game.
    SelectCharacter { character: String },

    /// Move this player's token to `location`.
    Move { location: String },
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// One row of a roster snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub id: PlayerId,
    pub character: Option<String>,
    pub location: Option<String>,
    pub has_moved: bool,
    pub username: String,
}

/// Events the server sends to clients.
///
/// `#[serde(untagged)]` serializes each variant as just its fields:
///
/// ```text
/// {"character": "Miss Scarlet", "from": "H2", "to": "Lounge"}
/// {"player_list": [ ... ]}
/// {"turn": "It's alice's turn (Miss Scarlet)"}
/// {"error": "that move is not allowed"}
/// {"message": "alice joined!"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerEvent {
    /// A token moved. `from` is empty for the initial placement that
    /// follows character selection.
    Moved {
        character: String,
        from: String,
        to: String,
    },

    /// The full roster, in turn order.
    PlayerList { player_list: Vec<PlayerEntry> },

    /// Whose turn it is, as display text.
    Turn { turn: String },

    /// A rejected request. Only ever sent to the requester.
    Error { error: String },

    /// Free-form room notice.
    Notice { message: String },
}

// =========================================================================
// Tests
// =========================================================================
