//! Room configuration.

use serde::{Deserialize, Serialize};

/// Settings applied to every room a registry creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Capacity of the room actor's command channel. When full, sessions
    /// wait to submit rather than the room buffering without bound.
    pub channel_size: usize,

    /// Pass the turn on when the player holding it loses their last live
    /// session. Off by default: a disconnected player keeps the turn and
    /// the room waits for them to come back.
    pub skip_turn_on_disconnect: bool,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            channel_size: 64,
            skip_turn_on_disconnect: false,
        }
    }
}
