//! Session handles: one per live connection.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use clueless_protocol::RoomId;

use crate::Identity;

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Names one live connection. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    /// Allocates a fresh id.
    pub fn next() -> Self {
        Self(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

/// A connection that has authenticated and named the room it plays in.
///
/// Transient: sessions are never persisted. The player row they act for
/// outlives them.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub identity: Identity,
    pub room_id: RoomId,
}

impl Session {
    pub fn open(identity: Identity, room_id: RoomId) -> Self {
        let id = SessionId::next();
        tracing::debug!(session_id = %id, username = %identity.username, %room_id, "session opened");
        Self {
            id,
            identity,
            room_id,
        }
    }
}
