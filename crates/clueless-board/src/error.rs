//! Error types for board lookups.

/// A name that does not match any board entity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("unknown space: {0}")]
    UnknownSpace(String),

    #[error("unknown character: {0}")]
    UnknownCharacter(String),
}
