//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding wire messages.
///
/// A `Decode` error on an inbound payload is what the server reports to a
/// client as a malformed request.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: not JSON, unknown `action`, or missing
    /// fields.
    #[cfg(feature = "json")]
    #[error("malformed request: {0}")]
    Decode(serde_json::Error),

    /// The message parsed but is not valid at this point of the
    /// conversation (e.g. a move before joining).
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
