//! Error types for the session layer.

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The token was missing, invalid, or rejected by the
    /// [`Authenticator`](crate::Authenticator).
    #[error("authentication failed: {0}")]
    AuthFailed(String),
}
