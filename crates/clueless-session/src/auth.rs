//! Authentication hook for resolving who a connection belongs to.
//!
//! The server doesn't implement accounts or passwords. It defines the
//! [`Authenticator`] trait: a single async method that takes the token a
//! client presented in its `join` message and returns an [`Identity`] or an
//! error. Deployments plug in whatever their login system issues.

use std::fmt;

use crate::SessionError;

/// Who a connection acts for. Player rows are keyed by this within a room,
/// so the same identity reconnecting finds its old token position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    pub username: String,
}

impl Identity {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}

/// Validates a client's token and returns their identity.
///
/// `Send + Sync + 'static` because one authenticator is shared by every
/// connection task for the lifetime of the server.
///
/// # Example
///
/// ```rust
/// use clueless_session::{Authenticator, Identity, SessionError};
///
/// /// Only lets in the people on the list.
/// struct GuestList(Vec<String>);
///
/// impl Authenticator for GuestList {
///     async fn authenticate(
///         &self,
///         token: Option<&str>,
///     ) -> Result<Identity, SessionError> {
///         let name = token.unwrap_or_default();
///         if self.0.iter().any(|guest| guest == name) {
///             Ok(Identity::new(name))
///         } else {
///             Err(SessionError::AuthFailed(format!("{name} is not invited")))
///         }
///     }
/// }
/// ```
pub trait Authenticator: Send + Sync + 'static {
    /// Resolves the token from a `join` message (absent if the client sent
    /// none).
    ///
    /// # Returns
    /// - `Ok(Identity)` — the connection may join
    /// - `Err(SessionError::AuthFailed)` — reject and close
    fn authenticate(
        &self,
        token: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Identity, SessionError>> + Send;
}

/// Trusts the token as the username. For local play and tests, where a
/// fronting proxy or nobody at all vouches for users.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsernameAuthenticator;

impl Authenticator for UsernameAuthenticator {
    async fn authenticate(&self, token: Option<&str>) -> Result<Identity, SessionError> {
        let username = token.map(str::trim).unwrap_or_default();
        if username.is_empty() {
            return Err(SessionError::AuthFailed("a username is required".into()));
        }
        if username.len() > 150 {
            return Err(SessionError::AuthFailed("username is too long".into()));
        }
        Ok(Identity::new(username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_username_authenticator_trims_token() {
        let identity = UsernameAuthenticator
            .authenticate(Some("  alice "))
            .await
            .unwrap();
        assert_eq!(identity, Identity::new("alice"));
        assert_eq!(identity.to_string(), "alice");
    }

    #[tokio::test]
    async fn test_username_authenticator_rejects_missing_or_blank() {
        assert!(UsernameAuthenticator.authenticate(None).await.is_err());
        let err = UsernameAuthenticator
            .authenticate(Some("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::AuthFailed(_)));
    }

    #[tokio::test]
    async fn test_username_authenticator_rejects_oversized_names() {
        let long = "x".repeat(151);
        assert!(UsernameAuthenticator.authenticate(Some(&long)).await.is_err());
    }
}
