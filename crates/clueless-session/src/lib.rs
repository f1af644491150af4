//! Player identity and session handles.
//!
//! 1. **Authentication** — turning a client's token into an [`Identity`]
//!    ([`Authenticator`] trait). Account management lives elsewhere; the
//!    server only needs a stable username.
//! 2. **Sessions** — one [`Session`] per live connection, named by a
//!    process-unique [`SessionId`]. The same identity may hold several
//!    sessions (two tabs, or a reconnect racing the old socket's close).
//!
//! ```text
//! Room Layer (above)  ← tracks which sessions are joined to which room
//!     ↕
//! Session Layer (this crate)
//!     ↕
//! Protocol Layer (below)  ← provides RoomId
//! ```

#![allow(async_fn_in_trait)]

mod auth;
mod error;
mod session;

pub use auth::{Authenticator, Identity, UsernameAuthenticator};
pub use error::SessionError;
pub use session::{Session, SessionId};
