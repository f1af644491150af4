//! `CluelessServer` builder and accept loop.
//!
//! Ties the layers together: transport → protocol → session → room.

use std::sync::Arc;
use std::time::Duration;

use clueless_protocol::{Codec, JsonCodec};
use clueless_room::{GameStore, RoomConfig, RoomRegistry};
use clueless_session::Authenticator;
use clueless_transport::{Transport, WebSocketTransport};

use crate::CluelessError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
///
/// The registry does its own locking, so the state itself is shared
/// through a plain `Arc`.
pub(crate) struct ServerState<A: Authenticator, S: GameStore, C: Codec> {
    pub(crate) rooms: RoomRegistry<S>,
    pub(crate) auth: A,
    pub(crate) codec: C,
    pub(crate) handshake_timeout: Duration,
    pub(crate) idle_timeout: Option<Duration>,
}

/// Builder for configuring and starting a Clue-Less server.
///
/// # Example
///
/// ```rust,ignore
/// use clueless::prelude::*;
///
/// let server = CluelessServerBuilder::new()
///     .bind("0.0.0.0:8000")
///     .room_config(RoomConfig { skip_turn_on_disconnect: true, ..Default::default() })
///     .build(UsernameAuthenticator, Arc::new(MemoryStore::new()))
///     .await?;
/// server.run().await
/// ```
pub struct CluelessServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
    handshake_timeout: Duration,
    idle_timeout: Option<Duration>,
}

impl CluelessServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            room_config: RoomConfig::default(),
            handshake_timeout: Duration::from_secs(5),
            idle_timeout: None,
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Settings for every room the server creates.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// How long a new connection has to send its `join` message.
    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Drop connections that send nothing for this long. `None` (the
    /// default) lets players sit on their turn indefinitely.
    pub fn idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Binds the listener and assembles the server.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build<A, S>(
        self,
        auth: A,
        store: Arc<S>,
    ) -> Result<CluelessServer<A, S, JsonCodec>, CluelessError>
    where
        A: Authenticator,
        S: GameStore,
    {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            rooms: RoomRegistry::new(store, self.room_config),
            auth,
            codec: JsonCodec,
            handshake_timeout: self.handshake_timeout,
            idle_timeout: self.idle_timeout,
        });

        Ok(CluelessServer { transport, state })
    }
}

impl Default for CluelessServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Clue-Less server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct CluelessServer<A: Authenticator, S: GameStore, C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<A, S, C>>,
}

impl<A, S, C> CluelessServer<A, S, C>
where
    A: Authenticator,
    S: GameStore,
    C: Codec,
{
    /// Creates a new builder.
    pub fn builder() -> CluelessServerBuilder {
        CluelessServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop, spawning one handler task per connection.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), CluelessError> {
        tracing::info!(addr = ?self.local_addr().ok(), "clueless server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
