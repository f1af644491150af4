//! Clue-Less game server.
//!
//! Configured from the environment; see [`settings::Settings`]. Log
//! verbosity follows `RUST_LOG` (default `info`).

mod settings;

use std::sync::Arc;

use clueless::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = Settings::from_env()?;
    tracing::info!(?settings, "starting clueless server");

    let server = CluelessServerBuilder::new()
        .bind(&settings.bind)
        .room_config(RoomConfig {
            skip_turn_on_disconnect: settings.skip_turn_on_disconnect,
            ..RoomConfig::default()
        })
        .handshake_timeout(settings.handshake_timeout)
        .idle_timeout(settings.idle_timeout)
        .build(UsernameAuthenticator, Arc::new(MemoryStore::new()))
        .await?;

    server.run().await?;
    Ok(())
}
