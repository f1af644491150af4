//! Per-connection handler: join handshake, then message routing.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Receive `join` → authenticate the token → look up the player row
//!   2. Attach to the room with a fresh outbound event queue
//!   3. Loop: forward client actions to the room, room events to the client

use std::sync::Arc;

use clueless_protocol::{ClientMessage, Codec, ProtocolError, ServerEvent};
use clueless_room::{GameStore, PlayerRecord, RoomError, RoomHandle};
use clueless_session::{Authenticator, Session, SessionId};
use clueless_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::CluelessError;
use crate::server::ServerState;

/// Drop guard that detaches the session from its room when the handler
/// exits, however it exits.
///
/// `Drop` is synchronous, so the leave is sent from a spawned task.
struct SessionGuard {
    session: SessionId,
    room: RoomHandle,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let session = self.session;
        let room = self.room.clone();
        tokio::spawn(async move {
            if let Err(e) = room.leave(session).await {
                tracing::debug!(%session, error = %e, "leave after disconnect failed");
            }
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<A, S, C>(
    conn: WebSocketConnection,
    state: Arc<ServerState<A, S, C>>,
) -> Result<(), CluelessError>
where
    A: Authenticator,
    S: GameStore,
    C: Codec,
{
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    // --- Step 1: Handshake ---
    let (session, player) = match perform_handshake(&conn, &state).await {
        Ok(joined) => joined,
        Err(e) => {
            let _ = conn.close().await;
            return Err(e);
        }
    };
    let session_id = session.id;
    let room_id = session.room_id;

    tracing::info!(
        %conn_id,
        %session_id,
        %room_id,
        username = %session.identity,
        "player authenticated"
    );

    // --- Step 2: Attach to the room ---
    let room = state.rooms.get_or_create(room_id).await;
    let (sender, mut events) = mpsc::unbounded_channel();
    if let Err(e) = room.join(session_id, player, sender).await {
        send_error(&conn, &state.codec, &e.to_string()).await?;
        let _ = conn.close().await;
        return Err(e.into());
    }
    let _guard = SessionGuard {
        session: session_id,
        room: room.clone(),
    };

    // --- Step 3: Message loop ---
    // One task owns the socket, so reads and writes are driven from one
    // select rather than split across tasks.
    let mut idle_deadline = state.idle_timeout.map(|limit| Instant::now() + limit);

    loop {
        tokio::select! {
            inbound = conn.recv() => {
                let data = match inbound {
                    Ok(Some(data)) => data,
                    Ok(None) => {
                        tracing::info!(%session_id, "connection closed cleanly");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%session_id, error = %e, "recv error");
                        break;
                    }
                };
                idle_deadline = state.idle_timeout.map(|limit| Instant::now() + limit);
                handle_message(&conn, &state, &room, session_id, &data).await?;
            }

            event = events.recv() => {
                let Some(event) = event else {
                    tracing::info!(%session_id, %room_id, "room closed, dropping connection");
                    let _ = conn.close().await;
                    break;
                };
                send_event(&conn, &state.codec, &event).await?;
            }

            () = idle_expired(idle_deadline) => {
                tracing::info!(%session_id, "connection idle, closing");
                let _ = conn.close().await;
                break;
            }
        }
    }

    // _guard drops here → the room is told the session left.
    Ok(())
}

/// Waits for the first message, which must be a `join`, and resolves it
/// to a session and the player row it acts for.
///
/// Anything that goes wrong is reported to the client as an error event
/// before the error is returned.
async fn perform_handshake<A, S, C>(
    conn: &WebSocketConnection,
    state: &ServerState<A, S, C>,
) -> Result<(Session, PlayerRecord), CluelessError>
where
    A: Authenticator,
    S: GameStore,
    C: Codec,
{
    let data = match tokio::time::timeout(state.handshake_timeout, conn.recv()).await {
        Ok(Ok(Some(data))) => data,
        Ok(Ok(None)) => {
            return Err(ProtocolError::InvalidMessage(
                "connection closed before join".into(),
            )
            .into());
        }
        Ok(Err(e)) => return Err(CluelessError::Transport(e)),
        Err(_) => {
            send_error(conn, &state.codec, "timed out waiting for join").await?;
            return Err(ProtocolError::InvalidMessage("join timed out".into()).into());
        }
    };

    let (game_id, token) = match state.codec.decode::<ClientMessage>(&data) {
        Ok(ClientMessage::Join { game_id, token }) => (game_id, token),
        Ok(_) => {
            let err = ProtocolError::InvalidMessage("join a game first".into());
            send_error(conn, &state.codec, &err.to_string()).await?;
            return Err(err.into());
        }
        Err(e) => {
            send_error(conn, &state.codec, &e.to_string()).await?;
            return Err(e.into());
        }
    };

    let identity = match state.auth.authenticate(token.as_deref()).await {
        Ok(identity) => identity,
        Err(e) => {
            send_error(conn, &state.codec, &e.to_string()).await?;
            return Err(e.into());
        }
    };

    // Store reads happen here, before the room's critical section.
    let store = state.rooms.store();
    let player = match store.get_or_create_room(game_id).await {
        Ok(()) => store.get_or_create_player(&identity, game_id).await,
        Err(e) => Err(e),
    };
    let player = match player {
        Ok(player) => player,
        Err(e) => {
            tracing::error!(room_id = %game_id, username = %identity, error = %e, "player lookup failed");
            let fault = RoomError::InternalFault(e);
            send_error(conn, &state.codec, &fault.to_string()).await?;
            return Err(fault.into());
        }
    };

    Ok((Session::open(identity, game_id), player))
}

/// Dispatches one inbound message to the room.
///
/// Room rejections are delivered by the room itself on the session's
/// event queue; this only reports what the room never saw.
async fn handle_message<A, S, C>(
    conn: &WebSocketConnection,
    state: &ServerState<A, S, C>,
    room: &RoomHandle,
    session: SessionId,
    data: &[u8],
) -> Result<(), CluelessError>
where
    A: Authenticator,
    S: GameStore,
    C: Codec,
{
    let msg: ClientMessage = match state.codec.decode(data) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::debug!(%session, error = %e, "failed to decode request");
            return send_error(conn, &state.codec, &e.to_string()).await;
        }
    };

    let result = match msg {
        ClientMessage::SelectCharacter { character } => {
            room.select_character(session, &character).await
        }
        ClientMessage::Move { location } => room.move_to(session, &location).await,
        ClientMessage::Join { game_id, .. } => {
            let err = ProtocolError::InvalidMessage(format!(
                "already joined game {}, cannot join {game_id}",
                room.room_id()
            ));
            return send_error(conn, &state.codec, &err.to_string()).await;
        }
    };

    if let Err(e) = result {
        tracing::debug!(%session, error = %e, "request rejected");
    }
    Ok(())
}

/// Completes at `deadline`, or never if there is none.
async fn idle_expired(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn send_event(
    conn: &WebSocketConnection,
    codec: &impl Codec,
    event: &ServerEvent,
) -> Result<(), CluelessError> {
    let bytes = codec.encode(event)?;
    conn.send(&bytes).await?;
    Ok(())
}

/// Sends an `{"error": ...}` event to this connection only.
async fn send_error(
    conn: &WebSocketConnection,
    codec: &impl Codec,
    message: &str,
) -> Result<(), CluelessError> {
    send_event(
        conn,
        codec,
        &ServerEvent::Error {
            error: message.to_string(),
        },
    )
    .await
}
