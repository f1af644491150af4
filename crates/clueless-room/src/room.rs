//! Room actor: an isolated Tokio task that owns one game's live state.
//!
//! Each room runs in its own task and is reached only through an mpsc
//! channel. Commands are handled one at a time to completion, which makes
//! the loop the room's critical section: no lock, no interleaving, and no
//! `.await` between reading state and writing it back.

use std::sync::Arc;

use clueless_board::{BoardGraph, Character, Space, is_legal};
use clueless_protocol::{PlayerEntry, PlayerId, RoomId, ServerEvent};
use clueless_session::SessionId;
use tokio::sync::{mpsc, oneshot, watch};

use crate::fanout::Fanout;
use crate::persist::{self, PersistOp, PersistSender};
use crate::roster::Roster;
use crate::{GameStore, PlayerRecord, RoomConfig, RoomError, SessionSender, turn};

/// Commands sent to a room actor through its channel.
///
/// Most variants carry a `oneshot::Sender` "reply channel": the caller
/// sends the command and waits for the outcome on it.
pub(crate) enum RoomCommand {
    /// Attach a session acting for `player`.
    Join {
        session: SessionId,
        player: PlayerRecord,
        sender: SessionSender,
        reply: oneshot::Sender<Result<Vec<PlayerEntry>, RoomError>>,
    },

    /// Detach a session. The player row stays.
    Leave {
        session: SessionId,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    SelectCharacter {
        session: SessionId,
        character: String,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    Move {
        session: SessionId,
        location: String,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    GetInfo {
        reply: oneshot::Sender<RoomInfo>,
    },

    Shutdown,
}

/// A snapshot of a room's live state.
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub room_id: RoomId,
    /// Roster in turn order.
    pub players: Vec<PlayerEntry>,
    /// Whose turn it is. `None` only while the roster is empty.
    pub turn: Option<PlayerId>,
    /// Number of joined sessions.
    pub sessions: usize,
}

/// Handle to a running room actor.
///
/// Cheap to clone: it's an `mpsc::Sender` wrapper. The registry holds one
/// per room and every connection joined to the room holds another.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
    /// Flips to `true` once the actor has stopped and every change it
    /// committed has been handed to the store.
    stopped: watch::Receiver<bool>,
}

impl RoomHandle {
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// `true` once the actor has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Joins a session to the room as `player`, adding the player to the
    /// roster if this is their first time here.
    ///
    /// Every joined session (this one included) receives a join notice and
    /// the roster. The first join of a room also starts the turn order.
    /// Returns the roster as of the join.
    pub async fn join(
        &self,
        session: SessionId,
        player: PlayerRecord,
        sender: SessionSender,
    ) -> Result<Vec<PlayerEntry>, RoomError> {
        self.request(|reply| RoomCommand::Join {
            session,
            player,
            sender,
            reply,
        })
        .await?
    }

    /// Detaches a session. The player keeps their character, location,
    /// and place in the turn order.
    pub async fn leave(&self, session: SessionId) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Leave { session, reply })
            .await?
    }

    /// Assigns a character to the session's player and places their token
    /// on its starting space.
    pub async fn select_character(
        &self,
        session: SessionId,
        character: &str,
    ) -> Result<(), RoomError> {
        let character = character.to_string();
        self.request(|reply| RoomCommand::SelectCharacter {
            session,
            character,
            reply,
        })
        .await?
    }

    /// Moves the session's player to `location`.
    ///
    /// A rejected move is also reported to the session as an `error`
    /// event; nothing is broadcast and the turn stays put.
    pub async fn move_to(&self, session: SessionId, location: &str) -> Result<(), RoomError> {
        let location = location.to_string();
        self.request(|reply| RoomCommand::Move {
            session,
            location,
            reply,
        })
        .await?
    }

    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        self.request(|reply| RoomCommand::GetInfo { reply }).await
    }

    /// Stops the actor and waits until its pending writes have reached
    /// the store. Joined sessions see their event stream end.
    ///
    /// Stopping an actor that has already stopped just waits for its
    /// writes.
    pub async fn shutdown(&self) {
        if self.sender.send(RoomCommand::Shutdown).await.is_err() {
            tracing::debug!(room_id = %self.room_id, "room already stopping");
        }
        self.stopped().await;
    }

    /// Resolves once the actor has stopped and its persister has drained.
    pub async fn stopped(&self) {
        let mut stopped = self.stopped.clone();
        // An error means the actor task is gone, which is just as final.
        let _ = stopped.wait_for(|done| *done).await;
    }

    /// `true` if both handles drive the same actor.
    pub fn same_room(&self, other: &RoomHandle) -> bool {
        self.sender.same_channel(&other.sender)
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> RoomCommand,
    ) -> Result<T, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    room_id: RoomId,
    config: RoomConfig,
    board: &'static BoardGraph,
    roster: Roster,
    turn: Option<PlayerId>,
    fanout: Fanout,
    persist: PersistSender,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Runs the actor loop, processing commands until shutdown.
    async fn run(mut self) {
        tracing::info!(
            room_id = %self.room_id,
            players = self.roster.len(),
            "room actor started"
        );

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join {
                    session,
                    player,
                    sender,
                    reply,
                } => {
                    let result = self.handle_join(session, player, sender);
                    let _ = reply.send(Ok(result));
                }
                RoomCommand::Leave { session, reply } => {
                    let result = self.handle_leave(session);
                    let _ = reply.send(result);
                }
                RoomCommand::SelectCharacter {
                    session,
                    character,
                    reply,
                } => {
                    let result = self.handle_select_character(session, &character);
                    self.report_rejection(session, &result);
                    let _ = reply.send(result);
                }
                RoomCommand::Move {
                    session,
                    location,
                    reply,
                } => {
                    let result = self.handle_move(session, &location);
                    self.report_rejection(session, &result);
                    let _ = reply.send(result);
                }
                RoomCommand::GetInfo { reply } => {
                    let _ = reply.send(self.info());
                }
                RoomCommand::Shutdown => {
                    tracing::info!(room_id = %self.room_id, "room shutting down");
                    break;
                }
            }
        }

        tracing::info!(room_id = %self.room_id, "room actor stopped");
    }

    fn handle_join(
        &mut self,
        session: SessionId,
        player: PlayerRecord,
        sender: SessionSender,
    ) -> Vec<PlayerEntry> {
        let player_id = player.id;
        let username = player.username.clone();
        // The in-memory row is newer than whatever the caller read.
        let seated = self.roster.add(player).cloned();
        let first_visit = seated.is_some();
        if let Some(record) = seated {
            self.persist(PersistOp::Player(record));
        }
        self.fanout.add(session, player_id, sender);

        tracing::info!(
            room_id = %self.room_id,
            %player_id,
            %session,
            first_visit,
            sessions = self.fanout.len(),
            "player joined"
        );

        self.fanout.publish(&ServerEvent::Notice {
            message: format!("{username} joined!"),
        });
        let snapshot = self.roster.snapshot();
        self.fanout.publish(&ServerEvent::PlayerList {
            player_list: snapshot.clone(),
        });

        if self.turn.is_none() {
            let first = self.roster.first_id();
            self.set_turn(first);
        } else if let Some(event) = self.turn_event() {
            self.fanout.send_to(session, event);
        }

        snapshot
    }

    fn handle_leave(&mut self, session: SessionId) -> Result<(), RoomError> {
        let player_id = self
            .fanout
            .remove(session)
            .ok_or(RoomError::NotJoined(session, self.room_id))?;

        tracing::info!(
            room_id = %self.room_id,
            %player_id,
            %session,
            sessions = self.fanout.len(),
            "player left"
        );

        self.fanout.publish(&ServerEvent::PlayerList {
            player_list: self.roster.snapshot(),
        });

        if self.config.skip_turn_on_disconnect
            && self.turn == Some(player_id)
            && !self.fanout.is_present(player_id)
        {
            let next = turn::advance(&self.roster.ids(), self.turn);
            if next != self.turn {
                tracing::info!(room_id = %self.room_id, %player_id, "skipping absent player's turn");
                self.set_turn(next);
            }
        }

        Ok(())
    }

    fn handle_select_character(
        &mut self,
        session: SessionId,
        name: &str,
    ) -> Result<(), RoomError> {
        let player_id = self.member(session)?;
        let character: Character = name
            .parse()
            .map_err(|_| RoomError::UnknownCharacter(name.to_string()))?;

        let current = self
            .roster
            .get(player_id)
            .ok_or(RoomError::NotJoined(session, self.room_id))?
            .character;
        if let Some(current) = current {
            return Err(RoomError::CharacterAlreadySelected(current));
        }
        if self.roster.holder_of(character).is_some() {
            return Err(RoomError::CharacterTaken(character));
        }
        let start = character.starting_space();
        if self.roster.occupied_except(player_id).contains(&start) {
            return Err(RoomError::StartingSpaceOccupied {
                character,
                space: start,
            });
        }

        let player = self
            .roster
            .get_mut(player_id)
            .ok_or(RoomError::NotJoined(session, self.room_id))?;
        player.character = Some(character);
        player.location = Some(start);
        player.has_moved = false;
        let record = player.clone();
        self.persist(PersistOp::Player(record));

        tracing::info!(room_id = %self.room_id, %player_id, %character, "character selected");

        self.fanout.publish(&ServerEvent::PlayerList {
            player_list: self.roster.snapshot(),
        });
        self.fanout.publish(&ServerEvent::Moved {
            character: character.name().to_string(),
            from: String::new(),
            to: start.name().to_string(),
        });
        Ok(())
    }

    fn handle_move(&mut self, session: SessionId, location: &str) -> Result<(), RoomError> {
        let player_id = self.member(session)?;
        if self.turn != Some(player_id) {
            return Err(RoomError::NotYourTurn);
        }

        let (character, current, has_moved) = {
            let player = self
                .roster
                .get(player_id)
                .ok_or(RoomError::NotJoined(session, self.room_id))?;
            (player.character, player.location, player.has_moved)
        };
        let character = character.ok_or(RoomError::CharacterNotSelected)?;

        // The first move must leave from the starting space; after that the
        // token moves from wherever it is.
        let start = character.starting_space();
        let origin = if has_moved {
            current
        } else {
            current.filter(|&here| here == start)
        };
        let destination = location.parse::<Space>().ok();
        let occupied = self.roster.occupied_except(player_id);

        let (from, to) = match (origin, destination) {
            (Some(from), Some(to)) if is_legal(self.board, &occupied, from, to) => (from, to),
            _ if !has_moved => {
                return Err(RoomError::InvalidFirstMove {
                    start,
                    to: location.to_string(),
                });
            }
            _ => {
                return Err(RoomError::InvalidMove {
                    from: current.map_or("nowhere", Space::name).to_string(),
                    to: location.to_string(),
                });
            }
        };

        let player = self
            .roster
            .get_mut(player_id)
            .ok_or(RoomError::NotJoined(session, self.room_id))?;
        player.location = Some(to);
        player.has_moved = true;
        let record = player.clone();
        self.persist(PersistOp::Player(record));

        tracing::info!(room_id = %self.room_id, %player_id, %from, %to, "player moved");

        self.fanout.publish(&ServerEvent::Moved {
            character: character.name().to_string(),
            from: from.name().to_string(),
            to: to.name().to_string(),
        });
        self.fanout.publish(&ServerEvent::PlayerList {
            player_list: self.roster.snapshot(),
        });

        let next = turn::advance(&self.roster.ids(), self.turn);
        self.set_turn(next);
        Ok(())
    }

    /// Points the turn at `next`, persists it, and announces it.
    fn set_turn(&mut self, next: Option<PlayerId>) {
        self.turn = next;
        self.persist(PersistOp::Turn(next));
        if let Some(event) = self.turn_event() {
            tracing::debug!(room_id = %self.room_id, turn = ?next, "turn advanced");
            self.fanout.publish(&event);
        }
    }

    fn turn_event(&self) -> Option<ServerEvent> {
        let player = self.roster.get(self.turn?)?;
        Some(ServerEvent::Turn {
            turn: turn::announcement(player),
        })
    }

    fn member(&self, session: SessionId) -> Result<PlayerId, RoomError> {
        self.fanout
            .player_of(session)
            .ok_or(RoomError::NotJoined(session, self.room_id))
    }

    /// Sends a rejected request's reason to the requester alone.
    fn report_rejection(&self, session: SessionId, result: &Result<(), RoomError>) {
        if let Err(e) = result {
            tracing::debug!(room_id = %self.room_id, %session, reason = %e, "request rejected");
            self.fanout.send_to(
                session,
                ServerEvent::Error {
                    error: e.to_string(),
                },
            );
        }
    }

    fn persist(&self, op: PersistOp) {
        if self.persist.send(op).is_err() {
            tracing::error!(room_id = %self.room_id, "persister gone, change not saved");
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.room_id,
            players: self.roster.snapshot(),
            turn: self.turn,
            sessions: self.fanout.len(),
        }
    }
}

/// Spawns a room actor (plus its persister) and returns a handle to it.
///
/// The actor loads the room's stored roster before it handles its first
/// command; commands sent meanwhile wait in the channel. If `predecessor`
/// is an earlier actor for the same room, loading waits until that actor
/// has stopped and its writes have landed.
pub(crate) fn spawn_room<S: GameStore>(
    room_id: RoomId,
    config: RoomConfig,
    store: Arc<S>,
    predecessor: Option<RoomHandle>,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(config.channel_size.max(1));
    let (stopped_tx, stopped_rx) = watch::channel(false);

    tokio::spawn(async move {
        if let Some(predecessor) = predecessor {
            predecessor.stopped().await;
        }

        let (persist_tx, persist_rx) = mpsc::unbounded_channel();
        let persister = tokio::spawn(persist::run_persister(
            room_id,
            Arc::clone(&store),
            persist_rx,
        ));

        let (players, stored_turn) = persist::hydrate(room_id, store.as_ref()).await;
        let roster = Roster::from_records(players);
        // A stored pointer must name someone on the roster.
        let turn = stored_turn
            .filter(|&id| roster.contains(id))
            .or_else(|| roster.first_id());

        let actor = RoomActor {
            room_id,
            config,
            board: BoardGraph::classic(),
            roster,
            turn,
            fanout: Fanout::new(room_id),
            persist: persist_tx,
            receiver: rx,
        };
        if turn != stored_turn {
            actor.persist(PersistOp::Turn(turn));
        }
        // Consumes the actor, so the persist queue closes when it returns.
        actor.run().await;

        if let Err(e) = persister.await {
            tracing::error!(%room_id, error = %e, "persister task failed");
        }
        stopped_tx.send_replace(true);
    });

    RoomHandle {
        room_id,
        sender: tx,
        stopped: stopped_rx,
    }
}
