//! Room actor: an isolated Tokio task that owns one game room.
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel. Connection handlers never touch room state
//! directly — they send commands through a [`RoomHandle`], and the actor
//! processes them strictly one at a time. That single-owner discipline
//! is what serializes concurrent mutation without any locks.
//!
//! Outbound events flow the other way: each player registers an
//! unbounded sender at join time, and the actor pushes [`ServerEvent`]s
//! into it. A send that fails (the player's connection is gone) is
//! logged and never aborts the sibling deliveries.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use wordspy_protocol::{
    ClientEvent, ClientFrame, Player, PlayerId, Recipient, RoomId, ServerEvent,
    SetNamePayload, SetVotePayload,
};
use wordspy_words::WordDeck;

use crate::{GameState, RoomConfig, RoomError, RoomPhase};

/// Channel sender for delivering outbound events to one player's
/// connection.
pub type PlayerSender = mpsc::UnboundedSender<ServerEvent>;

/// Commands sent to a room actor through its channel.
pub(crate) enum RoomCommand {
    /// Add an identified player to the room.
    Join {
        player: Player,
        sender: PlayerSender,
        reply: oneshot::Sender<()>,
    },

    /// Remove a player. Replies with the remaining player count so the
    /// registry can reap an empty room.
    Leave {
        player_id: PlayerId,
        reply: oneshot::Sender<usize>,
    },

    /// A post-join event frame from a player.
    Event {
        player_id: PlayerId,
        frame: ClientFrame,
    },

    /// The start countdown elapsed. Sent by the countdown task back
    /// into the room's own channel.
    StartRound,

    /// Request a metadata snapshot.
    Info { reply: oneshot::Sender<RoomInfo> },

    /// Shut down the room.
    Shutdown,
}

/// A snapshot of room metadata (not the game state itself).
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub phase: RoomPhase,
    pub player_count: usize,
    pub rounds: u32,
}

/// Handle to a running room actor. Cheap to clone — it's just an
/// `mpsc::Sender` wrapper. The registry holds one per room.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// Returns the room's unique id.
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Adds a player and waits until the actor has processed the join
    /// (and sent the roster + joined notifications).
    pub async fn join(
        &self,
        player: Player,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                player,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    /// Removes a player; returns how many players remain.
    pub async fn leave(&self, player_id: PlayerId) -> Result<usize, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Leave {
                player_id,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    /// Delivers an inbound event frame (fire-and-forget).
    pub async fn event(
        &self,
        player_id: PlayerId,
        frame: ClientFrame,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Event { player_id, frame })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    /// Requests the current room metadata.
    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Info { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    state: GameState,
    config: RoomConfig,
    deck: Arc<WordDeck>,
    /// Per-player outbound channels, keyed by player id.
    senders: HashMap<PlayerId, PlayerSender>,
    receiver: mpsc::Receiver<RoomCommand>,
    /// Clone of the room's own command sender, used by the countdown
    /// task to deliver `StartRound`.
    self_sender: mpsc::Sender<RoomCommand>,
    /// The pending start countdown, if one is running. Kept so room
    /// destruction can abort it; ready toggles deliberately can't.
    countdown: Option<JoinHandle<()>>,
}

impl RoomActor {
    /// Runs the actor loop, processing commands until shutdown.
    async fn run(mut self) {
        tracing::info!(room_id = %self.state.room_id(), "room started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join {
                    player,
                    sender,
                    reply,
                } => {
                    self.handle_join(player, sender);
                    let _ = reply.send(());
                }
                RoomCommand::Leave { player_id, reply } => {
                    self.handle_leave(&player_id);
                    let _ = reply.send(self.state.player_count());
                }
                RoomCommand::Event { player_id, frame } => {
                    self.handle_event(&player_id, frame);
                }
                RoomCommand::StartRound => {
                    self.handle_start_round();
                }
                RoomCommand::Info { reply } => {
                    let _ = reply.send(self.info());
                }
                RoomCommand::Shutdown => {
                    tracing::info!(
                        room_id = %self.state.room_id(),
                        "room shutting down"
                    );
                    break;
                }
            }
        }

        if let Some(countdown) = self.countdown.take() {
            countdown.abort();
        }
        tracing::info!(room_id = %self.state.room_id(), "room stopped");
    }

    // -----------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------

    fn handle_join(&mut self, player: Player, sender: PlayerSender) {
        let player_id = player.player_id.clone();
        self.senders.insert(player_id.clone(), sender);
        self.state.add_player(player.clone());

        tracing::info!(
            room_id = %self.state.room_id(),
            %player_id,
            players = self.state.player_count(),
            "player joined"
        );

        self.broadcast_roster();
        self.send_to(&player_id, ServerEvent::PlayerJoined {
            current_player: player,
        });
    }

    fn handle_leave(&mut self, player_id: &PlayerId) {
        if self.state.remove_player(player_id).is_none() {
            tracing::warn!(
                room_id = %self.state.room_id(),
                %player_id,
                "tried to remove a player that wasn't in the room"
            );
            return;
        }
        self.senders.remove(player_id);

        tracing::info!(
            room_id = %self.state.room_id(),
            %player_id,
            players = self.state.player_count(),
            "player removed"
        );

        self.dispatch(vec![(
            Recipient::All,
            ServerEvent::PlayerDisconnect {
                disconnected_user: player_id.clone(),
            },
        )]);
        self.broadcast_roster();
    }

    // -----------------------------------------------------------------
    // Event dispatch
    // -----------------------------------------------------------------

    /// Routes a post-join frame to its handler. Unknown event tags and
    /// events from non-members are logged and ignored — nothing goes
    /// back to the sender.
    fn handle_event(&mut self, player_id: &PlayerId, frame: ClientFrame) {
        if self.state.player(player_id).is_none() {
            tracing::warn!(
                room_id = %self.state.room_id(),
                %player_id,
                "event from non-member, ignoring"
            );
            return;
        }

        let Some(event) = ClientEvent::parse(&frame.event) else {
            tracing::info!(
                room_id = %self.state.room_id(),
                event = %frame.event,
                "unknown event"
            );
            return;
        };

        match event {
            ClientEvent::SetReady => self.handle_set_ready(player_id),
            ClientEvent::RemoveReady => self.handle_remove_ready(player_id),
            ClientEvent::SetName => self.handle_set_name(player_id, frame.data),
            ClientEvent::EndTurn => self.handle_end_turn(player_id),
            ClientEvent::SetVote => self.handle_set_vote(player_id, frame.data),
            ClientEvent::ResetRoom => self.handle_reset_room(),
        }
    }

    fn handle_set_ready(&mut self, player_id: &PlayerId) {
        self.state.set_ready(player_id);
        self.broadcast_roster();

        // begin_countdown only transitions out of Waiting, so a
        // re-ready after the quorum already fired can't re-arm it.
        if self.state.all_ready() && self.state.begin_countdown() {
            tracing::info!(
                room_id = %self.state.room_id(),
                delay = ?self.config.countdown,
                "all players ready, starting countdown"
            );
            self.dispatch(vec![(Recipient::All, ServerEvent::CountdownStart {})]);
            self.schedule_start();
        }
    }

    fn handle_remove_ready(&mut self, player_id: &PlayerId) {
        self.state.unready(player_id);
        self.broadcast_roster();
    }

    fn handle_set_name(&mut self, player_id: &PlayerId, data: serde_json::Value) {
        let payload: SetNamePayload =
            serde_json::from_value(data).unwrap_or_default();
        if let Some(new_name) = payload.new_name {
            self.state.set_name(player_id, new_name);
        }
        self.broadcast_roster();
    }

    fn handle_end_turn(&mut self, player_id: &PlayerId) {
        if !self.state.phase().is_in_progress() {
            tracing::debug!(
                room_id = %self.state.room_id(),
                %player_id,
                phase = %self.state.phase(),
                "END_TURN outside a running round, ignoring"
            );
            return;
        }

        tracing::info!(
            room_id = %self.state.room_id(),
            %player_id,
            "turn ended"
        );
        self.state.end_turn(player_id);

        match self.state.whos_next().map(|p| p.player_id.clone()) {
            Some(next) => self.start_turn_of(&next),
            None => {
                self.state.begin_voting();
                self.dispatch(vec![(
                    Recipient::All,
                    ServerEvent::VotingStart { votes: None },
                )]);
            }
        }
    }

    fn handle_set_vote(&mut self, player_id: &PlayerId, data: serde_json::Value) {
        if !self.state.phase().is_voting() {
            tracing::debug!(
                room_id = %self.state.room_id(),
                %player_id,
                phase = %self.state.phase(),
                "SET_VOTE outside voting, ignoring"
            );
            return;
        }

        let payload: SetVotePayload =
            serde_json::from_value(data).unwrap_or_default();
        let Some(accused) = payload.voted else {
            return;
        };

        if !self.state.record_vote(player_id, &accused) {
            tracing::debug!(
                room_id = %self.state.room_id(),
                %player_id,
                %accused,
                "vote for non-member, ignoring"
            );
            return;
        }

        tracing::info!(
            room_id = %self.state.room_id(),
            voter = %player_id,
            %accused,
            "vote recorded"
        );
        self.dispatch(vec![(
            Recipient::All,
            ServerEvent::VotingStart {
                votes: Some(self.state.vote_map()),
            },
        )]);

        if self.state.all_voted() {
            self.show_impostor();
        }
    }

    fn handle_reset_room(&mut self) {
        // An explicit reset during the countdown also cancels the
        // pending start; ready toggles never do.
        if let Some(countdown) = self.countdown.take() {
            countdown.abort();
        }
        self.state.reset();
        tracing::info!(room_id = %self.state.room_id(), "room reset");
        self.broadcast_roster();
    }

    // -----------------------------------------------------------------
    // Round flow
    // -----------------------------------------------------------------

    /// Spawns the start countdown. The task only sends `StartRound`
    /// back into the room's channel — all state changes happen here in
    /// the actor.
    fn schedule_start(&mut self) {
        let sender = self.self_sender.clone();
        let delay = self.config.countdown;
        self.countdown = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = sender.send(RoomCommand::StartRound).await;
        }));
    }

    fn handle_start_round(&mut self) {
        self.countdown = None;

        if !self.state.phase().is_starting() {
            tracing::debug!(
                room_id = %self.state.room_id(),
                phase = %self.state.phase(),
                "countdown elapsed but room is no longer starting"
            );
            return;
        }

        let pair = self.deck.draw().clone();
        let Some(impostor) = self.state.begin_round(pair.word.clone()) else {
            tracing::warn!(
                room_id = %self.state.room_id(),
                "room emptied during countdown, not starting"
            );
            return;
        };

        tracing::info!(
            room_id = %self.state.room_id(),
            "round started, discussion ongoing"
        );

        // The impostor gets the decoy clue in the same payload shape;
        // everyone else gets the word.
        self.dispatch(vec![
            (
                Recipient::AllExcept(impostor.clone()),
                ServerEvent::GameStart {
                    is_impostor: false,
                    word: pair.word,
                },
            ),
            (
                Recipient::Player(impostor),
                ServerEvent::GameStart {
                    is_impostor: true,
                    word: pair.clue,
                },
            ),
        ]);

        if let Some(first) = self.state.whos_next().map(|p| p.player_id.clone()) {
            self.start_turn_of(&first);
        }
    }

    /// Marks a player as the current speaker, rebroadcasts the roster,
    /// and tells them privately that it's their turn.
    fn start_turn_of(&mut self, player_id: &PlayerId) {
        self.state.start_turn(player_id);
        self.broadcast_roster();
        self.send_to(player_id, ServerEvent::StartTurn {});
    }

    /// Reveals the impostor and the round outcome to everyone. Runs
    /// exactly once per round: voting ends here, in `Revealed`.
    fn show_impostor(&mut self) {
        let Some(impostor) = self.state.impostor().cloned() else {
            tracing::warn!(
                room_id = %self.state.room_id(),
                "all voted but no impostor is assigned"
            );
            return;
        };
        self.state.reveal();

        let event = ServerEvent::ShowImpostor {
            impostor,
            winner: self.state.winner(),
            votes: self.state.vote_tally(),
            word: self.state.the_word().unwrap_or_default().to_string(),
        };
        tracing::info!(room_id = %self.state.room_id(), "round revealed");
        self.dispatch(vec![(Recipient::All, event)]);
    }

    // -----------------------------------------------------------------
    // Broadcast
    // -----------------------------------------------------------------

    /// Sends the full roster to everyone. Follows any membership or
    /// status change.
    fn broadcast_roster(&self) {
        self.dispatch(vec![(
            Recipient::All,
            ServerEvent::UpdatedPlayersList {
                players: self.state.players().to_vec(),
            },
        )]);
    }

    /// Delivers outbound events to their recipients. Each delivery is
    /// independent — one dead connection never blocks the rest.
    fn dispatch(&self, events: Vec<(Recipient, ServerEvent)>) {
        for (recipient, event) in events {
            match recipient {
                Recipient::All => {
                    for player in self.state.players() {
                        self.send_to(&player.player_id, event.clone());
                    }
                }
                Recipient::Player(id) => {
                    self.send_to(&id, event);
                }
                Recipient::AllExcept(excluded) => {
                    for player in self.state.players() {
                        if player.player_id != excluded {
                            self.send_to(&player.player_id, event.clone());
                        }
                    }
                }
            }
        }
    }

    /// Sends one event to one player. A failed send (connection gone)
    /// is logged and swallowed — at-most-once, best-effort.
    fn send_to(&self, player_id: &PlayerId, event: ServerEvent) {
        let Some(sender) = self.senders.get(player_id) else {
            return;
        };
        if sender.send(event).is_err() {
            tracing::warn!(
                room_id = %self.state.room_id(),
                %player_id,
                "failed to deliver event, connection is gone"
            );
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.state.room_id().clone(),
            phase: self.state.phase(),
            player_count: self.state.player_count(),
            rounds: self.state.rounds(),
        }
    }
}

/// Spawns a new room actor task and returns a handle to it.
pub(crate) fn spawn_room(
    room_id: RoomId,
    rounds: u32,
    config: RoomConfig,
    deck: Arc<WordDeck>,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(64);

    let actor = RoomActor {
        state: GameState::new(room_id.clone(), rounds),
        config,
        deck,
        senders: HashMap::new(),
        receiver: rx,
        self_sender: tx.clone(),
        countdown: None,
    };

    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: tx,
    }
}
