use game_core::{
    GameEvent, GameEventHandler, GameRng, GameSession, SessionError, SubmitOutcome, WORD_POINTS,
    WordBank,
};
use game_types::{
    ClientMessage, GameError, GamePhase, GameSettings, GameState, ServerMessage, SessionId,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::leaderboard::LeaderboardRepository;

const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq)]
pub struct DriverOptions {
    /// Fixed seed for reproducible games; entropy when absent.
    pub rng_seed: Option<u64>,
    pub word_points: u32,
    pub command_buffer: usize,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            rng_seed: None,
            word_points: WORD_POINTS,
            command_buffer: 32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DriverError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Session task is no longer running")]
    Closed,
}

impl From<&DriverError> for GameError {
    fn from(error: &DriverError) -> Self {
        match error {
            DriverError::Session(e) => e.into(),
            DriverError::Closed => GameError::SessionClosed,
        }
    }
}

type Reply<T> = oneshot::Sender<Result<T, SessionError>>;

#[derive(Debug)]
enum SessionCommand {
    Start {
        settings: GameSettings,
        player_names: Vec<String>,
        reply: Reply<SessionId>,
    },
    UpdateDraft {
        text: String,
        reply: Reply<()>,
    },
    SubmitWord {
        text: String,
        reply: Reply<SubmitOutcome>,
    },
    TimerExpired {
        reply: Reply<SubmitOutcome>,
    },
    Cancel {
        reply: Reply<()>,
    },
    Rematch {
        reply: Reply<SessionId>,
    },
    Snapshot {
        reply: oneshot::Sender<GameState>,
    },
}

/// Cloneable front door to a running session task.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub async fn start_session(
        &self,
        settings: GameSettings,
        player_names: Vec<String>,
    ) -> Result<SessionId, DriverError> {
        self.request(|reply| SessionCommand::Start {
            settings,
            player_names,
            reply,
        })
        .await
    }

    pub async fn update_draft(&self, text: &str) -> Result<(), DriverError> {
        let text = text.to_string();
        self.request(|reply| SessionCommand::UpdateDraft { text, reply })
            .await
    }

    pub async fn submit_word(&self, text: &str) -> Result<SubmitOutcome, DriverError> {
        let text = text.to_string();
        self.request(|reply| SessionCommand::SubmitWord { text, reply })
            .await
    }

    pub async fn timer_expired(&self) -> Result<SubmitOutcome, DriverError> {
        self.request(|reply| SessionCommand::TimerExpired { reply })
            .await
    }

    pub async fn cancel_session(&self) -> Result<(), DriverError> {
        self.request(|reply| SessionCommand::Cancel { reply }).await
    }

    pub async fn rematch(&self) -> Result<SessionId, DriverError> {
        self.request(|reply| SessionCommand::Rematch { reply }).await
    }

    pub async fn snapshot(&self) -> Result<GameState, DriverError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(SessionCommand::Snapshot { reply })
            .await
            .map_err(|_| DriverError::Closed)?;
        response.await.map_err(|_| DriverError::Closed)
    }

    /// Route a client message. Only `RequestState` produces a direct answer;
    /// everything else is reported through the notification stream.
    pub async fn dispatch(
        &self,
        message: ClientMessage,
    ) -> Result<Option<ServerMessage>, DriverError> {
        match message {
            ClientMessage::StartSession {
                settings,
                player_names,
            } => self.start_session(settings, player_names).await.map(|_| None),
            ClientMessage::UpdateDraft { text } => self.update_draft(&text).await.map(|_| None),
            ClientMessage::SubmitWord { text } => self.submit_word(&text).await.map(|_| None),
            ClientMessage::CancelSession => self.cancel_session().await.map(|_| None),
            ClientMessage::Rematch => self.rematch().await.map(|_| None),
            ClientMessage::RequestState => {
                let state = self.snapshot().await?;
                Ok(Some(ServerMessage::StateSnapshot { state }))
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Reply<T>) -> SessionCommand,
    ) -> Result<T, DriverError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(build(reply))
            .await
            .map_err(|_| DriverError::Closed)?;
        let result = response.await.map_err(|_| DriverError::Closed)?;
        result.map_err(DriverError::from)
    }
}

/// Turns session events into outbound notifications.
pub struct NotificationForwarder {
    sender: mpsc::UnboundedSender<ServerMessage>,
}

impl NotificationForwarder {
    pub fn new(sender: mpsc::UnboundedSender<ServerMessage>) -> Self {
        Self { sender }
    }
}

impl GameEventHandler for NotificationForwarder {
    fn handle_event(&mut self, event: GameEvent) {
        let message = match event {
            GameEvent::SessionStarted {
                session_id,
                players,
                category,
            } => ServerMessage::SessionStarted {
                session_id,
                players,
                category,
            },
            GameEvent::TurnChanged {
                current_player_index,
                time_remaining,
                ..
            } => ServerMessage::TurnChanged {
                current_player_index,
                time_remaining,
            },
            GameEvent::TimerTicked { time_remaining, .. } => {
                ServerMessage::TimerTicked { time_remaining }
            }
            GameEvent::WordAccepted {
                player_id,
                word,
                points,
                ..
            } => ServerMessage::WordAccepted {
                player_id,
                word,
                points,
            },
            GameEvent::MistakeMade {
                player_id,
                reason,
                lives_remaining,
                ..
            } => ServerMessage::MistakeMade {
                player_id,
                kind: reason.into(),
                lives_remaining,
            },
            GameEvent::PlayerEliminated { player_id, .. } => {
                ServerMessage::PlayerEliminated { player_id }
            }
            GameEvent::SessionFinished {
                leaderboard,
                winner,
                ..
            } => ServerMessage::SessionFinished {
                leaderboard,
                winner,
            },
            GameEvent::SessionCancelled { .. } => ServerMessage::SessionCancelled,
        };

        // Nobody listening is not an error for the game.
        let _ = self.sender.send(message);
    }
}

/// Move a new session into its own task.
///
/// The task is the only place session state changes. It serves commands in
/// arrival order and drives the turn clock with a one-second interval that
/// exists only while the session is playing.
pub fn spawn_session(
    options: DriverOptions,
    word_bank: Arc<WordBank>,
    leaderboard: Arc<LeaderboardRepository>,
) -> (
    SessionHandle,
    mpsc::UnboundedReceiver<ServerMessage>,
    JoinHandle<()>,
) {
    let (command_sender, commands) = mpsc::channel(options.command_buffer.max(1));
    let (notification_sender, notifications) = mpsc::unbounded_channel();

    let rng = options
        .rng_seed
        .map(GameRng::new)
        .unwrap_or_else(GameRng::from_entropy);
    let mut session = GameSession::new(word_bank, rng).with_word_points(options.word_points);
    session.add_handler(Box::new(NotificationForwarder::new(
        notification_sender.clone(),
    )));

    let driver = SessionDriver {
        session,
        commands,
        notifications: notification_sender,
        leaderboard,
        timer: None,
        armed_turn: 0,
    };
    let task = tokio::spawn(driver.run());

    (
        SessionHandle {
            sender: command_sender,
        },
        notifications,
        task,
    )
}

enum Wake {
    Command(Option<SessionCommand>),
    Tick,
}

struct SessionDriver {
    session: GameSession,
    commands: mpsc::Receiver<SessionCommand>,
    notifications: mpsc::UnboundedSender<ServerMessage>,
    leaderboard: Arc<LeaderboardRepository>,
    timer: Option<Interval>,
    armed_turn: u64,
}

impl SessionDriver {
    async fn run(mut self) {
        loop {
            let wake = tokio::select! {
                command = self.commands.recv() => Wake::Command(command),
                _ = next_tick(&mut self.timer) => Wake::Tick,
            };

            let result = match wake {
                Wake::Command(Some(command)) => self.handle_command(command).await,
                Wake::Command(None) => {
                    debug!("All handles for session {} dropped", self.session.id());
                    break;
                }
                Wake::Tick => self.handle_tick().await,
            };

            if let Err(e) = result {
                error!("Aborting session {}: {}", self.session.id(), e);
                let _ = self
                    .notifications
                    .send(ServerMessage::Aborted { error: (&e).into() });
                break;
            }

            self.sync_timer();
        }

        self.timer = None;
        debug!("Session task for {} stopped", self.session.id());
    }

    /// Returns an error only when the session can no longer be trusted.
    async fn handle_command(&mut self, command: SessionCommand) -> Result<(), SessionError> {
        match command {
            SessionCommand::Start {
                settings,
                player_names,
                reply,
            } => {
                let result = self
                    .session
                    .start(settings, player_names.as_slice())
                    .map(|_| self.session.id());
                self.complete(reply, result).await
            }
            SessionCommand::UpdateDraft { text, reply } => {
                let result = self.session.update_draft(&text);
                self.complete(reply, result).await
            }
            SessionCommand::SubmitWord { text, reply } => {
                let result = self.session.submit_word(&text);
                self.complete(reply, result).await
            }
            SessionCommand::TimerExpired { reply } => {
                let result = self.session.on_timer_expired();
                self.complete(reply, result).await
            }
            SessionCommand::Cancel { reply } => {
                let result = self.session.cancel();
                self.complete(reply, result).await
            }
            SessionCommand::Rematch { reply } => {
                let result = self.session.rematch().map(|_| self.session.id());
                self.complete(reply, result).await
            }
            SessionCommand::Snapshot { reply } => {
                let _ = reply.send(self.session.snapshot());
                Ok(())
            }
        }
    }

    async fn handle_tick(&mut self) -> Result<(), SessionError> {
        match self.session.tick() {
            Ok(_) => {
                self.record_finished_session().await;
                Ok(())
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                debug!("Ignoring tick for session {}: {}", self.session.id(), e);
                Ok(())
            }
        }
    }

    async fn complete<T>(
        &mut self,
        reply: Reply<T>,
        result: Result<T, SessionError>,
    ) -> Result<(), SessionError> {
        self.record_finished_session().await;

        match result {
            Ok(value) => {
                let _ = reply.send(Ok(value));
                Ok(())
            }
            Err(e) if e.is_fatal() => {
                let _ = reply.send(Err(e.clone()));
                Err(e)
            }
            Err(e) => {
                warn!("Rejected command for session {}: {}", self.session.id(), e);
                let _ = reply.send(Err(e));
                Ok(())
            }
        }
    }

    /// Store the results of a game that just ended. Best effort: the game
    /// is already decided, so a storage failure is only logged.
    async fn record_finished_session(&mut self) {
        let Some(entries) = self.session.take_pending_leaderboard() else {
            return;
        };

        match self.leaderboard.append(&entries).await {
            Ok(()) => info!(
                "Recorded {} leaderboard entries for session {}",
                entries.len(),
                self.session.id()
            ),
            Err(e) => warn!(
                "Failed to record leaderboard for session {}: {:#}",
                self.session.id(),
                e
            ),
        }
    }

    /// Keep the interval in step with the session: a fresh countdown for
    /// every new turn, none at all outside `Playing`.
    fn sync_timer(&mut self) {
        if self.session.phase() != GamePhase::Playing {
            if self.timer.take().is_some() {
                debug!("Turn timer stopped for session {}", self.session.id());
            }
            return;
        }

        let turn = self.session.turn_number();
        if self.timer.is_none() || self.armed_turn != turn {
            let mut interval = time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            self.timer = Some(interval);
            self.armed_turn = turn;
        }
    }
}

async fn next_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
