use game_types::{
    GamePhase, GameSettings, GameState, LeaderboardEntry, MAX_PLAYERS, MIN_PLAYERS, Player,
    PlayerId, SessionId, TIMER_CHOICES,
};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    ClockTick, EliminationPolicy, GameEvent, GameEventBus, GameEventHandler, GameRng,
    MistakeReason, PlayerRegistry, ScoringEngine, SessionError, Standings, TurnClock,
    TurnOutcome, UsedWords, WORD_POINTS, WordBank, advance_turn, normalize_word,
};

#[derive(Debug, Clone, PartialEq)]
pub enum TurnResolution {
    Advanced { next_player_index: usize },
    Finished { winner: Option<PlayerId> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Blank submission: nothing happened.
    Ignored,
    Accepted {
        word: String,
        points: u32,
        resolution: TurnResolution,
    },
    Mistake {
        player_id: PlayerId,
        reason: MistakeReason,
        lives_remaining: u8,
        eliminated: bool,
        resolution: TurnResolution,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Running { time_remaining: u32 },
    Expired(SubmitOutcome),
}

/// One game from setup to a single winner.
///
/// The session is the only writer of turn and phase state. Every mutation
/// goes through its methods and is announced on its event bus.
#[derive(Debug)]
pub struct GameSession {
    id: SessionId,
    word_bank: Arc<WordBank>,
    rng: GameRng,
    event_bus: GameEventBus,
    word_points: u32,
    settings: GameSettings,
    registry: PlayerRegistry,
    phase: GamePhase,
    current: usize,
    category: String,
    draft: String,
    used_words: UsedWords,
    clock: TurnClock,
    turn_number: u64,
    elimination_order: Vec<PlayerId>,
    standings: Option<Standings>,
    pending_leaderboard: Option<Vec<LeaderboardEntry>>,
}

impl GameSession {
    pub fn new(word_bank: Arc<WordBank>, rng: GameRng) -> Self {
        let settings = GameSettings::default();
        let clock = TurnClock::new(settings.timer_seconds);

        Self {
            id: Uuid::new_v4(),
            word_bank,
            rng,
            event_bus: GameEventBus::new(),
            word_points: WORD_POINTS,
            settings,
            registry: PlayerRegistry::default(),
            phase: GamePhase::Setup,
            current: 0,
            category: String::new(),
            draft: String::new(),
            used_words: UsedWords::new(),
            clock,
            turn_number: 0,
            elimination_order: Vec::new(),
            standings: None,
            pending_leaderboard: None,
        }
    }

    pub fn with_word_points(mut self, points: u32) -> Self {
        self.word_points = points;
        self
    }

    pub fn add_handler(&mut self, handler: Box<dyn GameEventHandler>) {
        self.event_bus.add_handler(handler);
        debug!(
            "Session {} has {} event handlers",
            self.id,
            self.event_bus.handler_count()
        );
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn players(&self) -> &[Player] {
        self.registry.as_slice()
    }

    pub fn current_player_index(&self) -> usize {
        self.current
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.registry.get(self.current)
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn used_words(&self) -> &[String] {
        self.used_words.as_slice()
    }

    pub fn time_remaining(&self) -> u32 {
        self.clock.remaining()
    }

    /// Increments every time a turn starts; lets drivers notice player changes.
    pub fn turn_number(&self) -> u64 {
        self.turn_number
    }

    pub fn elimination_order(&self) -> &[PlayerId] {
        &self.elimination_order
    }

    pub fn standings(&self) -> Option<&Standings> {
        self.standings.as_ref()
    }

    pub fn rng_seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn snapshot(&self) -> GameState {
        GameState {
            session_id: self.id,
            current_player: self.current,
            current_category: self.category.clone(),
            current_word: self.draft.clone(),
            used_words: self.used_words.as_slice().to_vec(),
            time_remaining: self.clock.remaining(),
            is_game_active: self.phase == GamePhase::Playing,
            game_phase: self.phase,
        }
    }

    /// Leaderboard entries of a finished game. Yields them exactly once.
    pub fn take_pending_leaderboard(&mut self) -> Option<Vec<LeaderboardEntry>> {
        self.pending_leaderboard.take()
    }

    pub fn start<S: AsRef<str>>(
        &mut self,
        settings: GameSettings,
        player_names: &[S],
    ) -> Result<(), SessionError> {
        self.require_phase(GamePhase::Setup)?;
        self.validate(&settings, player_names)?;

        let registry = PlayerRegistry::from_names(player_names, &mut self.rng);
        self.begin(self.id, settings, registry)
    }

    /// Replace a finished game with a brand-new one: fresh id, same players
    /// and settings, everyone back to full health.
    pub fn rematch(&mut self) -> Result<(), SessionError> {
        self.require_phase(GamePhase::Finished)?;
        if self.registry.is_empty() {
            return Err(SessionError::InvalidConfiguration(
                "Nothing to replay: the session never started".to_string(),
            ));
        }

        let mut registry = self.registry.clone();
        registry.reset_for_new_session();
        self.begin(Uuid::new_v4(), self.settings.clone(), registry)
    }

    pub fn update_draft(&mut self, text: &str) -> Result<(), SessionError> {
        self.require_phase(GamePhase::Playing)?;
        self.draft = text.to_string();
        Ok(())
    }

    pub fn submit_word(&mut self, text: &str) -> Result<SubmitOutcome, SessionError> {
        self.require_phase(GamePhase::Playing)?;

        let word = normalize_word(text);
        if word.is_empty() {
            debug!("Ignoring blank submission in session {}", self.id);
            return Ok(SubmitOutcome::Ignored);
        }

        if self.used_words.contains(&word) {
            debug!("Word '{}' already used in session {}", word, self.id);
            return self.register_mistake(MistakeReason::DuplicateWord);
        }

        let mut player = self.active_current_player()?.clone();
        player.score += self.word_points;
        let player_id = player.id;
        self.used_words.insert(&word);
        self.commit_current(player)?;

        debug!("Player {} scored {} for '{}'", player_id, self.word_points, word);
        self.event_bus.publish(GameEvent::WordAccepted {
            session_id: self.id,
            player_id,
            word: word.clone(),
            points: self.word_points,
        });

        let resolution = self.advance_from_current()?;
        Ok(SubmitOutcome::Accepted {
            word,
            points: self.word_points,
            resolution,
        })
    }

    pub fn on_timer_expired(&mut self) -> Result<SubmitOutcome, SessionError> {
        self.require_phase(GamePhase::Playing)?;
        self.register_mistake(MistakeReason::Timeout)
    }

    /// Advance the turn clock by one second.
    pub fn tick(&mut self) -> Result<TickOutcome, SessionError> {
        self.require_phase(GamePhase::Playing)?;

        match self.clock.tick() {
            ClockTick::Running(time_remaining) => {
                self.event_bus.publish(GameEvent::TimerTicked {
                    session_id: self.id,
                    time_remaining,
                });
                Ok(TickOutcome::Running { time_remaining })
            }
            ClockTick::Expired => Ok(TickOutcome::Expired(
                self.register_mistake(MistakeReason::Timeout)?,
            )),
        }
    }

    /// Abandon the session. No winner is declared and nothing is recorded.
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        if self.phase == GamePhase::Finished {
            return Err(SessionError::NotInPhase {
                expected: GamePhase::Playing,
                actual: self.phase,
            });
        }

        self.phase = GamePhase::Finished;
        self.draft.clear();
        info!("Session {} cancelled", self.id);
        self.event_bus
            .publish(GameEvent::SessionCancelled { session_id: self.id });
        Ok(())
    }

    fn validate<S: AsRef<str>>(
        &self,
        settings: &GameSettings,
        player_names: &[S],
    ) -> Result<(), SessionError> {
        let count = player_names.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(SessionError::InvalidConfiguration(format!(
                "Invalid number of players: {} (allowed {}-{})",
                count, MIN_PLAYERS, MAX_PLAYERS
            )));
        }
        if settings.number_of_players != count {
            return Err(SessionError::InvalidConfiguration(format!(
                "Settings expect {} players but {} were named",
                settings.number_of_players, count
            )));
        }
        if let Some(position) = player_names.iter().position(|n| n.as_ref().trim().is_empty()) {
            return Err(SessionError::InvalidConfiguration(format!(
                "Player {} has no name",
                position + 1
            )));
        }
        if !TIMER_CHOICES.contains(&settings.timer_seconds) {
            return Err(SessionError::InvalidConfiguration(format!(
                "Invalid timer length: {}s (allowed {:?})",
                settings.timer_seconds, TIMER_CHOICES
            )));
        }
        if let Some(unknown) = settings
            .categories
            .iter()
            .find(|name| self.word_bank.find_category(name).is_none())
        {
            return Err(SessionError::InvalidConfiguration(format!(
                "Unknown category: {}",
                unknown
            )));
        }
        if settings.categories.is_empty()
            && self
                .word_bank
                .categories_by_difficulty(settings.difficulty)
                .is_empty()
        {
            return Err(SessionError::InvalidConfiguration(format!(
                "No categories available for difficulty {}",
                settings.difficulty
            )));
        }
        Ok(())
    }

    fn begin(
        &mut self,
        id: SessionId,
        settings: GameSettings,
        registry: PlayerRegistry,
    ) -> Result<(), SessionError> {
        // Everything that can fail runs before the session is touched.
        if registry.len() < MIN_PLAYERS {
            return Err(SessionError::InvalidConfiguration(format!(
                "Need at least {} players, have {}",
                MIN_PLAYERS,
                registry.len()
            )));
        }
        if registry.get(0).is_none_or(|first| first.is_eliminated) {
            return Err(SessionError::InvalidConfiguration(
                "First player cannot take a turn".to_string(),
            ));
        }
        let category = self.pick_category(&settings)?;

        self.id = id;
        self.clock = TurnClock::new(settings.timer_seconds);
        self.settings = settings;
        self.registry = registry;
        self.category = category;
        self.current = 0;
        self.draft.clear();
        self.used_words = UsedWords::new();
        self.elimination_order.clear();
        self.standings = None;
        self.pending_leaderboard = None;
        self.turn_number = 1;
        self.phase = GamePhase::Playing;

        info!(
            "Session {} started: {} players, category '{}', {}s turns, seed {}",
            self.id,
            self.registry.len(),
            self.category,
            self.clock.duration(),
            self.rng.seed()
        );

        self.event_bus.publish(GameEvent::SessionStarted {
            session_id: self.id,
            players: self.registry.as_slice().to_vec(),
            category: self.category.clone(),
        });
        self.publish_turn_changed()?;
        Ok(())
    }

    fn pick_category(&mut self, settings: &GameSettings) -> Result<String, SessionError> {
        let category = if settings.categories.is_empty() {
            self.word_bank
                .random_category(&mut self.rng, Some(settings.difficulty))
                .map_err(|e| SessionError::InvalidConfiguration(e.to_string()))?
        } else {
            let name = self.rng.pick(&settings.categories).ok_or_else(|| {
                SessionError::InvalidConfiguration("Category pool is empty".to_string())
            })?;
            self.word_bank.find_category(name).ok_or_else(|| {
                SessionError::InvalidConfiguration(format!("Unknown category: {}", name))
            })?
        };
        Ok(category.name.clone())
    }

    fn require_phase(&self, expected: GamePhase) -> Result<(), SessionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(SessionError::NotInPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn active_current_player(&self) -> Result<&Player, SessionError> {
        let player = self.registry.get(self.current).ok_or_else(|| {
            SessionError::InvariantViolation(format!(
                "current player index {} out of range",
                self.current
            ))
        })?;
        if player.is_eliminated {
            return Err(SessionError::InvariantViolation(format!(
                "eliminated player {} holds the turn",
                player.name
            )));
        }
        Ok(player)
    }

    fn commit_current(&mut self, player: Player) -> Result<(), SessionError> {
        self.registry
            .replace(self.current, player)
            .map(|_| ())
            .ok_or_else(|| {
                SessionError::InvariantViolation(format!(
                    "cannot update player at index {}",
                    self.current
                ))
            })
    }

    fn register_mistake(&mut self, reason: MistakeReason) -> Result<SubmitOutcome, SessionError> {
        let player = self.active_current_player()?;
        let updated = EliminationPolicy::apply_mistake(player);
        let player_id = updated.id;
        let lives_remaining = updated.lives;
        let eliminated = updated.is_eliminated;

        // The next player is chosen while the current one still counts as
        // active. When this elimination leaves a single survivor the turn
        // engine is not consulted at all.
        let game_continues = !eliminated || self.registry.active_count() > 2;
        let next = if game_continues {
            Some(advance_turn(self.registry.as_slice(), self.current)?)
        } else {
            None
        };

        self.commit_current(updated)?;
        self.event_bus.publish(GameEvent::MistakeMade {
            session_id: self.id,
            player_id,
            reason,
            lives_remaining,
        });

        if eliminated {
            self.elimination_order.push(player_id);
            info!("Player {} eliminated from session {}", player_id, self.id);
            self.event_bus.publish(GameEvent::PlayerEliminated {
                session_id: self.id,
                player_id,
            });
        }

        let resolution = match next {
            Some(TurnOutcome::Next(index)) => self.begin_turn(index)?,
            Some(TurnOutcome::GameOver) | None => self.finish()?,
        };

        Ok(SubmitOutcome::Mistake {
            player_id,
            reason,
            lives_remaining,
            eliminated,
            resolution,
        })
    }

    fn advance_from_current(&mut self) -> Result<TurnResolution, SessionError> {
        match advance_turn(self.registry.as_slice(), self.current)? {
            TurnOutcome::Next(index) => self.begin_turn(index),
            TurnOutcome::GameOver => self.finish(),
        }
    }

    fn begin_turn(&mut self, index: usize) -> Result<TurnResolution, SessionError> {
        self.current = index;
        self.clock.reset();
        self.draft.clear();
        self.turn_number += 1;
        self.publish_turn_changed()?;
        Ok(TurnResolution::Advanced {
            next_player_index: index,
        })
    }

    fn publish_turn_changed(&mut self) -> Result<(), SessionError> {
        let player_id = self.active_current_player()?.id;
        debug!(
            "Session {} turn {}: player {} ({}s)",
            self.id,
            self.turn_number,
            self.current,
            self.clock.remaining()
        );
        self.event_bus.publish(GameEvent::TurnChanged {
            session_id: self.id,
            current_player_index: self.current,
            player_id,
            time_remaining: self.clock.remaining(),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<TurnResolution, SessionError> {
        let standings = ScoringEngine::finalize(self.registry.as_slice(), &self.elimination_order)?;
        let timestamp = chrono::Utc::now().to_rfc3339();
        let leaderboard = ScoringEngine::leaderboard_entries(&standings, self.id, &timestamp);
        let winner = standings
            .winner
            .and_then(|id| self.registry.index_of(id))
            .and_then(|index| self.registry.get(index))
            .cloned();

        self.phase = GamePhase::Finished;
        self.draft.clear();
        let winner_id = standings.winner;
        self.standings = Some(standings);
        self.pending_leaderboard = Some(leaderboard.clone());

        match &winner {
            Some(player) => info!("Session {} finished, winner {}", self.id, player.name),
            None => info!("Session {} finished without a single survivor", self.id),
        }

        self.event_bus.publish(GameEvent::SessionFinished {
            session_id: self.id,
            leaderboard,
            winner,
        });

        Ok(TurnResolution::Finished { winner: winner_id })
    }
}
