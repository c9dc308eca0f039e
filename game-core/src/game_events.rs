use game_types::{LeaderboardEntry, Player, PlayerId, SessionId};

use crate::MistakeReason;

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    SessionStarted {
        session_id: SessionId,
        players: Vec<Player>,
        category: String,
    },
    TurnChanged {
        session_id: SessionId,
        current_player_index: usize,
        player_id: PlayerId,
        time_remaining: u32,
    },
    TimerTicked {
        session_id: SessionId,
        time_remaining: u32,
    },
    WordAccepted {
        session_id: SessionId,
        player_id: PlayerId,
        word: String,
        points: u32,
    },
    MistakeMade {
        session_id: SessionId,
        player_id: PlayerId,
        reason: MistakeReason,
        lives_remaining: u8,
    },
    PlayerEliminated {
        session_id: SessionId,
        player_id: PlayerId,
    },
    SessionFinished {
        session_id: SessionId,
        leaderboard: Vec<LeaderboardEntry>,
        winner: Option<Player>,
    },
    SessionCancelled {
        session_id: SessionId,
    },
}

impl GameEvent {
    pub fn session_id(&self) -> SessionId {
        match self {
            GameEvent::SessionStarted { session_id, .. } => *session_id,
            GameEvent::TurnChanged { session_id, .. } => *session_id,
            GameEvent::TimerTicked { session_id, .. } => *session_id,
            GameEvent::WordAccepted { session_id, .. } => *session_id,
            GameEvent::MistakeMade { session_id, .. } => *session_id,
            GameEvent::PlayerEliminated { session_id, .. } => *session_id,
            GameEvent::SessionFinished { session_id, .. } => *session_id,
            GameEvent::SessionCancelled { session_id } => *session_id,
        }
    }
}

/// Event handler trait for processing game events
pub trait GameEventHandler: Send {
    fn handle_event(&mut self, event: GameEvent);
}

/// Simple event bus for distributing game events
pub struct GameEventBus {
    handlers: Vec<Box<dyn GameEventHandler>>,
}

impl GameEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn GameEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn publish(&mut self, event: GameEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(event.clone());
        }
    }
}

impl Default for GameEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GameEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEventBus")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
