use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{GameError, GameSettings, GameState, LeaderboardEntry, Player, PlayerId, SessionId};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ClientMessage {
    StartSession {
        settings: GameSettings,
        player_names: Vec<String>,
    },
    UpdateDraft { text: String },
    SubmitWord { text: String },
    CancelSession,
    Rematch,
    RequestState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum MistakeKind {
    Timeout,
    DuplicateWord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ServerMessage {
    SessionStarted {
        session_id: SessionId,
        players: Vec<Player>,
        category: String,
    },
    TurnChanged {
        current_player_index: usize,
        time_remaining: u32,
    },
    TimerTicked { time_remaining: u32 },
    WordAccepted {
        player_id: PlayerId,
        word: String,
        points: u32,
    },
    MistakeMade {
        player_id: PlayerId,
        kind: MistakeKind,
        lives_remaining: u8,
    },
    PlayerEliminated { player_id: PlayerId },
    SessionFinished {
        leaderboard: Vec<LeaderboardEntry>,
        winner: Option<Player>,
    },
    SessionCancelled,
    StateSnapshot { state: GameState },
    Aborted { error: GameError },
}
