use crate::{PlayerId, SessionId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

pub const MIN_PLAYERS: usize = 3;
pub const MAX_PLAYERS: usize = 6;
/// Per-turn timer lengths offered at setup, in seconds.
pub const TIMER_CHOICES: [u32; 3] = [5, 10, 15];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("Unknown difficulty: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameSettings {
    pub number_of_players: usize,
    pub difficulty: Difficulty,
    pub timer_seconds: u32,
    pub categories: Vec<String>, // Empty means every category of the difficulty
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            number_of_players: MIN_PLAYERS,
            difficulty: Difficulty::Easy,
            timer_seconds: TIMER_CHOICES[0],
            categories: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GamePhase {
    Setup,
    Playing,
    Finished,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GamePhase::Setup => "setup",
            GamePhase::Playing => "playing",
            GamePhase::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// Read-only snapshot of a session for presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameState {
    pub session_id: SessionId,
    pub current_player: usize,
    pub current_category: String,
    pub current_word: String,
    pub used_words: Vec<String>,
    pub time_remaining: u32,
    pub is_game_active: bool,
    pub game_phase: GamePhase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LeaderboardEntry {
    pub player_name: String,
    pub score: u32,
    pub date: String, // ISO 8601 string
    pub game_id: SessionId,
}

/// One player's final placement in a finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FinalStanding {
    pub player_id: PlayerId,
    pub player_name: String,
    pub rank: u32,
    pub placement_score: u32,
    pub word_points: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AppSettings {
    pub music: bool,
    pub vibration: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            music: true,
            vibration: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parsing() {
        assert_eq!("easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!(" Medium ".parse::<Difficulty>(), Ok(Difficulty::Medium));
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("impossible".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_default_settings() {
        let settings = GameSettings::default();
        assert_eq!(settings.number_of_players, 3);
        assert_eq!(settings.difficulty, Difficulty::Easy);
        assert_eq!(settings.timer_seconds, 5);
        assert!(settings.categories.is_empty());
    }

    #[test]
    fn test_phase_serialization() {
        let json = serde_json::to_string(&GamePhase::Playing).unwrap();
        assert_eq!(json, "\"Playing\"");
        assert_eq!(GamePhase::Finished.to_string(), "finished");
    }
}
