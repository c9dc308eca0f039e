use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::GamePhase;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameError {
    InvalidConfiguration { reason: String },
    InvariantViolation { detail: String },
    NotInPhase { expected: GamePhase, actual: GamePhase },
    SessionClosed,
}
