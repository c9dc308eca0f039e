use game_types::{GameError, GamePhase};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    /// Rejected at session start; the session never enters `Playing`.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Programmer error. Callers must abort rather than continue.
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
    #[error("Session is {actual}, expected {expected}")]
    NotInPhase {
        expected: GamePhase,
        actual: GamePhase,
    },
}

impl SessionError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, SessionError::InvariantViolation(_))
    }
}

impl From<&SessionError> for GameError {
    fn from(error: &SessionError) -> Self {
        match error {
            SessionError::InvalidConfiguration(reason) => GameError::InvalidConfiguration {
                reason: reason.clone(),
            },
            SessionError::InvariantViolation(detail) => GameError::InvariantViolation {
                detail: detail.clone(),
            },
            SessionError::NotInPhase { expected, actual } => GameError::NotInPhase {
                expected: *expected,
                actual: *actual,
            },
        }
    }
}
