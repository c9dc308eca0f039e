use game_types::{BodyPart, MistakeKind, Player};

/// A player is out after this many mistakes.
pub const MAX_MISTAKES: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MistakeReason {
    Timeout,
    DuplicateWord,
}

impl From<MistakeReason> for MistakeKind {
    fn from(reason: MistakeReason) -> Self {
        match reason {
            MistakeReason::Timeout => MistakeKind::Timeout,
            MistakeReason::DuplicateWord => MistakeKind::DuplicateWord,
        }
    }
}

pub struct EliminationPolicy;

impl EliminationPolicy {
    /// Charge one mistake to `player` and return the updated record.
    ///
    /// Each mistake costs a life and a body part (arm, then leg, then head).
    /// The third mistake, or running out of lives, eliminates the player.
    /// An already eliminated player is returned unchanged.
    pub fn apply_mistake(player: &Player) -> Player {
        let mut updated = player.clone();
        if updated.is_eliminated {
            return updated;
        }

        updated.mistakes = updated.mistakes.saturating_add(1);
        updated.lives = updated.lives.saturating_sub(1);

        if let Some(part) = BodyPart::for_mistake(updated.mistakes) {
            updated.avatar.missing_parts.push(part);
        }
        updated.avatar.is_damaged = true;

        if updated.mistakes >= MAX_MISTAKES || updated.lives == 0 {
            updated.is_eliminated = true;
        }

        updated
    }
}
