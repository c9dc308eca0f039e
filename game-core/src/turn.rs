use game_types::Player;

use crate::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Next(usize),
    GameOver,
}

/// Pick the player who takes the next turn.
///
/// Scans forward from `current + 1` in array order, wrapping once, and
/// returns the first player that is not eliminated. Signals `GameOver` when
/// at most one player is still in the game. An empty roster, an out of
/// range index or an eliminated `current` player are invariant violations.
pub fn advance_turn(players: &[Player], current: usize) -> Result<TurnOutcome, SessionError> {
    if players.is_empty() {
        return Err(SessionError::InvariantViolation(
            "cannot advance turn with no players".to_string(),
        ));
    }
    if current >= players.len() {
        return Err(SessionError::InvariantViolation(format!(
            "current player index {} out of range for {} players",
            current,
            players.len()
        )));
    }
    if players.len() == 1 {
        return Ok(TurnOutcome::GameOver);
    }
    if players[current].is_eliminated {
        return Err(SessionError::InvariantViolation(format!(
            "current player {} is already eliminated",
            current
        )));
    }

    let active = players.iter().filter(|p| p.is_active()).count();
    if active <= 1 {
        return Ok(TurnOutcome::GameOver);
    }

    (1..players.len())
        .map(|step| (current + step) % players.len())
        .find(|&index| players[index].is_active())
        .map(TurnOutcome::Next)
        .ok_or_else(|| {
            SessionError::InvariantViolation(format!(
                "{} active players but none found after index {}",
                active, current
            ))
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTick {
    Running(u32),
    Expired,
}

/// Per-turn countdown in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnClock {
    duration: u32,
    remaining: u32,
}

impl TurnClock {
    pub fn new(duration: u32) -> Self {
        Self {
            duration,
            remaining: duration,
        }
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn reset(&mut self) {
        self.remaining = self.duration;
    }

    pub fn tick(&mut self) -> ClockTick {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            ClockTick::Expired
        } else {
            ClockTick::Running(self.remaining)
        }
    }
}
