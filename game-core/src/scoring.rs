use game_types::{FinalStanding, LeaderboardEntry, Player, PlayerId, SessionId};

use crate::SessionError;

/// Points awarded for each accepted word.
pub const WORD_POINTS: u32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct Standings {
    /// Best first.
    pub entries: Vec<FinalStanding>,
    pub winner: Option<PlayerId>,
}

pub struct ScoringEngine;

impl ScoringEngine {
    /// Rank players at the end of a session.
    ///
    /// Placement scores follow elimination order: the first player knocked
    /// out scores 1, the next 2, and so on. Survivors score above every
    /// eliminated player, in roster order. The winner is the sole survivor.
    pub fn finalize(
        players: &[Player],
        elimination_order: &[PlayerId],
    ) -> Result<Standings, SessionError> {
        let eliminated = players.iter().filter(|p| p.is_eliminated).count();
        if eliminated != elimination_order.len() {
            return Err(SessionError::InvariantViolation(format!(
                "{} players eliminated but {} eliminations recorded",
                eliminated,
                elimination_order.len()
            )));
        }

        let mut scored: Vec<(usize, u32)> = Vec::with_capacity(players.len());
        for (order, id) in elimination_order.iter().enumerate() {
            let index = players
                .iter()
                .position(|p| p.id == *id && p.is_eliminated)
                .ok_or_else(|| {
                    SessionError::InvariantViolation(format!(
                        "recorded elimination of {} does not match the roster",
                        id
                    ))
                })?;
            scored.push((index, order as u32 + 1));
        }

        let survivors: Vec<usize> = players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_active())
            .map(|(i, _)| i)
            .collect();
        for (offset, &index) in survivors.iter().enumerate() {
            scored.push((index, (eliminated + offset) as u32 + 1));
        }

        // Roster order first so the stable sort breaks ties by it.
        scored.sort_by_key(|&(index, _)| index);
        scored.sort_by(|a, b| b.1.cmp(&a.1));

        let entries = scored
            .into_iter()
            .enumerate()
            .map(|(position, (index, placement_score))| {
                let player = &players[index];
                FinalStanding {
                    player_id: player.id,
                    player_name: player.name.clone(),
                    rank: position as u32 + 1,
                    placement_score,
                    word_points: player.score,
                }
            })
            .collect();

        let winner = match survivors.as_slice() {
            [only] => Some(players[*only].id),
            _ => None,
        };

        Ok(Standings { entries, winner })
    }

    pub fn leaderboard_entries(
        standings: &Standings,
        session_id: SessionId,
        timestamp: &str,
    ) -> Vec<LeaderboardEntry> {
        standings
            .entries
            .iter()
            .map(|standing| LeaderboardEntry {
                player_name: standing.player_name.clone(),
                score: standing.placement_score,
                date: timestamp.to_string(),
                game_id: session_id,
            })
            .collect()
    }
}
