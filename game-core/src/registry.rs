use game_types::{FrankensteinAvatar, Player, PlayerId, STARTING_LIVES};
use uuid::Uuid;

use crate::GameRng;

const SKIN_COLORS: [&str; 4] = ["#7BA05B", "#8FBC8F", "#6B8E23", "#9ACD32"];
const SHIRT_COLORS: [&str; 5] = ["#4B0082", "#2F4F4F", "#8B0000", "#483D8B", "#556B2F"];

/// Roll a fresh, undamaged avatar.
pub fn random_avatar(rng: &mut GameRng) -> FrankensteinAvatar {
    let skin = rng.pick(&SKIN_COLORS).copied().unwrap_or(SKIN_COLORS[0]);
    let shirt = rng.pick(&SHIRT_COLORS).copied().unwrap_or(SHIRT_COLORS[0]);

    FrankensteinAvatar {
        id: Uuid::new_v4().to_string(),
        skin_color: skin.to_string(),
        shirt_color: shirt.to_string(),
        is_damaged: false,
        missing_parts: Vec::new(),
    }
}

pub fn new_player(name: &str, rng: &mut GameRng) -> Player {
    Player {
        id: Uuid::new_v4(),
        name: name.trim().to_string(),
        avatar: random_avatar(rng),
        lives: STARTING_LIVES,
        score: 0,
        is_eliminated: false,
        mistakes: 0,
    }
}

/// Ordered players of one session. Turn order is array order.
#[derive(Debug, Clone, Default)]
pub struct PlayerRegistry {
    players: Vec<Player>,
}

impl PlayerRegistry {
    pub fn new(players: Vec<Player>) -> Self {
        Self { players }
    }

    pub fn from_names<S: AsRef<str>>(names: &[S], rng: &mut GameRng) -> Self {
        Self::new(names.iter().map(|n| new_player(n.as_ref(), rng)).collect())
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    pub fn as_slice(&self) -> &[Player] {
        &self.players
    }

    pub fn index_of(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    /// Swap in an updated record for the player at `index`. Returns the old one.
    pub fn replace(&mut self, index: usize, player: Player) -> Option<Player> {
        let slot = self.players.get_mut(index)?;
        Some(std::mem::replace(slot, player))
    }

    pub fn active_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_active()).count()
    }

    /// Put every player back to full health for a new session. Identity,
    /// names and avatar looks are kept; scores start over.
    pub fn reset_for_new_session(&mut self) {
        for player in &mut self.players {
            player.lives = STARTING_LIVES;
            player.score = 0;
            player.is_eliminated = false;
            player.mistakes = 0;
            player.avatar = player.avatar.repaired();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_types::BodyPart;

    fn registry(names: &[&str]) -> PlayerRegistry {
        let mut rng = GameRng::new(11);
        PlayerRegistry::from_names(names, &mut rng)
    }

    #[test]
    fn test_new_players_start_healthy() {
        let registry = registry(&["Alice", " Bob ", "Carol"]);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.active_count(), 3);

        let bob = registry.get(1).unwrap();
        assert_eq!(bob.name, "Bob");
        assert_eq!(bob.lives, 3);
        assert_eq!(bob.score, 0);
        assert_eq!(bob.mistakes, 0);
        assert!(!bob.avatar.is_damaged);
        assert!(bob.avatar.missing_parts.is_empty());
    }

    #[test]
    fn test_player_ids_are_unique() {
        let registry = registry(&["Alice", "Alice", "Alice"]);
        let ids: std::collections::HashSet<_> = registry.as_slice().iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_avatar_colors_come_from_palettes() {
        let mut rng = GameRng::new(5);
        for _ in 0..10 {
            let avatar = random_avatar(&mut rng);
            assert!(SKIN_COLORS.contains(&avatar.skin_color.as_str()));
            assert!(SHIRT_COLORS.contains(&avatar.shirt_color.as_str()));
        }
    }

    #[test]
    fn test_replace_updates_active_count() {
        let mut registry = registry(&["Alice", "Bob", "Carol"]);
        let mut bob = registry.get(1).unwrap().clone();
        bob.is_eliminated = true;
        bob.lives = 0;

        let old = registry.replace(1, bob.clone()).unwrap();
        assert!(!old.is_eliminated);
        assert_eq!(registry.active_count(), 2);
        assert_eq!(registry.index_of(bob.id), Some(1));
        assert!(registry.replace(7, bob).is_none());
    }

    #[test]
    fn test_reset_for_new_session() {
        let mut registry = registry(&["Alice", "Bob", "Carol"]);
        let mut alice = registry.get(0).unwrap().clone();
        let skin = alice.avatar.skin_color.clone();
        alice.lives = 0;
        alice.mistakes = 3;
        alice.score = 300;
        alice.is_eliminated = true;
        alice.avatar.is_damaged = true;
        alice.avatar.missing_parts = BodyPart::LOSS_ORDER.to_vec();
        registry.replace(0, alice);

        registry.reset_for_new_session();

        let alice = registry.get(0).unwrap();
        assert_eq!(alice.lives, 3);
        assert_eq!(alice.mistakes, 0);
        assert_eq!(alice.score, 0);
        assert!(!alice.is_eliminated);
        assert!(alice.avatar.missing_parts.is_empty());
        assert_eq!(alice.avatar.skin_color, skin);
    }
}
