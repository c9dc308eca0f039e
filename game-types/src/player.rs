use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::PlayerId;

/// Lives every player starts a session with.
pub const STARTING_LIVES: u8 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub avatar: FrankensteinAvatar,
    pub lives: u8,
    pub score: u32, // Accepted-word points earned during play
    pub is_eliminated: bool,
    pub mistakes: u8,
}

impl Player {
    pub fn is_active(&self) -> bool {
        !self.is_eliminated
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FrankensteinAvatar {
    pub id: String,
    pub skin_color: String,
    pub shirt_color: String,
    pub is_damaged: bool,
    pub missing_parts: Vec<BodyPart>,
}

impl FrankensteinAvatar {
    /// Restore a damaged avatar while keeping its look.
    pub fn repaired(&self) -> Self {
        Self {
            is_damaged: false,
            missing_parts: Vec::new(),
            ..self.clone()
        }
    }
}

/// Body parts in the order they fall off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum BodyPart {
    Arm,
    Leg,
    Head,
}

impl BodyPart {
    pub const LOSS_ORDER: [BodyPart; 3] = [BodyPart::Arm, BodyPart::Leg, BodyPart::Head];

    /// The part lost on the given (1-based) mistake, if any is left.
    pub fn for_mistake(mistake: u8) -> Option<BodyPart> {
        match mistake {
            0 => None,
            n => Self::LOSS_ORDER.get(usize::from(n) - 1).copied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_part_loss_order() {
        assert_eq!(BodyPart::for_mistake(0), None);
        assert_eq!(BodyPart::for_mistake(1), Some(BodyPart::Arm));
        assert_eq!(BodyPart::for_mistake(2), Some(BodyPart::Leg));
        assert_eq!(BodyPart::for_mistake(3), Some(BodyPart::Head));
        assert_eq!(BodyPart::for_mistake(4), None);
    }

    #[test]
    fn test_repaired_avatar_keeps_colors() {
        let avatar = FrankensteinAvatar {
            id: "avatar-1".to_string(),
            skin_color: "#7BA05B".to_string(),
            shirt_color: "#4B0082".to_string(),
            is_damaged: true,
            missing_parts: vec![BodyPart::Arm, BodyPart::Leg],
        };

        let repaired = avatar.repaired();
        assert!(!repaired.is_damaged);
        assert!(repaired.missing_parts.is_empty());
        assert_eq!(repaired.skin_color, avatar.skin_color);
        assert_eq!(repaired.shirt_color, avatar.shirt_color);
    }
}
