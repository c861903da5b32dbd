//! Bonus pickups and the timed effects they grant

use glam::IVec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::player::Player;
use crate::consts::{FLAME_EXTRA_RANGE, FLAME_SECONDS, JACKET_SECONDS};

/// Bonus variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusKind {
    /// Temporary extra blast range
    Flame,
    /// Temporary bomb-damage invincibility
    Jacket,
    /// Permanent extra life
    Life,
}

impl BonusKind {
    pub const ALL: [BonusKind; 3] = [BonusKind::Flame, BonusKind::Jacket, BonusKind::Life];

    /// Effect strength granted on pickup
    pub fn magnitude(self) -> i32 {
        match self {
            BonusKind::Flame => FLAME_EXTRA_RANGE,
            BonusKind::Jacket | BonusKind::Life => 1,
        }
    }

    /// How long the effect lasts; `None` for permanent effects
    pub fn duration_secs(self) -> Option<f32> {
        match self {
            BonusKind::Flame => Some(FLAME_SECONDS),
            BonusKind::Jacket => Some(JACKET_SECONDS),
            BonusKind::Life => None,
        }
    }

    /// Uniform pick used for wall drops
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&BonusKind::Flame)
    }

    pub fn glyph(self) -> char {
        match self {
            BonusKind::Flame => 'F',
            BonusKind::Jacket => 'J',
            BonusKind::Life => 'L',
        }
    }
}

/// A pickup lying on the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bonus {
    pub kind: BonusKind,
    pub pos: IVec2,
    pub collected: bool,
}

impl Bonus {
    pub fn new(kind: BonusKind, pos: IVec2) -> Self {
        Self {
            kind,
            pos,
            collected: false,
        }
    }

    /// Grant this bonus to `player`. Returns false (and does nothing) if it was
    /// already collected.
    pub fn apply_to(&mut self, player: &mut Player) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        let secs = self.kind.duration_secs().unwrap_or_default();
        match self.kind {
            BonusKind::Flame => player.add_flame_bonus_temp(self.kind.magnitude(), secs),
            BonusKind::Jacket => player.add_jacket_bonus_temp(secs),
            BonusKind::Life => player.add_life(),
        }
        true
    }
}

/// A time-limited effect currently held by a player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveBonus {
    pub kind: BonusKind,
    pub magnitude: i32,
    pub remaining_secs: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::player::Controller;

    fn player() -> Player {
        Player::new(0, IVec2::new(1, 1), 1, 2, 1, Controller::Human)
    }

    #[test]
    fn test_flame_applies_once() {
        let mut p = player();
        let mut bonus = Bonus::new(BonusKind::Flame, IVec2::new(1, 1));
        assert!(bonus.apply_to(&mut p));
        assert_eq!(p.bomb_range, 2 + FLAME_EXTRA_RANGE);
        assert!(bonus.collected);

        assert!(!bonus.apply_to(&mut p));
        assert_eq!(p.bomb_range, 2 + FLAME_EXTRA_RANGE);
        assert_eq!(p.active_bonuses.len(), 1);
    }

    #[test]
    fn test_timed_effects_last_their_kind_duration() {
        let mut p = player();
        Bonus::new(BonusKind::Flame, IVec2::new(1, 1)).apply_to(&mut p);
        Bonus::new(BonusKind::Jacket, IVec2::new(1, 1)).apply_to(&mut p);
        let remaining: Vec<_> = p
            .active_bonuses
            .iter()
            .map(|b| (b.kind, b.remaining_secs))
            .collect();
        assert_eq!(
            remaining,
            vec![
                (BonusKind::Flame, FLAME_SECONDS),
                (BonusKind::Jacket, JACKET_SECONDS)
            ]
        );
        assert_eq!(BonusKind::Life.duration_secs(), None);
    }

    #[test]
    fn test_random_kind_is_seeded() {
        use rand::SeedableRng;
        use rand_pcg::Pcg32;

        let draw = |seed| {
            let mut rng = Pcg32::seed_from_u64(seed);
            (0..32).map(|_| BonusKind::random(&mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(draw(9), draw(9));
        for kind in BonusKind::ALL {
            assert!(draw(9).contains(&kind));
        }
    }

    #[test]
    fn test_jacket_grants_invincibility() {
        let mut p = player();
        assert!(!p.is_invincible());
        let mut bonus = Bonus::new(BonusKind::Jacket, IVec2::new(1, 1));
        assert!(bonus.apply_to(&mut p));
        assert!(p.is_invincible());
    }

    #[test]
    fn test_life_is_permanent() {
        let mut p = player();
        let mut bonus = Bonus::new(BonusKind::Life, IVec2::new(1, 1));
        assert!(bonus.apply_to(&mut p));
        assert_eq!(p.lives, 2);
        assert!(p.active_bonuses.is_empty());

        let expired = p.update_active_bonuses(1000.0);
        assert!(expired.is_empty());
        assert_eq!(p.lives, 2);
    }
}
