//! Players and their controllers
//!
//! Humans and AI share the same [`Player`] record; the [`Controller`] decides
//! who drives it.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::ai::AiBrain;
use super::bomb::Bomb;
use super::bonus::{ActiveBonus, BonusKind};
use super::grid::{Cell, Grid};

/// Who issues a player's actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Controller {
    /// Driven by input commands
    Human,
    /// Driven by the per-tick AI decision loop
    Ai(AiBrain),
}

/// A combatant in the arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub pos: IVec2,
    pub alive: bool,
    pub lives: u32,
    /// Blast range without any flame bonus
    pub base_range: i32,
    /// Current blast range (base plus active flame bonuses)
    pub bomb_range: i32,
    pub max_bombs: usize,
    pub active_bonuses: Vec<ActiveBonus>,
    pub controller: Controller,
}

impl Player {
    pub fn new(
        id: u32,
        pos: IVec2,
        lives: u32,
        bomb_range: i32,
        max_bombs: usize,
        controller: Controller,
    ) -> Self {
        Self {
            id,
            pos,
            alive: lives > 0,
            lives,
            base_range: bomb_range,
            bomb_range,
            max_bombs,
            active_bonuses: Vec::new(),
            controller,
        }
    }

    pub fn is_ai(&self) -> bool {
        matches!(self.controller, Controller::Ai(_))
    }

    /// Step by (dx, dy). Only succeeds onto an in-bounds empty cell.
    pub fn move_by(&mut self, dx: i32, dy: i32, grid: &Grid) -> bool {
        if !self.alive {
            return false;
        }
        let target = self.pos + IVec2::new(dx, dy);
        if grid.get(target) != Some(Cell::Empty) {
            return false;
        }
        self.pos = target;
        true
    }

    /// Lose one life. Returns true if this hit killed the player.
    ///
    /// Does not look at invincibility; callers check `is_invincible` first.
    pub fn take_damage(&mut self) -> bool {
        let was_alive = self.alive;
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.alive = false;
        }
        was_alive && !self.alive
    }

    /// Mark dead regardless of remaining lives
    pub fn kill(&mut self) {
        self.lives = 0;
        self.alive = false;
    }

    /// Live bombs this player owns
    pub fn live_bomb_count(&self, live_bombs: &[Bomb]) -> usize {
        live_bombs
            .iter()
            .filter(|b| b.owner() == Some(self.id))
            .count()
    }

    /// Produce a bomb at the current position, or `None` if one of ours is
    /// already here or the `max_bombs` limit is reached
    pub fn drop_bomb(&self, base_timer: i32, live_bombs: &[Bomb]) -> Option<Bomb> {
        if live_bombs
            .iter()
            .any(|b| b.owner() == Some(self.id) && b.pos() == self.pos)
        {
            return None;
        }
        if self.live_bomb_count(live_bombs) >= self.max_bombs {
            return None;
        }
        Some(Bomb::new(
            Some(self.id),
            self.pos,
            base_timer,
            self.bomb_range,
        ))
    }

    pub fn add_flame_bonus_temp(&mut self, extra_range: i32, secs: f32) {
        self.bomb_range += extra_range;
        self.active_bonuses.push(ActiveBonus {
            kind: BonusKind::Flame,
            magnitude: extra_range,
            remaining_secs: secs,
        });
    }

    pub fn add_jacket_bonus_temp(&mut self, secs: f32) {
        self.active_bonuses.push(ActiveBonus {
            kind: BonusKind::Jacket,
            magnitude: 1,
            remaining_secs: secs,
        });
    }

    pub fn add_life(&mut self) {
        self.lives += 1;
    }

    /// Any jacket active
    pub fn is_invincible(&self) -> bool {
        self.active_bonuses
            .iter()
            .any(|b| b.kind == BonusKind::Jacket)
    }

    /// Age every active bonus by `dt` seconds and revert the ones that ran
    /// out. Returns the kinds that expired this call.
    pub fn update_active_bonuses(&mut self, dt: f32) -> Vec<BonusKind> {
        let mut expired = Vec::new();
        let mut reverted_range = 0;
        self.active_bonuses.retain_mut(|bonus| {
            bonus.remaining_secs -= dt;
            if bonus.remaining_secs > 0.0 {
                return true;
            }
            if bonus.kind == BonusKind::Flame {
                reverted_range += bonus.magnitude;
            }
            expired.push(bonus.kind);
            false
        });
        self.bomb_range -= reverted_range;
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{FLAME_SECONDS, TICK_SECONDS};

    fn open_grid() -> Grid {
        Grid::new(5, 5).unwrap()
    }

    fn player_at(x: i32, y: i32) -> Player {
        Player::new(0, IVec2::new(x, y), 2, 2, 1, Controller::Human)
    }

    #[test]
    fn test_move_onto_empty() {
        let grid = open_grid();
        let mut p = player_at(1, 1);
        assert!(p.move_by(1, 0, &grid));
        assert_eq!(p.pos, IVec2::new(2, 1));
    }

    #[test]
    fn test_move_blocked() {
        let mut grid = open_grid();
        let mut p = player_at(0, 0);
        // Out of bounds
        assert!(!p.move_by(-1, 0, &grid));

        for cell in [
            Cell::Bomb,
            Cell::Destructible,
            Cell::Indestructible,
            Cell::Explosion,
        ] {
            grid.set(IVec2::new(1, 0), cell);
            assert!(!p.move_by(1, 0, &grid), "moved onto {cell:?}");
            assert_eq!(p.pos, IVec2::ZERO);
        }

        p.kill();
        assert!(!p.move_by(0, 1, &grid));
    }

    #[test]
    fn test_take_damage_floor_and_death() {
        let mut p = player_at(1, 1);
        assert!(!p.take_damage());
        assert!(p.alive);
        assert_eq!(p.lives, 1);
        assert!(p.take_damage());
        assert!(!p.alive);
        assert_eq!(p.lives, 0);
        // Further hits change nothing
        assert!(!p.take_damage());
        assert_eq!(p.lives, 0);
    }

    #[test]
    fn test_drop_bomb_limits() {
        let mut p = player_at(1, 1);
        let mut live = Vec::new();
        let first = p.drop_bomb(3, &live).unwrap();
        live.push(first);
        assert_eq!(live[0].range(), 2);
        assert_eq!(p.live_bomb_count(&live), 1);

        // Same spot, and limit of one
        assert!(p.drop_bomb(3, &live).is_none());
        p.pos = IVec2::new(2, 1);
        assert!(p.drop_bomb(3, &live).is_none());

        p.max_bombs = 2;
        assert!(p.drop_bomb(3, &live).is_some());

        // Other players' bombs don't count against us
        let other = vec![Bomb::new(Some(7), IVec2::new(3, 3), 3, 1)];
        assert_eq!(p.live_bomb_count(&other), 0);
        p.max_bombs = 1;
        assert!(p.drop_bomb(3, &other).is_some());
    }

    #[test]
    fn test_flame_reverts_exactly_once() {
        let mut p = player_at(1, 1);
        p.add_flame_bonus_temp(1, FLAME_SECONDS);
        assert_eq!(p.bomb_range, 3);

        let ticks = (FLAME_SECONDS / TICK_SECONDS) as usize;
        for _ in 0..ticks - 1 {
            assert!(p.update_active_bonuses(TICK_SECONDS).is_empty());
            assert_eq!(p.bomb_range, 3);
        }
        assert_eq!(p.update_active_bonuses(TICK_SECONDS), vec![BonusKind::Flame]);
        assert_eq!(p.bomb_range, 2);

        assert!(p.update_active_bonuses(TICK_SECONDS).is_empty());
        assert_eq!(p.bomb_range, 2);
    }

    #[test]
    fn test_stacked_flames_revert_independently() {
        let mut p = player_at(1, 1);
        p.add_flame_bonus_temp(1, 1.0);
        p.add_flame_bonus_temp(2, 2.0);
        assert_eq!(p.bomb_range, 5);
        p.update_active_bonuses(1.0);
        assert_eq!(p.bomb_range, 4);
        p.update_active_bonuses(1.0);
        assert_eq!(p.bomb_range, p.base_range);
    }
}
