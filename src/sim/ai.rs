//! AI controller
//!
//! Each tick an AI player is in one of three modes:
//! - Flee: its cell is threatened, step to the neighbour with the best danger level
//! - Advance: its cell is safe, wander to a fully safe neighbour
//! - Plant: its cell is safe and an escape exists, occasionally drop a bomb
//!
//! Danger is judged by line of sight along the four axes; only indestructible
//! walls block it. Destructible walls are ignored here even though they stop
//! the real blast, so the AI errs on the side of caution.

use glam::IVec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::bomb::Bomb;
use super::grid::{Cell, Direction, Grid};
use crate::consts::{AI_ADVANCE_CHANCE, AI_PLANT_CHANCE};

/// Bomb identity as remembered by the AI: position plus timer
pub type BombIdentity = (IVec2, i32);

/// Per-player AI memory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiBrain {
    /// Bomb this AI just planted; skipped by exactly one danger evaluation
    pub ignore_bomb: Option<BombIdentity>,
}

/// Decision probabilities, derived from match difficulty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiProfile {
    /// Chance to take a step while safe
    pub advance_chance: f64,
    /// Chance to plant a bomb while safe
    pub plant_chance: f64,
}

impl Default for AiProfile {
    fn default() -> Self {
        Self {
            advance_chance: AI_ADVANCE_CHANCE,
            plant_chance: AI_PLANT_CHANCE,
        }
    }
}

/// Ticks until the earliest bomb whose blast reaches a cell. Higher is safer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Danger(i32);

impl Danger {
    /// No bomb threatens the cell
    pub const SAFE: Danger = Danger(i32::MAX);

    pub fn is_safe(self) -> bool {
        self == Self::SAFE
    }

    /// Countdown of the most urgent threat, `None` when safe
    pub fn ticks(self) -> Option<i32> {
        (!self.is_safe()).then_some(self.0)
    }
}

/// Danger level of `pos`: the minimum timer among bombs in line of sight
/// within their range. `ignore` skips one bomb by identity.
pub fn danger_level(
    pos: IVec2,
    grid: &Grid,
    bombs: &[Bomb],
    ignore: Option<BombIdentity>,
) -> Danger {
    bombs
        .iter()
        .filter(|bomb| ignore != Some(bomb.identity()))
        .filter(|bomb| threatens(bomb, pos, grid))
        .map(|bomb| Danger(bomb.timer()))
        .min()
        .unwrap_or(Danger::SAFE)
}

fn threatens(bomb: &Bomb, pos: IVec2, grid: &Grid) -> bool {
    let offset = bomb.pos() - pos;
    if offset == IVec2::ZERO {
        return true;
    }
    if offset.x != 0 && offset.y != 0 {
        return false;
    }
    let distance = offset.x.abs() + offset.y.abs();
    if distance > bomb.range() {
        return false;
    }
    let step = offset.signum();
    (1..distance).all(|i| grid.get(pos + step * i) != Some(Cell::Indestructible))
}

/// Empty orthogonal neighbours of `pos`
fn open_neighbours(pos: IVec2, grid: &Grid) -> impl Iterator<Item = Direction> + '_ {
    Direction::ALL
        .into_iter()
        .filter(move |dir| grid.is_empty(pos + dir.delta()))
}

/// Flee: pick the empty neighbour with the highest danger level, provided it
/// beats the current cell. Ties are broken at random. `None` means stay put.
pub fn flee_step<R: Rng + ?Sized>(
    pos: IVec2,
    grid: &Grid,
    bombs: &[Bomb],
    rng: &mut R,
) -> Option<Direction> {
    let here = danger_level(pos, grid, bombs, None);
    let scored: Vec<(Direction, Danger)> = open_neighbours(pos, grid)
        .map(|dir| (dir, danger_level(pos + dir.delta(), grid, bombs, None)))
        .filter(|&(_, danger)| danger > here)
        .collect();

    let best = scored.iter().map(|&(_, danger)| danger).max()?;
    let tied: Vec<Direction> = scored
        .iter()
        .filter(|&&(_, danger)| danger == best)
        .map(|&(dir, _)| dir)
        .collect();
    tied.choose(rng).copied()
}

/// Advance: with `advance_chance`, step to a random empty and fully safe neighbour
pub fn advance_step<R: Rng + ?Sized>(
    pos: IVec2,
    grid: &Grid,
    bombs: &[Bomb],
    ignore: Option<BombIdentity>,
    profile: &AiProfile,
    rng: &mut R,
) -> Option<Direction> {
    if !rng.random_bool(profile.advance_chance.clamp(0.0, 1.0)) {
        return None;
    }
    let safe: Vec<Direction> = safe_neighbours(pos, grid, bombs, ignore).collect();
    safe.choose(rng).copied()
}

/// Plant gate: at least one empty neighbour is fully safe
pub fn has_escape(pos: IVec2, grid: &Grid, bombs: &[Bomb], ignore: Option<BombIdentity>) -> bool {
    safe_neighbours(pos, grid, bombs, ignore).next().is_some()
}

fn safe_neighbours<'a>(
    pos: IVec2,
    grid: &'a Grid,
    bombs: &'a [Bomb],
    ignore: Option<BombIdentity>,
) -> impl Iterator<Item = Direction> + 'a {
    open_neighbours(pos, grid)
        .filter(move |dir| danger_level(pos + dir.delta(), grid, bombs, ignore).is_safe())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn bomb(x: i32, y: i32, timer: i32, range: i32) -> Bomb {
        Bomb::new(None, IVec2::new(x, y), timer, range)
    }

    #[test]
    fn test_danger_line_of_sight() {
        let mut grid = Grid::new(7, 7).unwrap();
        let bombs = vec![bomb(3, 3, 4, 2)];

        assert_eq!(danger_level(IVec2::new(3, 3), &grid, &bombs, None).ticks(), Some(4));
        assert_eq!(danger_level(IVec2::new(5, 3), &grid, &bombs, None).ticks(), Some(4));
        assert!(danger_level(IVec2::new(6, 3), &grid, &bombs, None).is_safe());
        assert!(danger_level(IVec2::new(4, 4), &grid, &bombs, None).is_safe());

        // Destructible walls don't block danger, indestructible ones do
        grid.set(IVec2::new(3, 2), Cell::Destructible);
        assert!(!danger_level(IVec2::new(3, 1), &grid, &bombs, None).is_safe());
        grid.set(IVec2::new(3, 2), Cell::Indestructible);
        assert!(danger_level(IVec2::new(3, 1), &grid, &bombs, None).is_safe());
    }

    #[test]
    fn test_danger_takes_minimum_timer() {
        let grid = Grid::new(7, 7).unwrap();
        let bombs = vec![bomb(1, 3, 5, 3), bomb(3, 1, 2, 3)];
        assert_eq!(danger_level(IVec2::new(3, 3), &grid, &bombs, None).ticks(), Some(2));
    }

    #[test]
    fn test_ignore_matches_exact_identity_only() {
        let grid = Grid::new(5, 5).unwrap();
        let bombs = vec![bomb(2, 2, 3, 2)];
        let pos = IVec2::new(2, 1);
        assert!(danger_level(pos, &grid, &bombs, Some((IVec2::new(2, 2), 3))).is_safe());
        assert!(!danger_level(pos, &grid, &bombs, Some((IVec2::new(2, 2), 2))).is_safe());
    }

    #[test]
    fn test_flee_toward_safe_neighbour() {
        // Corridor: the only open neighbour of (2,2) besides the bomb row is (2,3)
        let mut grid = Grid::new(5, 5).unwrap();
        grid.set(IVec2::new(2, 1), Cell::Indestructible);
        let bombs = vec![bomb(0, 2, 3, 3)];
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..20 {
            assert_eq!(
                flee_step(IVec2::new(2, 2), &grid, &bombs, &mut rng),
                Some(Direction::Down)
            );
        }
    }

    #[test]
    fn test_flee_stays_when_nothing_improves() {
        let mut grid = Grid::new(5, 1).unwrap();
        grid.set(IVec2::new(4, 0), Cell::Indestructible);
        // Every neighbour on this row is covered by the same bomb
        let bombs = vec![bomb(0, 0, 3, 4)];
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(flee_step(IVec2::new(2, 0), &grid, &bombs, &mut rng), None);
    }

    #[test]
    fn test_advance_only_to_safe_cells() {
        let grid = Grid::new(5, 5).unwrap();
        let bombs = vec![bomb(2, 0, 3, 1)];
        let profile = AiProfile {
            advance_chance: 1.0,
            plant_chance: 0.0,
        };
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..30 {
            let dir = advance_step(IVec2::new(2, 2), &grid, &bombs, None, &profile, &mut rng);
            assert!(dir.is_some());
            assert_ne!(dir, Some(Direction::Up));
        }

        let idle = AiProfile {
            advance_chance: 0.0,
            plant_chance: 0.0,
        };
        assert_eq!(
            advance_step(IVec2::new(2, 2), &grid, &bombs, None, &idle, &mut rng),
            None
        );
    }

    #[test]
    fn test_has_escape() {
        let mut grid = Grid::new(3, 3).unwrap();
        let pos = IVec2::new(1, 1);
        assert!(has_escape(pos, &grid, &[], None));
        for dir in Direction::ALL {
            grid.set(pos + dir.delta(), Cell::Destructible);
        }
        assert!(!has_escape(pos, &grid, &[], None));
    }
}
