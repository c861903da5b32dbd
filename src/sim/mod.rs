//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick cadence only
//! - Seeded RNG only
//! - Stable iteration order (roster order, placement order)
//! - No rendering or platform dependencies

pub mod ai;
pub mod bomb;
pub mod bonus;
pub mod explosion;
pub mod grid;
pub mod level;
pub mod player;
pub mod state;
pub mod tick;

pub use ai::{AiBrain, AiProfile, Danger, danger_level};
pub use bomb::Bomb;
pub use bonus::{ActiveBonus, Bonus, BonusKind};
pub use explosion::{Explosion, ExplosionPart};
pub use grid::{Cell, Direction, Grid, spawn_points};
pub use level::LevelLayout;
pub use player::{Controller, Player};
pub use state::{Game, GameEvent};
pub use tick::{Action, PlayerCommand, TickInput, tick};
