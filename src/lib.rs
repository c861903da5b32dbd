//! Blast Arena - a tick-based bomb arena simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, bombs, explosions, bonuses, players, AI)
//! - `settings`: Match configuration passed into the simulation
//! - `standings`: Win tally across several matches
//! - `error`: Construction and configuration errors

pub mod error;
pub mod settings;
pub mod sim;
pub mod standings;

pub use error::{SettingsError, SimError};
pub use settings::{Difficulty, MatchSettings};
pub use standings::Standings;

/// Game configuration constants
pub mod consts {
    /// Bomb/explosion cadence: one simulation tick every half second
    pub const TICK_SECONDS: f32 = 0.5;
    /// Match clock cadence (seconds per `advance_clock` call)
    pub const CLOCK_SECONDS: u32 = 1;

    /// Default arena dimensions (odd so the wall lattice closes on the border)
    pub const DEFAULT_WIDTH: i32 = 15;
    pub const DEFAULT_HEIGHT: i32 = 13;

    /// Spawn corners available per match
    pub const MAX_PLAYERS: usize = 4;

    /// Player defaults
    pub const DEFAULT_LIVES: u32 = 1;
    pub const DEFAULT_MAX_BOMBS: usize = 1;
    pub const DEFAULT_BOMB_RANGE: i32 = 2;

    /// Ticks between placement and detonation
    pub const BOMB_TIMER_TICKS: i32 = 3;
    /// Ticks an explosion marker stays on the grid after the tick that created it
    pub const EXPLOSION_TICKS: i32 = 1;

    /// World generation: chance an open interior cell starts as a destructible wall
    pub const WALL_DENSITY: f64 = 0.3;
    /// Chance a destroyed wall leaves a bonus behind
    pub const BONUS_DROP_CHANCE: f64 = 0.3;

    /// Flame bonus: extra blast range for a limited time
    pub const FLAME_EXTRA_RANGE: i32 = 1;
    pub const FLAME_SECONDS: f32 = 10.0;
    /// Jacket bonus: bomb-damage invincibility for a limited time
    pub const JACKET_SECONDS: f32 = 20.0;

    /// AI tuning (Normal difficulty)
    pub const AI_ADVANCE_CHANCE: f64 = 0.7;
    pub const AI_PLANT_CHANCE: f64 = 0.08;
}
