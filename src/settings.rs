//! Match configuration
//!
//! Everything the simulation needs is passed in through [`MatchSettings`];
//! nothing is read from global state.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;
use crate::sim::AiProfile;

/// AI difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// AI decision probabilities for this level
    pub fn ai_profile(&self) -> AiProfile {
        match self {
            Difficulty::Easy => AiProfile {
                advance_chance: 0.5,
                plant_chance: 0.04,
            },
            Difficulty::Normal => AiProfile::default(),
            Difficulty::Hard => AiProfile {
                advance_chance: 0.85,
                plant_chance: 0.12,
            },
        }
    }
}

/// Parameters for one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    // === Arena ===
    /// Grid width (ignored when a level layout is supplied)
    pub width: i32,
    /// Grid height (ignored when a level layout is supplied)
    pub height: i32,
    /// Chance an open interior cell is generated as a destructible wall
    pub wall_density: f64,

    // === Roster ===
    pub humans: usize,
    pub ai: usize,
    pub difficulty: Difficulty,

    // === Players ===
    pub starting_lives: u32,
    pub max_bombs: usize,
    pub bomb_range: i32,

    // === Timing ===
    /// Ticks from placement to detonation
    pub bomb_timer_ticks: i32,
    /// Ticks a blast marker lingers
    pub explosion_ticks: i32,
    /// Seconds of simulated time per tick (drives bonus expiry)
    pub tick_seconds: f32,
    /// Optional match clock in seconds; the match is a draw when it runs out
    pub match_seconds: Option<u32>,

    // === Rules ===
    pub bonus_drop_chance: f64,
    /// Blasts set off other bombs they reach
    pub chain_reactions: bool,

    /// RNG seed for world generation, drops and AI
    pub seed: u64,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            wall_density: WALL_DENSITY,

            humans: 1,
            ai: 3,
            difficulty: Difficulty::Normal,

            starting_lives: DEFAULT_LIVES,
            max_bombs: DEFAULT_MAX_BOMBS,
            bomb_range: DEFAULT_BOMB_RANGE,

            bomb_timer_ticks: BOMB_TIMER_TICKS,
            explosion_ticks: EXPLOSION_TICKS,
            tick_seconds: TICK_SECONDS,
            match_seconds: None,

            bonus_drop_chance: BONUS_DROP_CHANCE,
            chain_reactions: true,

            seed: 0,
        }
    }
}

impl MatchSettings {
    /// Total combatants
    pub fn player_count(&self) -> usize {
        self.humans + self.ai
    }

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings as pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = MatchSettings::from_json(r#"{ "ai": 2, "seed": 17, "difficulty": "Hard" }"#)
            .unwrap();
        assert_eq!(settings.ai, 2);
        assert_eq!(settings.seed, 17);
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.width, DEFAULT_WIDTH);
        assert_eq!(settings.bomb_timer_ticks, BOMB_TIMER_TICKS);
        assert!(settings.chain_reactions);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = MatchSettings {
            match_seconds: Some(90),
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(MatchSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_difficulty_parsing() {
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("medium"), Some(Difficulty::Normal));
        assert_eq!(Difficulty::from_str("nightmare"), None);
        assert_eq!(Difficulty::Easy.as_str(), "Easy");
        assert!(Difficulty::Hard.ai_profile().plant_chance > Difficulty::Easy.ai_profile().plant_chance);
    }

    #[test]
    fn test_load_missing_file() {
        let err = MatchSettings::load(Path::new("/nonexistent/blast-arena.json")).unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }
}
