//! Error types
//!
//! In-game rejections (walking into a wall, bomb limit reached) are not errors;
//! they surface as `false`/`None`. Only building a match can fail.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to construct a grid or a match
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("{0} players requested but only 4 spawn corners exist")]
    TooManyPlayers(usize),

    #[error("a match needs at least one player")]
    NoPlayers,

    #[error("level layout has no cells")]
    EmptyLayout,

    #[error("level layout row {row} has {found} cells, expected {expected}")]
    RaggedLayout {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("level layout cell ({x}, {y}) has unknown value {value}")]
    InvalidLayoutCell { x: usize, y: usize, value: u8 },
}

/// Failure to load settings or a level file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid level: {0}")]
    Level(#[from] SimError),

    #[error("unparseable level cell {0:?}")]
    LevelToken(String),
}
