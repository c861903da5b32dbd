//! Static level layouts
//!
//! A layout is a rectangular grid of integers: 0 = empty, 1 = indestructible,
//! 2 = destructible. Layouts come either as JSON (`[[1,1,1],[1,0,1],[1,1,1]]`)
//! or as plain text with one row per line:
//!
//! ```text
//! 1 1 1 1 1
//! 1 0 2 0 1
//! 1 1 1 1 1
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::grid::Cell;
use crate::error::{SettingsError, SimError};

/// Validated rectangular level layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct LevelLayout {
    rows: Vec<Vec<u8>>,
}

impl LevelLayout {
    /// Validate raw rows: non-empty, rectangular, known cell values only
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self, SimError> {
        let expected = rows.first().map(Vec::len).unwrap_or(0);
        if expected == 0 {
            return Err(SimError::EmptyLayout);
        }
        for (y, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(SimError::RaggedLayout {
                    row: y,
                    expected,
                    found: row.len(),
                });
            }
            if let Some((x, &value)) = row
                .iter()
                .enumerate()
                .find(|(_, v)| Cell::from_layout(**v).is_none())
            {
                return Err(SimError::InvalidLayoutCell { x, y, value });
            }
        }
        Ok(Self { rows })
    }

    /// Parse the plain text format. Blank lines and `//` comments are skipped;
    /// cells may be separated by whitespace, commas, or nothing at all.
    pub fn parse_text(text: &str) -> Result<Self, SettingsError> {
        let mut rows = Vec::new();
        for line in text.lines() {
            let line = line.split("//").next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            let row = line
                .chars()
                .filter(|c| !c.is_whitespace() && *c != ',')
                .map(|c| {
                    c.to_digit(10)
                        .map(|d| d as u8)
                        .ok_or_else(|| SettingsError::LevelToken(c.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }
        Ok(Self::from_rows(rows)?)
    }

    /// Parse the JSON format
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a layout file; `.json` files use the JSON format, anything else the text format
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let layout = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&text)?,
            _ => Self::parse_text(&text)?,
        };
        log::info!(
            "Loaded level {} ({}x{})",
            path.display(),
            layout.width(),
            layout.height()
        );
        Ok(layout)
    }

    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }

    pub fn width(&self) -> usize {
        self.rows[0].len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

impl TryFrom<Vec<Vec<u8>>> for LevelLayout {
    type Error = SimError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<LevelLayout> for Vec<Vec<u8>> {
    fn from(layout: LevelLayout) -> Self {
        layout.rows
    }
}
