//! Transient blast markers

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::grid::Direction;

/// Which piece of the cross a marker represents (for rendering)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExplosionPart {
    /// The bomb's own cell
    Center,
    /// Inner segment of a blast ray
    Arm(Direction),
    /// Last cell a blast ray reached
    Tip(Direction),
}

/// One blast-marked cell with its own short display timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: IVec2,
    pub part: ExplosionPart,
    pub ticks_remaining: i32,
}

impl Explosion {
    pub fn new(pos: IVec2, part: ExplosionPart, ticks: i32) -> Self {
        Self {
            pos,
            part,
            ticks_remaining: ticks,
        }
    }

    pub fn tick(&mut self) {
        self.ticks_remaining -= 1;
    }

    pub fn is_expired(&self) -> bool {
        self.ticks_remaining <= 0
    }
}
