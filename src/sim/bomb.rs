//! Placed bombs
//!
//! A bomb only counts down. Detonation (blast rays, damage, wall destruction)
//! is resolved by the game when `is_exploded` turns true.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// A live bomb on the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bomb {
    owner: Option<u32>,
    pos: IVec2,
    timer: i32,
    range: i32,
}

impl Bomb {
    pub fn new(owner: Option<u32>, pos: IVec2, timer: i32, range: i32) -> Self {
        Self {
            owner,
            pos,
            timer,
            range,
        }
    }

    /// Player that placed the bomb, if any
    pub fn owner(&self) -> Option<u32> {
        self.owner
    }

    pub fn pos(&self) -> IVec2 {
        self.pos
    }

    /// Remaining ticks before detonation
    pub fn timer(&self) -> i32 {
        self.timer
    }

    /// Blast reach in cells along each ray
    pub fn range(&self) -> i32 {
        self.range
    }

    /// Count down by exactly one tick
    pub fn tick(&mut self) {
        self.timer -= 1;
    }

    pub fn is_exploded(&self) -> bool {
        self.timer <= 0
    }

    /// Zero the fuse so the bomb goes off during the current resolution pass
    /// (chain reactions)
    pub fn detonate(&mut self) {
        self.timer = self.timer.min(0);
    }

    /// Identity used by the AI to skip its own fresh bomb: position plus timer
    pub fn identity(&self) -> (IVec2, i32) {
        (self.pos, self.timer)
    }
}
