//! Match state
//!
//! [`Game`] owns the grid, the roster and every live bomb, blast marker and
//! bonus. All mutation goes through its methods; the per-tick advance lives in
//! `tick.rs`.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ai::{AiBrain, AiProfile};
use super::bomb::Bomb;
use super::bonus::{Bonus, BonusKind};
use super::explosion::{Explosion, ExplosionPart};
use super::grid::{Cell, Grid, spawn_points};
use super::level::LevelLayout;
use super::player::{Controller, Player};
use crate::consts::MAX_PLAYERS;
use crate::error::SimError;
use crate::settings::MatchSettings;

/// Observable changes, queued for reporting layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BombPlaced { owner: u32, pos: IVec2 },
    BombExploded { owner: Option<u32>, pos: IVec2 },
    WallDestroyed { pos: IVec2 },
    BonusSpawned { kind: BonusKind, pos: IVec2 },
    BonusCollected { player: u32, kind: BonusKind },
    BonusExpired { player: u32, kind: BonusKind },
    PlayerShielded { player: u32 },
    PlayerDamaged { player: u32, lives: u32 },
    PlayerDied { player: u32 },
    ClockExpired,
    GameOver { winner: Option<u32> },
}

/// One match of the arena simulation
#[derive(Debug, Clone)]
pub struct Game {
    pub(crate) settings: MatchSettings,
    pub(crate) ai_profile: AiProfile,
    pub(crate) grid: Grid,
    /// Roster in spawn order; dead players stay in place
    pub(crate) players: Vec<Player>,
    pub(crate) bombs: Vec<Bomb>,
    pub(crate) explosions: Vec<Explosion>,
    pub(crate) bonuses: Vec<Bonus>,
    pub(crate) game_over: bool,
    pub(crate) winner: Option<u32>,
    /// Simulation tick counter
    pub(crate) time_ticks: u64,
    /// Match clock seconds left, if a clock is configured
    pub(crate) clock_remaining: Option<u32>,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
}

/// The first `count` spawn corners must be distinct cells inside the grid
fn check_spawns(width: i32, height: i32, count: usize) -> Result<(), SimError> {
    let spawns = spawn_points(width, height);
    let used = &spawns[..count.min(spawns.len())];
    let inside = used
        .iter()
        .all(|p| p.x >= 0 && p.y >= 0 && p.x < width && p.y < height);
    let distinct = used
        .iter()
        .enumerate()
        .all(|(i, p)| !used[..i].contains(p));
    if inside && distinct {
        Ok(())
    } else {
        Err(SimError::InvalidDimensions { width, height })
    }
}

impl Game {
    /// Start a match. With a layout the grid is loaded verbatim; otherwise it
    /// is generated from the settings' dimensions and seed.
    pub fn new(settings: &MatchSettings, layout: Option<&LevelLayout>) -> Result<Self, SimError> {
        let count = settings.player_count();
        if count == 0 {
            return Err(SimError::NoPlayers);
        }
        if count > MAX_PLAYERS {
            return Err(SimError::TooManyPlayers(count));
        }

        let mut rng = Pcg32::seed_from_u64(settings.seed);
        let grid = match layout {
            Some(layout) => Grid::from_layout(layout),
            None => {
                let (width, height) = (settings.width, settings.height);
                // Spawn corners sit one cell inside the border
                if width < 3 || height < 3 {
                    return Err(SimError::InvalidDimensions { width, height });
                }
                check_spawns(width, height, count)?;
                let spawns = spawn_points(width, height);
                Grid::generate(width, height, &spawns[..count], settings.wall_density, &mut rng)?
            }
        };
        if layout.is_some() {
            check_spawns(grid.width(), grid.height(), count)?;
        }

        let spawns = spawn_points(grid.width(), grid.height());
        let players = spawns
            .iter()
            .take(count)
            .enumerate()
            .map(|(i, &pos)| {
                let controller = if i < settings.humans {
                    Controller::Human
                } else {
                    Controller::Ai(AiBrain::default())
                };
                Player::new(
                    i as u32,
                    pos,
                    settings.starting_lives,
                    settings.bomb_range,
                    settings.max_bombs,
                    controller,
                )
            })
            .collect();

        let mut game = Self {
            settings: settings.clone(),
            ai_profile: settings.difficulty.ai_profile(),
            grid,
            players,
            bombs: Vec::new(),
            explosions: Vec::new(),
            bonuses: Vec::new(),
            game_over: false,
            winner: None,
            time_ticks: 0,
            clock_remaining: settings.match_seconds,
            rng,
            events: Vec::new(),
        };
        game.seed_bonuses();

        log::info!(
            "Match started: {}x{} grid, {} humans, {} AI ({}), seed {}",
            game.grid.width(),
            game.grid.height(),
            settings.humans,
            settings.ai,
            settings.difficulty.as_str(),
            settings.seed
        );
        Ok(game)
    }

    /// Fixed starting pickups, skipped where the cell is indestructible
    fn seed_bonuses(&mut self) {
        let (w, h) = (self.grid.width(), self.grid.height());
        let seeds = [
            (BonusKind::Flame, IVec2::new(w / 2, 1)),
            (BonusKind::Jacket, IVec2::new(1, h / 2)),
            (BonusKind::Life, IVec2::new(w - 2, h / 2)),
        ];
        for (kind, pos) in seeds {
            match self.grid.get(pos) {
                Some(cell) if cell != Cell::Indestructible => {
                    if !self.bonuses.iter().any(|b| b.pos == pos) {
                        self.bonuses.push(Bonus::new(kind, pos));
                    }
                }
                _ => {}
            }
        }
    }

    // === Accessors ===

    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: u32) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub(crate) fn player_mut(&mut self, id: u32) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn bombs(&self) -> &[Bomb] {
        &self.bombs
    }

    pub fn bonuses(&self) -> &[Bonus] {
        &self.bonuses
    }

    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Sole survivor once the match is over; `None` for a draw or while running
    pub fn winner(&self) -> Option<u32> {
        self.winner
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn clock_remaining(&self) -> Option<u32> {
        self.clock_remaining
    }

    /// Which part of a blast cross covers `pos`, for rendering
    pub fn explosion_part_at(&self, pos: IVec2) -> Option<ExplosionPart> {
        self.explosions
            .iter()
            .rev()
            .find(|e| e.pos == pos)
            .map(|e| e.part)
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn living_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.alive)
    }

    // === Input-driven actions ===

    /// Move a player by (dx, dy). No-op once the match is over, for dead
    /// players, or when the destination is blocked.
    pub fn move_player(&mut self, id: u32, dx: i32, dy: i32) -> bool {
        if self.game_over {
            return false;
        }
        let grid = &self.grid;
        match self.players.iter_mut().find(|p| p.id == id) {
            Some(player) if player.alive => player.move_by(dx, dy, grid),
            _ => false,
        }
    }

    /// Drop a bomb at the player's position. Returns false when the player is
    /// dead, a bomb already sits there, or the player's bomb limit is reached.
    pub fn place_bomb(&mut self, id: u32) -> bool {
        if self.game_over {
            return false;
        }
        let Some(player) = self.player(id).filter(|p| p.alive) else {
            return false;
        };
        if self.bombs.iter().any(|b| b.pos() == player.pos) {
            return false;
        }
        let Some(bomb) = player.drop_bomb(self.settings.bomb_timer_ticks, &self.bombs) else {
            log::trace!("Player {} cannot place another bomb", id);
            return false;
        };

        let pos = bomb.pos();
        log::debug!("Player {} placed bomb at {} (range {})", id, pos, bomb.range());
        self.grid.set(pos, Cell::Bomb);
        self.bombs.push(bomb);
        self.events.push(GameEvent::BombPlaced { owner: id, pos });
        true
    }

    /// Kill a player outright (forfeit) and re-evaluate the win condition
    pub fn kill_player(&mut self, id: u32) {
        let Some(player) = self.player_mut(id) else {
            return;
        };
        if !player.alive {
            return;
        }
        player.kill();
        log::info!("Player {} eliminated", id);
        self.events.push(GameEvent::PlayerDied { player: id });
        self.update_game_over();
    }

    /// Advance the match clock by one second (1 s cadence). When it runs out
    /// the match ends as a draw.
    pub fn advance_clock(&mut self) {
        if self.game_over {
            return;
        }
        let Some(remaining) = self.clock_remaining.as_mut() else {
            return;
        };
        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            log::info!("Match clock expired");
            self.events.push(GameEvent::ClockExpired);
            self.finish(None);
        }
    }

    /// Recompute the win condition: the match ends when at most one player lives
    pub(crate) fn update_game_over(&mut self) {
        if self.game_over {
            return;
        }
        let (first, others) = {
            let mut living = self.living_players();
            (living.next().map(|p| p.id), living.next().is_some())
        };
        if !others {
            self.finish(first);
        }
    }

    fn finish(&mut self, winner: Option<u32>) {
        self.game_over = true;
        self.winner = winner;
        match winner {
            Some(id) => log::info!("Game over after {} ticks: player {} wins", self.time_ticks, id),
            None => log::info!("Game over after {} ticks: no winner", self.time_ticks),
        }
        self.events.push(GameEvent::GameOver { winner });
    }
}
