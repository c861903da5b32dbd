//! Fixed-cadence simulation tick
//!
//! `tick` applies one tick's worth of input, lets every AI player decide, and
//! then advances the world with `Game::advance_one_tick`.

use glam::IVec2;
use rand::Rng;

use super::ai;
use super::bomb::Bomb;
use super::bonus::{Bonus, BonusKind};
use super::explosion::{Explosion, ExplosionPart};
use super::grid::{Cell, Direction};
use super::player::Controller;
use super::state::{Game, GameEvent};

/// What a player wants to do this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
    PlaceBomb,
}

/// An action addressed to one player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerCommand {
    pub player: u32,
    pub action: Action,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Human commands, applied in order. Commands for AI players are ignored.
    pub commands: Vec<PlayerCommand>,
}

impl TickInput {
    pub fn push(&mut self, player: u32, action: Action) {
        self.commands.push(PlayerCommand { player, action });
    }
}

/// Advance the match by one tick: human input, AI decisions, then world update
pub fn tick(game: &mut Game, input: &TickInput) {
    if game.is_game_over() {
        return;
    }

    for command in &input.commands {
        let is_human = game
            .player(command.player)
            .is_some_and(|p| !p.is_ai());
        if !is_human {
            continue;
        }
        match command.action {
            Action::Move(dir) => {
                let d = dir.delta();
                game.move_player(command.player, d.x, d.y);
            }
            Action::PlaceBomb => {
                game.place_bomb(command.player);
            }
        }
    }

    let ai_players: Vec<u32> = game
        .living_players()
        .filter(|p| p.is_ai())
        .map(|p| p.id)
        .collect();
    for id in ai_players {
        drive_ai(game, id);
    }

    game.advance_one_tick();
}

/// One AI decision: flee when threatened, otherwise maybe plant, then maybe wander
fn drive_ai(game: &mut Game, id: u32) {
    let Some(player) = game.player(id).filter(|p| p.alive) else {
        return;
    };
    let Controller::Ai(mut brain) = player.controller else {
        return;
    };
    let pos = player.pos;
    let profile = game.ai_profile;

    let here = ai::danger_level(pos, &game.grid, &game.bombs, None);
    if let Some(ticks) = here.ticks() {
        // Flee
        let step = ai::flee_step(pos, &game.grid, &game.bombs, &mut game.rng);
        log::trace!("AI {} fleeing (danger {}): {:?}", id, ticks, step);
        if let Some(dir) = step {
            let d = dir.delta();
            game.move_player(id, d.x, d.y);
        }
    } else {
        // Plant, only with a guaranteed way out
        if game.rng.random_bool(profile.plant_chance.clamp(0.0, 1.0))
            && ai::has_escape(pos, &game.grid, &game.bombs, None)
            && game.place_bomb(id)
        {
            brain.ignore_bomb = game.bombs.last().map(Bomb::identity);
            log::trace!("AI {} planted at {}", id, pos);
        }

        // Advance
        let ignore = brain.ignore_bomb.take();
        let step = ai::advance_step(
            pos,
            &game.grid,
            &game.bombs,
            ignore,
            &profile,
            &mut game.rng,
        );
        if let Some(dir) = step {
            let d = dir.delta();
            game.move_player(id, d.x, d.y);
        }
    }

    if let Some(player) = game.player_mut(id) {
        player.controller = Controller::Ai(brain);
    }
}

impl Game {
    /// Advance the world by one tick, in fixed order:
    /// 1. count down bombs, resolving every one that goes off
    /// 2. age blast markers, clearing expired ones
    /// 3. hand out bonuses under living players
    /// 4. age active bonuses, reverting expired effects
    /// 5. re-evaluate the win condition
    pub fn advance_one_tick(&mut self) {
        if self.game_over {
            return;
        }
        self.time_ticks += 1;

        // Markers created this tick are not aged until the next one
        let previous_markers = self.explosions.len();

        // 1. Bombs
        for bomb in &mut self.bombs {
            bomb.tick();
        }
        while let Some(index) = self.bombs.iter().position(Bomb::is_exploded) {
            let bomb = self.bombs.remove(index);
            self.resolve_explosion(&bomb);
        }

        // 2. Blast markers
        self.age_explosions(previous_markers);

        // 3. Pickups
        self.collect_bonuses();

        // 4. Active bonus timers
        let dt = self.settings.tick_seconds;
        for player in self.players.iter_mut().filter(|p| p.alive) {
            for kind in player.update_active_bonuses(dt) {
                log::debug!("Player {} {:?} bonus expired", player.id, kind);
                self.events.push(GameEvent::BonusExpired {
                    player: player.id,
                    kind,
                });
            }
        }

        // 5. Win condition
        self.update_game_over();
    }

    /// Blast a cross from the bomb's cell. Each ray stops before an
    /// indestructible wall, or on (and destroys) the first destructible wall.
    fn resolve_explosion(&mut self, bomb: &Bomb) {
        let center = bomb.pos();
        log::debug!(
            "Bomb at {} exploded (owner {:?}, range {})",
            center,
            bomb.owner(),
            bomb.range()
        );
        self.events.push(GameEvent::BombExploded {
            owner: bomb.owner(),
            pos: center,
        });

        if self.grid.get(center) == Some(Cell::Destructible) {
            self.destroy_wall(center);
        }
        self.mark_explosion(center, ExplosionPart::Center);
        self.damage_at(center);

        for dir in Direction::ALL {
            let mut reached: Vec<IVec2> = Vec::new();
            for distance in 1..=bomb.range() {
                let pos = center + dir.delta() * distance;
                match self.grid.get(pos) {
                    None | Some(Cell::Indestructible) => break,
                    Some(Cell::Destructible) => {
                        self.damage_at(pos);
                        self.destroy_wall(pos);
                        reached.push(pos);
                        break;
                    }
                    Some(cell) => {
                        if cell == Cell::Bomb || self.bombs.iter().any(|b| b.pos() == pos) {
                            self.chain_detonate(pos);
                        }
                        self.damage_at(pos);
                        reached.push(pos);
                    }
                }
            }

            let last = reached.len().saturating_sub(1);
            for (i, pos) in reached.into_iter().enumerate() {
                let part = if i == last {
                    ExplosionPart::Tip(dir)
                } else {
                    ExplosionPart::Arm(dir)
                };
                self.mark_explosion(pos, part);
            }
        }
    }

    fn mark_explosion(&mut self, pos: IVec2, part: ExplosionPart) {
        self.grid.set(pos, Cell::Explosion);
        self.explosions
            .push(Explosion::new(pos, part, self.settings.explosion_ticks));
    }

    /// A blast reached another live bomb
    fn chain_detonate(&mut self, pos: IVec2) {
        if !self.settings.chain_reactions {
            return;
        }
        for bomb in self.bombs.iter_mut().filter(|b| b.pos() == pos) {
            log::trace!("Chain reaction at {}", pos);
            bomb.detonate();
        }
    }

    /// Destroy a destructible wall, possibly leaving a bonus behind. A cell
    /// holds at most one uncollected bonus.
    fn destroy_wall(&mut self, pos: IVec2) {
        self.grid.set(pos, Cell::Empty);
        self.events.push(GameEvent::WallDestroyed { pos });

        if self.bonuses.iter().any(|b| !b.collected && b.pos == pos) {
            return;
        }
        let chance = self.settings.bonus_drop_chance.clamp(0.0, 1.0);
        if self.rng.random_bool(chance) {
            let kind = BonusKind::random(&mut self.rng);
            log::debug!("{:?} bonus dropped at {}", kind, pos);
            self.bonuses.push(Bonus::new(kind, pos));
            self.events.push(GameEvent::BonusSpawned { kind, pos });
        }
    }

    /// Every living player on `pos` loses a life unless wearing a jacket
    fn damage_at(&mut self, pos: IVec2) {
        for player in self.players.iter_mut().filter(|p| p.alive && p.pos == pos) {
            if player.is_invincible() {
                self.events.push(GameEvent::PlayerShielded { player: player.id });
                continue;
            }
            let died = player.take_damage();
            self.events.push(GameEvent::PlayerDamaged {
                player: player.id,
                lives: player.lives,
            });
            if died {
                log::info!("Player {} died at {}", player.id, pos);
                self.events.push(GameEvent::PlayerDied { player: player.id });
            }
        }
    }

    /// Age the first `count` markers; expired ones give their cell back
    fn age_explosions(&mut self, count: usize) {
        let mut expired = Vec::new();
        let mut index = 0;
        self.explosions.retain_mut(|marker| {
            let aged = index < count;
            index += 1;
            if aged {
                marker.tick();
            }
            if aged && marker.is_expired() {
                expired.push(marker.pos);
                return false;
            }
            true
        });

        for pos in expired {
            if self.grid.get(pos) != Some(Cell::Explosion) {
                continue;
            }
            if self.explosions.iter().any(|e| e.pos == pos) {
                continue;
            }
            let restored = if self.bombs.iter().any(|b| b.pos() == pos) {
                Cell::Bomb
            } else {
                Cell::Empty
            };
            self.grid.set(pos, restored);
        }
    }

    fn collect_bonuses(&mut self) {
        for player in self.players.iter_mut().filter(|p| p.alive) {
            let pos = player.pos;
            for bonus in self
                .bonuses
                .iter_mut()
                .filter(|b| !b.collected && b.pos == pos)
            {
                if bonus.apply_to(player) {
                    log::debug!("Player {} collected {:?}", player.id, bonus.kind);
                    self.events.push(GameEvent::BonusCollected {
                        player: player.id,
                        kind: bonus.kind,
                    });
                }
            }
        }
        self.bonuses.retain(|b| !b.collected);
    }
}
