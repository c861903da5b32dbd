//! Blast Arena entry point
//!
//! Headless driver: runs one or more matches on the fixed tick cadence without
//! real-time pacing, prints board snapshots and a standings table.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::IVec2;

use blast_arena::consts::CLOCK_SECONDS;
use blast_arena::sim::{Cell, Game, LevelLayout, TickInput, tick};
use blast_arena::{Difficulty, MatchSettings, Standings};

#[derive(Debug, Parser)]
#[command(name = "blast-arena", about = "Run headless bomb arena matches")]
struct Args {
    /// JSON settings file; flags below override it
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Level layout (.json or text grid of 0/1/2)
    #[arg(long)]
    level: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    /// Human slots (idle in headless mode)
    #[arg(long)]
    humans: Option<usize>,
    #[arg(long)]
    ai: Option<usize>,
    #[arg(long)]
    width: Option<i32>,
    #[arg(long)]
    height: Option<i32>,
    /// easy, normal or hard
    #[arg(long)]
    difficulty: Option<String>,
    /// Give up on a match after this many ticks
    #[arg(long, default_value_t = 2_000)]
    max_ticks: u64,
    /// Number of matches; seeds increase by one per match
    #[arg(long, default_value_t = 1)]
    matches: u32,
    /// Print the board every N ticks (0 = only at the end)
    #[arg(long, default_value_t = 0)]
    render_every: u64,
    /// Print the final standings as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("Blast Arena (headless) starting...");

    let mut settings = match &args.settings {
        Some(path) => MatchSettings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => MatchSettings {
            humans: 0,
            ai: 4,
            ..Default::default()
        },
    };
    apply_overrides(&mut settings, &args)?;

    let layout = args
        .level
        .as_deref()
        .map(LevelLayout::load)
        .transpose()
        .context("loading level")?;

    let mut standings = Standings::new(settings.player_count());
    for round in 0..args.matches {
        let match_settings = MatchSettings {
            seed: settings.seed.wrapping_add(round as u64),
            ..settings.clone()
        };
        let winner = run_match(&match_settings, layout.as_ref(), &args)?;
        standings.record(winner);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&standings)?);
    } else {
        print_standings(&standings);
    }
    Ok(())
}

fn apply_overrides(settings: &mut MatchSettings, args: &Args) -> Result<()> {
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if let Some(humans) = args.humans {
        settings.humans = humans;
    }
    if let Some(ai) = args.ai {
        settings.ai = ai;
    }
    if let Some(width) = args.width {
        settings.width = width;
    }
    if let Some(height) = args.height {
        settings.height = height;
    }
    if let Some(name) = &args.difficulty {
        settings.difficulty = Difficulty::from_str(name)
            .with_context(|| format!("unknown difficulty {name:?}"))?;
    }
    Ok(())
}

fn run_match(
    settings: &MatchSettings,
    layout: Option<&LevelLayout>,
    args: &Args,
) -> Result<Option<u32>> {
    let mut game = Game::new(settings, layout).context("starting match")?;
    let input = TickInput::default();
    let ticks_per_second = clock_cadence(settings.tick_seconds);

    while !game.is_game_over() && game.time_ticks() < args.max_ticks {
        tick(&mut game, &input);
        if game.time_ticks() % ticks_per_second == 0 {
            game.advance_clock();
        }
        for event in game.drain_events() {
            log::debug!("tick {}: {:?}", game.time_ticks(), event);
        }
        if args.render_every > 0 && game.time_ticks() % args.render_every == 0 {
            println!("tick {}\n{}", game.time_ticks(), render(&game));
        }
    }

    let winner = game.winner();
    if args.json {
        return Ok(winner);
    }
    println!("{}", render(&game));
    match (game.is_game_over(), winner) {
        (true, Some(id)) => println!(
            "Seed {}: player {} wins after {} ticks",
            settings.seed,
            id,
            game.time_ticks()
        ),
        (true, None) => println!("Seed {}: draw after {} ticks", settings.seed, game.time_ticks()),
        (false, _) => println!(
            "Seed {}: stopped after {} ticks with {} players standing",
            settings.seed,
            game.time_ticks(),
            game.living_players().count()
        ),
    }
    Ok(winner)
}

/// Simulation ticks per match-clock second, never less than one
fn clock_cadence(tick_seconds: f32) -> u64 {
    if tick_seconds.is_nan() || tick_seconds <= 0.0 {
        return 1;
    }
    ((CLOCK_SECONDS as f32 / tick_seconds).round() as u64).max(1)
}

/// ASCII snapshot: players as digits, bonuses as letters, then grid cells
fn render(game: &Game) -> String {
    let grid = game.grid();
    let mut out = String::with_capacity(((grid.width() + 1) * grid.height()) as usize);
    for (y, row) in grid.rows().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            let pos = IVec2::new(x as i32, y as i32);
            let glyph = if let Some(p) = game.living_players().find(|p| p.pos == pos) {
                char::from_digit(p.id, 10).unwrap_or('@')
            } else if let Some(b) = game
                .bonuses()
                .iter()
                .find(|b| b.pos == pos && *cell != Cell::Destructible)
            {
                b.kind.glyph()
            } else {
                cell.glyph()
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

fn print_standings(standings: &Standings) {
    if standings.is_empty() {
        println!("\nNo matches played");
        return;
    }
    println!("\n{} matches, {} draws", standings.matches, standings.draws);
    for (rank, entry) in standings.ranked().iter().enumerate() {
        println!("{:>2}. player {}  {} wins", rank + 1, entry.player, entry.wins);
    }
    match standings.leader() {
        Some(player) => println!("Leader: player {player}"),
        None => println!("No outright leader"),
    }
}
