//! Headless autoplay runner (default binary).
//!
//! Bootstraps a game, drives it with gravity ticks and optional periodic ground
//! shifts, and prints ASCII frames plus a final summary. Spawns are placed by the
//! heuristic unless the config file picks another spawn policy.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use conveyor_tetris::core::{BootstrapOptions, EngineConfig, GameState};
use conveyor_tetris::engine::{Command, Engine};

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "conveyor-tetris", about = "Headless conveyor-tetris autoplay runner")]
struct Args {
    /// Seed for the 7-bag randomizer
    #[arg(long, default_value_t = 1)]
    seed: u32,

    /// Maximum number of gravity ticks to run
    #[arg(long, default_value_t = 2_000)]
    ticks: u64,

    /// JSON engine config; defaults apply to any missing field
    #[arg(long, value_name = "path.json")]
    config: Option<PathBuf>,

    /// Shift the ground one cell every N ticks (0 = never)
    #[arg(long, default_value_t = 0)]
    shift_every: u64,

    /// Print a frame every N ticks (0 = final frame only)
    #[arg(long, default_value_t = 0)]
    print_every: u64,
}

fn load_engine(args: &Args) -> Result<Engine> {
    match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            Engine::from_json_str(&json)
                .with_context(|| format!("invalid config {}", path.display()))
        }
        None => Engine::new(EngineConfig::default()).context("invalid default config"),
    }
}

fn print_frame(tick: u64, state: &GameState) {
    println!(
        "[Runner] tick {} | score {} | lines {} | level {} | shift {} | phase {}",
        tick,
        state.score(),
        state.lines(),
        state.level(),
        state.ground_shift(),
        state.phase().as_str()
    );
    print!("{}", state.composite_field());
}

fn run(args: &Args) -> Result<()> {
    let engine = load_engine(args)?;
    let config = engine.config();
    println!(
        "[Runner] seed {} | field {}x{} | {:?} | {:?}",
        args.seed,
        config.dimensions.cols,
        config.dimensions.rows,
        config.topology,
        config.spawn_policy
    );

    let mut state = engine.start(&engine.bootstrap(&BootstrapOptions::seeded(args.seed)));
    let mut ticks_run = 0;

    for tick in 1..=args.ticks {
        if state.is_game_over() {
            break;
        }
        state = engine.apply(&state, Command::Tick);
        if args.shift_every > 0 && tick % args.shift_every == 0 {
            state = engine.apply(&state, Command::ShiftGround(1));
        }
        ticks_run = tick;

        if args.print_every > 0 && tick % args.print_every == 0 {
            print_frame(tick, &state);
        }
    }

    if state.is_game_over() {
        println!("[Runner] game over after {} ticks", ticks_run);
    }
    print_frame(ticks_run, &state);
    println!(
        "[Runner] drops {} | first clear at drop {} | gravity {}ms",
        state.mino_drops(),
        state
            .first_clear_drop_count()
            .map_or_else(|| "-".to_string(), |n| n.to_string()),
        engine.gravity_interval_ms(&state)
    );
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    run(&args)
}
