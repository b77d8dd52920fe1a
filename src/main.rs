//! TETRS rules - headless driver
//!
//! Plays one game with a simple placement bot, sending the engine the same
//! commands and frame ticks a frontend would, then prints the result.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tetrs_rules::{Action, Board, Game, GameEvent, Rewards, Settings};
use tracing_subscriber::EnvFilter;

/// Simulated frame length between commands
const FRAME: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(version, about = "Play a headless game of TETRS with a placement bot")]
struct Args {
    /// Rules file (defaults to the platform config location)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Piece sequence seed, overrides the one in the rules file
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many pieces have locked
    #[arg(long, default_value_t = 500)]
    pieces: u64,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,

    /// Write the effective rules file and exit
    #[arg(long)]
    write_config: bool,
}

/// Where the bot wants the current piece
#[derive(Debug, Clone, Copy)]
struct Placement {
    rotations: u8,
    shift: i32,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Generate session ID for this run
    let session_id: u32 = rand::random();
    let log_dir = std::env::temp_dir().join("tetrs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;
    let log_file = format!("{:08x}.log", session_id);

    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(EnvFilter::from_default_env().add_directive("tetrs_rules=debug".parse()?))
        .with_ansi(false)
        .init();

    tracing::info!(
        "TETRS rules starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings = match &args.config {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("loading rules from {}", path.display()))?,
        None => Settings::load(),
    };

    if args.write_config {
        match &args.config {
            Some(path) => settings.save_to(path)?,
            None => settings.save()?,
        }
        println!("Rules written.");
        return Ok(());
    }

    let seed = args
        .seed
        .or(settings.spawner.seed)
        .unwrap_or_else(rand::random);
    let mut game = Game::with_seed(settings.rules(), seed);
    let mut rewards = Rewards::new(settings.rewards.locks_per_coin);
    tracing::info!(seed, rules = ?game.rules(), "game started");

    while game.is_playing() && game.lock_count() < args.pieces {
        play_piece(&mut game);
        for event in game.drain_events() {
            rewards.observe(&event);
            if let GameEvent::LinesCleared(count) = event {
                tracing::debug!(count, total = game.lines_cleared(), "lines cleared");
            }
        }
    }

    let snapshot = game.snapshot();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", snapshot.board_text());
        println!();
        println!("Seed: {}", seed);
        println!("Final Score: {}", snapshot.score);
        println!("Level: {} | Lines: {}", snapshot.level, snapshot.lines);
        println!("Pieces: {} | Coins: {}", snapshot.lock_count, rewards.coins());
        if snapshot.is_game_over() {
            println!("Game Over");
        }
    }

    Ok(())
}

/// Steer the current piece to the bot's choice and drop it, ticking between
/// commands like a frame loop would
fn play_piece(game: &mut Game) {
    let locks = game.lock_count();
    let Some(plan) = choose_placement(game) else {
        game.process_action(Action::HardDrop);
        return;
    };

    let step = if plan.shift < 0 { Action::MoveLeft } else { Action::MoveRight };
    let commands = std::iter::repeat_n(Action::Rotate, plan.rotations as usize)
        .chain(std::iter::repeat_n(step, plan.shift.unsigned_abs() as usize));

    for action in commands {
        game.process_action(action);
        game.tick(FRAME);
        if game.lock_count() != locks || !game.is_playing() {
            return;
        }
    }
    game.process_action(Action::HardDrop);
}

/// Try every rotation and column on a copy of the game and keep the best board
fn choose_placement(game: &Game) -> Option<Placement> {
    let width = game.board().width() as i32;
    let mut best: Option<(f64, Placement)> = None;

    for rotations in 0..4u8 {
        for shift in -width..=width {
            let Some(trial) = simulate(game, rotations, shift) else {
                continue;
            };
            let value = evaluate(&trial, game.lines_cleared());
            if best.is_none_or(|(best_value, _)| value > best_value) {
                best = Some((value, Placement { rotations, shift }));
            }
        }
    }

    best.map(|(_, placement)| placement)
}

fn simulate(game: &Game, rotations: u8, shift: i32) -> Option<Game> {
    let mut trial = game.clone();
    for _ in 0..rotations {
        if !trial.rotate() {
            return None;
        }
    }
    let step = if shift < 0 { Action::MoveLeft } else { Action::MoveRight };
    for _ in 0..shift.unsigned_abs() {
        if !trial.process_action(step) {
            return None;
        }
    }
    trial.hard_drop();
    Some(trial)
}

fn evaluate(trial: &Game, lines_before: u32) -> f64 {
    if trial.is_game_over() {
        return f64::MIN;
    }
    let board = trial.board();
    let heights = board.column_heights();
    let aggregate: usize = heights.iter().sum();
    let bumpiness: usize = heights.windows(2).map(|w| w[0].abs_diff(w[1])).sum();
    let lines = trial.lines_cleared() - lines_before;

    0.76 * lines as f64
        - 0.51 * aggregate as f64
        - 0.36 * count_holes(board) as f64
        - 0.18 * bumpiness as f64
}

/// Empty cells with a filled cell somewhere above them in the same column
fn count_holes(board: &Board) -> usize {
    (0..board.width())
        .map(|col| {
            board
                .rows()
                .iter()
                .map(|row| row[col])
                .skip_while(|cell| cell.is_empty())
                .filter(|cell| cell.is_empty())
                .count()
        })
        .sum()
}
