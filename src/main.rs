use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use checker_snake::config::{
    GameConfig, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, DEFAULT_SPEED_FLOOR_MS,
    DEFAULT_SQUARE_SIZE, DEFAULT_START_LENGTH, DEFAULT_START_SPEED_MS,
};
use checker_snake::game::SnakeGame;
use checker_snake::term::TermManager;
use checker_snake::GameState;

#[derive(Parser, Debug)]
#[command(name = "checker-snake", about = "Snake on a checkerboard, in your terminal")]
struct Args {
    /// Grid width in squares
    #[arg(long, default_value_t = DEFAULT_GRID_WIDTH)]
    width: u16,

    /// Grid height in squares
    #[arg(long, default_value_t = DEFAULT_GRID_HEIGHT)]
    height: u16,

    /// Terminal columns per square
    #[arg(long, default_value_t = DEFAULT_SQUARE_SIZE)]
    square_size: u16,

    /// Length the snake grows to before it starts moving as a whole
    #[arg(long, default_value_t = DEFAULT_START_LENGTH)]
    start_length: usize,

    /// Initial milliseconds between ticks
    #[arg(long, default_value_t = DEFAULT_START_SPEED_MS)]
    start_speed: u64,

    /// Fastest allowed milliseconds between ticks
    #[arg(long, default_value_t = DEFAULT_SPEED_FLOOR_MS)]
    speed_floor: u64,

    /// Seed for food placement, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (filtered by RUST_LOG, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn game_config(&self) -> GameConfig {
        GameConfig {
            square_size: self.square_size,
            start_length: self.start_length,
            start_speed_ms: self.start_speed,
            speed_floor_ms: self.speed_floor,
            grid_width: self.width,
            grid_height: self.height,
            ..GameConfig::default()
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // The screen belongs to the game, so logs only go to a file.
    if let Some(path) = &args.log_file {
        let file = File::create(path)
            .with_context(|| format!("Error creating log file {:?}", path))?;
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    let config = args.game_config();
    let state = match args.seed {
        Some(seed) => GameState::seeded(config, seed),
        None => GameState::new(config),
    }
    .context("Invalid game configuration")?;
    let term = TermManager::new(state.config())?;

    info!(config = ?state.config(), seed = ?args.seed, "starting");
    let mut game = SnakeGame::new(term, state, Instant::now());
    game.run()
}
