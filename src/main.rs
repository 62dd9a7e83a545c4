//! # Rogue Main Entry Point
//!
//! Parses the command line, sets up logging and the macroquad window, and
//! hands control to the scene manager.

use clap::Parser;
use tracing::{error, info, Level};
use macroquad::prelude::Conf;
use rogue::{config, GenerationConfig, MacroquadDisplay, RogueResult, SceneManager};
use std::path::PathBuf;

/// Command line arguments for the roguelike.
#[derive(Parser, Debug)]
#[command(name = "rogue")]
#[command(about = "A turn-based roguelike: descend, fight, level up")]
#[command(version)]
struct Args {
    /// Random seed for dungeon generation; a fresh seed per game if omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Where the game is saved and loaded from
    #[arg(long, default_value = config::DEFAULT_SAVE_FILE)]
    save_file: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Yet Another Roguelike Tutorial".to_string(),
        window_width: config::SCREEN_WIDTH * 10,
        window_height: config::SCREEN_HEIGHT * 16,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    if let Err(err) = run(args).await {
        error!("Fatal error: {}", err);
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber at the requested level.
fn initialize_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "error" => Level::ERROR,
        "warn" => Level::WARN,
        "info" => Level::INFO,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

async fn run(args: Args) -> RogueResult<()> {
    info!("Starting rogue v{}", rogue::VERSION);

    let generation = GenerationConfig::new(args.seed.unwrap_or_default());
    generation.validate()?;

    let mut display = MacroquadDisplay::new(config::SCREEN_WIDTH, config::SCREEN_HEIGHT);
    let mut scenes = SceneManager::new(args.save_file, generation, args.seed);
    scenes.run(&mut display).await
}
