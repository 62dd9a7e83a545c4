//! # Rogue
//!
//! A deterministic, turn-based roguelike engine.
//!
//! ## Architecture Overview
//!
//! The engine is split along the path a single key press travels:
//!
//! - **Input**: key and pointer events are interpreted by the current
//!   [`InputHandler`] mode, yielding either an action or a mode switch
//! - **Actions**: every state change is a validated [`ConcreteAction`] that either
//!   commits completely or fails with [`RogueError::Impossible`]
//! - **Game State**: [`GameState`] runs the turn (player action, enemy AI,
//!   field of view) and owns the map, the message log and the RNG
//! - **Generation**: room-and-corridor dungeons populated from floor-scaled tables
//! - **Rendering**: everything is drawn through the [`Console`] trait; the
//!   macroquad window is one implementation of it
//!
//! Saves are plain JSON documents produced by [`game::save`].

pub mod game;
pub mod generation;
pub mod input;
pub mod rendering;
pub mod scenes;
pub mod utils;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use input::*;
pub use rendering::*;
pub use scenes::*;
pub use utils::*;

/// Core error type for the engine.
///
/// `Impossible` is the recoverable, player-facing failure of an action; the
/// turn scheduler turns it into a log line. `Load` covers malformed or missing
/// save data and is surfaced to the player as a popup.
#[derive(thiserror::Error, Debug)]
pub enum RogueError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// The requested action cannot be performed right now
    #[error("{0}")]
    Impossible(String),

    /// Save data could not be turned back into a game
    #[error("Failed to load save: {0}")]
    Load(String),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

impl RogueError {
    /// Builds the recoverable "you can't do that" error.
    pub fn impossible(message: impl Into<String>) -> Self {
        RogueError::Impossible(message.into())
    }

    /// Whether this error is an expected, player-caused failure.
    pub fn is_impossible(&self) -> bool {
        matches!(self, RogueError::Impossible(_))
    }
}

/// Result type used throughout the crate.
pub type RogueResult<T> = Result<T, RogueError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Console width in cells
    pub const SCREEN_WIDTH: i32 = 80;

    /// Console height in cells
    pub const SCREEN_HEIGHT: i32 = 50;

    /// Default dungeon width in tiles
    pub const DEFAULT_MAP_WIDTH: i32 = 80;

    /// Default dungeon height in tiles
    pub const DEFAULT_MAP_HEIGHT: i32 = 43;

    /// Room placement attempts per floor
    pub const DEFAULT_MAX_ROOMS: u32 = 30;

    /// Smallest room, walls included
    pub const DEFAULT_MIN_ROOM_SIZE: i32 = 6;

    /// Largest room, walls included
    pub const DEFAULT_MAX_ROOM_SIZE: i32 = 10;

    /// How far the player can see
    pub const FOV_RADIUS: i32 = 8;

    /// Items an actor can carry
    pub const INVENTORY_CAPACITY: usize = 26;

    /// Where the game is saved unless told otherwise
    pub const DEFAULT_SAVE_FILE: &str = "savegame.json";
}
