//! # Utilities Module
//!
//! Pathfinding and text layout helpers shared by the game and the UI.

pub mod pathfinding;
pub mod text;

pub use self::pathfinding::*;
pub use text::*;
