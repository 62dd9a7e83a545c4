//! # Rendering Module
//!
//! Character-cell rendering. Screens are composed on a [`Console`] and the
//! macroquad window presents the finished cells.

pub mod color;
pub mod console;
pub mod display;
pub mod ui;

pub use color::*;
pub use console::*;
pub use display::*;
pub use ui::*;
