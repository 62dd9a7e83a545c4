//! # Colors
//!
//! RGB triples used for tiles, entities and message log lines.

use serde::{Deserialize, Serialize};

/// An opaque 24-bit color. Serializes as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Scales each channel by `factor` (clamped to `0.0..=1.0`).
    pub fn dimmed(self, factor: f32) -> Rgb {
        let factor = factor.clamp(0.0, 1.0);
        let scale = |channel: u8| (channel as f32 * factor) as u8;
        Rgb(scale(self.0), scale(self.1), scale(self.2))
    }
}

/// Named colors shared by the renderer and the message log.
pub mod palette {
    use super::Rgb;

    pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgb = Rgb(0x00, 0x00, 0x00);
    pub const RED: Rgb = Rgb(0xFF, 0x00, 0x00);

    pub const PLAYER_ATTACK: Rgb = Rgb(0xE0, 0xE0, 0xE0);
    pub const ENEMY_ATTACK: Rgb = Rgb(0xFF, 0xC0, 0xC0);
    pub const NEEDS_TARGET: Rgb = Rgb(0x3F, 0xFF, 0xFF);
    pub const STATUS_EFFECT_APPLIED: Rgb = Rgb(0x3F, 0xFF, 0x3F);
    pub const DESCEND: Rgb = Rgb(0x9F, 0x3F, 0xFF);

    pub const PLAYER_DIE: Rgb = Rgb(0xFF, 0x30, 0x30);
    pub const ENEMY_DIE: Rgb = Rgb(0xFF, 0xA0, 0x30);

    pub const INVALID: Rgb = Rgb(0xFF, 0xFF, 0x00);
    pub const IMPOSSIBLE: Rgb = Rgb(0x80, 0x80, 0x80);
    pub const ERROR: Rgb = Rgb(0xFF, 0x40, 0x40);

    pub const WELCOME_TEXT: Rgb = Rgb(0x20, 0xA0, 0xFF);
    pub const HEALTH_RECOVERED: Rgb = Rgb(0x00, 0xFF, 0x00);

    pub const BAR_TEXT: Rgb = WHITE;
    pub const BAR_FILLED: Rgb = Rgb(0x00, 0x60, 0x00);
    pub const BAR_EMPTY: Rgb = Rgb(0x40, 0x10, 0x10);

    pub const MENU_TITLE: Rgb = Rgb(0xFF, 0xFF, 0x3F);
    pub const MENU_TEXT: Rgb = WHITE;
}
