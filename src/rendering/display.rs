//! # Display Management
//!
//! Presents a [`GridConsole`] in the macroquad window and turns keyboard and
//! mouse state into [`InputEvent`]s.

use super::color::Rgb;
use super::console::{Console, GridConsole};
use crate::{InputEvent, Key, KeyEvent, Modifiers, Position};
use macroquad::prelude::*;

/// Special keys polled each frame; printable keys come from the char queue.
const SPECIAL_KEYS: [(KeyCode, Key); 11] = [
    (KeyCode::Up, Key::Up),
    (KeyCode::Down, Key::Down),
    (KeyCode::Left, Key::Left),
    (KeyCode::Right, Key::Right),
    (KeyCode::Home, Key::Home),
    (KeyCode::End, Key::End),
    (KeyCode::PageUp, Key::PageUp),
    (KeyCode::PageDown, Key::PageDown),
    (KeyCode::Enter, Key::Enter),
    (KeyCode::KpEnter, Key::Enter),
    (KeyCode::Escape, Key::Escape),
];

/// Keypad digits. Some platforms also deliver these through the char queue,
/// so they are merged with typed characters without duplicates.
const KEYPAD_DIGITS: [(KeyCode, char); 9] = [
    (KeyCode::Kp1, '1'),
    (KeyCode::Kp2, '2'),
    (KeyCode::Kp3, '3'),
    (KeyCode::Kp4, '4'),
    (KeyCode::Kp5, '5'),
    (KeyCode::Kp6, '6'),
    (KeyCode::Kp7, '7'),
    (KeyCode::Kp8, '8'),
    (KeyCode::Kp9, '9'),
];

/// Macroquad display manager for the game.
pub struct MacroquadDisplay {
    /// Console width in cells
    pub columns: i32,
    /// Console height in cells
    pub rows: i32,
    /// Cell width in pixels
    pub cell_width: f32,
    /// Cell height in pixels
    pub cell_height: f32,
    /// Last cell the pointer was over
    pub last_mouse_cell: Option<Position>,
}

impl MacroquadDisplay {
    /// Creates a display sized to the current window.
    pub fn new(columns: i32, rows: i32) -> Self {
        let mut display = Self {
            columns,
            rows,
            cell_width: 10.0,
            cell_height: 16.0,
            last_mouse_cell: None,
        };
        display.fit_to_window(screen_width(), screen_height());
        display
    }

    /// Recomputes cell size so the console fills the window.
    pub fn fit_to_window(&mut self, width: f32, height: f32) {
        if self.columns > 0 && self.rows > 0 {
            self.cell_width = (width / self.columns as f32).max(1.0);
            self.cell_height = (height / self.rows as f32).max(1.0);
        }
    }

    /// Maps a pixel position to the console cell under it.
    pub fn pixel_to_cell(&self, x: f32, y: f32) -> Option<Position> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let cell = Position::new((x / self.cell_width) as i32, (y / self.cell_height) as i32);
        if cell.x < self.columns && cell.y < self.rows {
            Some(cell)
        } else {
            None
        }
    }

    /// Draws every console cell: background rectangle, then glyph.
    pub fn present(&mut self, console: &GridConsole) {
        self.fit_to_window(screen_width(), screen_height());
        clear_background(BLACK);

        let font_size = self.cell_height;
        for y in 0..console.height() {
            for x in 0..console.width() {
                let Some(cell) = console.cell(x, y) else {
                    continue;
                };
                let px = x as f32 * self.cell_width;
                let py = y as f32 * self.cell_height;
                if cell.bg != Rgb(0, 0, 0) {
                    draw_rectangle(px, py, self.cell_width, self.cell_height, to_color(cell.bg));
                }
                if cell.ch != ' ' {
                    let mut buffer = [0u8; 4];
                    let glyph = cell.ch.encode_utf8(&mut buffer);
                    draw_text(
                        glyph,
                        px,
                        py + self.cell_height * 0.8,
                        font_size,
                        to_color(cell.fg),
                    );
                }
            }
        }
    }

    /// Drains this frame's keyboard and mouse input.
    pub fn poll_events(&mut self) -> Vec<InputEvent> {
        let modifiers = Modifiers {
            shift: is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift),
            ctrl: is_key_down(KeyCode::LeftControl) || is_key_down(KeyCode::RightControl),
            alt: is_key_down(KeyCode::LeftAlt) || is_key_down(KeyCode::RightAlt),
        };
        let mut events = Vec::new();

        for (code, key) in SPECIAL_KEYS {
            if is_key_pressed(code) {
                events.push(InputEvent::Key(KeyEvent { key, modifiers }));
            }
        }

        let mut typed = Vec::new();
        while let Some(ch) = get_char_pressed() {
            if !ch.is_control() {
                typed.push(ch);
            }
        }
        for (code, ch) in KEYPAD_DIGITS {
            if is_key_pressed(code) && !typed.contains(&ch) {
                typed.push(ch);
            }
        }
        events.extend(
            typed
                .into_iter()
                .map(|ch| InputEvent::Key(KeyEvent { key: Key::Char(ch), modifiers })),
        );

        let (mx, my) = mouse_position();
        let cell = self.pixel_to_cell(mx, my);
        if let Some(cell) = cell {
            if self.last_mouse_cell != Some(cell) {
                events.push(InputEvent::MouseMove(cell));
            }
            if is_mouse_button_pressed(MouseButton::Left) {
                events.push(InputEvent::Click(cell));
            }
        }
        self.last_mouse_cell = cell;

        events
    }

    /// The cell the pointer is over, or the origin.
    pub fn mouse_cell(&self) -> Position {
        self.last_mouse_cell.unwrap_or_default()
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::from_rgba(rgb.0, rgb.1, rgb.2, 255)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display() -> MacroquadDisplay {
        MacroquadDisplay {
            columns: 80,
            rows: 50,
            cell_width: 10.0,
            cell_height: 16.0,
            last_mouse_cell: None,
        }
    }

    #[test]
    fn test_pixel_to_cell() {
        let display = display();
        assert_eq!(display.pixel_to_cell(0.0, 0.0), Some(Position::new(0, 0)));
        assert_eq!(display.pixel_to_cell(25.0, 33.0), Some(Position::new(2, 2)));
        assert_eq!(display.pixel_to_cell(799.0, 799.0), Some(Position::new(79, 49)));
        assert_eq!(display.pixel_to_cell(800.0, 10.0), None);
        assert_eq!(display.pixel_to_cell(-1.0, 10.0), None);
    }

    #[test]
    fn test_fit_to_window_scales_cells() {
        let mut display = display();
        display.fit_to_window(1600.0, 800.0);
        assert_eq!(display.cell_width, 20.0);
        assert_eq!(display.cell_height, 16.0);
    }
}
