//! # Console Surface
//!
//! The character-cell surface every screen is drawn onto, plus an in-memory
//! implementation that the window blits from and tests read back.

use super::color::{palette, Rgb};

/// A character-cell display surface.
///
/// Coordinates are in cells; writes outside the surface are ignored.
pub trait Console {
    /// Width in cells.
    fn width(&self) -> i32;

    /// Height in cells.
    fn height(&self) -> i32;

    /// Resets every cell to a blank black cell.
    fn clear(&mut self);

    /// Replaces the glyph and both colors of a cell.
    fn draw_cell(&mut self, x: i32, y: i32, ch: char, fg: Rgb, bg: Rgb);

    /// Overwrites only the parts of a cell that are given; `None` keeps what
    /// is already there.
    fn draw_over_cell(
        &mut self,
        x: i32,
        y: i32,
        ch: Option<char>,
        fg: Option<Rgb>,
        bg: Option<Rgb>,
    );

    /// Writes a line of text, truncated to `max_width` cells when given.
    fn draw_text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        fg: Rgb,
        bg: Option<Rgb>,
        max_width: Option<usize>,
    ) {
        let limit = max_width.unwrap_or(usize::MAX);
        for (offset, ch) in text.chars().take(limit).enumerate() {
            self.draw_over_cell(x + offset as i32, y, Some(ch), Some(fg), bg);
        }
    }

    /// Fills a rectangle with one glyph and background.
    fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, ch: char, fg: Rgb, bg: Rgb) {
        for cy in y..y + height {
            for cx in x..x + width {
                self.draw_cell(cx, cy, ch, fg, bg);
            }
        }
    }

    /// Draws a single-line box with an optional title in the top edge.
    fn draw_frame(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        title: &str,
        fg: Rgb,
        bg: Rgb,
    ) {
        if width < 2 || height < 2 {
            return;
        }
        self.draw_rect(x, y, width, height, ' ', fg, bg);
        let right = x + width - 1;
        let bottom = y + height - 1;
        for cx in x + 1..right {
            self.draw_cell(cx, y, '─', fg, bg);
            self.draw_cell(cx, bottom, '─', fg, bg);
        }
        for cy in y + 1..bottom {
            self.draw_cell(x, cy, '│', fg, bg);
            self.draw_cell(right, cy, '│', fg, bg);
        }
        self.draw_cell(x, y, '┌', fg, bg);
        self.draw_cell(right, y, '┐', fg, bg);
        self.draw_cell(x, bottom, '└', fg, bg);
        self.draw_cell(right, bottom, '┘', fg, bg);

        if !title.is_empty() {
            let label = format!(" {} ", title);
            let start = x + (width - label.chars().count() as i32).max(0) / 2;
            self.draw_text(start, y, &label, bg, Some(fg), Some(width.max(0) as usize));
        }
    }
}

/// One character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Rgb,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: palette::WHITE,
            bg: palette::BLACK,
        }
    }
}

/// In-memory console, stored row-major.
#[derive(Debug, Clone)]
pub struct GridConsole {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl GridConsole {
    /// Creates a blank console of the given size in cells.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cells: vec![Cell::default(); (width * height) as usize],
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && x < self.width && y < self.height {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }

    /// Gets the cell at a position, if it is on the surface.
    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).and_then(|index| self.cells.get(index))
    }

    /// The glyphs of one row as a string.
    pub fn row_text(&self, y: i32) -> String {
        (0..self.width)
            .filter_map(|x| self.cell(x, y).map(|cell| cell.ch))
            .collect()
    }

    /// Whether any row contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        (0..self.height).any(|y| self.row_text(y).contains(needle))
    }
}

impl Console for GridConsole {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    fn draw_cell(&mut self, x: i32, y: i32, ch: char, fg: Rgb, bg: Rgb) {
        if let Some(index) = self.index(x, y) {
            self.cells[index] = Cell { ch, fg, bg };
        }
    }

    fn draw_over_cell(
        &mut self,
        x: i32,
        y: i32,
        ch: Option<char>,
        fg: Option<Rgb>,
        bg: Option<Rgb>,
    ) {
        if let Some(index) = self.index(x, y) {
            let cell = &mut self.cells[index];
            if let Some(ch) = ch {
                cell.ch = ch;
            }
            if let Some(fg) = fg {
                cell.fg = fg;
            }
            if let Some(bg) = bg {
                cell.bg = bg;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_writes_are_ignored() {
        let mut console = GridConsole::new(4, 2);
        console.draw_cell(-1, 0, '#', palette::WHITE, palette::BLACK);
        console.draw_cell(4, 1, '#', palette::WHITE, palette::BLACK);
        assert_eq!(console.row_text(0), "    ");
        assert_eq!(console.row_text(1), "    ");
    }

    #[test]
    fn test_draw_over_cell_keeps_unspecified_parts() {
        let mut console = GridConsole::new(2, 1);
        console.draw_cell(0, 0, '@', palette::WHITE, palette::BLACK);
        console.draw_over_cell(0, 0, None, None, Some(palette::RED));

        let cell = console.cell(0, 0).unwrap();
        assert_eq!(cell.ch, '@');
        assert_eq!(cell.fg, palette::WHITE);
        assert_eq!(cell.bg, palette::RED);
    }

    #[test]
    fn test_draw_text_respects_max_width() {
        let mut console = GridConsole::new(10, 1);
        console.draw_text(1, 0, "Hello there", palette::WHITE, None, Some(5));
        assert_eq!(console.row_text(0), " Hello    ");
    }

    #[test]
    fn test_frame_draws_title() {
        let mut console = GridConsole::new(20, 5);
        console.draw_frame(0, 0, 20, 5, "Inventory", palette::WHITE, palette::BLACK);
        assert!(console.row_text(0).contains(" Inventory "));
        assert_eq!(console.cell(0, 0).unwrap().ch, '┌');
        assert_eq!(console.cell(19, 4).unwrap().ch, '┘');
    }
}
