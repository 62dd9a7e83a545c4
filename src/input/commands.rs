//! # Command Definitions
//!
//! Backend-independent input events and the key tables that map them to
//! player commands.

use crate::{Direction, Position};

/// Keys the game distinguishes. Printable keys arrive as [`Key::Char`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Enter,
    Escape,
    Char(char),
}

/// Modifier keys held while a key was pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

/// A single key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key press without modifiers.
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    pub fn char(ch: char) -> Self {
        Self::plain(Key::Char(ch))
    }
}

/// Everything the input handlers react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    /// The pointer moved over a map cell
    MouseMove(Position),
    /// The primary button was clicked over a map cell
    Click(Position),
}

/// Player input types available in the main game mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    /// Move (or attack) in a direction
    Move(Direction),
    /// Wait/rest for one turn
    Wait,
    /// Pick up item at current position
    PickUp,
    /// Open the inventory to use an item
    ShowInventory,
    /// Open the inventory to drop an item
    DropInventory,
    /// Scroll through the message log
    ViewHistory,
    /// Move a free cursor around the map
    Look,
    /// Show character information
    CharacterInfo,
    /// Go down the stairs
    Descend,
    /// Save without leaving
    Save,
    /// Save and quit
    Quit,
}

/// Movement keys: arrows, numpad digits, home/end/page keys and vi-keys.
///
/// # Examples
///
/// ```
/// use rogue::{move_direction, Direction, Key, KeyEvent};
///
/// assert_eq!(move_direction(&KeyEvent::plain(Key::Home)), Some(Direction::Northwest));
/// assert_eq!(move_direction(&KeyEvent::char('l')), Some(Direction::East));
/// assert_eq!(move_direction(&KeyEvent::char('5')), None);
/// ```
pub fn move_direction(event: &KeyEvent) -> Option<Direction> {
    match event.key {
        Key::Up => Some(Direction::North),
        Key::Down => Some(Direction::South),
        Key::Left => Some(Direction::West),
        Key::Right => Some(Direction::East),
        Key::Home => Some(Direction::Northwest),
        Key::End => Some(Direction::Southwest),
        Key::PageUp => Some(Direction::Northeast),
        Key::PageDown => Some(Direction::Southeast),
        Key::Char(ch) => match ch {
            '1' | 'b' => Some(Direction::Southwest),
            '2' | 'j' => Some(Direction::South),
            '3' | 'n' => Some(Direction::Southeast),
            '4' | 'h' => Some(Direction::West),
            '6' | 'l' => Some(Direction::East),
            '7' | 'y' => Some(Direction::Northwest),
            '8' | 'k' => Some(Direction::North),
            '9' | 'u' => Some(Direction::Northeast),
            _ => None,
        },
        Key::Enter | Key::Escape => None,
    }
}

pub fn is_wait_key(event: &KeyEvent) -> bool {
    matches!(event.key, Key::Char('5') | Key::Char('.'))
}

pub fn is_confirm_key(event: &KeyEvent) -> bool {
    event.key == Key::Enter
}

/// Maps a key press in the main game mode to a command.
pub fn game_command(event: &KeyEvent) -> Option<PlayerInput> {
    if let Some(direction) = move_direction(event) {
        return Some(PlayerInput::Move(direction));
    }
    if is_wait_key(event) {
        return Some(PlayerInput::Wait);
    }
    match event.key {
        Key::Escape => Some(PlayerInput::Quit),
        Key::Char('g') => Some(PlayerInput::PickUp),
        Key::Char('i') => Some(PlayerInput::ShowInventory),
        Key::Char('d') => Some(PlayerInput::DropInventory),
        Key::Char('v') => Some(PlayerInput::ViewHistory),
        Key::Char('/') => Some(PlayerInput::Look),
        Key::Char('c') => Some(PlayerInput::CharacterInfo),
        Key::Char('>') => Some(PlayerInput::Descend),
        Key::Char('s') => Some(PlayerInput::Save),
        _ => None,
    }
}

/// How far one cursor step moves with the given modifiers held.
pub fn cursor_step(modifiers: Modifiers) -> i32 {
    if modifiers.alt {
        20
    } else if modifiers.ctrl {
        10
    } else if modifiers.shift {
        5
    } else {
        1
    }
}

/// Scroll amount for history navigation keys.
pub fn scroll_amount(event: &KeyEvent) -> Option<isize> {
    match event.key {
        Key::Up | Key::Char('k') | Key::Char('8') => Some(-1),
        Key::Down | Key::Char('j') | Key::Char('2') => Some(1),
        Key::PageUp => Some(-10),
        Key::PageDown => Some(10),
        _ => None,
    }
}

/// Inventory slot letter to index: `a` is 0.
pub fn letter_index(ch: char) -> Option<usize> {
    if ch.is_ascii_lowercase() {
        Some(ch as usize - 'a' as usize)
    } else {
        None
    }
}

/// Inventory slot index to letter.
pub fn index_letter(index: usize) -> char {
    (b'a' + (index % 26) as u8) as char
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_movement_layouts_agree() {
        let groups = [
            (Key::Up, '8', 'k', Direction::North),
            (Key::Down, '2', 'j', Direction::South),
            (Key::Left, '4', 'h', Direction::West),
            (Key::Right, '6', 'l', Direction::East),
            (Key::Home, '7', 'y', Direction::Northwest),
            (Key::PageUp, '9', 'u', Direction::Northeast),
            (Key::End, '1', 'b', Direction::Southwest),
            (Key::PageDown, '3', 'n', Direction::Southeast),
        ];
        for (key, digit, vi, direction) in groups {
            assert_eq!(move_direction(&KeyEvent::plain(key)), Some(direction));
            assert_eq!(move_direction(&KeyEvent::char(digit)), Some(direction));
            assert_eq!(move_direction(&KeyEvent::char(vi)), Some(direction));
        }
    }

    #[test]
    fn test_game_commands() {
        assert_eq!(game_command(&KeyEvent::char('5')), Some(PlayerInput::Wait));
        assert_eq!(game_command(&KeyEvent::char('.')), Some(PlayerInput::Wait));
        assert_eq!(game_command(&KeyEvent::char('g')), Some(PlayerInput::PickUp));
        assert_eq!(game_command(&KeyEvent::char('>')), Some(PlayerInput::Descend));
        assert_eq!(game_command(&KeyEvent::plain(Key::Escape)), Some(PlayerInput::Quit));
        assert_eq!(game_command(&KeyEvent::char('z')), None);
    }

    #[test]
    fn test_cursor_step_multipliers() {
        let mut modifiers = Modifiers::default();
        assert_eq!(cursor_step(modifiers), 1);
        modifiers.shift = true;
        assert_eq!(cursor_step(modifiers), 5);
        modifiers.ctrl = true;
        assert_eq!(cursor_step(modifiers), 10);
        modifiers.alt = true;
        assert_eq!(cursor_step(modifiers), 20);
    }

    #[test]
    fn test_inventory_letters() {
        assert_eq!(letter_index('a'), Some(0));
        assert_eq!(letter_index('z'), Some(25));
        assert_eq!(letter_index('A'), None);
        assert_eq!(index_letter(2), 'c');
    }
}
