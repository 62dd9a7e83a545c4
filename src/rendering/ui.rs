//! # Screen Layout
//!
//! Draws the game and every input mode's overlay onto a [`Console`].
//!
//! Layout on the 80x50 console: the map fills the top 43 rows, the HP bar and
//! dungeon level sit in the bottom-left corner, names under the pointer and
//! the message log fill the bottom-right.

use super::color::{palette, Rgb};
use super::console::Console;
use crate::{
    index_letter, wrap_text, Entity, GameMap, GameState, InputHandler, InventoryPurpose,
    MessageImportance, MessageLog, Position, TargetPurpose,
};

const BAR_X: i32 = 0;
const BAR_Y: i32 = 45;
const BAR_WIDTH: i32 = 20;
const FLOOR_LABEL_Y: i32 = 47;
const LOG_X: i32 = 21;
const LOG_Y: i32 = 45;
const LOG_WIDTH: i32 = 40;
const LOG_HEIGHT: i32 = 5;
const NAMES_Y: i32 = 44;

/// Color a log line is drawn in.
pub fn importance_color(importance: MessageImportance) -> Rgb {
    match importance {
        MessageImportance::Info => palette::WHITE,
        MessageImportance::Welcome => palette::WELCOME_TEXT,
        MessageImportance::PlayerAttack => palette::PLAYER_ATTACK,
        MessageImportance::EnemyAttack => palette::ENEMY_ATTACK,
        MessageImportance::PlayerDeath => palette::PLAYER_DIE,
        MessageImportance::EnemyDeath => palette::ENEMY_DIE,
        MessageImportance::StatusEffect => palette::STATUS_EFFECT_APPLIED,
        MessageImportance::HealthRecovered => palette::HEALTH_RECOVERED,
        MessageImportance::NeedsTarget => palette::NEEDS_TARGET,
        MessageImportance::Descend => palette::DESCEND,
        MessageImportance::Invalid => palette::INVALID,
        MessageImportance::Impossible => palette::IMPOSSIBLE,
        MessageImportance::Error => palette::ERROR,
    }
}

/// Draws the whole screen for the active handler.
pub fn render_screen(
    console: &mut dyn Console,
    state: Option<&GameState>,
    handler: &InputHandler,
    mouse: Position,
) {
    console.clear();

    let state = match (handler, state) {
        (InputHandler::MainMenu { popup }, _) => {
            render_main_menu(console, popup.as_deref());
            return;
        }
        (_, Some(state)) => state,
        (_, None) => {
            render_main_menu(console, None);
            return;
        }
    };

    render_game(console, state, mouse);

    match handler {
        InputHandler::MainMenu { .. } | InputHandler::Game => {}
        InputHandler::GameOver => render_game_over(console),
        InputHandler::Inventory(purpose) => render_inventory(console, state, *purpose),
        InputHandler::History { cursor } => render_history(console, &state.messages, *cursor),
        InputHandler::Target { purpose, cursor } => {
            render_target(console, &state.map, *purpose, *cursor)
        }
        InputHandler::LevelUp => render_level_up(console, state),
        InputHandler::CharacterInfo => render_character_info(console, state),
    }
}

/// Draws the map, the status panel and the message log.
pub fn render_game(console: &mut dyn Console, state: &GameState, mouse: Position) {
    render_map(console, &state.map);

    if let Some(player) = state.player_actor() {
        render_bar(console, player.fighter.hp(), player.fighter.max_hp, BAR_WIDTH);
    }
    console.draw_text(
        BAR_X,
        FLOOR_LABEL_Y,
        &format!("Dungeon level: {}", state.current_floor),
        palette::WHITE,
        None,
        None,
    );
    render_names_at(console, &state.map, mouse);
    render_messages(console, LOG_X, LOG_Y, LOG_WIDTH, LOG_HEIGHT, &state.messages);
}

/// Draws every tile, then the visible entities in render order.
pub fn render_map(console: &mut dyn Console, map: &GameMap) {
    for (y, row) in map.tiles.iter().enumerate() {
        for (x, tile) in row.iter().enumerate() {
            let graphic = tile.graphic();
            console.draw_cell(x as i32, y as i32, graphic.ch, graphic.fg, graphic.bg);
        }
    }

    let mut visible: Vec<&Entity> = map
        .entities
        .iter()
        .filter(|entity| map.is_visible(entity.position))
        .collect();
    visible.sort_by_key(|entity| entity.render_order);
    for entity in visible {
        console.draw_over_cell(
            entity.position.x,
            entity.position.y,
            Some(entity.ch),
            Some(entity.fg),
            entity.bg,
        );
    }
}

/// HP bar with the filled part proportional to current hp.
pub fn render_bar(console: &mut dyn Console, current: i32, maximum: i32, total_width: i32) {
    let filled = if maximum > 0 {
        (current.max(0) as f64 / maximum as f64 * total_width as f64) as i32
    } else {
        0
    };

    console.draw_rect(BAR_X, BAR_Y, total_width, 1, ' ', palette::BAR_TEXT, palette::BAR_EMPTY);
    if filled > 0 {
        console.draw_rect(BAR_X, BAR_Y, filled, 1, ' ', palette::BAR_TEXT, palette::BAR_FILLED);
    }
    console.draw_text(
        BAR_X + 1,
        BAR_Y,
        &format!("HP: {}/{}", current, maximum),
        palette::BAR_TEXT,
        None,
        Some(total_width as usize),
    );
}

/// Names of visible entities under the pointer, comma separated.
pub fn render_names_at(console: &mut dyn Console, map: &GameMap, mouse: Position) {
    if !map.in_bounds(mouse) || !map.is_visible(mouse) {
        return;
    }
    let names: Vec<&str> = map
        .entities
        .iter()
        .filter(|entity| entity.position == mouse)
        .map(|entity| entity.name.as_str())
        .collect();
    if names.is_empty() {
        return;
    }
    let mut text = names.join(", ");
    if let Some(first) = text.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    console.draw_text(LOG_X, NAMES_Y, &text, palette::WHITE, None, Some(LOG_WIDTH as usize));
}

/// Newest messages at the bottom, wrapped to `width`, oldest cut off at the
/// top of the box.
pub fn render_messages(
    console: &mut dyn Console,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    messages: &MessageLog,
) {
    render_message_slice(console, x, y, width, height, messages, messages.len());
}

fn render_message_slice(
    console: &mut dyn Console,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    messages: &MessageLog,
    end: usize,
) {
    let mut y_offset = height - 1;
    let end = end.min(messages.len());
    for message in messages.messages()[..end].iter().rev() {
        let color = importance_color(message.importance);
        for line in wrap_text(&message.full_text(), width.max(1) as usize).iter().rev() {
            console.draw_text(x, y + y_offset, line, color, None, Some(width as usize));
            y_offset -= 1;
            if y_offset < 0 {
                return;
            }
        }
    }
}

fn render_main_menu(console: &mut dyn Console, popup: Option<&str>) {
    let center_x = console.width() / 2;
    let center_y = console.height() / 2;
    let title = "TOMBS OF THE ANCIENT KINGS";
    let credit = "By the rogue developers";
    console.draw_text(
        center_x - title.len() as i32 / 2,
        center_y - 4,
        title,
        palette::MENU_TITLE,
        None,
        None,
    );
    console.draw_text(
        center_x - credit.len() as i32 / 2,
        console.height() - 2,
        credit,
        palette::MENU_TITLE,
        None,
        None,
    );

    let options = ["[N] Play a new game", "[C] Continue last game", "[Q] Quit"];
    for (offset, text) in options.iter().enumerate() {
        console.draw_text(
            center_x - 12,
            center_y - 2 + offset as i32,
            &format!("{:<24}", text),
            palette::MENU_TEXT,
            Some(palette::BLACK),
            None,
        );
    }

    if let Some(text) = popup {
        let width = text.chars().count() as i32 + 4;
        let left = center_x - width / 2;
        console.draw_frame(left, center_y + 3, width, 3, "", palette::WHITE, palette::BLACK);
        console.draw_text(
            center_x - width / 2 + 2,
            center_y + 4,
            text,
            palette::WHITE,
            None,
            None,
        );
    }
}

fn render_game_over(console: &mut dyn Console) {
    let text = "You died! Press Escape to leave.";
    let x = (console.width() - text.len() as i32) / 2;
    console.draw_text(x, 0, text, palette::PLAYER_DIE, Some(palette::BLACK), None);
}

/// Left-hand corner when the player stands on the right half of the map.
fn menu_x(state: &GameState) -> i32 {
    match state.player_position() {
        Some(pos) if pos.x <= 30 => 40,
        _ => 0,
    }
}

fn render_inventory(console: &mut dyn Console, state: &GameState, purpose: InventoryPurpose) {
    let title = match purpose {
        InventoryPurpose::Use => "Select an item to use",
        InventoryPurpose::Drop => "Select an item to drop",
    };
    let Some(player) = state.player_actor() else {
        return;
    };

    let items = &player.inventory.items;
    let height = (items.len() as i32).max(1) + 2;
    let width = title.len() as i32 + 4;
    let x = menu_x(state);
    console.draw_frame(x, 0, width, height, title, palette::WHITE, palette::BLACK);

    if items.is_empty() {
        console.draw_text(x + 1, 1, "(Empty)", palette::WHITE, None, None);
        return;
    }
    for (index, item) in items.iter().enumerate() {
        let mut line = format!("({}) {}", index_letter(index), item.name);
        if player.equipment.is_equipped(item.id) {
            line.push_str(" (E)");
        }
        let row = 1 + index as i32;
        let max_width = Some(width as usize - 2);
        console.draw_text(x + 1, row, &line, palette::WHITE, None, max_width);
    }
}

fn render_history(console: &mut dyn Console, messages: &MessageLog, cursor: usize) {
    let width = console.width() - 6;
    let height = console.height() - 6;
    console.draw_frame(3, 3, width, height, "Message history", palette::WHITE, palette::BLACK);
    render_message_slice(console, 4, 4, width - 2, height - 2, messages, cursor.saturating_add(1));
}

fn render_target(
    console: &mut dyn Console,
    map: &GameMap,
    purpose: TargetPurpose,
    cursor: Position,
) {
    if let TargetPurpose::Area { radius, .. } = purpose {
        let reach = radius.ceil() as i32;
        for y in cursor.y - reach..=cursor.y + reach {
            for x in cursor.x - reach..=cursor.x + reach {
                let pos = Position::new(x, y);
                if map.in_bounds(pos) && cursor.euclidean_distance(pos) <= radius {
                    console.draw_over_cell(x, y, None, None, Some(palette::RED));
                }
            }
        }
    }
    console.draw_over_cell(cursor.x, cursor.y, None, Some(palette::BLACK), Some(palette::WHITE));
}

fn render_level_up(console: &mut dyn Console, state: &GameState) {
    let Some(player) = state.player_actor() else {
        return;
    };
    let x = menu_x(state);
    console.draw_frame(x, 0, 35, 8, "Level Up", palette::WHITE, palette::BLACK);
    console.draw_text(x + 1, 1, "Congratulations! You level up!", palette::WHITE, None, None);
    console.draw_text(x + 1, 2, "Select an attribute to increase.", palette::WHITE, None, None);
    console.draw_text(
        x + 1,
        4,
        &format!("a) Constitution (+20 HP, from {})", player.fighter.max_hp),
        palette::WHITE,
        None,
        Some(33),
    );
    console.draw_text(
        x + 1,
        5,
        &format!("b) Strength (+1 attack, from {})", player.power()),
        palette::WHITE,
        None,
        Some(33),
    );
    console.draw_text(
        x + 1,
        6,
        &format!("c) Agility (+1 defense, from {})", player.defense()),
        palette::WHITE,
        None,
        Some(33),
    );
}

fn render_character_info(console: &mut dyn Console, state: &GameState) {
    let Some(player) = state.player_actor() else {
        return;
    };
    let x = menu_x(state);
    let title = "Character Information";
    console.draw_frame(x, 0, title.len() as i32 + 4, 7, title, palette::WHITE, palette::BLACK);

    let lines = [
        format!("Level: {}", player.level.current_level),
        format!("XP: {}", player.level.current_xp),
        format!("XP for next Level: {}", player.level.experience_to_next_level()),
        format!("Attack: {}", player.power()),
        format!("Defense: {}", player.defense()),
    ];
    for (offset, line) in lines.iter().enumerate() {
        console.draw_text(x + 1, 1 + offset as i32, line, palette::WHITE, None, None);
    }
}
