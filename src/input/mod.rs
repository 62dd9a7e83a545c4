//! # Input Module
//!
//! Modal input handling. The active [`InputHandler`] decides what a key press
//! or mouse event means; the answer is a [`HandlerResponse`] the scene
//! manager acts on (run a turn, switch modes, save, quit).

pub mod commands;

pub use commands::*;

use crate::{
    BumpAction, ConcreteAction, DropAction, EntityId, EquipAction, GameState, ItemAction,
    LevelUpChoice, MessageImportance, PickupAction, Position, TakeStairsAction,
    TargetRequirement, WaitAction,
};
use tracing::debug;

/// What an inventory menu does with the selected item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryPurpose {
    Use,
    Drop,
}

/// What a targeting cursor is selecting for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetPurpose {
    /// Free look; confirming just returns to the game
    Look,
    /// A single tile for an item such as a confusion scroll
    Single { item: EntityId },
    /// The centre of an area effect
    Area { item: EntityId, radius: f64 },
}

/// The active input mode.
#[derive(Debug, Clone, PartialEq)]
pub enum InputHandler {
    MainMenu { popup: Option<String> },
    Game,
    GameOver,
    Inventory(InventoryPurpose),
    History { cursor: usize },
    Target { purpose: TargetPurpose, cursor: Position },
    LevelUp,
    CharacterInfo,
}

/// The outcome of handling one input event.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerResponse {
    /// Run a full turn with this player action
    Action(ConcreteAction),
    /// Replace the active handler
    Switch(InputHandler),
    /// Nothing to do
    Stay,
    /// Save the game and keep playing
    Save,
    /// Save the game and exit
    Quit,
    /// Start a new game
    NewGame,
    /// Load the saved game
    Continue,
    /// Exit without saving
    Exit,
}

impl Default for InputHandler {
    fn default() -> Self {
        InputHandler::MainMenu { popup: None }
    }
}

impl InputHandler {
    /// A main menu showing a popup message.
    pub fn menu_with_popup(text: impl Into<String>) -> Self {
        InputHandler::MainMenu {
            popup: Some(text.into()),
        }
    }

    /// Short name for logs and the status line.
    pub fn mode_name(&self) -> &'static str {
        match self {
            InputHandler::MainMenu { .. } => "main menu",
            InputHandler::Game => "game",
            InputHandler::GameOver => "game over",
            InputHandler::Inventory(InventoryPurpose::Use) => "inventory",
            InputHandler::Inventory(InventoryPurpose::Drop) => "drop",
            InputHandler::History { .. } => "history",
            InputHandler::Target { .. } => "target",
            InputHandler::LevelUp => "level up",
            InputHandler::CharacterInfo => "character",
        }
    }

    /// Position of the targeting cursor, if one is shown.
    pub fn cursor(&self) -> Option<Position> {
        match self {
            InputHandler::Target { cursor, .. } => Some(*cursor),
            _ => None,
        }
    }

    /// Reacts to one input event.
    ///
    /// Cursor and scroll movement update the handler in place and answer
    /// [`HandlerResponse::Stay`]. Every other mode change is returned as a
    /// [`HandlerResponse::Switch`].
    pub fn handle(&mut self, event: InputEvent, state: Option<&mut GameState>) -> HandlerResponse {
        if let InputHandler::MainMenu { popup } = self {
            return handle_main_menu(popup.is_some(), event);
        }

        let Some(state) = state else {
            debug!("No game in progress for {} input", self.mode_name());
            return HandlerResponse::Switch(InputHandler::default());
        };

        match self {
            InputHandler::MainMenu { .. } => HandlerResponse::Stay,
            InputHandler::Game => handle_game(event, state),
            InputHandler::GameOver => handle_game_over(event),
            InputHandler::Inventory(purpose) => handle_inventory(*purpose, event, state),
            InputHandler::History { cursor } => handle_history(cursor, event, state),
            InputHandler::Target { purpose, cursor } => {
                handle_target(*purpose, cursor, event, state)
            }
            InputHandler::LevelUp => handle_level_up(event, state),
            InputHandler::CharacterInfo => match event {
                InputEvent::Key(_) => HandlerResponse::Switch(InputHandler::Game),
                _ => HandlerResponse::Stay,
            },
        }
    }
}

fn handle_main_menu(popup_shown: bool, event: InputEvent) -> HandlerResponse {
    let InputEvent::Key(key) = event else {
        return HandlerResponse::Stay;
    };
    if popup_shown {
        return HandlerResponse::Switch(InputHandler::default());
    }
    match key.key {
        Key::Char('n') => HandlerResponse::NewGame,
        Key::Char('c') => HandlerResponse::Continue,
        Key::Char('q') | Key::Escape => HandlerResponse::Exit,
        _ => HandlerResponse::Stay,
    }
}

fn handle_game(event: InputEvent, state: &mut GameState) -> HandlerResponse {
    let InputEvent::Key(key) = event else {
        return HandlerResponse::Stay;
    };
    let Some(command) = game_command(&key) else {
        return HandlerResponse::Stay;
    };
    let actor = state.player_id;

    match command {
        PlayerInput::Move(direction) => {
            HandlerResponse::Action(ConcreteAction::Bump(BumpAction { actor, direction }))
        }
        PlayerInput::Wait => HandlerResponse::Action(ConcreteAction::Wait(WaitAction { actor })),
        PlayerInput::PickUp => {
            HandlerResponse::Action(ConcreteAction::Pickup(PickupAction { actor }))
        }
        PlayerInput::Descend => {
            HandlerResponse::Action(ConcreteAction::TakeStairs(TakeStairsAction { actor }))
        }
        PlayerInput::ShowInventory => {
            HandlerResponse::Switch(InputHandler::Inventory(InventoryPurpose::Use))
        }
        PlayerInput::DropInventory => {
            HandlerResponse::Switch(InputHandler::Inventory(InventoryPurpose::Drop))
        }
        PlayerInput::ViewHistory => HandlerResponse::Switch(InputHandler::History {
            cursor: state.messages.len().saturating_sub(1),
        }),
        PlayerInput::Look => HandlerResponse::Switch(InputHandler::Target {
            purpose: TargetPurpose::Look,
            cursor: state.player_position().unwrap_or_default(),
        }),
        PlayerInput::CharacterInfo => HandlerResponse::Switch(InputHandler::CharacterInfo),
        PlayerInput::Save => HandlerResponse::Save,
        PlayerInput::Quit => HandlerResponse::Quit,
    }
}

fn handle_game_over(event: InputEvent) -> HandlerResponse {
    match event {
        InputEvent::Key(KeyEvent {
            key: Key::Escape, ..
        }) => HandlerResponse::Exit,
        InputEvent::Key(KeyEvent {
            key: Key::Char('v'),
            ..
        }) => HandlerResponse::Switch(InputHandler::History { cursor: usize::MAX }),
        _ => HandlerResponse::Stay,
    }
}

fn handle_inventory(
    purpose: InventoryPurpose,
    event: InputEvent,
    state: &mut GameState,
) -> HandlerResponse {
    let InputEvent::Key(key) = event else {
        return HandlerResponse::Stay;
    };
    let Key::Char(ch) = key.key else {
        return HandlerResponse::Switch(InputHandler::Game);
    };
    let Some(index) = letter_index(ch) else {
        return HandlerResponse::Switch(InputHandler::Game);
    };

    let actor = state.player_id;
    let selected = state.player_actor().and_then(|player| {
        player.inventory.items.get(index).map(|entity| {
            let item = entity.as_item();
            (
                entity.id,
                item.and_then(|item| item.consumable),
                item.map(|item| item.equippable.is_some()).unwrap_or(false),
            )
        })
    });
    let Some((item, consumable, equippable)) = selected else {
        state
            .messages
            .add("Invalid entry.", MessageImportance::Invalid);
        return HandlerResponse::Stay;
    };

    if purpose == InventoryPurpose::Drop {
        return HandlerResponse::Action(ConcreteAction::Drop(DropAction { actor, item }));
    }
    if equippable {
        return HandlerResponse::Action(ConcreteAction::Equip(EquipAction { actor, item }));
    }

    let requirement = consumable
        .map(|consumable| consumable.target_requirement())
        .unwrap_or(TargetRequirement::None);
    let cursor = state.player_position().unwrap_or_default();
    match requirement {
        TargetRequirement::None => HandlerResponse::Action(ConcreteAction::UseItem(ItemAction {
            actor,
            item,
            target: None,
        })),
        TargetRequirement::Single => {
            state
                .messages
                .add("Select a target location.", MessageImportance::NeedsTarget);
            HandlerResponse::Switch(InputHandler::Target {
                purpose: TargetPurpose::Single { item },
                cursor,
            })
        }
        TargetRequirement::Area { radius } => {
            state
                .messages
                .add("Select a target location.", MessageImportance::NeedsTarget);
            HandlerResponse::Switch(InputHandler::Target {
                purpose: TargetPurpose::Area { item, radius },
                cursor,
            })
        }
    }
}

fn handle_history(cursor: &mut usize, event: InputEvent, state: &GameState) -> HandlerResponse {
    let InputEvent::Key(key) = event else {
        return HandlerResponse::Stay;
    };
    let last = state.messages.len().saturating_sub(1);
    // Entering from game over does not know the log length yet.
    *cursor = (*cursor).min(last);

    if let Some(amount) = scroll_amount(&key) {
        *cursor = (*cursor as isize + amount).clamp(0, last as isize) as usize;
        return HandlerResponse::Stay;
    }
    match key.key {
        Key::Home => {
            *cursor = 0;
            HandlerResponse::Stay
        }
        Key::End => {
            *cursor = last;
            HandlerResponse::Stay
        }
        _ => HandlerResponse::Switch(InputHandler::Game),
    }
}

fn handle_target(
    purpose: TargetPurpose,
    cursor: &mut Position,
    event: InputEvent,
    state: &GameState,
) -> HandlerResponse {
    match event {
        InputEvent::MouseMove(position) => {
            if state.map.in_bounds(position) {
                *cursor = position;
            }
            HandlerResponse::Stay
        }
        InputEvent::Click(position) => {
            if !state.map.in_bounds(position) {
                return HandlerResponse::Stay;
            }
            *cursor = position;
            confirm_target(purpose, position, state)
        }
        InputEvent::Key(key) => {
            if let Some(direction) = move_direction(&key) {
                let step = cursor_step(key.modifiers);
                let delta = direction.to_delta();
                cursor.x = (cursor.x + delta.x * step).clamp(0, state.map.width - 1);
                cursor.y = (cursor.y + delta.y * step).clamp(0, state.map.height - 1);
                return HandlerResponse::Stay;
            }
            if is_confirm_key(&key) {
                return confirm_target(purpose, *cursor, state);
            }
            HandlerResponse::Switch(InputHandler::Game)
        }
    }
}

fn confirm_target(purpose: TargetPurpose, target: Position, state: &GameState) -> HandlerResponse {
    let actor = state.player_id;
    match purpose {
        TargetPurpose::Look => HandlerResponse::Switch(InputHandler::Game),
        TargetPurpose::Single { item } | TargetPurpose::Area { item, .. } => {
            HandlerResponse::Action(ConcreteAction::UseItem(ItemAction {
                actor,
                item,
                target: Some(target),
            }))
        }
    }
}

fn handle_level_up(event: InputEvent, state: &mut GameState) -> HandlerResponse {
    let InputEvent::Key(key) = event else {
        return HandlerResponse::Stay;
    };
    let choice = match key.key {
        Key::Char('a') => LevelUpChoice::Constitution,
        Key::Char('b') => LevelUpChoice::Strength,
        Key::Char('c') => LevelUpChoice::Agility,
        _ => {
            state
                .messages
                .add("Invalid entry.", MessageImportance::Invalid);
            return HandlerResponse::Stay;
        }
    };
    match state.level_up(choice) {
        Ok(()) => HandlerResponse::Switch(InputHandler::Game),
        Err(err) => {
            state.messages.add(err.to_string(), MessageImportance::Impossible);
            HandlerResponse::Switch(InputHandler::Game)
        }
    }
}
