//! # Scene Management System
//!
//! Owns the running game (if any), the active input mode and the save file,
//! and turns [`HandlerResponse`]s into game operations.
//!
//! The per-frame loop is: poll input, feed each event to the handler, apply
//! the response, compose the screen on a [`GridConsole`], present it.

use crate::{
    config, load_from_file, render_screen, save_to_file, GameState, GenerationConfig,
    GridConsole, HandlerResponse, InputEvent, InputHandler, MacroquadDisplay, MessageImportance,
    Position, RogueResult,
};
use tracing::{error, info, warn};
use macroquad::prelude::next_frame;
use std::path::{Path, PathBuf};

/// The main scene manager that coordinates the game and its input modes.
pub struct SceneManager {
    game: Option<GameState>,
    handler: InputHandler,
    save_path: PathBuf,
    generation: GenerationConfig,
    fixed_seed: Option<u64>,
    exit_requested: bool,
}

impl SceneManager {
    /// Starts at the main menu.
    ///
    /// With `fixed_seed` every new game uses that seed; otherwise each new
    /// game draws a fresh one. Map sizes come from `generation`.
    pub fn new(
        save_path: impl Into<PathBuf>,
        generation: GenerationConfig,
        fixed_seed: Option<u64>,
    ) -> Self {
        Self {
            game: None,
            handler: InputHandler::default(),
            save_path: save_path.into(),
            generation,
            fixed_seed,
            exit_requested: false,
        }
    }

    pub fn game(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    pub fn handler(&self) -> &InputHandler {
        &self.handler
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    pub fn should_exit(&self) -> bool {
        self.exit_requested
    }

    /// Feeds one input event through the active handler and applies the
    /// response.
    pub fn dispatch(&mut self, event: InputEvent) -> RogueResult<()> {
        let response = self.handler.handle(event, self.game.as_mut());
        self.apply(response)
    }

    /// Applies a handler response.
    pub fn apply(&mut self, response: HandlerResponse) -> RogueResult<()> {
        match response {
            HandlerResponse::Stay => {}
            HandlerResponse::Action(action) => {
                let Some(game) = self.game.as_mut() else {
                    self.handler = self.resume_handler();
                    return Ok(());
                };
                let acted = match game.process_player_action(action) {
                    Ok(acted) => acted,
                    Err(err) => {
                        error!("Action {:?} failed: {}", action, err);
                        game.messages.add(err.to_string(), MessageImportance::Error);
                        false
                    }
                };
                // A refused action leaves the current menu or cursor open.
                if acted || !game.is_player_alive() {
                    self.handler = self.resume_handler();
                }
            }
            HandlerResponse::Switch(InputHandler::Game) => {
                self.handler = self.resume_handler();
            }
            HandlerResponse::Switch(handler) => {
                self.handler = handler;
            }
            HandlerResponse::Save => {
                if let Some(game) = self.game.as_mut() {
                    match save_to_file(game, &self.save_path) {
                        Ok(()) => game.messages.add("Game saved.", MessageImportance::Info),
                        Err(err) => {
                            error!("Saving to {} failed: {}", self.save_path.display(), err);
                            game.messages.add("Failed to save.", MessageImportance::Error);
                        }
                    }
                }
            }
            HandlerResponse::Quit => {
                self.save_if_alive()?;
                self.exit_requested = true;
            }
            HandlerResponse::NewGame => self.start_new_game()?,
            HandlerResponse::Continue => self.continue_game(),
            HandlerResponse::Exit => {
                if self.game.as_ref().map(GameState::is_game_over).unwrap_or(false) {
                    self.discard_save();
                }
                self.exit_requested = true;
            }
        }
        Ok(())
    }

    /// The mode to return to after a turn or a closed menu.
    fn resume_handler(&self) -> InputHandler {
        match &self.game {
            None => InputHandler::default(),
            Some(game) if !game.is_player_alive() => InputHandler::GameOver,
            Some(game) if game.player_requires_level_up() => InputHandler::LevelUp,
            Some(_) => InputHandler::Game,
        }
    }

    fn start_new_game(&mut self) -> RogueResult<()> {
        let seed = self.fixed_seed.unwrap_or_else(rand::random);
        let config = GenerationConfig {
            seed,
            ..self.generation.clone()
        };
        self.game = Some(GameState::new_game(config)?);
        self.handler = InputHandler::Game;
        Ok(())
    }

    fn continue_game(&mut self) {
        match load_from_file(&self.save_path, self.generation.clone()) {
            Ok(game) => {
                self.game = Some(game);
                self.handler = self.resume_handler();
            }
            Err(err) => {
                warn!("Could not load {}: {}", self.save_path.display(), err);
                self.handler = InputHandler::menu_with_popup("Failed to load save.");
            }
        }
    }

    fn save_if_alive(&self) -> RogueResult<()> {
        if let Some(game) = &self.game {
            if game.is_player_alive() {
                save_to_file(game, &self.save_path)?;
            }
        }
        Ok(())
    }

    /// A dead character's save must not be continued.
    fn discard_save(&self) {
        match std::fs::remove_file(&self.save_path) {
            Ok(()) => info!("Removed {}", self.save_path.display()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => warn!("Could not remove {}: {}", self.save_path.display(), err),
        }
    }

    /// Composes the current screen.
    pub fn render(&self, console: &mut GridConsole, mouse: Position) {
        render_screen(console, self.game.as_ref(), &self.handler, mouse);
    }

    /// Runs the main loop until the player exits.
    pub async fn run(&mut self, display: &mut MacroquadDisplay) -> RogueResult<()> {
        let mut console = GridConsole::new(config::SCREEN_WIDTH, config::SCREEN_HEIGHT);
        while !self.exit_requested {
            for event in display.poll_events() {
                self.dispatch(event)?;
                if self.exit_requested {
                    break;
                }
            }
            self.render(&mut console, display.mouse_cell());
            display.present(&console);
            next_frame().await;
        }
        info!("Scene loop ended");
        Ok(())
    }
}
