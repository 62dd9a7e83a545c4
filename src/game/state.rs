//! # Game State Module
//!
//! Central game state management and the turn scheduler.
//!
//! [`GameState`] is the context every action, AI decision and consumable is
//! handed: the current map, the player's id, the message log and the RNG. It
//! runs a full turn in [`GameState::process_player_action`]: the player's
//! action resolves completely, then each living enemy acts in map order, then
//! the field of view is recomputed.

use crate::components::LevelUpChoice;
use crate::rendering::Rgb;
use crate::{
    config, ai, Action, Actor, ActorKind, ConcreteAction, Entity, EntityId, GameEvent, GameMap,
    GenerationConfig, Position, RenderOrder, RogueError, RogueResult, RoomCorridorGenerator,
    TileKind,
};
use tracing::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// How a message log line should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageImportance {
    Info,
    Welcome,
    PlayerAttack,
    EnemyAttack,
    PlayerDeath,
    EnemyDeath,
    StatusEffect,
    HealthRecovered,
    NeedsTarget,
    Descend,
    Invalid,
    Impossible,
    Error,
}

/// One line of the in-game message log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub importance: MessageImportance,
    /// How many times in a row this exact message was logged
    pub count: u32,
}

impl Message {
    /// The text with a repeat counter when stacked, e.g. `"Orc attacks (x3)"`.
    pub fn full_text(&self) -> String {
        if self.count > 1 {
            format!("{} (x{})", self.text, self.count)
        } else {
            self.text.clone()
        }
    }
}

/// The in-game message log. Consecutive identical messages stack.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message, stacking it onto the previous one if identical.
    pub fn add(&mut self, text: impl Into<String>, importance: MessageImportance) {
        let text = text.into();
        if let Some(last) = self.messages.last_mut() {
            if last.text == text && last.importance == importance {
                last.count += 1;
                return;
            }
        }
        self.messages.push(Message {
            text,
            importance,
            count: 1,
        });
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Game statistics tracking player progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameStatistics {
    /// Number of enemies defeated
    pub enemies_defeated: u32,
    /// Number of items collected
    pub items_collected: u32,
    /// Total damage dealt by the player
    pub damage_dealt: u64,
    /// Total damage taken by the player
    pub damage_taken: u64,
    /// Total steps taken by the player
    pub steps_taken: u64,
    /// Deepest floor reached
    pub max_depth_reached: u32,
}

impl GameStatistics {
    /// Updates statistics based on a game event.
    pub fn update_from_event(&mut self, event: &GameEvent, player_id: EntityId) {
        match event {
            GameEvent::EntityMoved { entity_id, .. } if *entity_id == player_id => {
                self.steps_taken += 1;
            }
            GameEvent::EntityDamaged {
                entity_id,
                damage,
                source,
            } => {
                if *entity_id == player_id {
                    self.damage_taken += *damage as u64;
                } else if *source == Some(player_id) {
                    self.damage_dealt += *damage as u64;
                }
            }
            GameEvent::EntityDied { entity_id, .. } if *entity_id != player_id => {
                self.enemies_defeated += 1;
            }
            GameEvent::ItemPickedUp { entity_id, .. } if *entity_id == player_id => {
                self.items_collected += 1;
            }
            GameEvent::FloorChanged { floor } => {
                self.max_depth_reached = self.max_depth_reached.max(*floor);
            }
            _ => {}
        }
    }
}

/// Game completion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCompletionState {
    /// Game is still in progress
    Playing,
    /// Player died; the game can still be looked at but not played
    PlayerDied,
}

/// Central game state containing all game data and systems.
#[derive(Debug, Clone)]
pub struct GameState {
    /// The current floor
    pub map: GameMap,
    /// The player entity ID
    pub player_id: EntityId,
    /// Messages shown to the player
    pub messages: MessageLog,
    /// Dungeon depth, starting at 1
    pub current_floor: u32,
    /// Completed turns
    pub turn_number: u64,
    /// Settings used for every floor of this game
    pub generation: GenerationConfig,
    /// Current game completion state
    pub completion_state: GameCompletionState,
    /// Game statistics for player progress
    pub statistics: GameStatistics,
    pub(crate) rng: StdRng,
}

impl GameState {
    /// Starts a new game: creates the player and generates the first floor.
    ///
    /// # Examples
    ///
    /// ```
    /// use rogue::{GameState, GenerationConfig};
    ///
    /// let state = GameState::new_game(GenerationConfig::new(12345)).unwrap();
    /// assert_eq!(state.current_floor, 1);
    /// assert!(state.is_player_alive());
    /// ```
    pub fn new_game(config: GenerationConfig) -> RogueResult<Self> {
        let player = ActorKind::Player.spawn(Position::new(0, 0));
        let player_id = player.id;
        let floor = 1;
        let map = RoomCorridorGenerator::new().generate_dungeon(&config, floor, player)?;

        info!("Starting new game with seed {}", config.seed);
        let mut state = Self::from_parts(map, player_id, floor, config);
        state.messages.add(
            "Hello and welcome, adventurer, to yet another dungeon!",
            MessageImportance::Welcome,
        );
        Ok(state)
    }

    /// Wraps an existing map (new or loaded) in a game state and computes the
    /// initial field of view.
    pub fn from_parts(
        map: GameMap,
        player_id: EntityId,
        current_floor: u32,
        generation: GenerationConfig,
    ) -> Self {
        let rng_seed = generation.seed ^ 0x5EED_u64.wrapping_mul(current_floor as u64 + 1);
        let rng = StdRng::seed_from_u64(rng_seed);
        let player_alive = map
            .entity(player_id)
            .map(Entity::is_alive_actor)
            .unwrap_or(false);
        let completion_state = if player_alive {
            GameCompletionState::Playing
        } else {
            GameCompletionState::PlayerDied
        };
        let mut state = Self {
            map,
            player_id,
            messages: MessageLog::new(),
            current_floor,
            turn_number: 0,
            generation,
            completion_state,
            statistics: GameStatistics {
                max_depth_reached: current_floor,
                ..GameStatistics::default()
            },
            rng,
        };
        state.update_fov();
        state
    }

    /// Gets the player entity.
    pub fn player(&self) -> Option<&Entity> {
        self.map.entity(self.player_id)
    }

    /// Gets the player's actor components.
    pub fn player_actor(&self) -> Option<&Actor> {
        self.player().and_then(Entity::as_actor)
    }

    pub fn player_actor_mut(&mut self) -> Option<&mut Actor> {
        let player_id = self.player_id;
        self.map.entity_mut(player_id).and_then(Entity::as_actor_mut)
    }

    pub fn player_position(&self) -> Option<Position> {
        self.player().map(|player| player.position)
    }

    pub fn is_player_alive(&self) -> bool {
        self.player().map(Entity::is_alive_actor).unwrap_or(false)
    }

    /// Checks if the game has ended.
    pub fn is_game_over(&self) -> bool {
        self.completion_state != GameCompletionState::Playing
    }

    /// Looks up an actor on the current map.
    pub fn actor(&self, id: EntityId) -> RogueResult<&Actor> {
        self.map
            .entity(id)
            .and_then(Entity::as_actor)
            .ok_or_else(|| RogueError::InvalidState(format!("Actor {} not found", id)))
    }

    /// Looks up an actor on the current map, mutably.
    pub fn actor_mut(&mut self, id: EntityId) -> RogueResult<&mut Actor> {
        self.map
            .entity_mut(id)
            .and_then(Entity::as_actor_mut)
            .ok_or_else(|| RogueError::InvalidState(format!("Actor {} not found", id)))
    }

    /// Looks up an entity on the current map.
    pub fn entity(&self, id: EntityId) -> RogueResult<&Entity> {
        self.map
            .entity(id)
            .ok_or_else(|| RogueError::InvalidState(format!("Entity {} not found", id)))
    }

    /// Runs one full turn for a player command.
    ///
    /// Returns `Ok(false)` if the action was impossible (the reason is logged
    /// and nothing else happens) or the player is dead. Returns `Ok(true)`
    /// once the player and every enemy have acted and the field of view is
    /// current.
    pub fn process_player_action(&mut self, action: ConcreteAction) -> RogueResult<bool> {
        if !self.is_player_alive() {
            debug!("Ignoring {:?}: the player is dead", action.action_type());
            return Ok(false);
        }

        match action.execute(self) {
            Ok(events) => self.process_events(&events),
            Err(err) if err.is_impossible() => {
                self.messages
                    .add(err.to_string(), MessageImportance::Impossible);
                return Ok(false);
            }
            Err(err) => return Err(err),
        }

        self.handle_enemy_turns()?;
        self.update_fov();
        self.turn_number += 1;
        Ok(true)
    }

    /// Lets every living non-player actor act once, in map order.
    ///
    /// Impossible enemy actions are dropped silently.
    pub fn handle_enemy_turns(&mut self) -> RogueResult<()> {
        let enemies: Vec<EntityId> = self
            .map
            .living_actors()
            .filter(|entity| entity.id != self.player_id)
            .filter(|entity| entity.as_actor().map(|actor| actor.ai.is_some()).unwrap_or(false))
            .map(|entity| entity.id)
            .collect();

        for enemy in enemies {
            if !self.is_player_alive() {
                break;
            }
            if !self.map.entity(enemy).map(Entity::is_alive_actor).unwrap_or(false) {
                continue;
            }
            match ai::take_turn(self, enemy) {
                Ok(events) => self.process_events(&events),
                Err(err) if err.is_impossible() => {
                    debug!("Enemy {} could not act: {}", enemy, err);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Recomputes which tiles the player can see.
    pub fn update_fov(&mut self) {
        if let Some(origin) = self.player_position() {
            self.map.update_fov(origin, config::FOV_RADIUS);
        }
    }

    /// Applies the side effects of events: log lines and statistics.
    pub fn process_events(&mut self, events: &[GameEvent]) {
        for event in events {
            self.process_event(event);
        }
    }

    /// Processes a single game event.
    pub fn process_event(&mut self, event: &GameEvent) {
        self.statistics.update_from_event(event, self.player_id);
        if let GameEvent::Message { text, importance } = event {
            self.messages.add(text.clone(), *importance);
        }
    }

    /// Damages an actor and, if that was the killing blow, turns it into a
    /// corpse.
    pub fn apply_damage(
        &mut self,
        target: EntityId,
        amount: i32,
        source: Option<EntityId>,
    ) -> Vec<GameEvent> {
        let Some(actor) = self.map.entity_mut(target).and_then(Entity::as_actor_mut) else {
            return Vec::new();
        };
        let died = actor.fighter.take_damage(amount);

        let mut events = vec![GameEvent::EntityDamaged {
            entity_id: target,
            damage: amount,
            source,
        }];
        if died {
            events.extend(self.kill(target, source));
        }
        events
    }

    /// The death transition: corpse glyph, "Remains of" name, no AI, no
    /// blocking. Does nothing for an entity that is already a corpse.
    pub fn kill(&mut self, target: EntityId, killer: Option<EntityId>) -> Vec<GameEvent> {
        let player_id = self.player_id;
        let Some(entity) = self.map.entity_mut(target) else {
            return Vec::new();
        };
        if entity.render_order == RenderOrder::Corpse {
            return Vec::new();
        }
        let Some(actor) = entity.as_actor_mut() else {
            return Vec::new();
        };

        actor.ai = None;
        actor.fighter.set_hp(0);
        let xp_given = actor.level.xp_given;
        let original_name = entity.name.clone();

        entity.ch = '%';
        entity.fg = Rgb(191, 0, 0);
        entity.blocks_movement = false;
        entity.render_order = RenderOrder::Corpse;
        entity.name = format!("Remains of {}", original_name);

        let mut events = vec![GameEvent::EntityDied {
            entity_id: target,
            killer,
        }];

        if target == player_id {
            info!("The player has died on floor {}", self.current_floor);
            self.completion_state = GameCompletionState::PlayerDied;
            events.push(GameEvent::message("You died!", MessageImportance::PlayerDeath));
        } else {
            events.push(GameEvent::message(
                format!("{} is dead!", original_name),
                MessageImportance::EnemyDeath,
            ));
            if let Some(player) = self.player_actor_mut() {
                if xp_given > 0 {
                    player.level.add_xp(xp_given);
                    events.push(GameEvent::message(
                        format!("You gain {} experience points.", xp_given),
                        MessageImportance::Info,
                    ));
                    if player.level.requires_level_up() {
                        events.push(GameEvent::message(
                            format!("You advance to level {}!", player.level.current_level + 1),
                            MessageImportance::Info,
                        ));
                    }
                }
            }
        }
        events
    }

    /// Whether the player has banked enough experience to level up.
    pub fn player_requires_level_up(&self) -> bool {
        self.player_actor()
            .map(|actor| actor.is_alive() && actor.level.requires_level_up())
            .unwrap_or(false)
    }

    /// Spends one pending level-up on the chosen attribute.
    pub fn level_up(&mut self, choice: LevelUpChoice) -> RogueResult<()> {
        let actor = self.actor_mut(self.player_id)?;
        if !actor.level.requires_level_up() {
            return Err(RogueError::impossible("You are not ready to level up."));
        }

        let text = match choice {
            LevelUpChoice::Constitution => {
                actor.increase_max_hp(20);
                "Your health improves!"
            }
            LevelUpChoice::Strength => {
                actor.increase_power(1);
                "You feel stronger!"
            }
            LevelUpChoice::Agility => {
                actor.increase_defense(1);
                "Your movements are getting swifter!"
            }
        };
        let new_level = actor.level.current_level;

        debug!("Player reached level {}", new_level);
        self.messages.add(text, MessageImportance::Info);
        Ok(())
    }

    /// Generates the next floor and moves the player onto it.
    pub fn descend(&mut self) -> RogueResult<Vec<GameEvent>> {
        let on_stairs = self
            .player_position()
            .and_then(|pos| self.map.tile(pos))
            .map(|tile| tile.kind == TileKind::DownStairs)
            .unwrap_or(false);
        if !on_stairs {
            return Err(RogueError::impossible("There are no stairs here."));
        }

        let next_floor = self.current_floor + 1;
        let player = self.entity(self.player_id)?.clone();
        self.map =
            RoomCorridorGenerator::new().generate_dungeon(&self.generation, next_floor, player)?;
        self.current_floor = next_floor;
        self.update_fov();

        info!("Player descended to floor {}", next_floor);
        Ok(vec![
            GameEvent::FloorChanged { floor: next_floor },
            GameEvent::message("You descend the staircase.", MessageImportance::Descend),
        ])
    }

    /// Serializes the game to the JSON save format.
    pub fn save_to_json(&self) -> RogueResult<String> {
        crate::save::serialize_game(self)
    }

    /// Restores a game from the JSON save format.
    pub fn load_from_json(json: &str, generation: GenerationConfig) -> RogueResult<Self> {
        let loaded = crate::save::deserialize_game(json)?;
        let generation = GenerationConfig {
            seed: loaded.seed.unwrap_or(generation.seed),
            ..generation
        };
        Ok(Self::from_parts(
            loaded.map,
            loaded.player_id,
            loaded.current_floor,
            generation,
        ))
    }
}
