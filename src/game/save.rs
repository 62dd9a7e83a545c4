//! # Save Games
//!
//! The save file is a single JSON document holding the current floor: its
//! tiles verbatim and one flat record per entity. Entities are rebuilt from
//! their stable kind identifier through the same spawn functions the dungeon
//! generator uses, then their saved state is laid over the fresh template.
//!
//! Entity ids are not persisted; a loaded game gets fresh ones.

use crate::components::{Fighter, Level};
use crate::rendering::Rgb;
use crate::{
    Actor, ActorKind, Ai, Entity, EntityId, EntityKind, GameMap, GameState, GenerationConfig,
    ItemKind, Position, RenderOrder, RogueError, RogueResult, Tile, TileKind,
};
use tracing::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveGame {
    /// Seed for the floors below this one; absent in older saves
    #[serde(default)]
    seed: Option<u64>,
    current_floor: u32,
    width: i32,
    height: i32,
    tiles: Vec<Vec<Tile>>,
    entities: Vec<EntityRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum KindRecord {
    Actor(ActorKind),
    Item(ItemKind),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntityRecord {
    kind: KindRecord,
    x: i32,
    y: i32,
    char: char,
    fg: Rgb,
    bg: Option<Rgb>,
    name: String,
    fighter: Option<FighterRecord>,
    level: Option<LevelRecord>,
    ai_type: Option<String>,
    confused_turns_remaining: u32,
    inventory: Option<Vec<InventoryRecord>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FighterRecord {
    max_hp: i32,
    hp: i32,
    /// Base defense, without equipment
    defense: i32,
    /// Base power, without equipment
    power: i32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LevelRecord {
    current_level: i32,
    current_xp: i32,
    level_up_base: i32,
    level_up_factor: i32,
    xp_given: i32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InventoryRecord {
    item_type: ItemKind,
    equipped: bool,
}

/// A game read back from a save file.
#[derive(Debug, Clone)]
pub struct LoadedGame {
    pub map: GameMap,
    pub player_id: EntityId,
    pub current_floor: u32,
    pub seed: Option<u64>,
}

/// Serializes the current floor of a game to compact JSON.
pub fn serialize_game(state: &GameState) -> RogueResult<String> {
    let map = &state.map;
    let save = SaveGame {
        seed: Some(state.generation.seed),
        current_floor: state.current_floor,
        width: map.width,
        height: map.height,
        tiles: map.tiles.clone(),
        entities: map.entities.iter().map(entity_record).collect(),
    };
    Ok(serde_json::to_string(&save)?)
}

fn entity_record(entity: &Entity) -> EntityRecord {
    let mut record = EntityRecord {
        kind: match &entity.kind {
            EntityKind::Actor(actor) => KindRecord::Actor(actor.kind),
            EntityKind::Item(item) => KindRecord::Item(item.kind),
        },
        x: entity.position.x,
        y: entity.position.y,
        char: entity.ch,
        fg: entity.fg,
        bg: entity.bg,
        name: entity.name.clone(),
        fighter: None,
        level: None,
        ai_type: None,
        confused_turns_remaining: 0,
        inventory: None,
    };

    if let Some(actor) = entity.as_actor() {
        record.fighter = Some(FighterRecord {
            max_hp: actor.fighter.max_hp,
            hp: actor.fighter.hp(),
            defense: actor.fighter.base_defense,
            power: actor.fighter.base_power,
        });
        record.level = Some(LevelRecord {
            current_level: actor.level.current_level,
            current_xp: actor.level.current_xp,
            level_up_base: actor.level.level_up_base,
            level_up_factor: actor.level.level_up_factor,
            xp_given: actor.level.xp_given,
        });
        record.ai_type = actor.ai.as_ref().map(|ai| ai.type_name().to_string());
        record.confused_turns_remaining = actor
            .ai
            .as_ref()
            .map(Ai::confused_turns_remaining)
            .unwrap_or(0);
        record.inventory = Some(
            actor
                .inventory
                .items
                .iter()
                .filter_map(|item| {
                    item.as_item().map(|payload| InventoryRecord {
                        item_type: payload.kind,
                        equipped: actor.equipment.is_equipped(item.id),
                    })
                })
                .collect(),
        );
    }
    record
}

/// Rebuilds a floor from JSON produced by [`serialize_game`].
///
/// Malformed JSON and a save without a player are both [`RogueError::Load`].
pub fn deserialize_game(json: &str) -> RogueResult<LoadedGame> {
    let save: SaveGame =
        serde_json::from_str(json).map_err(|err| RogueError::Load(err.to_string()))?;

    if save.tiles.len() != save.height.max(0) as usize
        || save.tiles.iter().any(|row| row.len() != save.width.max(0) as usize)
    {
        return Err(RogueError::Load(format!(
            "Tile grid does not match {}x{}",
            save.width, save.height
        )));
    }

    let mut map = GameMap::new(save.width, save.height);
    map.tiles = save.tiles;
    if let Some(stairs) = find_downstairs(&map) {
        map.downstairs = stairs;
    }

    let mut player_id = None;
    for record in save.entities {
        let entity = rebuild_entity(record)?;
        if player_id.is_none()
            && entity.as_actor().map(|actor| actor.kind) == Some(ActorKind::Player)
        {
            player_id = Some(entity.id);
        }
        map.add_entity(entity);
    }

    let player_id =
        player_id.ok_or_else(|| RogueError::Load("No player found in save".to_string()))?;
    Ok(LoadedGame {
        map,
        player_id,
        current_floor: save.current_floor,
        seed: save.seed,
    })
}

fn find_downstairs(map: &GameMap) -> Option<Position> {
    map.tiles.iter().enumerate().find_map(|(y, row)| {
        row.iter()
            .position(|tile| tile.kind == TileKind::DownStairs)
            .map(|x| Position::new(x as i32, y as i32))
    })
}

fn rebuild_entity(record: EntityRecord) -> RogueResult<Entity> {
    let position = Position::new(record.x, record.y);
    let mut entity = match record.kind {
        KindRecord::Actor(kind) => kind.spawn(position),
        KindRecord::Item(kind) => kind.spawn(position),
    };
    entity.ch = record.char;
    entity.fg = record.fg;
    entity.bg = record.bg;
    entity.name = record.name;

    if let EntityKind::Actor(actor) = &mut entity.kind {
        restore_actor(actor, position, record.fighter, record.level, record.inventory)?;
        actor.ai = match record.ai_type.as_deref() {
            Some("hostile") => Some(Ai::hostile()),
            Some("confused") => Some(Ai::confused(Ai::hostile(), record.confused_turns_remaining)),
            None => None,
            Some(other) => {
                return Err(RogueError::Load(format!("Unknown AI type '{}'", other)));
            }
        };
        if !actor.is_alive() {
            actor.ai = None;
            entity.blocks_movement = false;
            entity.render_order = RenderOrder::Corpse;
        }
    }
    Ok(entity)
}

fn restore_actor(
    actor: &mut Actor,
    position: Position,
    fighter: Option<FighterRecord>,
    level: Option<LevelRecord>,
    inventory: Option<Vec<InventoryRecord>>,
) -> RogueResult<()> {
    let fighter =
        fighter.ok_or_else(|| RogueError::Load("Actor without fighter stats".to_string()))?;
    actor.fighter = Fighter::new(fighter.max_hp, fighter.defense, fighter.power);
    actor.fighter.set_hp(fighter.hp);

    if let Some(level) = level {
        actor.level = Level {
            current_level: level.current_level,
            current_xp: level.current_xp,
            level_up_base: level.level_up_base,
            level_up_factor: level.level_up_factor,
            xp_given: level.xp_given,
        };
    }

    actor.inventory.items.clear();
    actor.equipment = Default::default();
    for saved in inventory.unwrap_or_default() {
        let item = saved.item_type.spawn(position);
        if saved.equipped {
            match item.as_item().and_then(|payload| payload.equippable) {
                Some(equippable) => {
                    actor.equipment.equip(item.id, equippable);
                }
                None => warn!("Ignoring equipped flag on {}", item.name),
            }
        }
        actor.inventory.items.push(item);
    }
    Ok(())
}

/// Writes the game to `path`.
pub fn save_to_file(state: &GameState, path: impl AsRef<Path>) -> RogueResult<()> {
    let path = path.as_ref();
    let json = serialize_game(state)?;
    fs::write(path, json)?;
    info!("Saved game to {}", path.display());
    Ok(())
}

/// Reads a game from `path`. A missing or unreadable file is a load error.
pub fn load_from_file(
    path: impl AsRef<Path>,
    generation: GenerationConfig,
) -> RogueResult<GameState> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)
        .map_err(|err| RogueError::Load(format!("{}: {}", path.display(), err)))?;
    let state = GameState::load_from_json(&json, generation)?;
    info!("Loaded game from {}", path.display());
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_game() -> GameState {
        GameState::new_game(GenerationConfig::new(2024)).unwrap()
    }

    #[test]
    fn test_round_trip_is_byte_identical() {
        let state = sample_game();
        let first = serialize_game(&state).unwrap();
        let loaded = GameState::load_from_json(&first, GenerationConfig::new(2024)).unwrap();
        let second = serialize_game(&loaded).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_top_level_shape() {
        let state = sample_game();
        let json = serialize_game(&state).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["currentFloor"], 1);
        assert_eq!(value["width"], 80);
        assert_eq!(value["height"], 43);
        assert_eq!(value["tiles"].as_array().unwrap().len(), 43);

        let player = &value["entities"][0];
        assert_eq!(player["kind"]["actor"], "player");
        assert_eq!(player["char"], "@");
        assert_eq!(player["fighter"]["maxHp"], 30);
        assert_eq!(player["aiType"], serde_json::Value::Null);
        assert_eq!(player["inventory"][0]["itemType"], "dagger");
        assert_eq!(player["inventory"][0]["equipped"], true);
    }

    #[test]
    fn test_confusion_and_corpses_survive() {
        let mut state = sample_game();
        let orc = state.map.add_entity(ActorKind::Orc.spawn(Position::new(1, 1)));
        state.actor_mut(orc).unwrap().ai = Some(Ai::confused(Ai::hostile(), 7));
        let dead = state.map.add_entity(ActorKind::Troll.spawn(Position::new(2, 1)));
        state.kill(dead, None);

        let json = serialize_game(&state).unwrap();
        let loaded = deserialize_game(&json).unwrap();

        let orc = &loaded.map.entities[loaded.map.entities.len() - 2];
        let ai = orc.as_actor().unwrap().ai.as_ref().unwrap();
        assert_eq!(ai.confused_turns_remaining(), 7);

        let corpse = loaded.map.entities.last().unwrap();
        assert_eq!(corpse.name, "Remains of Troll");
        assert_eq!(corpse.ch, '%');
        assert!(!corpse.blocks_movement);
        assert_eq!(corpse.render_order, RenderOrder::Corpse);
        assert!(corpse.as_actor().unwrap().ai.is_none());
    }

    #[test]
    fn test_missing_player_is_a_load_error() {
        let mut state = sample_game();
        let player = state.player_id;
        state.map.remove_entity(player);
        let json = serialize_game(&state).unwrap();
        assert!(matches!(deserialize_game(&json), Err(RogueError::Load(_))));
    }

    #[test]
    fn test_garbage_is_a_load_error() {
        assert!(matches!(deserialize_game("not json"), Err(RogueError::Load(_))));
        assert!(matches!(deserialize_game("{}"), Err(RogueError::Load(_))));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        let state = sample_game();

        save_to_file(&state, &path).unwrap();
        let loaded = load_from_file(&path, GenerationConfig::new(2024)).unwrap();
        assert_eq!(loaded.current_floor, 1);
        assert_eq!(
            loaded.player_actor().unwrap().fighter.hp(),
            state.player_actor().unwrap().fighter.hp()
        );

        let missing = load_from_file(dir.path().join("nope.json"), GenerationConfig::new(1));
        assert!(matches!(missing, Err(RogueError::Load(_))));
    }

    #[test]
    fn test_nested_confusion_reloads_as_single_layer() {
        let mut state = sample_game();
        let orc = state.map.add_entity(ActorKind::Orc.spawn(Position::new(1, 1)));
        let twice = Ai::confused(Ai::confused(Ai::hostile(), 5), 2);
        state.actor_mut(orc).unwrap().ai = Some(twice);

        let loaded = deserialize_game(&serialize_game(&state).unwrap()).unwrap();
        let orc = loaded.map.entities.last().unwrap();
        assert_eq!(
            orc.as_actor().unwrap().ai,
            Some(Ai::confused(Ai::hostile(), 2))
        );
    }

    #[test]
    fn test_loaded_game_keeps_its_own_seed() {
        let state = sample_game();
        let json = serialize_game(&state).unwrap();

        let loaded = GameState::load_from_json(&json, GenerationConfig::new(0)).unwrap();
        assert_eq!(loaded.generation.seed, 2024);
        assert_eq!(loaded.generation.map_width, 80);

        // Saves written without a seed fall back to the configured one.
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value.as_object_mut().unwrap().remove("seed");
        let legacy =
            GameState::load_from_json(&value.to_string(), GenerationConfig::new(5)).unwrap();
        assert_eq!(legacy.generation.seed, 5);
    }
}
