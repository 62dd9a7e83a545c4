//! # Dungeon Generation
//!
//! Room-and-corridor floor layouts.
//!
//! Rooms are placed at random with collision rejection; each accepted room is
//! joined to the previous one by an L-shaped corridor, which keeps the whole
//! floor connected. The player starts in the first room and the down stairs
//! sit in the center of the last one.

use crate::{
    EncounterGenerator, Entity, GameMap, GenerationConfig, Generator, ItemGenerator, Position,
    RogueError, RogueResult, Room, Tile, TileKind,
};
use ::pathfinding::prelude::bfs_reach;
use tracing::{debug, info};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, Rng};
use std::collections::HashSet;

/// A carved floor before anything has been placed on it.
#[derive(Debug, Clone)]
pub struct DungeonLayout {
    pub map: GameMap,
    /// Accepted rooms in placement order
    pub rooms: Vec<Room>,
}

/// Primary dungeon generator using the room-and-corridor algorithm.
#[derive(Debug, Clone, Default)]
pub struct RoomCorridorGenerator;

impl RoomCorridorGenerator {
    /// Creates a new dungeon generator.
    ///
    /// # Examples
    ///
    /// ```
    /// use rogue::{ActorKind, GenerationConfig, Position, RoomCorridorGenerator};
    ///
    /// let generator = RoomCorridorGenerator::new();
    /// let config = GenerationConfig::new(7);
    /// let player = ActorKind::Player.spawn(Position::new(0, 0));
    /// let map = generator.generate_dungeon(&config, 1, player).unwrap();
    /// assert_eq!((map.width, map.height), (80, 43));
    /// ```
    pub fn new() -> Self {
        Self
    }

    /// Builds a complete floor: layout, the player in the first room, then
    /// monsters and items in every room.
    pub fn generate_dungeon(
        &self,
        config: &GenerationConfig,
        floor: u32,
        mut player: Entity,
    ) -> RogueResult<GameMap> {
        let mut rng = config.floor_rng(floor);
        let layout = self.generate(config, floor, &mut rng)?;
        self.validate(&layout, config, floor)?;

        let DungeonLayout { mut map, rooms } = layout;
        let start = rooms
            .first()
            .map(Room::center)
            .ok_or_else(|| RogueError::GenerationFailed("Failed to place any rooms".to_string()))?;
        player.position = start;
        map.add_entity(player);

        for room in &rooms {
            self.place_entities(&mut map, room, config, floor, &mut rng)?;
        }

        info!(
            "Generated floor {} with {} rooms and {} entities",
            floor,
            rooms.len(),
            map.entities.len()
        );
        Ok(map)
    }

    /// Stocks one room from the encounter and item tables. A spawn whose
    /// chosen tile is already taken is skipped.
    fn place_entities(
        &self,
        map: &mut GameMap,
        room: &Room,
        config: &GenerationConfig,
        floor: u32,
        rng: &mut StdRng,
    ) -> RogueResult<()> {
        let monsters = EncounterGenerator.generate(config, floor, rng)?;
        EncounterGenerator.validate(&monsters, config, floor)?;
        let items = ItemGenerator.generate(config, floor, rng)?;
        ItemGenerator.validate(&items, config, floor)?;

        let floor_tiles = room.floor_positions();
        let origin = room.center();
        let spawns: Vec<Entity> = monsters
            .into_iter()
            .map(|kind| kind.spawn(origin))
            .chain(items.into_iter().map(|kind| kind.spawn(origin)))
            .collect();

        for mut entity in spawns {
            let Some(&pos) = floor_tiles.choose(rng) else {
                break;
            };
            if map.is_occupied(pos) {
                debug!("Skipping {} in room {}: {:?} is taken", entity.name, room.id, pos);
                continue;
            }
            entity.position = pos;
            map.add_entity(entity);
        }
        Ok(())
    }

    /// Carves the interior of a room.
    fn carve_room(&self, map: &mut GameMap, room: &Room) {
        let inner_width = (room.width - 2) as usize;
        let inner_height = (room.height - 2) as usize;
        let block = vec![vec![Tile::floor(); inner_width]; inner_height];
        map.add_room(room.top_left.x + 1, room.top_left.y + 1, &block);
    }

    /// Carves an L-shaped corridor between two points, turning at a random
    /// corner.
    fn carve_l_corridor(
        &self,
        map: &mut GameMap,
        start: Position,
        end: Position,
        rng: &mut StdRng,
    ) -> RogueResult<()> {
        let corner = if rng.gen_bool(0.5) {
            Position::new(end.x, start.y)
        } else {
            Position::new(start.x, end.y)
        };

        for pos in straight_line(start, corner).chain(straight_line(corner, end)) {
            if map.in_bounds(pos) {
                map.set_tile(pos, Tile::floor())?;
            }
        }
        Ok(())
    }
}

/// Every tile from `from` to `to` along one axis, both ends included.
fn straight_line(from: Position, to: Position) -> impl Iterator<Item = Position> {
    let step = Position::new((to.x - from.x).signum(), (to.y - from.y).signum());
    let length = (to.x - from.x).abs().max((to.y - from.y).abs());
    (0..=length).map(move |i| Position::new(from.x + step.x * i, from.y + step.y * i))
}

impl Generator<DungeonLayout> for RoomCorridorGenerator {
    fn generate(
        &self,
        config: &GenerationConfig,
        floor: u32,
        rng: &mut StdRng,
    ) -> RogueResult<DungeonLayout> {
        config.validate()?;
        let mut map = GameMap::new(config.map_width, config.map_height);
        let mut rooms: Vec<Room> = Vec::new();

        for _ in 0..config.max_rooms {
            let width = rng.gen_range(config.min_room_size..=config.max_room_size);
            let height = rng.gen_range(config.min_room_size..=config.max_room_size);
            let x = rng.gen_range(0..=config.map_width - width);
            let y = rng.gen_range(0..=config.map_height - height);
            let room = Room::new(rooms.len() as u32, Position::new(x, y), width, height);

            if rooms.iter().any(|other| room.overlaps(other)) {
                continue;
            }

            self.carve_room(&mut map, &room);
            if let Some(previous) = rooms.last() {
                self.carve_l_corridor(&mut map, previous.center(), room.center(), rng)?;
            }
            rooms.push(room);
        }

        let last = rooms
            .last()
            .ok_or_else(|| RogueError::GenerationFailed("Failed to place any rooms".to_string()))?;
        let stairs = last.center();
        map.set_tile(stairs, Tile::down_stairs())?;
        map.downstairs = stairs;

        debug!(
            "{} placed {} rooms on floor {}",
            self.generator_type(),
            rooms.len(),
            floor
        );
        Ok(DungeonLayout { map, rooms })
    }

    /// Every room interior and the stairs must be reachable from the first
    /// room.
    fn validate(
        &self,
        layout: &DungeonLayout,
        _config: &GenerationConfig,
        _floor: u32,
    ) -> RogueResult<()> {
        let Some(first) = layout.rooms.first() else {
            return Err(RogueError::GenerationFailed("Layout has no rooms".to_string()));
        };
        let map = &layout.map;

        if map.tile(map.downstairs).map(|tile| tile.kind) != Some(TileKind::DownStairs) {
            return Err(RogueError::GenerationFailed(
                "Down stairs are missing".to_string(),
            ));
        }

        let reachable: HashSet<Position> = bfs_reach(first.center(), |pos| {
            pos.adjacent_positions()
                .into_iter()
                .filter(|next| map.is_walkable(*next))
                .collect::<Vec<_>>()
        })
        .collect();

        for room in &layout.rooms {
            if let Some(pos) = room
                .floor_positions()
                .into_iter()
                .find(|pos| !reachable.contains(pos))
            {
                return Err(RogueError::GenerationFailed(format!(
                    "Room {} is not connected to other rooms ({:?} unreachable)",
                    room.id, pos
                )));
            }
        }
        if !reachable.contains(&map.downstairs) {
            return Err(RogueError::GenerationFailed(
                "Down stairs are unreachable".to_string(),
            ));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "RoomCorridorGenerator"
    }
}
