//! # Generation Module
//!
//! Procedural content generation for dungeon floors and what lives on them.
//!
//! A floor is built in two passes: [`RoomCorridorGenerator`] carves rooms and
//! corridors into a fresh map, then every room is stocked with monsters and
//! items drawn from depth-scaled tables ([`EncounterGenerator`] and
//! [`ItemGenerator`]). All randomness for a floor comes from one RNG seeded by
//! the game seed and the floor number, so the same seed always yields the same
//! dungeon.

pub mod dungeon;
pub mod encounters;
pub mod items;

pub use dungeon::*;
pub use encounters::*;
pub use items::*;

use crate::{config, Position, RogueError, RogueResult};
use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Configuration for procedural generation.
///
/// Room sizes include the one-tile wall on each side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Map width in tiles
    pub map_width: i32,
    /// Map height in tiles
    pub map_height: i32,
    /// Room placement attempts per floor
    pub max_rooms: u32,
    /// Minimum room size
    pub min_room_size: i32,
    /// Maximum room size
    pub max_room_size: i32,
}

impl GenerationConfig {
    /// Creates the standard 80x43 configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use rogue::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(42);
    /// assert!(config.min_room_size >= 3);
    /// assert!(config.max_room_size >= config.min_room_size);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            map_width: config::DEFAULT_MAP_WIDTH,
            map_height: config::DEFAULT_MAP_HEIGHT,
            max_rooms: config::DEFAULT_MAX_ROOMS,
            min_room_size: config::DEFAULT_MIN_ROOM_SIZE,
            max_room_size: config::DEFAULT_MAX_ROOM_SIZE,
        }
    }

    /// Creates a configuration for testing with smaller, simpler levels.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            map_width: 40,
            map_height: 30,
            max_rooms: 10,
            min_room_size: 5,
            max_room_size: 8,
        }
    }

    /// Checks that rooms of every allowed size fit on the map.
    pub fn validate(&self) -> RogueResult<()> {
        if self.min_room_size < 3 {
            return Err(RogueError::GenerationFailed(format!(
                "Minimum room size {} leaves no floor inside the walls",
                self.min_room_size
            )));
        }
        if self.min_room_size > self.max_room_size {
            return Err(RogueError::GenerationFailed(format!(
                "Minimum room size {} exceeds maximum {}",
                self.min_room_size, self.max_room_size
            )));
        }
        if self.max_room_size > self.map_width || self.max_room_size > self.map_height {
            return Err(RogueError::GenerationFailed(format!(
                "Rooms up to {} tiles do not fit a {}x{} map",
                self.max_room_size, self.map_width, self.map_height
            )));
        }
        if self.max_rooms == 0 {
            return Err(RogueError::GenerationFailed(
                "At least one room attempt is required".to_string(),
            ));
        }
        Ok(())
    }

    /// The RNG used to build one floor of this game.
    pub fn floor_rng(&self, floor: u32) -> StdRng {
        StdRng::seed_from_u64(self.seed.wrapping_add(floor as u64 * 1000))
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// A rectangular room, walls included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Placement order on its floor
    pub id: u32,
    /// Top-left corner of the room
    pub top_left: Position,
    /// Width of the room (including walls)
    pub width: i32,
    /// Height of the room (including walls)
    pub height: i32,
}

impl Room {
    /// Creates a new room with the given parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use rogue::{Room, Position};
    ///
    /// let room = Room::new(1, Position::new(5, 5), 10, 8);
    /// assert_eq!(room.center(), Position::new(10, 9));
    /// assert!(room.contains(Position::new(7, 7)));
    /// assert!(!room.contains(Position::new(20, 20)));
    /// ```
    pub fn new(id: u32, top_left: Position, width: i32, height: i32) -> Self {
        Self {
            id,
            top_left,
            width,
            height,
        }
    }

    /// Gets the bottom-right corner of the room.
    pub fn bottom_right(&self) -> Position {
        Position::new(
            self.top_left.x + self.width - 1,
            self.top_left.y + self.height - 1,
        )
    }

    /// Gets the center position of the room.
    pub fn center(&self) -> Position {
        Position::new(
            self.top_left.x + self.width / 2,
            self.top_left.y + self.height / 2,
        )
    }

    /// Checks if a position is inside this room, walls included.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.top_left.x
            && pos.y >= self.top_left.y
            && pos.x < self.top_left.x + self.width
            && pos.y < self.top_left.y + self.height
    }

    /// Checks if a position is on the border of this room.
    pub fn is_border(&self, pos: Position) -> bool {
        if !self.contains(pos) {
            return false;
        }

        pos.x == self.top_left.x
            || pos.y == self.top_left.y
            || pos.x == self.top_left.x + self.width - 1
            || pos.y == self.top_left.y + self.height - 1
    }

    /// Checks if this room overlaps with another room.
    pub fn overlaps(&self, other: &Room) -> bool {
        !(self.top_left.x >= other.top_left.x + other.width
            || other.top_left.x >= self.top_left.x + self.width
            || self.top_left.y >= other.top_left.y + other.height
            || other.top_left.y >= self.top_left.y + self.height)
    }

    /// Gets all floor positions within this room.
    pub fn floor_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();

        for y in (self.top_left.y + 1)..(self.top_left.y + self.height - 1) {
            for x in (self.top_left.x + 1)..(self.top_left.x + self.width - 1) {
                positions.push(Position::new(x, y));
            }
        }

        positions
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content for a floor using the provided random number generator.
    fn generate(&self, config: &GenerationConfig, floor: u32, rng: &mut StdRng) -> RogueResult<T>;

    /// Validates that content generated for `floor` meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig, floor: u32) -> RogueResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// `(minimum floor, value)` steps, sorted by floor.
pub type FloorValues = &'static [(u32, u32)];

/// `(minimum floor, weights)` steps, sorted by floor. Later steps override the
/// weight of a kind already listed.
pub type SpawnTable<T> = &'static [(u32, &'static [(T, u32)])];

/// The value of the last step at or below `floor`, or 0 before the first.
///
/// # Examples
///
/// ```
/// use rogue::max_value_for_floor;
///
/// let table = &[(1, 2), (4, 3), (6, 5)];
/// assert_eq!(max_value_for_floor(table, 1), 2);
/// assert_eq!(max_value_for_floor(table, 5), 3);
/// assert_eq!(max_value_for_floor(table, 9), 5);
/// ```
pub fn max_value_for_floor(table: &[(u32, u32)], floor: u32) -> u32 {
    let mut current = 0;
    for &(minimum_floor, value) in table {
        if minimum_floor > floor {
            break;
        }
        current = value;
    }
    current
}

/// The weights in effect on `floor`, in first-listed order.
pub fn weights_for_floor<T: Copy + PartialEq>(
    table: &[(u32, &[(T, u32)])],
    floor: u32,
) -> Vec<(T, u32)> {
    let mut weights: Vec<(T, u32)> = Vec::new();
    for &(minimum_floor, entries) in table {
        if minimum_floor > floor {
            break;
        }
        for &(kind, weight) in entries {
            match weights.iter_mut().find(|(known, _)| *known == kind) {
                Some(slot) => slot.1 = weight,
                None => weights.push((kind, weight)),
            }
        }
    }
    weights
}

/// Draws `count` kinds, with replacement, weighted by the table for `floor`.
pub fn choose_for_floor<T: Copy + PartialEq>(
    table: &[(u32, &[(T, u32)])],
    count: u32,
    floor: u32,
    rng: &mut StdRng,
) -> Vec<T> {
    let weights = weights_for_floor(table, floor);
    let Ok(distribution) = WeightedIndex::new(weights.iter().map(|(_, weight)| *weight)) else {
        return Vec::new();
    };
    (0..count)
        .map(|_| weights[distribution.sample(rng)].0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generation_config_creation() {
        let config = GenerationConfig::new(12345);
        assert_eq!(config.seed, 12345);
        assert_eq!(config.map_width, 80);
        assert_eq!(config.map_height, 43);
        assert!(config.validate().is_ok());
        assert!(GenerationConfig::for_testing(1).validate().is_ok());
    }

    #[test]
    fn test_generation_config_rejects_bad_sizes() {
        let mut config = GenerationConfig::new(1);
        config.min_room_size = 2;
        assert!(config.validate().is_err());

        let mut config = GenerationConfig::new(1);
        config.min_room_size = 11;
        assert!(config.validate().is_err());

        let mut config = GenerationConfig::new(1);
        config.map_height = 8;
        assert!(config.validate().is_err());

        let mut config = GenerationConfig::new(1);
        config.max_rooms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_room_geometry() {
        let room = Room::new(1, Position::new(5, 5), 10, 8);

        assert_eq!(room.bottom_right(), Position::new(14, 12));
        assert_eq!(room.center(), Position::new(10, 9));

        assert!(room.contains(Position::new(5, 5)));
        assert!(room.contains(Position::new(14, 12)));
        assert!(!room.contains(Position::new(4, 5)));
        assert!(!room.contains(Position::new(15, 12)));

        assert!(room.is_border(Position::new(5, 5)));
        assert!(room.is_border(Position::new(10, 5)));
        assert!(!room.is_border(Position::new(7, 7)));
    }

    #[test]
    fn test_room_overlap() {
        let room1 = Room::new(1, Position::new(5, 5), 10, 8);
        let room2 = Room::new(2, Position::new(10, 8), 6, 6);
        let room3 = Room::new(3, Position::new(20, 20), 5, 5);

        assert!(room1.overlaps(&room2));
        assert!(room2.overlaps(&room1));
        assert!(!room1.overlaps(&room3));
        assert!(!room3.overlaps(&room1));
    }

    #[test]
    fn test_room_floor_excludes_walls() {
        let room = Room::new(1, Position::new(5, 5), 4, 4);
        let floor: HashSet<_> = room.floor_positions().into_iter().collect();
        assert_eq!(floor.len(), 4);
        assert!(floor.iter().all(|pos| !room.is_border(*pos)));
    }

    #[test]
    fn test_floor_values() {
        let table: &[(u32, u32)] = &[(1, 1), (4, 2)];
        assert_eq!(max_value_for_floor(table, 0), 0);
        assert_eq!(max_value_for_floor(table, 1), 1);
        assert_eq!(max_value_for_floor(table, 3), 1);
        assert_eq!(max_value_for_floor(table, 4), 2);
        assert_eq!(max_value_for_floor(table, 100), 2);
    }

    #[test]
    fn test_later_weights_override() {
        let table: &[(u32, &[(char, u32)])] =
            &[(0, &[('o', 80)]), (3, &[('T', 15)]), (5, &[('T', 30)])];
        assert_eq!(weights_for_floor(table, 1), vec![('o', 80)]);
        assert_eq!(weights_for_floor(table, 3), vec![('o', 80), ('T', 15)]);
        assert_eq!(weights_for_floor(table, 6), vec![('o', 80), ('T', 30)]);
    }

    #[test]
    fn test_choose_for_floor_uses_available_kinds() {
        let table: &[(u32, &[(char, u32)])] = &[(0, &[('o', 80)]), (3, &[('T', 15)])];
        let mut rng = GenerationConfig::new(9).floor_rng(1);
        let picks = choose_for_floor(table, 20, 1, &mut rng);
        assert_eq!(picks.len(), 20);
        assert!(picks.iter().all(|kind| *kind == 'o'));

        let empty: &[(u32, &[(char, u32)])] = &[(5, &[('o', 1)])];
        assert!(choose_for_floor(empty, 3, 1, &mut rng).is_empty());
    }
}
