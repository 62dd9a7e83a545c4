//! # World Module
//!
//! Tiles and the map that owns them, together with the entities placed on it.

use crate::rendering::{palette, Rgb};
use crate::{Entity, EntityId, Position, RogueError, RogueResult};
use serde::{Deserialize, Serialize};

/// A glyph with its colors, as drawn for one tile state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graphic {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Rgb,
}

impl Graphic {
    pub const fn new(ch: char, fg: Rgb, bg: Rgb) -> Self {
        Self { ch, fg, bg }
    }
}

/// Drawn for tiles the player has never seen.
pub const SHROUD: Graphic = Graphic::new(' ', palette::WHITE, palette::BLACK);

/// Structural kind of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Wall,
    Floor,
    DownStairs,
}

/// A single map cell.
///
/// `visible` and `seen` are only writable through [`Tile::set_visible`], which
/// keeps `visible ⟹ seen` and never clears `seen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    pub walkable: bool,
    pub transparent: bool,
    visible: bool,
    seen: bool,
    pub dark: Graphic,
    pub light: Graphic,
}

impl Tile {
    /// Creates an unseen tile of the given kind.
    pub fn new(kind: TileKind) -> Self {
        match kind {
            TileKind::Wall => Self::wall(),
            TileKind::Floor => Self::floor(),
            TileKind::DownStairs => Self::down_stairs(),
        }
    }

    pub fn floor() -> Self {
        Self {
            kind: TileKind::Floor,
            walkable: true,
            transparent: true,
            visible: false,
            seen: false,
            dark: Graphic::new(' ', palette::WHITE, Rgb(50, 50, 150)),
            light: Graphic::new(' ', palette::WHITE, Rgb(200, 180, 50)),
        }
    }

    pub fn wall() -> Self {
        Self {
            kind: TileKind::Wall,
            walkable: false,
            transparent: false,
            visible: false,
            seen: false,
            dark: Graphic::new(' ', palette::WHITE, Rgb(0, 0, 100)),
            light: Graphic::new(' ', palette::WHITE, Rgb(130, 110, 50)),
        }
    }

    pub fn down_stairs() -> Self {
        Self {
            kind: TileKind::DownStairs,
            walkable: true,
            transparent: true,
            visible: false,
            seen: false,
            dark: Graphic::new('>', Rgb(0, 0, 100), Rgb(50, 50, 150)),
            light: Graphic::new('>', palette::WHITE, Rgb(200, 180, 50)),
        }
    }

    /// Whether the tile is lit this turn.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the player has ever seen this tile.
    pub fn is_seen(&self) -> bool {
        self.seen
    }

    /// Sets current visibility. Becoming visible also marks the tile seen.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if visible {
            self.seen = true;
        }
    }

    /// The graphic to draw for the tile's current state.
    pub fn graphic(&self) -> Graphic {
        if self.visible {
            self.light
        } else if self.seen {
            self.dark
        } else {
            SHROUD
        }
    }
}

/// One dungeon floor: its tiles (row-major, `tiles[y][x]`) and every entity
/// lying or standing on it, in placement order.
#[derive(Debug, Clone)]
pub struct GameMap {
    pub width: i32,
    pub height: i32,
    pub tiles: Vec<Vec<Tile>>,
    pub entities: Vec<Entity>,
    pub downstairs: Position,
}

impl GameMap {
    /// Creates a map filled with wall tiles.
    ///
    /// # Examples
    ///
    /// ```
    /// use rogue::{GameMap, Position, TileKind};
    ///
    /// let map = GameMap::new(10, 8);
    /// assert!(map.in_bounds(Position::new(9, 7)));
    /// assert!(!map.in_bounds(Position::new(10, 0)));
    /// assert_eq!(map.tile(Position::new(0, 0)).unwrap().kind, TileKind::Wall);
    /// ```
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            tiles: vec![vec![Tile::wall(); width as usize]; height as usize],
            entities: Vec::new(),
            downstairs: Position::new(0, 0),
        }
    }

    /// Checks whether a position is inside `[0,width)×[0,height)`.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    /// Gets the tile at a position, if in bounds.
    pub fn tile(&self, pos: Position) -> Option<&Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.tiles
            .get(pos.y as usize)
            .and_then(|row| row.get(pos.x as usize))
    }

    /// Gets a mutable tile at a position, if in bounds.
    pub fn tile_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.tiles
            .get_mut(pos.y as usize)
            .and_then(|row| row.get_mut(pos.x as usize))
    }

    /// Replaces the tile at a position.
    pub fn set_tile(&mut self, pos: Position, tile: Tile) -> RogueResult<()> {
        let slot = self.tile_mut(pos).ok_or_else(|| {
            RogueError::InvalidState(format!("Tile position {:?} is out of bounds", pos))
        })?;
        *slot = tile;
        Ok(())
    }

    /// Copies a rectangular block of tiles into the map with its top-left
    /// corner at `(x, y)`. Cells falling outside the map are dropped.
    pub fn add_room(&mut self, x: i32, y: i32, block: &[Vec<Tile>]) {
        for (dy, row) in block.iter().enumerate() {
            for (dx, tile) in row.iter().enumerate() {
                let pos = Position::new(x + dx as i32, y + dy as i32);
                if let Some(slot) = self.tile_mut(pos) {
                    *slot = *tile;
                }
            }
        }
    }

    pub fn is_walkable(&self, pos: Position) -> bool {
        self.tile(pos).map(|tile| tile.walkable).unwrap_or(false)
    }

    pub fn is_visible(&self, pos: Position) -> bool {
        self.tile(pos).map(|tile| tile.is_visible()).unwrap_or(false)
    }

    /// Adds an entity to the map and returns its id.
    pub fn add_entity(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.entities.push(entity);
        id
    }

    /// Removes an entity from the map, handing ownership back to the caller.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.entities.iter().position(|entity| entity.id == id)?;
        Some(self.entities.remove(index))
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id == id)
    }

    /// First entity at `pos` that blocks movement.
    pub fn blocking_entity_at(&self, pos: Position) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|entity| entity.blocks_movement && entity.position == pos)
    }

    /// The living actor at `pos`, if any.
    pub fn actor_at(&self, pos: Position) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|entity| entity.position == pos && entity.is_alive_actor())
    }

    /// Items lying at `pos`.
    pub fn items_at(&self, pos: Position) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(move |entity| entity.position == pos && entity.as_item().is_some())
    }

    /// Living actors in placement order.
    pub fn living_actors(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|entity| entity.is_alive_actor())
    }

    /// Whether any entity at all stands at `pos`.
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.entities.iter().any(|entity| entity.position == pos)
    }

    /// Positions of tiles that are walkable, row by row.
    pub fn walkable_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Position::new(x, y);
                if self.is_walkable(pos) {
                    positions.push(pos);
                }
            }
        }
        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ActorKind;

    #[test]
    fn test_visible_implies_seen() {
        let mut tile = Tile::floor();
        assert!(!tile.is_visible());
        assert!(!tile.is_seen());

        tile.set_visible(true);
        assert!(tile.is_visible());
        assert!(tile.is_seen());

        tile.set_visible(false);
        assert!(!tile.is_visible());
        assert!(tile.is_seen(), "seen must never revert");
    }

    #[test]
    fn test_tile_graphic_follows_state() {
        let mut tile = Tile::wall();
        assert_eq!(tile.graphic(), SHROUD);
        tile.set_visible(true);
        assert_eq!(tile.graphic(), tile.light);
        tile.set_visible(false);
        assert_eq!(tile.graphic(), tile.dark);
    }

    #[test]
    fn test_map_bounds() {
        let map = GameMap::new(5, 3);
        assert!(map.in_bounds(Position::new(0, 0)));
        assert!(map.in_bounds(Position::new(4, 2)));
        assert!(!map.in_bounds(Position::new(-1, 0)));
        assert!(!map.in_bounds(Position::new(5, 0)));
        assert!(!map.in_bounds(Position::new(0, 3)));
        assert!(map.tile(Position::new(0, 3)).is_none());
    }

    #[test]
    fn test_set_tile_out_of_bounds_fails() {
        let mut map = GameMap::new(5, 5);
        assert!(map.set_tile(Position::new(2, 2), Tile::floor()).is_ok());
        assert!(map.set_tile(Position::new(7, 2), Tile::floor()).is_err());
        assert!(map.is_walkable(Position::new(2, 2)));
    }

    #[test]
    fn test_add_room_translates_offsets() {
        let mut map = GameMap::new(10, 10);
        let block = vec![vec![Tile::floor(); 3]; 2];
        map.add_room(4, 6, &block);

        for y in 6..8 {
            for x in 4..7 {
                assert!(map.is_walkable(Position::new(x, y)));
            }
        }
        assert!(!map.is_walkable(Position::new(3, 6)));
        assert!(!map.is_walkable(Position::new(4, 8)));
    }

    #[test]
    fn test_add_room_clips_at_edges() {
        let mut map = GameMap::new(4, 4);
        let block = vec![vec![Tile::floor(); 3]; 3];
        map.add_room(2, 2, &block);
        assert!(map.is_walkable(Position::new(3, 3)));
        assert_eq!(map.walkable_positions().len(), 4);
    }

    #[test]
    fn test_entity_queries() {
        let mut map = GameMap::new(10, 10);
        let orc = ActorKind::Orc.spawn(Position::new(3, 3));
        let orc_id = map.add_entity(orc);
        let potion = crate::ItemKind::HealthPotion.spawn(Position::new(3, 3));
        map.add_entity(potion);

        assert_eq!(map.blocking_entity_at(Position::new(3, 3)).map(|e| e.id), Some(orc_id));
        assert_eq!(map.actor_at(Position::new(3, 3)).map(|e| e.id), Some(orc_id));
        assert_eq!(map.items_at(Position::new(3, 3)).count(), 1);
        assert!(map.actor_at(Position::new(4, 4)).is_none());

        let removed = map.remove_entity(orc_id).unwrap();
        assert_eq!(removed.name, "Orc");
        assert!(map.blocking_entity_at(Position::new(3, 3)).is_none());
        assert!(map.remove_entity(orc_id).is_none());
    }
}
