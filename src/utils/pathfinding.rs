//! # Pathfinding Algorithms
//!
//! Route finding for monsters chasing the player.

use crate::{GameMap, Position};
use ::pathfinding::prelude::astar;
use std::collections::HashSet;

/// Extra cost of stepping onto a tile where a blocking entity stands, so
/// monsters route around each other when a free path exists.
pub const BLOCKED_TILE_COST: u32 = 10;

/// Finds a path from `start` to `goal` over walkable tiles in 8 directions.
///
/// Returns the steps to take, excluding `start` and including `goal`, or an
/// empty path if the goal cannot be reached.
///
/// # Examples
///
/// ```
/// use rogue::{find_path, GameMap, Position, Tile};
///
/// let mut map = GameMap::new(6, 3);
/// for x in 1..5 {
///     map.set_tile(Position::new(x, 1), Tile::floor()).unwrap();
/// }
/// let path = find_path(&map, Position::new(1, 1), Position::new(4, 1));
/// assert_eq!(path.first(), Some(&Position::new(2, 1)));
/// assert_eq!(path.last(), Some(&Position::new(4, 1)));
/// assert_eq!(path.len(), 3);
/// ```
pub fn find_path(map: &GameMap, start: Position, goal: Position) -> Vec<Position> {
    if start == goal || !map.is_walkable(goal) {
        return Vec::new();
    }

    let blocked: HashSet<Position> = map
        .entities
        .iter()
        .filter(|entity| entity.blocks_movement)
        .map(|entity| entity.position)
        .collect();

    let result = astar(
        &start,
        |pos| {
            pos.adjacent_positions()
                .into_iter()
                .filter(|next| map.is_walkable(*next))
                .map(|next| {
                    let cost = if next != goal && blocked.contains(&next) {
                        1 + BLOCKED_TILE_COST
                    } else {
                        1
                    };
                    (next, cost)
                })
                .collect::<Vec<_>>()
        },
        |pos| pos.chebyshev_distance(goal) as u32,
        |pos| *pos == goal,
    );

    match result {
        Some((mut path, _cost)) => {
            path.remove(0);
            path
        }
        None => Vec::new(),
    }
}
