//! # Field of View
//!
//! Recursive shadowcasting. The area around the origin is split into 8
//! octants, each scanned row by row outward while tracking the slopes that are
//! still lit. Walls and anything out of bounds stop light; the blocking tile
//! itself is lit.

use crate::{GameMap, Position};
use std::collections::HashSet;

/// Computes every position visible from `origin` within `radius`.
///
/// # Examples
///
/// ```
/// use rogue::{compute_fov, GameMap, Position, Tile};
///
/// let mut map = GameMap::new(10, 10);
/// for x in 1..9 {
///     map.set_tile(Position::new(x, 5), Tile::floor()).unwrap();
/// }
/// let visible = compute_fov(&map, Position::new(4, 5), 8);
/// assert!(visible.contains(&Position::new(8, 5)));
/// assert!(visible.contains(&Position::new(9, 5))); // the wall at the end
/// assert!(!visible.contains(&Position::new(4, 7))); // behind the corridor wall
/// ```
pub fn compute_fov(map: &GameMap, origin: Position, radius: i32) -> HashSet<Position> {
    let mut visible = HashSet::new();
    if !map.in_bounds(origin) {
        return visible;
    }
    visible.insert(origin);

    for octant in 0..8 {
        cast_light(map, &mut visible, origin, radius, 1, 1.0, 0.0, octant);
    }
    visible
}

/// Maps `(row, col)` in octant space to a delta from the origin.
///
/// Octants are numbered 0-7, starting from the top and going clockwise:
///   \1|2/
///   0\|/3
///   --@--
///   7/|\4
///   /6|5\
#[inline]
fn transform(octant: u8, row: i32, col: i32) -> Position {
    match octant {
        0 => Position::new(-col, -row),
        1 => Position::new(-row, -col),
        2 => Position::new(-row, col),
        3 => Position::new(col, -row),
        4 => Position::new(col, row),
        5 => Position::new(row, col),
        6 => Position::new(row, -col),
        _ => Position::new(-col, row),
    }
}

fn blocks_light(map: &GameMap, pos: Position) -> bool {
    map.tile(pos).map(|tile| !tile.transparent).unwrap_or(true)
}

#[allow(clippy::too_many_arguments)]
fn cast_light(
    map: &GameMap,
    visible: &mut HashSet<Position>,
    origin: Position,
    radius: i32,
    row: i32,
    mut start_slope: f32,
    end_slope: f32,
    octant: u8,
) {
    if start_slope < end_slope || row > radius {
        return;
    }

    let mut prev_blocked = false;
    let mut saved_start_slope = start_slope;

    let min_col = (row as f32 * end_slope).floor() as i32;
    let max_col = (row as f32 * start_slope).ceil() as i32;

    for col in (min_col..=max_col).rev() {
        let delta = transform(octant, row, col);
        let pos = origin + delta;

        if delta.x * delta.x + delta.y * delta.y > radius * radius {
            continue;
        }

        let left_slope = (col as f32 + 0.5) / (row as f32 - 0.5);
        let right_slope = (col as f32 - 0.5) / (row as f32 + 0.5);

        if right_slope > start_slope {
            continue;
        }
        if left_slope < end_slope {
            break;
        }

        if map.in_bounds(pos) {
            visible.insert(pos);
        }
        let is_blocked = blocks_light(map, pos);

        if prev_blocked {
            if is_blocked {
                saved_start_slope = right_slope;
            } else {
                prev_blocked = false;
                start_slope = saved_start_slope;
            }
        } else if is_blocked {
            prev_blocked = true;
            cast_light(
                map,
                visible,
                origin,
                radius,
                row + 1,
                start_slope,
                left_slope,
                octant,
            );
            saved_start_slope = right_slope;
        }
    }

    if !prev_blocked {
        cast_light(
            map,
            visible,
            origin,
            radius,
            row + 1,
            start_slope,
            end_slope,
            octant,
        );
    }
}

impl GameMap {
    /// Clears current visibility, then lights everything visible from
    /// `origin`. Lit tiles become seen.
    pub fn update_fov(&mut self, origin: Position, radius: i32) {
        let lit = compute_fov(self, origin, radius);
        for (y, row) in self.tiles.iter_mut().enumerate() {
            for (x, tile) in row.iter_mut().enumerate() {
                tile.set_visible(lit.contains(&Position::new(x as i32, y as i32)));
            }
        }
    }
}
