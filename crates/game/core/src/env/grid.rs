//! Tile/pixel conversion and pure grid geometry.
//!
//! Tiles are squares of [`SimConfig::TILE_SIZE`] pixels. A tile's pixel
//! position is its centre; a pixel belongs to the tile it falls inside.

use glam::Vec2;

use crate::config::SimConfig;
use crate::env::MapOracle;
use crate::state::Position;

/// Centre of `tile` in world pixels.
pub fn to_pixel(tile: Position) -> Vec2 {
    Vec2::new(
        (tile.x as f32 + 0.5) * SimConfig::TILE_SIZE,
        (tile.y as f32 + 0.5) * SimConfig::TILE_SIZE,
    )
}

/// Tile containing the world pixel `pixel`.
pub fn to_tile(pixel: Vec2) -> Position {
    Position::new(
        (pixel.x / SimConfig::TILE_SIZE).floor() as i32,
        (pixel.y / SimConfig::TILE_SIZE).floor() as i32,
    )
}

/// The eight compass directions, clockwise on screen starting at south.
///
/// Screen coordinates grow downwards, so south is `+y`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction8 {
    #[default]
    South,
    SouthWest,
    West,
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
}

impl Direction8 {
    pub const ALL: [Direction8; 8] = [
        Direction8::South,
        Direction8::SouthWest,
        Direction8::West,
        Direction8::NorthWest,
        Direction8::North,
        Direction8::NorthEast,
        Direction8::East,
        Direction8::SouthEast,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Wraps any integer into a direction, as `Dir=` fields do.
    pub const fn from_index(index: i32) -> Self {
        Self::ALL[index.rem_euclid(8) as usize]
    }

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction8::South => (0, 1),
            Direction8::SouthWest => (-1, 1),
            Direction8::West => (-1, 0),
            Direction8::NorthWest => (-1, -1),
            Direction8::North => (0, -1),
            Direction8::NorthEast => (1, -1),
            Direction8::East => (1, 0),
            Direction8::SouthEast => (1, 1),
        }
    }

    pub const fn opposite(self) -> Self {
        Self::from_index(self as i32 + 4)
    }

    /// Unit vector pointing in this direction.
    pub fn unit(self) -> Vec2 {
        let (dx, dy) = self.delta();
        Vec2::new(dx as f32, dy as f32).normalize()
    }

    /// Nearest compass direction to `vector`, or `None` for the zero vector.
    pub fn from_vector(vector: Vec2) -> Option<Self> {
        if vector.length_squared() <= f32::EPSILON {
            return None;
        }
        // Angle measured from south, growing towards west.
        let angle = (-vector.x).atan2(vector.y);
        let sector = (angle / core::f32::consts::FRAC_PI_4).round() as i32;
        Some(Self::from_index(sector))
    }
}

/// Chebyshev distance between two tiles: diagonal steps count as one.
pub fn view_distance(a: Position, b: Position) -> u32 {
    let dx = (a.x - b.x).unsigned_abs();
    let dy = (a.y - b.y).unsigned_abs();
    dx.max(dy)
}

pub fn neighbor_in_direction(tile: Position, direction: Direction8) -> Position {
    let (dx, dy) = direction.delta();
    tile.offset(dx, dy)
}

/// Neighbour of `tile` in the compass direction nearest to `vector`.
///
/// The zero vector yields `tile` itself.
pub fn neighbor_toward(tile: Position, vector: Vec2) -> Position {
    match Direction8::from_vector(vector) {
        Some(direction) => neighbor_in_direction(tile, direction),
        None => tile,
    }
}

/// Tile `distance` steps from `tile` along the compass direction nearest to
/// `vector`. A zero vector steps south.
pub fn tile_at_distance(tile: Position, vector: Vec2, distance: u32) -> Position {
    let direction = Direction8::from_vector(vector).unwrap_or_default();
    let (dx, dy) = direction.delta();
    tile.offset(dx * distance as i32, dy * distance as i32)
}

/// Vector from tile `from` to tile `to` in tile units.
pub fn tile_vector(from: Position, to: Position) -> Vec2 {
    Vec2::new((to.x - from.x) as f32, (to.y - from.y) as f32)
}

/// Tiles on the Bresenham line from `from` to `to`, both ends included.
pub fn line_tiles(from: Position, to: Position) -> Vec<Position> {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx + dy;
    let mut current = from;
    let mut tiles = Vec::with_capacity((dx.max(-dy) + 1) as usize);
    loop {
        tiles.push(current);
        if current == to {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            current.x += sx;
        }
        if e2 <= dx {
            err += dx;
            current.y += sy;
        }
    }
    tiles
}

/// Whether `to` is visible from `from` within `radius` tiles.
///
/// Only tiles strictly between the two ends can block the view.
pub fn has_line_of_sight(map: &dyn MapOracle, from: Position, to: Position, radius: u32) -> bool {
    if view_distance(from, to) > radius {
        return false;
    }
    let line = line_tiles(from, to);
    let inner = line.len().saturating_sub(1);
    line.iter()
        .take(inner)
        .skip(1)
        .all(|tile| !map.blocks_sight(*tile))
}

/// Whether a straight slide from `from` to `to` crosses only free tiles.
pub fn is_linearly_reachable(map: &dyn MapOracle, from: Position, to: Position) -> bool {
    line_tiles(from, to)
        .iter()
        .skip(1)
        .all(|tile| map.contains(*tile) && !map.has_obstacle(*tile))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_and_tile_conversions_agree() {
        let tile = Position::new(5, 8);
        assert_eq!(to_pixel(tile), Vec2::new(176.0, 272.0));
        assert_eq!(to_tile(to_pixel(tile)), tile);
        assert_eq!(to_tile(Vec2::new(-1.0, 31.9)), Position::new(-1, 0));
    }

    #[test]
    fn vectors_map_to_nearest_direction() {
        assert_eq!(Direction8::from_vector(Vec2::new(0.0, 1.0)), Some(Direction8::South));
        assert_eq!(Direction8::from_vector(Vec2::new(-1.0, 0.0)), Some(Direction8::West));
        assert_eq!(Direction8::from_vector(Vec2::new(0.0, -3.0)), Some(Direction8::North));
        assert_eq!(Direction8::from_vector(Vec2::new(2.0, 0.1)), Some(Direction8::East));
        assert_eq!(Direction8::from_vector(Vec2::new(1.0, 1.0)), Some(Direction8::SouthEast));
        assert_eq!(Direction8::from_vector(Vec2::ZERO), None);
        for direction in Direction8::ALL {
            assert_eq!(Direction8::from_vector(direction.unit()), Some(direction));
        }
    }

    #[test]
    fn distance_helpers_follow_the_compass() {
        let origin = Position::new(4, 4);
        assert_eq!(view_distance(origin, Position::new(7, 2)), 3);
        assert_eq!(
            tile_at_distance(origin, Vec2::new(-2.0, 0.0), 3),
            Position::new(1, 4)
        );
        assert_eq!(neighbor_toward(origin, Vec2::ZERO), origin);
        assert_eq!(Direction8::North.opposite(), Direction8::South);
    }

    #[test]
    fn bresenham_includes_both_ends() {
        let line = line_tiles(Position::new(0, 0), Position::new(3, 1));
        assert_eq!(line.first(), Some(&Position::new(0, 0)));
        assert_eq!(line.last(), Some(&Position::new(3, 1)));
        assert_eq!(line.len(), 4);
    }
}
