use crate::state::Position;

/// Map oracle exposing terrain plus the obstacle queries the motion engine needs.
///
/// `has_obstacle` must reflect both static terrain and blocking characters.
/// Implementations are pure functions of the current map state.
pub trait MapOracle {
    fn dimensions(&self) -> MapDimensions;
    fn tile(&self, position: Position) -> Option<StaticTile>;

    /// Whether `position` is blocked for walking (terrain or a blocking character).
    fn has_obstacle(&self, position: Position) -> bool;

    fn contains(&self, position: Position) -> bool {
        self.dimensions().contains(position)
    }

    /// Whether a jump may not pass over `position`.
    fn is_obstacle_for_jump(&self, position: Position) -> bool {
        self.tile(position)
            .map(|tile| tile.terrain().blocks_jump())
            .unwrap_or(true)
    }

    /// Whether stepping on `position` fires a trap script.
    fn has_trap_script(&self, _position: Position) -> bool {
        false
    }

    /// Whether a scripted event actor stands on `position`.
    fn has_event_actor(&self, _position: Position) -> bool {
        false
    }

    /// Whether `position` blocks line of sight.
    fn blocks_sight(&self, position: Position) -> bool {
        self.tile(position)
            .map(|tile| tile.terrain().blocks_sight())
            .unwrap_or(true)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }
}

/// Immutable descriptor for a tile in the static layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaticTile {
    terrain: TerrainKind,
}

impl StaticTile {
    pub const fn new(terrain: TerrainKind) -> Self {
        Self { terrain }
    }

    pub fn terrain(self) -> TerrainKind {
        self.terrain
    }

    pub fn is_passable(self) -> bool {
        self.terrain.is_passable()
    }
}

/// Canonical terrain classes for static map tiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainKind {
    #[default]
    Floor,
    Wall,
    Void,
    Water,
    /// Low obstacle: blocks walking but can be jumped over and seen across.
    Fence,
}

impl TerrainKind {
    pub fn is_passable(self) -> bool {
        matches!(self, TerrainKind::Floor)
    }

    pub fn blocks_jump(self) -> bool {
        matches!(self, TerrainKind::Wall | TerrainKind::Void)
    }

    pub fn blocks_sight(self) -> bool {
        matches!(self, TerrainKind::Wall)
    }
}
