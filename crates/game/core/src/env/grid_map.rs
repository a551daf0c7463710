//! Reference [`MapOracle`] backed by a dense terrain grid and an occupancy overlay.

use std::collections::{BTreeMap, BTreeSet};

use super::map::{MapDimensions, MapOracle, StaticTile, TerrainKind};
use crate::state::{EntityId, Position};

/// Dense tile map with trap tiles, event actors and blocking occupants.
///
/// Terrain is static for a level; occupants are rebuilt by the owner before
/// each character update so that `has_obstacle` sees everybody else.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridMap {
    dimensions: MapDimensions,
    terrain: Vec<TerrainKind>,
    traps: BTreeSet<Position>,
    event_actors: BTreeSet<Position>,
    #[cfg_attr(feature = "serde", serde(skip))]
    occupants: BTreeMap<Position, EntityId>,
}

impl GridMap {
    /// Creates a map of the given size filled with floor.
    pub fn new(dimensions: MapDimensions) -> Self {
        let len = dimensions.width as usize * dimensions.height as usize;
        Self {
            dimensions,
            terrain: vec![TerrainKind::Floor; len],
            traps: BTreeSet::new(),
            event_actors: BTreeSet::new(),
            occupants: BTreeMap::new(),
        }
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.dimensions
            .contains(position)
            .then(|| position.y as usize * self.dimensions.width as usize + position.x as usize)
    }

    /// Overrides the terrain at `position`. Out-of-bounds positions are ignored.
    pub fn set_terrain(&mut self, position: Position, terrain: TerrainKind) {
        if let Some(index) = self.index(position) {
            self.terrain[index] = terrain;
        }
    }

    pub fn set_trap(&mut self, position: Position, has_trap: bool) {
        if has_trap {
            self.traps.insert(position);
        } else {
            self.traps.remove(&position);
        }
    }

    pub fn set_event_actor(&mut self, position: Position, present: bool) {
        if present {
            self.event_actors.insert(position);
        } else {
            self.event_actors.remove(&position);
        }
    }

    /// Marks `position` as blocked by `entity`.
    pub fn occupy(&mut self, position: Position, entity: EntityId) {
        self.occupants.insert(position, entity);
    }

    pub fn vacate(&mut self, position: Position) {
        self.occupants.remove(&position);
    }

    pub fn clear_occupants(&mut self) {
        self.occupants.clear();
    }

    pub fn occupant(&self, position: Position) -> Option<EntityId> {
        self.occupants.get(&position).copied()
    }
}

impl MapOracle for GridMap {
    fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    fn tile(&self, position: Position) -> Option<StaticTile> {
        self.index(position)
            .and_then(|index| self.terrain.get(index))
            .map(|terrain| StaticTile::new(*terrain))
    }

    fn has_obstacle(&self, position: Position) -> bool {
        match self.tile(position) {
            Some(tile) => !tile.is_passable() || self.occupants.contains_key(&position),
            None => true,
        }
    }

    fn has_trap_script(&self, position: Position) -> bool {
        self.traps.contains(&position)
    }

    fn has_event_actor(&self, position: Position) -> bool {
        self.event_actors.contains(&position)
    }
}
