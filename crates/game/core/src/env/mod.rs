//! Collaborators a character consults while it updates.
//!
//! Oracles expose map geometry, route planning, the other characters and
//! deterministic rolls. The [`SimEnv`] aggregate bundles them read-only; the
//! [`SimContext`] pairs it with the mutable [`SimHost`] for one call.
mod actors;
mod grid;
mod grid_map;
mod host;
mod map;
mod pathfinder;
mod rng;

pub use actors::{
    ActorSnapshot, CharacterDirectory, DirectorySnapshot, InteractTarget, ObjectSnapshot,
};
pub use grid::{
    Direction8, has_line_of_sight, is_linearly_reachable, line_tiles, neighbor_in_direction,
    neighbor_toward, tile_at_distance, tile_vector, to_pixel, to_tile, view_distance,
};
pub use grid_map::GridMap;
pub use host::{
    CorpseRef, HostEvent, RecordingHost, ScriptHandle, ScriptRef, SimHost, SoundHandle, SoundRef,
};
pub use map::{MapDimensions, MapOracle, StaticTile, TerrainKind};
pub use pathfinder::{GridPathFinder, PathFinder, PathStyle};
pub use rng::{FixedRng, PcgRng, RngOracle, RollContext, compute_seed};

use crate::config::SimConfig;

/// Aggregates the read-only oracles a character update needs.
#[derive(Clone, Copy)]
pub struct SimEnv<'a> {
    map: &'a dyn MapOracle,
    pathfinder: &'a dyn PathFinder,
    directory: &'a dyn CharacterDirectory,
    rng: &'a dyn RngOracle,
    config: &'a SimConfig,
}

impl<'a> SimEnv<'a> {
    pub fn new(
        map: &'a dyn MapOracle,
        pathfinder: &'a dyn PathFinder,
        directory: &'a dyn CharacterDirectory,
        rng: &'a dyn RngOracle,
        config: &'a SimConfig,
    ) -> Self {
        Self {
            map,
            pathfinder,
            directory,
            rng,
            config,
        }
    }

    pub fn map(&self) -> &'a dyn MapOracle {
        self.map
    }

    pub fn pathfinder(&self) -> &'a dyn PathFinder {
        self.pathfinder
    }

    pub fn directory(&self) -> &'a dyn CharacterDirectory {
        self.directory
    }

    pub fn rng(&self) -> &'a dyn RngOracle {
        self.rng
    }

    pub fn config(&self) -> &'a SimConfig {
        self.config
    }
}

impl std::fmt::Debug for SimEnv<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimEnv")
            .field("dimensions", &self.map.dimensions())
            .field("actors", &self.directory.actors().len())
            .field("config", self.config)
            .finish()
    }
}

/// Environment plus host for a single update or command.
pub struct SimContext<'a> {
    pub env: SimEnv<'a>,
    pub host: &'a mut dyn SimHost,
}

impl<'a> SimContext<'a> {
    pub fn new(env: SimEnv<'a>, host: &'a mut dyn SimHost) -> Self {
        Self { env, host }
    }
}
