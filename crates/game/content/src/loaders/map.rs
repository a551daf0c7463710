//! Map layout loader.
//!
//! Loads terrain, trap tiles and event-actor tiles from RON files into a
//! [`GridMap`]. Character placement is handled by scenario files.

use std::path::Path;

use actor_core::{GridMap, MapDimensions, Position, TerrainKind};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Map layout as authored.
///
/// `layout` rows are optional ASCII art, one character per tile:
/// `.` floor, `#` wall, `~` water, `=` fence, anything else void.
/// Explicit `tiles` entries are applied after the layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapData {
    pub dimensions: (u32, u32),
    pub layout: Vec<String>,
    pub tiles: Vec<(i32, i32, TerrainKind)>,
    pub traps: Vec<(i32, i32)>,
    pub event_actors: Vec<(i32, i32)>,
}

impl MapData {
    pub fn build(&self) -> LoadResult<GridMap> {
        let (width, height) = self.dimensions;
        if width == 0 || height == 0 {
            anyhow::bail!("map dimensions must be positive, got {}x{}", width, height);
        }
        if self.layout.len() > height as usize {
            anyhow::bail!(
                "layout has {} rows but the map is {} tall",
                self.layout.len(),
                height
            );
        }

        let mut map = GridMap::new(MapDimensions::new(width, height));
        for (y, row) in self.layout.iter().enumerate() {
            if row.chars().count() > width as usize {
                anyhow::bail!("layout row {} is wider than {}", y, width);
            }
            for (x, glyph) in row.chars().enumerate() {
                map.set_terrain(Position::new(x as i32, y as i32), terrain_for(glyph));
            }
        }
        for &(x, y, terrain) in &self.tiles {
            map.set_terrain(Position::new(x, y), terrain);
        }
        for &(x, y) in &self.traps {
            map.set_trap(Position::new(x, y), true);
        }
        for &(x, y) in &self.event_actors {
            map.set_event_actor(Position::new(x, y), true);
        }
        Ok(map)
    }
}

fn terrain_for(glyph: char) -> TerrainKind {
    match glyph {
        '.' => TerrainKind::Floor,
        '#' => TerrainKind::Wall,
        '~' => TerrainKind::Water,
        '=' => TerrainKind::Fence,
        _ => TerrainKind::Void,
    }
}

/// Loader for map data from RON files.
pub struct MapLoader;

impl MapLoader {
    pub fn load(path: &Path) -> LoadResult<GridMap> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load map {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<GridMap> {
        let data: MapData = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse map RON: {}", e))?;
        data.build()
    }
}
