//! Content factory for loading everything from a data directory.

use std::path::{Path, PathBuf};

use actor_core::{CharacterConfig, GridMap, LevelTable, SimConfig, StateResources};

use crate::loaders::{
    CharacterLoader, ConfigLoader, LevelTableLoader, LoadResult, MapLoader, ResourceLoader,
    read_file,
};

/// Content factory that resolves file references against a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── maps/       map layouts (RON)
/// ├── npc/        character definitions (Key=Value)
/// ├── npcres/     per-state animation and sound tables (RON)
/// └── level/      level tables ([LevelN] sections)
/// ```
///
/// Character definitions name their resource and level files relative to
/// `npcres/` and `level/`.
#[derive(Clone, Debug)]
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Loads `config.toml`, or the defaults when the file does not exist.
    pub fn load_config(&self) -> LoadResult<SimConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::info!("no {} found, using default tuning", path.display());
            return Ok(SimConfig::new());
        }
        ConfigLoader::load(&path)
    }

    pub fn load_map(&self, name: &str) -> LoadResult<GridMap> {
        MapLoader::load(&self.data_dir.join("maps").join(name))
    }

    pub fn load_character(&self, name: &str) -> LoadResult<CharacterConfig> {
        let path = self.data_dir.join("npc").join(name);
        let content = read_file(&path)?;
        let config = CharacterLoader::parse(&content, self);
        tracing::debug!(file = name, name = %config.name, "loaded character definition");
        Ok(config)
    }

    pub fn load_resources(&self, name: &str) -> LoadResult<StateResources> {
        ResourceLoader::load(&self.data_dir.join("npcres").join(name))
    }

    pub fn load_level_table(&self, name: &str) -> LoadResult<LevelTable> {
        LevelTableLoader::load(&self.data_dir.join("level").join(name))
    }
}
