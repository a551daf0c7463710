//! Content loaders for reading game data from files.
//!
//! Whole-file failures (unreadable file, malformed RON/TOML) are errors.
//! Field-level problems inside `Key=Value` files are logged and skipped.

pub mod character;
pub mod config;
pub mod factory;
pub mod level;
pub mod map;
pub mod resources;

pub use character::CharacterLoader;
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use level::LevelTableLoader;
pub use map::{MapData, MapLoader};
pub use resources::ResourceLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
