//! Per-state animation and sound tables.

use std::path::Path;

use actor_core::StateResources;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`StateResources`] from RON files.
///
/// RON format: a map from action state to asset.
///
/// ```ron
/// {
///     Stand: (image: Some("guard_stand.png"), frames: 4, frame_interval: 0.15),
///     Walk: (frames: 6, frame_interval: 0.1, sound: Some(SoundRef("step.wav"))),
/// }
/// ```
pub struct ResourceLoader;

impl ResourceLoader {
    pub fn load(path: &Path) -> LoadResult<StateResources> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse resources {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<StateResources> {
        let resources: StateResources =
            ron::from_str(content).map_err(|e| anyhow::anyhow!("{}", e))?;
        Ok(resources)
    }
}
