//! Level table loader.
//!
//! ```text
//! [Level1]
//! LevelUpExp=100
//! LifeMax=100
//! Attack=10
//! ```

use std::path::Path;

use actor_core::{LevelDetail, LevelTable};

use crate::ini::{IniDocument, IniSection};
use crate::loaders::{LoadResult, read_file};

pub struct LevelTableLoader;

impl LevelTableLoader {
    pub fn load(path: &Path) -> LoadResult<LevelTable> {
        let content = read_file(path)?;
        Ok(Self::parse(&content))
    }

    /// Sections not named `LevelN` are skipped, as are malformed values.
    pub fn parse(content: &str) -> LevelTable {
        let document = IniDocument::parse(content);
        let mut table = LevelTable::new();
        for section in document.sections() {
            let Some(name) = section.name.as_deref() else {
                continue;
            };
            let Some(level) = name
                .strip_prefix("Level")
                .and_then(|number| number.parse::<u32>().ok())
            else {
                tracing::debug!("skipping level table section [{}]", name);
                continue;
            };
            table.insert(level, detail_from(level, section));
        }
        table
    }
}

fn detail_from(level: u32, section: &IniSection) -> LevelDetail {
    let mut detail = LevelDetail::default();
    for (key, value) in &section.entries {
        let field = match key.as_str() {
            "LevelUpExp" => &mut detail.level_up_exp,
            "LifeMax" => &mut detail.life_max,
            "ThewMax" => &mut detail.thew_max,
            "ManaMax" => &mut detail.mana_max,
            "Attack" => &mut detail.attack,
            "Defend" | "Defence" => &mut detail.defend,
            "Evade" => &mut detail.evade,
            other => {
                tracing::debug!("level {}: unknown key {}", level, other);
                continue;
            }
        };
        match value.parse() {
            Ok(parsed) => *field = parsed,
            Err(_) => tracing::warn!("level {}: bad value {}={:?}", level, key, value),
        }
    }
    detail
}
