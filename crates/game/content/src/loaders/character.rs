//! Character definition loader.
//!
//! Definitions are `Key=Value` files. Keys are case-sensitive. Numeric codes
//! for `Kind`, `Relation`, `Dir`, `PathFinder` and `MagicDirectionWhenDie`
//! follow the `from_code` tables of the core types.
//!
//! ```text
//! [Init]
//! Name=Bandit
//! Kind=1
//! Relation=1
//! MapX=12
//! MapY=7
//! NpcIni=bandit.ron
//! FlyIni=arrow:4
//! FixedPos=0C0007000F000700
//! ```

use std::str::FromStr;

use actor_core::env::{CorpseRef, ScriptRef};
use actor_core::{
    AbilityBinding, AbilityRef, CharacterConfig, CharacterKind, DeathAim, Direction8, PathStyle,
    Relation,
};

use crate::ini::IniDocument;
use crate::loaders::{ContentFactory, LoadResult};
use crate::patrol::decode_fixed_pos;

/// Ability reference as written in `FlyIni=name` or `FlyIni=name:distance`.
struct PendingBinding {
    name: String,
    use_distance: Option<u32>,
}

pub struct CharacterLoader;

impl CharacterLoader {
    /// Parses a definition. Referenced resource and level files are loaded
    /// through `factory`. Bad fields are logged and keep their defaults.
    pub fn parse(content: &str, factory: &ContentFactory) -> CharacterConfig {
        let document = IniDocument::parse(content);
        let mut config = CharacterConfig::default();
        let mut primary = None;
        let mut secondary = None;

        for (key, value) in document.entries() {
            let applied = match key {
                "FlyIni" => parse_binding(value).map(|binding| primary = Some(binding)),
                "FlyIni2" => parse_binding(value).map(|binding| secondary = Some(binding)),
                _ => apply_field(&mut config, key, value, factory),
            };
            if let Err(error) = applied {
                tracing::warn!("skipping {}={:?}: {}", key, value, error);
            }
        }

        // Bindings without an explicit distance fire from the attack radius,
        // wherever `AttackRadius` appears in the file.
        let radius = config.attack_radius;
        let resolve = |binding: PendingBinding| {
            AbilityBinding::new(
                AbilityRef::new(binding.name),
                binding.use_distance.unwrap_or(radius),
            )
        };
        config.primary_ability = primary.map(resolve);
        config.secondary_ability = secondary.map(resolve);
        config
    }
}

fn apply_field(
    config: &mut CharacterConfig,
    key: &str,
    value: &str,
    factory: &ContentFactory,
) -> LoadResult<()> {
    match key {
        "Name" => config.name = value.to_string(),
        "Kind" => {
            let code = number(value)?;
            config.kind = CharacterKind::from_code(code)
                .ok_or_else(|| anyhow::anyhow!("unknown kind code {}", code))?;
        }
        "Relation" => {
            let code = number(value)?;
            config.relation = Relation::from_code(code)
                .ok_or_else(|| anyhow::anyhow!("unknown relation code {}", code))?;
        }
        "Dir" => config.direction = Direction8::from_index(number(value)?),
        "PathFinder" => config.path_style = PathStyle::from_code(number(value)?),
        "MapX" => config.tile.x = number(value)?,
        "MapY" => config.tile.y = number(value)?,

        "VisionRadius" => config.vision_radius = number(value)?,
        "DialogRadius" => config.dialog_radius = number(value)?,
        "AttackRadius" => config.attack_radius = number(value)?,
        "WalkSpeed" => config.walk_speed = number(value)?,

        "Life" => config.life = number(value)?,
        "LifeMax" => config.life_max = number(value)?,
        "Thew" => config.thew = number(value)?,
        "ThewMax" => config.thew_max = number(value)?,
        "Mana" => config.mana = number(value)?,
        "ManaMax" => config.mana_max = number(value)?,
        "Attack" => config.attack = number(value)?,
        "Defend" | "Defence" => config.defend = number(value)?,
        "Evade" => config.evade = number(value)?,
        "AttackLevel" => config.attack_level = number(value)?,
        "Level" => config.level = number(value)?,
        "Exp" => config.exp = number(value)?,
        "LevelUpExp" => config.level_up_exp = number(value)?,
        "ExpBonus" => config.exp_bonus = number(value)?,

        "NpcIni" => config.resources = factory.load_resources(value)?,
        "LevelIni" => config.level_table = Some(factory.load_level_table(value)?),
        "BodyIni" => config.corpse = non_empty(value).map(|name| CorpseRef(name.to_string())),
        "FlyInis" => config.extra_abilities = parse_binding_list(value),
        "ScriptFile" => config.script = non_empty(value).map(script),
        "DeathScript" => config.death_script = non_empty(value).map(script),
        "TimerScriptFile" => config.timer_script = non_empty(value).map(script),
        "TimerScriptInterval" => {
            let millis: u32 = number(value)?;
            config.timer_interval = millis as f32 / 1000.0;
        }
        "MagicToUseWhenDie" => config.death_ability = non_empty(value).map(AbilityRef::new),
        "MagicDirectionWhenDie" => config.death_aim = DeathAim::from_code(number(value)?),
        "FixedPos" => config.patrol = decode_fixed_pos(value).unwrap_or_default(),
        other => tracing::debug!("ignoring unknown key {}", other),
    }
    Ok(())
}

fn number<T: FromStr>(value: &str) -> LoadResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("not a number: {:?}", value))
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

fn script(name: &str) -> ScriptRef {
    ScriptRef(name.to_string())
}

fn parse_binding(value: &str) -> LoadResult<PendingBinding> {
    let value = non_empty(value).ok_or_else(|| anyhow::anyhow!("empty ability"))?;
    match value.split_once(':') {
        Some((name, distance)) => Ok(PendingBinding {
            name: name.trim().to_string(),
            use_distance: Some(number(distance)?),
        }),
        None => Ok(PendingBinding {
            name: value.to_string(),
            use_distance: None,
        }),
    }
}

/// `name:distance;name:distance`. Malformed entries are skipped.
fn parse_binding_list(value: &str) -> Vec<AbilityBinding> {
    value
        .split(';')
        .filter_map(non_empty)
        .filter_map(|entry| {
            let parsed = entry.split_once(':').and_then(|(name, distance)| {
                let name = non_empty(name)?;
                let distance = distance.trim().parse().ok()?;
                Some(AbilityBinding::new(AbilityRef::new(name), distance))
            });
            if parsed.is_none() {
                tracing::warn!("skipping ability entry {:?}", entry);
            }
            parsed
        })
        .collect()
}
