//! The parsed character definition a [`Character`](crate::state::Character)
//! is built from.

use crate::combat::{AbilityBinding, AbilityRef};
use crate::env::{CorpseRef, Direction8, PathStyle, ScriptRef};
use crate::state::{EntityId, Position, StateResources};
use crate::stats::LevelTable;
use crate::traits::{CharacterKind, Relation};

/// Which way the on-death ability is aimed.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DeathAim {
    /// Along the character's facing.
    #[default]
    Facing,
    /// Toward whoever dealt the killing blow.
    ToLastAttacker,
    /// Opposite the travel direction of the last projectile that hit.
    OppositeProjectile,
}

impl DeathAim {
    pub const fn from_code(code: i32) -> Self {
        match code {
            1 => Self::ToLastAttacker,
            2 => Self::OppositeProjectile,
            _ => Self::Facing,
        }
    }
}

/// Everything needed to construct a character.
///
/// Fields left at their defaults behave like an unconfigured townsperson
/// standing at the origin.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CharacterConfig {
    pub name: String,
    pub kind: CharacterKind,
    pub relation: Relation,
    pub path_style: PathStyle,
    pub tile: Position,
    pub direction: Direction8,

    pub vision_radius: u32,
    pub dialog_radius: u32,
    pub attack_radius: u32,
    /// Walk speed multiplier. Values below one are raised to one.
    pub walk_speed: u32,

    pub life: i32,
    pub life_max: i32,
    pub thew: i32,
    pub thew_max: i32,
    pub mana: i32,
    pub mana_max: i32,

    pub attack: i32,
    pub defend: i32,
    pub evade: i32,
    pub attack_level: u32,

    pub level: u32,
    pub exp: i32,
    pub level_up_exp: i32,
    pub exp_bonus: i32,
    pub level_table: Option<LevelTable>,

    pub resources: StateResources,
    pub primary_ability: Option<AbilityBinding>,
    pub secondary_ability: Option<AbilityBinding>,
    pub extra_abilities: Vec<AbilityBinding>,

    pub script: Option<ScriptRef>,
    pub death_script: Option<ScriptRef>,
    pub timer_script: Option<ScriptRef>,
    pub timer_interval: f32,

    pub death_ability: Option<AbilityRef>,
    pub death_aim: DeathAim,
    pub corpse: Option<CorpseRef>,

    /// Decoded patrol waypoints. Empty means no patrol.
    pub patrol: Vec<Position>,
    pub follow_target: Option<EntityId>,

    pub fight_disabled: bool,
    pub jump_disabled: bool,
    pub run_disabled: bool,
}

impl CharacterConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: CharacterKind::default(),
            relation: Relation::default(),
            path_style: PathStyle::default(),
            tile: Position::ORIGIN,
            direction: Direction8::default(),
            vision_radius: 9,
            dialog_radius: 1,
            attack_radius: 1,
            walk_speed: 1,
            life: 100,
            life_max: 100,
            thew: 100,
            thew_max: 100,
            mana: 100,
            mana_max: 100,
            attack: 10,
            defend: 0,
            evade: 0,
            attack_level: 1,
            level: 1,
            exp: 0,
            level_up_exp: 0,
            exp_bonus: 0,
            level_table: None,
            resources: StateResources::default(),
            primary_ability: None,
            secondary_ability: None,
            extra_abilities: Vec::new(),
            script: None,
            death_script: None,
            timer_script: None,
            timer_interval: 0.0,
            death_ability: None,
            death_aim: DeathAim::default(),
            corpse: None,
            patrol: Vec::new(),
            follow_target: None,
            fight_disabled: false,
            jump_disabled: false,
            run_disabled: false,
        }
    }
}
