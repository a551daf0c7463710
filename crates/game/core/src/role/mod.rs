//! Per-role strategy injected into the shared state machine.
//!
//! Player, NPC and companion characters share motion, combat and lifecycle.
//! They differ only in the hooks below and in whether the character picks
//! its own goals (see [`goal`]).

pub mod goal;

pub use goal::{Goal, GoalSelector};

use crate::combat::AbilityRef;
use crate::config::SimConfig;
use crate::state::{Character, DisabledActions};
use crate::traits::{CharacterKind, Relation};

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
pub enum Role {
    /// Driven by commands from outside.
    Player,
    /// Picks its own goals.
    #[default]
    Npc,
    /// Picks its own goals, following the player by default.
    Companion,
}

impl Role {
    pub const fn for_kind(kind: CharacterKind) -> Self {
        match kind {
            CharacterKind::Player => Self::Player,
            CharacterKind::Follower => Self::Companion,
            _ => Self::Npc,
        }
    }

    /// Whether the character decides its own intent every idle tick.
    pub const fn selects_goals(self) -> bool {
        !matches!(self, Self::Player)
    }

    /// Players need enough mana for the cost; everybody else casts freely.
    pub fn can_use_magic(self, character: &Character, ability: &AbilityRef) -> bool {
        match self {
            Self::Player => character.mana() >= ability.mana_cost,
            Self::Npc | Self::Companion => true,
        }
    }

    /// Called once a cast has been accepted.
    pub fn on_magic_cast(self, character: &mut Character, ability: &AbilityRef) {
        if let Self::Player = self {
            character.vitals.mana.add(-ability.mana_cost);
        }
    }

    /// Whether the character may start an attack at all.
    pub fn can_perform_attack(self, character: &Character) -> bool {
        if character.disabled_actions().contains(DisabledActions::FIGHT) {
            return false;
        }
        match self {
            Self::Player | Self::Companion => true,
            Self::Npc => {
                character.relation() != Relation::Neutral || character.kind().is_aggressive()
            }
        }
    }

    /// Called when an attack animation completes.
    pub fn on_attacking(self, character: &mut Character, config: &SimConfig) {
        if let Self::Player = self {
            character.vitals.thew.add(-config.player_attack_thew_cost);
        }
    }
}
