//! Pending intents and relationships a character carries between ticks.

use glam::Vec2;

use crate::combat::AbilityRef;
use crate::env::{InteractTarget, ScriptHandle, ScriptRef};
use crate::state::{EffectId, EntityId, Position};

/// What an attack pursuit is aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackTarget {
    Tile(Position),
    /// Re-resolved every tick; the pursuit ends when the character is gone.
    Character(EntityId),
}

/// Commanded attack that is still being approached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingAttack {
    pub target: AttackTarget,
    pub run: bool,
}

/// The shot to release when the current attack animation completes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackRelease {
    /// `None` for a melee swing.
    pub ability: Option<(AbilityRef, u32)>,
    pub destination: Vec2,
    pub target: Option<EntityId>,
}

/// The cast to release when the magic animation completes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MagicCast {
    pub ability: AbilityRef,
    pub level: u32,
    pub destination: Vec2,
    pub target: Option<EntityId>,
}

/// Interaction whose target is still being approached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingInteraction {
    pub target: InteractTarget,
    pub run: bool,
}

/// Looping patrol over decoded waypoints.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Patrol {
    pub points: Vec<Position>,
    pub next: usize,
}

impl Patrol {
    pub fn new(points: Vec<Position>) -> Option<Self> {
        (!points.is_empty()).then_some(Self { points, next: 0 })
    }

    pub fn current(&self) -> Option<Position> {
        self.points.get(self.next).copied()
    }

    pub fn advance(&mut self) {
        if !self.points.is_empty() {
            self.next = (self.next + 1) % self.points.len();
        }
    }
}

/// Back-reference to whoever summoned this character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Summoner {
    pub owner: EntityId,
    pub effect: EffectId,
}

/// Remote piloting by another character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RemoteControl {
    /// Must be present when control ends.
    pub controller: Option<EntityId>,
}

/// Script re-run on a fixed interval once its previous run ends.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimerScript {
    pub script: ScriptRef,
    pub interval: f32,
    pub elapsed: f32,
    pub running: Option<ScriptHandle>,
}

/// Combat-alert flag with its idle timer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FightingFlag {
    pub active: bool,
    pub idle_seconds: f32,
}

impl FightingFlag {
    pub fn engage(&mut self) {
        self.active = true;
        self.idle_seconds = 0.0;
    }
}
