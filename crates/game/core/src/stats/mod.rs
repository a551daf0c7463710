//! Numeric character stats.
//!
//! Vitals clamp on every mutation; combat numbers are plain integers that the
//! level table overwrites on level-up.

pub mod level;
pub mod resources;

pub use level::{LevelDetail, LevelTable, Progression};
pub use resources::{ResourceKind, ResourceMeter, Vitals};

/// Combat numbers read by the ability system and melee resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatStats {
    pub attack: i32,
    pub defend: i32,
    pub evade: i32,
    /// Level used to derive the level of every ability the character casts.
    pub attack_level: u32,
}

impl CombatStats {
    /// Damage a melee swing with these stats deals to `defender`. Never below one.
    pub fn melee_damage(&self, defender: &CombatStats) -> i32 {
        (self.attack - defender.defend).max(1)
    }
}
