//! Ranged abilities a character can release, keyed by use-distance.

use arrayvec::ArrayVec;

use crate::config::SimConfig;

/// An ability definition as far as the core needs to know it.
///
/// The ability system resolves the name to its real behaviour.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityRef {
    pub name: String,
    /// Mana a player pays to cast it.
    pub mana_cost: i32,
    /// Highest level the ability can be used at.
    pub max_level: u32,
}

impl AbilityRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mana_cost: 0,
            max_level: 1,
        }
    }

    #[must_use]
    pub fn with_mana_cost(mut self, mana_cost: i32) -> Self {
        self.mana_cost = mana_cost;
        self
    }

    #[must_use]
    pub fn with_max_level(mut self, max_level: u32) -> Self {
        self.max_level = max_level;
        self
    }

    /// Level this ability is used at by a caster of `attack_level`.
    pub fn level_for(&self, attack_level: u32) -> u32 {
        attack_level.clamp(1, self.max_level.max(1))
    }
}

/// An ability as configured on a character, before levels are derived.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityBinding {
    pub ability: AbilityRef,
    pub use_distance: u32,
}

impl AbilityBinding {
    pub fn new(ability: AbilityRef, use_distance: u32) -> Self {
        Self {
            ability,
            use_distance,
        }
    }
}

/// One entry of the targeting table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilitySlot {
    /// Tile distance at which the ability is meant to be fired.
    pub use_distance: u32,
    pub ability: AbilityRef,
    /// Derived from the owner's attack level.
    pub level: u32,
}

/// Abilities sorted by ascending use-distance. Equal distances keep insertion
/// order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityTable {
    slots: ArrayVec<AbilitySlot, { SimConfig::MAX_ABILITIES }>,
}

impl AbilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an ability. Returns false when the table is full.
    pub fn insert(&mut self, ability: AbilityRef, use_distance: u32, attack_level: u32) -> bool {
        if self.slots.is_full() {
            return false;
        }
        let index = self
            .slots
            .iter()
            .position(|slot| slot.use_distance > use_distance)
            .unwrap_or(self.slots.len());
        let level = ability.level_for(attack_level);
        self.slots.insert(
            index,
            AbilitySlot {
                use_distance,
                ability,
                level,
            },
        );
        true
    }

    /// Recomputes every ability level from a new attack level.
    pub fn rederive_levels(&mut self, attack_level: u32) {
        for slot in &mut self.slots {
            slot.level = slot.ability.level_for(attack_level);
        }
    }

    pub fn slots(&self) -> &[AbilitySlot] {
        &self.slots
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_stay_sorted_and_stable() {
        let mut table = AbilityTable::new();
        table.insert(AbilityRef::new("far"), 5, 1);
        table.insert(AbilityRef::new("near"), 1, 1);
        table.insert(AbilityRef::new("far2"), 5, 1);
        let names: Vec<_> = table.slots().iter().map(|s| s.ability.name.as_str()).collect();
        assert_eq!(names, ["near", "far", "far2"]);
    }

    #[test]
    fn levels_follow_attack_level_within_bounds() {
        let mut table = AbilityTable::new();
        table.insert(AbilityRef::new("bolt").with_max_level(3), 2, 0);
        assert_eq!(table.slots()[0].level, 1);
        table.rederive_levels(2);
        assert_eq!(table.slots()[0].level, 2);
        table.rederive_levels(9);
        assert_eq!(table.slots()[0].level, 3);
    }
}
