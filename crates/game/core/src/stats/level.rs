//! Experience levels.
//!
//! A level table maps each level to the maxima and combat numbers a character
//! gets on reaching it, plus the experience needed to leave it.

use std::collections::BTreeMap;

/// Values granted on reaching a level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LevelDetail {
    /// Experience needed to go from this level to the next. Zero means final.
    pub level_up_exp: i32,
    pub life_max: i32,
    pub thew_max: i32,
    pub mana_max: i32,
    pub attack: i32,
    pub defend: i32,
    pub evade: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LevelTable {
    levels: BTreeMap<u32, LevelDetail>,
}

impl LevelTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, level: u32, detail: LevelDetail) {
        self.levels.insert(level, detail);
    }

    #[must_use]
    pub fn with(mut self, level: u32, detail: LevelDetail) -> Self {
        self.insert(level, detail);
        self
    }

    pub fn get(&self, level: u32) -> Option<&LevelDetail> {
        self.levels.get(&level)
    }

    pub fn max_level(&self) -> u32 {
        self.levels.keys().next_back().copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Experience bookkeeping of one character.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Progression {
    pub level: u32,
    pub exp: i32,
    /// Experience at which the next level is reached. Zero means no next level.
    pub level_up_exp: i32,
    /// Extra experience granted to whoever kills this character.
    pub exp_bonus: i32,
}

impl Progression {
    /// Whether the current experience reaches the next level.
    pub fn can_level_up(&self) -> bool {
        self.level_up_exp > 0 && self.exp >= self.level_up_exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progression_needs_a_positive_threshold() {
        let mut progression = Progression {
            level: 1,
            exp: 50,
            level_up_exp: 0,
            exp_bonus: 0,
        };
        assert!(!progression.can_level_up());
        progression.level_up_exp = 40;
        assert!(progression.can_level_up());
    }

    #[test]
    fn max_level_is_the_highest_key() {
        let table = LevelTable::new()
            .with(1, LevelDetail::default())
            .with(3, LevelDetail::default());
        assert_eq!(table.max_level(), 3);
        assert_eq!(LevelTable::new().max_level(), 0);
    }
}
