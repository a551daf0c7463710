//! Status effect entry points guarded by the lifecycle.

use crate::state::Character;

impl Character {
    /// Freezes for `seconds`. No-op while dying, petrified or already frozen.
    pub fn set_frozen(&mut self, seconds: f32, visual: bool) -> bool {
        !self.death_invoked && self.status.apply_frozen(seconds, visual)
    }

    /// Poisons for `seconds`. No-op while dying, petrified or already poisoned.
    pub fn set_poisoned(&mut self, seconds: f32, visual: bool) -> bool {
        !self.death_invoked && self.status.apply_poisoned(seconds, visual)
    }

    /// Petrifies for `seconds`, thawing any freeze. No-op while dying or
    /// already petrified.
    pub fn set_petrified(&mut self, seconds: f32, visual: bool) -> bool {
        !self.death_invoked && self.status.apply_petrified(seconds, visual)
    }

    pub fn clear_frozen(&mut self) {
        self.status.clear_frozen();
    }

    pub fn clear_poisoned(&mut self) {
        self.status.clear_poisoned();
    }

    pub fn clear_petrified(&mut self) {
        self.status.clear_petrified();
    }

    /// Clears every status timer.
    pub fn clear_all_status(&mut self) {
        self.status.clear_all();
    }
}
