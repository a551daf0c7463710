//! Timed incapacitating effects: frozen, poisoned and petrified.
//!
//! # Rules
//!
//! - The first application wins; an active timer is never refreshed.
//! - Petrifying clears frozen. While petrified, frozen and poisoned cannot be
//!   applied.
//! - Timers are seconds remaining and never go negative.
//! - Clearing is always explicit through the `clear_*` methods.
//!
//! Whether the character is dying is not known here; the character rejects
//! applications while dying before it reaches the tracker.

use crate::config::SimConfig;

/// One countdown timer plus the "show the effect" flag set by its caster.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusTimer {
    seconds: f32,
    visual: bool,
}

impl StatusTimer {
    pub fn seconds(&self) -> f32 {
        self.seconds
    }

    pub fn has_visual(&self) -> bool {
        self.visual
    }

    pub fn is_active(&self) -> bool {
        self.seconds > 0.0
    }

    fn start(&mut self, seconds: f32, visual: bool) {
        self.seconds = seconds.max(0.0);
        self.visual = visual;
    }

    fn tick(&mut self, elapsed: f32) {
        self.seconds = (self.seconds - elapsed).max(0.0);
        if self.seconds == 0.0 {
            self.visual = false;
        }
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Override shown by the death animation when a status was active at death.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeathVisual {
    Petrified,
    Poisoned,
    Frozen,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusTracker {
    frozen: StatusTimer,
    poisoned: StatusTimer,
    petrified: StatusTimer,
    /// Poison time accumulated since the last damage application.
    poison_elapsed: f32,
}

impl StatusTracker {
    pub fn frozen(&self) -> StatusTimer {
        self.frozen
    }

    pub fn poisoned(&self) -> StatusTimer {
        self.poisoned
    }

    pub fn petrified(&self) -> StatusTimer {
        self.petrified
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.is_active()
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned.is_active()
    }

    pub fn is_petrified(&self) -> bool {
        self.petrified.is_active()
    }

    /// Returns true if the effect was applied.
    pub fn apply_frozen(&mut self, seconds: f32, visual: bool) -> bool {
        if self.is_frozen() || self.is_petrified() || seconds <= 0.0 {
            return false;
        }
        self.frozen.start(seconds, visual);
        true
    }

    /// Returns true if the effect was applied.
    pub fn apply_poisoned(&mut self, seconds: f32, visual: bool) -> bool {
        if self.is_poisoned() || self.is_petrified() || seconds <= 0.0 {
            return false;
        }
        self.poisoned.start(seconds, visual);
        self.poison_elapsed = 0.0;
        true
    }

    /// Returns true if the effect was applied. Clears frozen.
    pub fn apply_petrified(&mut self, seconds: f32, visual: bool) -> bool {
        if self.is_petrified() || seconds <= 0.0 {
            return false;
        }
        self.petrified.start(seconds, visual);
        self.frozen.clear();
        true
    }

    pub fn clear_frozen(&mut self) {
        self.frozen.clear();
    }

    pub fn clear_poisoned(&mut self) {
        self.poisoned.clear();
        self.poison_elapsed = 0.0;
    }

    pub fn clear_petrified(&mut self) {
        self.petrified.clear();
    }

    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    pub fn tick_petrified(&mut self, elapsed: f32) {
        self.petrified.tick(elapsed);
    }

    pub fn tick_frozen(&mut self, elapsed: f32) {
        self.frozen.tick(elapsed);
    }

    /// Advances the poison timer and returns the life to remove this tick.
    ///
    /// Time only accumulates while the timer is still running after the
    /// decrement, and damage lands once the accumulation strictly exceeds
    /// the interval.
    pub fn tick_poison(&mut self, elapsed: f32, config: &SimConfig) -> i32 {
        if !self.is_poisoned() {
            return 0;
        }
        self.poisoned.tick(elapsed);
        if !self.is_poisoned() {
            self.poison_elapsed = 0.0;
            return 0;
        }
        self.poison_elapsed += elapsed;
        if self.poison_elapsed > config.poison_interval_seconds {
            self.poison_elapsed = 0.0;
            config.poison_damage
        } else {
            0
        }
    }

    /// Elapsed time as experienced by motion and animation.
    pub fn effective_elapsed(&self, elapsed: f32) -> f32 {
        if self.is_frozen() {
            elapsed * 0.5
        } else {
            elapsed
        }
    }

    /// Status override for the death animation, by priority.
    pub fn death_visual(&self) -> Option<DeathVisual> {
        if self.is_petrified() {
            Some(DeathVisual::Petrified)
        } else if self.is_poisoned() {
            Some(DeathVisual::Poisoned)
        } else if self.is_frozen() {
            Some(DeathVisual::Frozen)
        } else {
            None
        }
    }
}
