//! Vital resources: life, thew (stamina) and mana.
//!
//! Every mutation clamps. `current` always lies in `[0, maximum]` and a
//! lowered maximum pulls `current` down with it.

/// Enum naming an individual vital, used by role hooks and content files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceKind {
    Life,
    Thew,
    Mana,
}

/// A clamped current/maximum pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    current: i32,
    maximum: i32,
}

impl ResourceMeter {
    /// Negative maxima become zero; `current` is clamped into range.
    pub fn new(current: i32, maximum: i32) -> Self {
        let maximum = maximum.max(0);
        Self {
            current: current.clamp(0, maximum),
            maximum,
        }
    }

    /// A full meter.
    pub fn full(maximum: i32) -> Self {
        Self::new(maximum, maximum)
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn maximum(&self) -> i32 {
        self.maximum
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    pub fn set_current(&mut self, value: i32) {
        self.current = value.clamp(0, self.maximum);
    }

    /// Sets the maximum, clamping `current` down if it now exceeds it.
    pub fn set_maximum(&mut self, value: i32) {
        self.maximum = value.max(0);
        self.current = self.current.min(self.maximum);
    }

    /// Adds `delta` (which may be negative) with saturation.
    pub fn add(&mut self, delta: i32) {
        self.set_current(self.current.saturating_add(delta));
    }

    pub fn refill(&mut self) {
        self.current = self.maximum;
    }

    /// `current / maximum`, or zero for an empty pool.
    pub fn ratio(&self) -> f32 {
        if self.maximum == 0 {
            0.0
        } else {
            self.current as f32 / self.maximum as f32
        }
    }
}

/// The three vitals of a character.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vitals {
    pub life: ResourceMeter,
    pub thew: ResourceMeter,
    pub mana: ResourceMeter,
}

impl Vitals {
    pub fn get(&self, kind: ResourceKind) -> &ResourceMeter {
        match kind {
            ResourceKind::Life => &self.life,
            ResourceKind::Thew => &self.thew,
            ResourceKind::Mana => &self.mana,
        }
    }

    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut ResourceMeter {
        match kind {
            ResourceKind::Life => &mut self.life,
            ResourceKind::Thew => &mut self.thew,
            ResourceKind::Mana => &mut self.mana,
        }
    }

    pub fn refill(&mut self) {
        self.life.refill();
        self.thew.refill();
        self.mana.refill();
    }
}
