//! Movement modes other than plain path following.

use glam::Vec2;

use crate::env::Direction8;
use crate::state::CarrierId;

/// Straight-line flight toward a fixed pixel destination.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixedLine {
    pub start: Vec2,
    pub destination: Vec2,
    pub total: f32,
    pub moved: f32,
}

impl FixedLine {
    pub fn new(start: Vec2, destination: Vec2) -> Self {
        Self {
            start,
            destination,
            total: start.distance(destination),
            moved: 0.0,
        }
    }

    /// Unit vector toward the destination, zero once there.
    pub fn direction(&self) -> Vec2 {
        (self.destination - self.start).normalize_or_zero()
    }

    pub fn is_finished(&self) -> bool {
        self.moved >= self.total || self.direction() == Vec2::ZERO
    }
}

/// A scripted walk of a fixed number of tiles in one direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepMove {
    pub direction: Direction8,
    /// Tiles still to walk after the current one.
    pub remaining: u32,
}

/// Displacement imposed from outside, overriding path following.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExternalMotion {
    /// Bounce with a decaying velocity in pixels per second.
    Knockback { velocity: f32, direction: Vec2 },
    /// Glued to a magic sprite.
    Carried(CarrierId),
}

/// Timed walk-speed multiplier.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeedBoost {
    pub fold: f32,
    pub remaining: f32,
}
