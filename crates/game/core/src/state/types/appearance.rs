//! Per-state animation and sound resources, and the play-once clock.

use std::collections::BTreeMap;

use super::action_state::ActionState;
use crate::env::SoundRef;

/// Animation and sound bound to one action state.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StateAsset {
    /// Sprite sheet name. Rendering is not the core's concern.
    pub image: Option<String>,
    /// Frames per direction.
    pub frames: u32,
    /// Seconds each frame is shown.
    pub frame_interval: f32,
    pub sound: Option<SoundRef>,
}

impl StateAsset {
    pub fn new(frames: u32, frame_interval: f32) -> Self {
        Self {
            image: None,
            frames,
            frame_interval,
            sound: None,
        }
    }

    #[must_use]
    pub fn with_sound(mut self, sound: impl Into<String>) -> Self {
        self.sound = Some(SoundRef(sound.into()));
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Time one directional pass of the animation takes.
    pub fn duration(&self) -> f32 {
        self.frames as f32 * self.frame_interval
    }
}

/// The state table of a character. A state without an entry cannot be entered.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StateResources {
    assets: BTreeMap<ActionState, StateAsset>,
}

impl StateResources {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, state: ActionState, asset: StateAsset) -> Self {
        self.insert(state, asset);
        self
    }

    pub fn insert(&mut self, state: ActionState, asset: StateAsset) {
        self.assets.insert(state, asset);
    }

    pub fn get(&self, state: ActionState) -> Option<&StateAsset> {
        self.assets.get(&state)
    }

    pub fn contains(&self, state: ActionState) -> bool {
        self.assets.contains_key(&state)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

/// Countdown for the current "play once" animation.
///
/// An idle clock counts as finished.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationClock {
    remaining: f32,
}

impl AnimationClock {
    pub fn play_once(&mut self, duration: f32) {
        self.remaining = duration.max(0.0);
    }

    pub fn stop(&mut self) {
        self.remaining = 0.0;
    }

    pub fn advance(&mut self, elapsed: f32) {
        self.remaining = (self.remaining - elapsed).max(0.0);
    }

    pub fn is_finished(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}
