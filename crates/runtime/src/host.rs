//! The scene's implementation of the core side-effect sink.
//!
//! There is no script interpreter or mixer here. Scripts are recorded and
//! count as running for a fixed amount of simulated time; sounds are recorded
//! and looped sounds are tracked by handle until stopped.

use std::collections::BTreeMap;

use actor_core::EntityId;
use actor_core::env::{HostEvent, ScriptHandle, ScriptRef, SimHost, SoundHandle, SoundRef};

/// A script start as seen by the host.
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptRecord {
    pub handle: ScriptHandle,
    pub script: ScriptRef,
    /// Character the script runs on behalf of.
    pub context: EntityId,
}

#[derive(Clone, Debug)]
struct RunningScript {
    remaining: f32,
}

#[derive(Clone, Debug, Default)]
pub struct SceneHost {
    pending: Vec<HostEvent>,
    running: BTreeMap<ScriptHandle, RunningScript>,
    script_log: Vec<ScriptRecord>,
    sounds_played: Vec<SoundRef>,
    loops: BTreeMap<SoundHandle, SoundRef>,
    script_seconds: f32,
    next_handle: u64,
}

impl SceneHost {
    /// `script_seconds` is how long every script keeps running. Zero ends
    /// scripts at the next scene tick.
    pub fn new(script_seconds: f32) -> Self {
        Self {
            script_seconds: script_seconds.max(0.0),
            ..Self::default()
        }
    }

    pub fn set_script_seconds(&mut self, seconds: f32) {
        self.script_seconds = seconds.max(0.0);
    }

    /// Counts down running scripts and ends those that ran out.
    pub(crate) fn advance_scripts(&mut self, elapsed: f32) {
        self.running.retain(|handle, script| {
            script.remaining -= elapsed;
            let keep = script.remaining > 0.0;
            if !keep {
                tracing::trace!("script {:?} ended", handle);
            }
            keep
        });
    }

    pub fn finish_script(&mut self, handle: ScriptHandle) {
        self.running.remove(&handle);
    }

    pub fn running_scripts(&self) -> usize {
        self.running.len()
    }

    pub fn script_log(&self) -> &[ScriptRecord] {
        &self.script_log
    }

    pub fn sounds_played(&self) -> &[SoundRef] {
        &self.sounds_played
    }

    pub fn playing_loops(&self) -> impl Iterator<Item = &SoundRef> {
        self.loops.values()
    }

    pub(crate) fn has_pending_events(&self) -> bool {
        !self.pending.is_empty()
    }

    pub(crate) fn drain_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.pending)
    }

    fn allocate(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl SimHost for SceneHost {
    fn emit(&mut self, event: HostEvent) {
        self.pending.push(event);
    }

    fn run_script(&mut self, script: &ScriptRef, context: EntityId) -> ScriptHandle {
        let handle = ScriptHandle(self.allocate());
        tracing::debug!("running script {} for {}", script.0, context);
        self.running.insert(
            handle,
            RunningScript {
                remaining: self.script_seconds,
            },
        );
        self.script_log.push(ScriptRecord {
            handle,
            script: script.clone(),
            context,
        });
        handle
    }

    fn is_script_end(&self, handle: ScriptHandle) -> bool {
        !self.running.contains_key(&handle)
    }

    fn play_sound_once(&mut self, sound: &SoundRef) {
        self.sounds_played.push(sound.clone());
    }

    fn play_sound_loop(&mut self, sound: &SoundRef) -> SoundHandle {
        let handle = SoundHandle(self.allocate());
        self.loops.insert(handle, sound.clone());
        handle
    }

    fn stop_sound(&mut self, handle: SoundHandle) {
        self.loops.remove(&handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripts_run_for_the_configured_time() {
        let mut host = SceneHost::new(0.5);
        let handle = host.run_script(&ScriptRef("talk.txt".into()), EntityId(2));
        assert!(!host.is_script_end(handle));
        host.advance_scripts(0.25);
        assert!(!host.is_script_end(handle));
        host.advance_scripts(0.25);
        assert!(host.is_script_end(handle));
        assert_eq!(host.script_log().len(), 1);
        assert_eq!(host.script_log()[0].context, EntityId(2));
    }

    #[test]
    fn loops_are_tracked_until_stopped() {
        let mut host = SceneHost::new(0.0);
        let step = host.play_sound_loop(&SoundRef("step.wav".into()));
        let wind = host.play_sound_loop(&SoundRef("wind.wav".into()));
        assert_ne!(step, wind);
        host.stop_sound(step);
        let playing: Vec<_> = host.playing_loops().map(|sound| sound.0.as_str()).collect();
        assert_eq!(playing, vec!["wind.wav"]);
    }
}
