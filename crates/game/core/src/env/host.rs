//! Outward side effects of a character update.
//!
//! Abilities, scripts, sounds and death bookkeeping live outside the core.
//! A character reaches them only through [`SimHost`], which the owning scene
//! implements. Calls are fire-and-forget; the core never waits on a result
//! except for the "has this script ended" query.

use std::collections::BTreeSet;

use glam::Vec2;

use crate::combat::AbilityRef;
use crate::env::{Direction8, InteractTarget};
use crate::state::{ActionState, EffectId, EntityId};

/// Name of a script file understood by the host's interpreter.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScriptRef(pub String);

/// Name of a sound effect understood by the host's mixer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SoundRef(pub String);

/// Object definition dropped where a character dies.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorpseRef(pub String);

/// A running script instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScriptHandle(pub u64);

/// A playing looped sound, owned by the character that started it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SoundHandle(pub u64);

/// Notifications a character sends to its owner.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HostEvent {
    /// An ability was released. The ability system takes it from here.
    AbilityUsed {
        caster: EntityId,
        ability: AbilityRef,
        level: u32,
        origin: Vec2,
        destination: Vec2,
        target: Option<EntityId>,
    },
    /// An attack animation finished.
    AttackCompleted {
        attacker: EntityId,
        state: ActionState,
        destination: Vec2,
        /// Set for melee swings, which have no ability to carry the hit.
        melee_target: Option<EntityId>,
    },
    /// The initiator reached `target` and wants its interaction entry point run.
    InteractionRequested {
        initiator: EntityId,
        target: InteractTarget,
    },
    /// The character left the set of active characters.
    DeathStarted { actor: EntityId },
    /// The death sequence completed; the character no longer simulates.
    Died {
        actor: EntityId,
        position: Vec2,
        direction: Direction8,
    },
    CorpseSpawned {
        actor: EntityId,
        corpse: CorpseRef,
        position: Vec2,
        direction: Direction8,
    },
    /// A summoned character died; its summoner's effect must go away.
    SummonEffectDestroyed {
        actor: EntityId,
        summoner: EntityId,
        effect: EffectId,
    },
    /// Remote control over `actor` ended; `controller` gets its input back.
    ControlReleased {
        actor: EntityId,
        controller: EntityId,
    },
}

/// Side-effect sink implemented by the owner of the characters.
pub trait SimHost {
    fn emit(&mut self, event: HostEvent);

    /// Starts `script` with `context` as its current character.
    fn run_script(&mut self, script: &ScriptRef, context: EntityId) -> ScriptHandle;

    fn is_script_end(&self, handle: ScriptHandle) -> bool;

    fn play_sound_once(&mut self, sound: &SoundRef);

    fn play_sound_loop(&mut self, sound: &SoundRef) -> SoundHandle;

    fn stop_sound(&mut self, handle: SoundHandle);
}

/// Host double that records everything it is asked to do.
///
/// Scripts keep running until [`RecordingHost::finish_script`] is called.
#[derive(Clone, Debug, Default)]
pub struct RecordingHost {
    pub events: Vec<HostEvent>,
    pub scripts: Vec<(ScriptRef, EntityId, ScriptHandle)>,
    pub sounds_once: Vec<SoundRef>,
    pub loops_started: Vec<(SoundRef, SoundHandle)>,
    pub loops_stopped: Vec<SoundHandle>,
    running: BTreeSet<ScriptHandle>,
    next_handle: u64,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish_script(&mut self, handle: ScriptHandle) {
        self.running.remove(&handle);
    }

    pub fn finish_all_scripts(&mut self) {
        self.running.clear();
    }

    /// Loop handles started and not yet stopped.
    pub fn playing_loops(&self) -> Vec<SoundHandle> {
        self.loops_started
            .iter()
            .map(|(_, handle)| *handle)
            .filter(|handle| !self.loops_stopped.contains(handle))
            .collect()
    }

    pub fn ability_uses(&self) -> usize {
        self.count(|event| matches!(event, HostEvent::AbilityUsed { .. }))
    }

    pub fn count(&self, predicate: impl Fn(&HostEvent) -> bool) -> usize {
        self.events.iter().filter(|event| predicate(event)).count()
    }

    pub fn take_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    fn allocate(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl SimHost for RecordingHost {
    fn emit(&mut self, event: HostEvent) {
        self.events.push(event);
    }

    fn run_script(&mut self, script: &ScriptRef, context: EntityId) -> ScriptHandle {
        let handle = ScriptHandle(self.allocate());
        self.running.insert(handle);
        self.scripts.push((script.clone(), context, handle));
        handle
    }

    fn is_script_end(&self, handle: ScriptHandle) -> bool {
        !self.running.contains(&handle)
    }

    fn play_sound_once(&mut self, sound: &SoundRef) {
        self.sounds_once.push(sound.clone());
    }

    fn play_sound_loop(&mut self, sound: &SoundRef) -> SoundHandle {
        let handle = SoundHandle(self.allocate());
        self.loops_started.push((sound.clone(), handle));
        handle
    }

    fn stop_sound(&mut self, handle: SoundHandle) {
        self.loops_stopped.push(handle);
    }
}
