//! The action state machine: guards, state entry and coming to rest.

use super::CommandError;
use crate::env::{RollContext, SimContext, SimHost};
use crate::state::{ActionState, Character};

impl Character {
    /// Whether new commands are accepted.
    ///
    /// False while a locking state plays out (jump, attack, magic, hurt,
    /// death), while petrified, transported, carried or knocked back.
    pub fn perform_action_ok(&self) -> bool {
        !self.state.is_locking()
            && !self.death_invoked
            && !self.status.is_petrified()
            && !self.in_transport
            && self.external.is_none()
    }

    /// Entry check shared by every command.
    pub(crate) fn ensure_can_act(&self) -> Result<(), CommandError> {
        if self.death_invoked {
            return Err(CommandError::Dying);
        }
        if !self.perform_action_ok() {
            tracing::trace!("{} rejected command in {}", self.id, self.state);
            return Err(CommandError::ActionLocked);
        }
        Ok(())
    }

    /// Resets everything a new commanded state must not inherit.
    pub(crate) fn state_initialize(&mut self, end_interaction: bool) {
        self.clock.stop();
        self.clear_motion();
        self.pending_attack = None;
        self.pending_interaction = None;
        self.attack_release = None;
        self.magic_cast = None;
        if end_interaction {
            self.interacting_with = None;
        }
    }

    pub(crate) fn clear_motion(&mut self) {
        self.destination = None;
        self.path = None;
        self.fixed_line = None;
        self.step_move = None;
        self.stand_at_next_step = false;
    }

    /// Switches to `state` if it differs and has a resource.
    ///
    /// Stops the previous looping sound. Walk and run start a new loop; attack
    /// and magic keep their sound for completion; everything else plays its
    /// sound once now. Returns whether the state changed.
    pub(crate) fn set_state(&mut self, state: ActionState, host: &mut dyn SimHost) -> bool {
        if self.state == state || !self.resources.contains(state) {
            return false;
        }
        self.switch_state(state, host);
        true
    }

    fn switch_state(&mut self, state: ActionState, host: &mut dyn SimHost) {
        if let Some(handle) = self.loop_sound.take() {
            host.stop_sound(handle);
        }
        let sound = self
            .resources
            .get(state)
            .and_then(|asset| asset.sound.clone());
        if let Some(sound) = sound {
            if state.loops_sound() {
                self.loop_sound = Some(host.play_sound_loop(&sound));
            } else if !state.sounds_on_completion() {
                host.play_sound_once(&sound);
            }
        }
        tracing::debug!("{}: {} -> {}", self.id, self.state, state);
        self.state = state;
    }

    /// Starts the current state's animation as a single pass.
    pub(crate) fn play_once(&mut self) {
        let duration = self
            .resources
            .get(self.state)
            .map(|asset| asset.duration())
            .unwrap_or(0.0);
        self.clock.play_once(duration);
    }

    /// Stops whatever the character is doing and stands.
    pub fn standing(&mut self, ctx: &mut SimContext<'_>) {
        self.state_initialize(false);
        self.settle(ctx);
    }

    /// Comes to rest without dropping pending attack or interaction pursuits.
    ///
    /// Fighting characters use `FightStand` when they have it. Otherwise one
    /// rest in `stand_variant_odds` picks `Stand1` (never twice in a row).
    /// A character without any stand animation still ends up in `Stand`.
    pub(crate) fn settle(&mut self, ctx: &mut SimContext<'_>) {
        self.clock.stop();
        self.clear_motion();

        if self.fighting.active && self.resources.contains(ActionState::FightStand) {
            self.set_state(ActionState::FightStand, ctx.host);
            return;
        }

        let odds = ctx.env.config().stand_variant_odds;
        let variant = self.resources.contains(ActionState::Stand1)
            && self.state != ActionState::Stand1
            && self.roll(&ctx.env, RollContext::StandVariant, odds) == 1;
        let next = if variant {
            ActionState::Stand1
        } else {
            ActionState::Stand
        };
        if !self.set_state(next, ctx.host) && !self.state.is_standing() {
            self.switch_state(ActionState::Stand, ctx.host);
        }
        self.play_once();
    }

    /// Marks the character as in combat and restarts the idle timer.
    pub(crate) fn engage(&mut self) {
        self.fighting.engage();
    }

    /// Drops the fighting flag and swaps fight-prefixed states for their
    /// peaceful counterparts.
    pub fn to_non_fighting_state(&mut self, host: &mut dyn SimHost) {
        self.fighting.active = false;
        self.fighting.idle_seconds = 0.0;
        if self.state.is_walking() {
            self.set_state(ActionState::Walk, host);
        } else if self.state.is_running() {
            self.set_state(ActionState::Run, host);
        } else if self.state == ActionState::FightStand {
            self.set_state(ActionState::Stand, host);
        }
    }

    /// Fight variant of `state` when fighting and available, else `state`.
    pub(crate) fn combat_variant(&self, state: ActionState) -> ActionState {
        match state.fighting_variant() {
            Some(fight) if self.fighting.active && self.resources.contains(fight) => fight,
            _ => state,
        }
    }
}
