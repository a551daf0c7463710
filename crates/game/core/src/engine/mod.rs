//! The per-tick character update.
//!
//! [`Character::update`] advances one character by `elapsed` seconds:
//!
//! 1. Petrification freezes everything but its own timer
//! 2. Poison damage, the frozen half-speed clock, speed boost and scripts
//! 3. External displacement, or else the current action state
//! 4. The fighting idle timer
//! 5. Pending attack and interaction pursuits when resting
//! 6. Goal selection for characters that pick their own goals

mod external;
mod motion;

use crate::action::LifecycleError;
use crate::env::SimContext;
use crate::state::{ActionState, Character};

impl Character {
    /// Advances the character by `elapsed` simulated seconds.
    ///
    /// # Errors
    ///
    /// Propagates [`LifecycleError`] from a death triggered during the tick.
    pub fn update(&mut self, elapsed: f32, ctx: &mut SimContext<'_>) -> Result<(), LifecycleError> {
        if self.is_death || elapsed <= 0.0 {
            return Ok(());
        }
        if self.status.is_petrified() {
            self.status.tick_petrified(elapsed);
            return Ok(());
        }

        let poison = self.status.tick_poison(elapsed, ctx.env.config());
        if poison > 0 && !self.death_invoked {
            self.vitals.life.add(-poison);
            if self.vitals.life.is_empty() {
                self.death(ctx)?;
            }
        }

        let dt = self.status.effective_elapsed(elapsed);
        self.status.tick_frozen(elapsed);
        self.tick_speed_boost(elapsed);
        self.tick_scripts(elapsed, ctx);

        self.clock.advance(dt);
        if self.external.is_some() {
            self.update_external(dt, ctx);
        } else {
            self.update_state(dt, ctx);
        }
        if self.is_death || self.death_invoked {
            return Ok(());
        }

        self.update_fighting(elapsed, ctx);

        if self.state.is_standing() && self.perform_action_ok() {
            if self.pending_attack.is_some() {
                if let Err(error) = self.pursue_attack(ctx) {
                    tracing::trace!("{}: attack pursuit ended: {}", self.id, error);
                }
            } else if self.pending_interaction.is_some() {
                self.pursue_interaction(true, ctx);
            }
        }

        self.think(ctx);
        Ok(())
    }

    fn update_state(&mut self, dt: f32, ctx: &mut SimContext<'_>) {
        use ActionState::*;
        match self.state {
            Walk | FightWalk | Run | FightRun => self.update_walking(dt, ctx),
            Jump | FightJump => self.update_jump(dt, ctx),
            Stand | Stand1 | Hurt => {
                if self.clock.is_finished() {
                    self.settle(ctx);
                }
            }
            Attack | Attack1 | Attack2 => {
                if self.clock.is_finished() {
                    self.complete_attack(ctx);
                }
            }
            Magic => {
                if self.clock.is_finished() {
                    self.complete_magic(ctx);
                }
            }
            Death => {
                if self.clock.is_finished() {
                    self.finish_death(ctx);
                }
            }
            FightStand | Sit => {}
        }
    }

    fn update_fighting(&mut self, elapsed: f32, ctx: &mut SimContext<'_>) {
        if !self.fighting.active {
            return;
        }
        self.fighting.idle_seconds += elapsed;
        if self.fighting.idle_seconds > ctx.env.config().max_non_fight_seconds {
            tracing::debug!("{}: leaving fight stance", self.id);
            self.to_non_fighting_state(ctx.host);
        }
    }

    fn tick_speed_boost(&mut self, elapsed: f32) {
        if let Some(boost) = self.speed_boost.as_mut() {
            boost.remaining -= elapsed;
            if boost.remaining <= 0.0 {
                self.speed_boost = None;
            }
        }
    }

    /// Clears finished interaction scripts and re-runs the timer script.
    fn tick_scripts(&mut self, elapsed: f32, ctx: &mut SimContext<'_>) {
        if let Some(handle) = self.running_script {
            if ctx.host.is_script_end(handle) {
                self.running_script = None;
            }
        }
        if self.death_invoked {
            return;
        }
        let id = self.id;
        let Some(timer) = self.timer_script.as_mut() else {
            return;
        };
        if let Some(handle) = timer.running {
            if !ctx.host.is_script_end(handle) {
                return;
            }
            timer.running = None;
        }
        timer.elapsed += elapsed;
        if timer.elapsed >= timer.interval {
            timer.elapsed = 0.0;
            timer.running = Some(ctx.host.run_script(&timer.script, id));
        }
    }
}
