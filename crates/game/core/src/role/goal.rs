//! Goal definition and selection logic.
//!
//! Goals are the intents an NPC or companion picks for itself whenever it is
//! idle. Selection is a pure function of the character and its directory
//! snapshot; applying a goal issues ordinary commands.

use crate::action::CommandError;
use crate::env::{
    ActorSnapshot, CharacterDirectory, SimContext, SimEnv, tile_at_distance, tile_vector,
    view_distance,
};
use crate::state::{Character, EntityId, Position};
use crate::traits::CharacterKind;

/// Life ratio under which an animal runs from danger.
const FLEE_LIFE_RATIO: f32 = 0.3;
/// A follower closer than this stays put.
const FOLLOW_STOP_DISTANCE: u32 = 2;
/// A follower farther than this runs instead of walking.
const FOLLOW_RUN_DISTANCE: u32 = 5;

/// A concrete goal that drives command selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Goal {
    /// Run away from a specific entity.
    FleeFrom { threat: EntityId },

    /// Attack a specific entity.
    Attack { target: EntityId },

    /// Stay close to a specific entity.
    Follow { target: EntityId, run: bool },

    /// Walk to the next patrol waypoint.
    Patrol { waypoint: Position },

    /// Do nothing.
    Idle,
}

/// Selects a goal based on the current situation.
pub struct GoalSelector;

impl GoalSelector {
    /// # Decision Process
    ///
    /// 1. **Survival**: a badly hurt animal flees from its attacker or the
    ///    nearest hostile in view
    /// 2. **Combat**: aggressive kinds attack the nearest hostile in view
    /// 3. **Follow**: stay near the follow target
    /// 4. **Patrol**: walk the decoded waypoint loop
    /// 5. **Default**: idle
    pub fn select(character: &Character, env: &SimEnv<'_>) -> Goal {
        let directory = env.directory();
        let nearest_hostile = Self::nearest_hostile(character, directory);

        tracing::debug!(
            "GoalSelector: entity={}, life={}/{}, hostile={:?}",
            character.id(),
            character.life(),
            character.life_max(),
            nearest_hostile.map(|actor| actor.id)
        );

        if character.kind() == CharacterKind::Animal
            && character.vitals().life.ratio() < FLEE_LIFE_RATIO
        {
            let threat = character
                .last_attacker()
                .and_then(|id| directory.actor(id))
                .filter(|actor| Self::in_view(character, actor))
                .or(nearest_hostile);
            if let Some(threat) = threat {
                tracing::debug!("  → Goal: FleeFrom {}", threat.id);
                return Goal::FleeFrom { threat: threat.id };
            }
        }

        if character.kind().is_aggressive() && character.role().can_perform_attack(character) {
            if let Some(target) = nearest_hostile {
                tracing::debug!("  → Goal: Attack {}", target.id);
                return Goal::Attack { target: target.id };
            }
        }

        if let Some(target) = character
            .follow_target()
            .and_then(|id| directory.actor(id))
            .filter(|actor| actor.is_targetable())
        {
            let distance = view_distance(character.tile(), target.tile);
            if distance > FOLLOW_STOP_DISTANCE {
                return Goal::Follow {
                    target: target.id,
                    run: distance > FOLLOW_RUN_DISTANCE,
                };
            }
            return Goal::Idle;
        }

        if let Some(waypoint) = character.patrol().and_then(|patrol| patrol.current()) {
            return Goal::Patrol { waypoint };
        }

        Goal::Idle
    }

    fn in_view(character: &Character, actor: &ActorSnapshot) -> bool {
        actor.is_targetable()
            && view_distance(character.tile(), actor.tile) <= character.vision_radius()
    }

    /// Nearest living hostile within vision. Ties go to the lowest id.
    fn nearest_hostile<'d>(
        character: &Character,
        directory: &'d dyn CharacterDirectory,
    ) -> Option<&'d ActorSnapshot> {
        directory
            .actors()
            .iter()
            .filter(|actor| actor.id != character.id())
            .filter(|actor| character.relation().is_hostile_to(actor.relation))
            .filter(|actor| Self::in_view(character, actor))
            .min_by_key(|actor| view_distance(character.tile(), actor.tile))
    }
}

impl Character {
    /// Whether the character is free to pick a new goal this tick.
    pub(crate) fn is_idle_for_goals(&self) -> bool {
        self.role.selects_goals()
            && self.state.is_standing()
            && self.perform_action_ok()
            && self.pending_attack.is_none()
            && self.pending_interaction.is_none()
            && self.running_script.is_none()
            && self.remote_control.is_none()
    }

    /// Issues the commands that serve `goal`.
    pub fn pursue_goal(&mut self, goal: Goal, ctx: &mut SimContext<'_>) -> Result<(), CommandError> {
        match goal {
            Goal::FleeFrom { threat } => {
                let threat_tile = ctx
                    .env
                    .directory()
                    .actor(threat)
                    .map(|actor| actor.tile)
                    .ok_or(CommandError::TargetGone)?;
                let away = tile_vector(threat_tile, self.tile());
                let refuge = tile_at_distance(self.tile(), away, self.vision_radius.max(1));
                match self.run_to(refuge, ctx) {
                    Err(CommandError::Disabled) => self.walk_to(refuge, ctx),
                    other => other,
                }
            }
            Goal::Attack { target } => self.attack_character(target, false, ctx),
            Goal::Follow { target, run } => {
                let tile = ctx
                    .env
                    .directory()
                    .actor(target)
                    .map(|actor| actor.tile)
                    .ok_or(CommandError::TargetGone)?;
                if run {
                    match self.run_to(tile, ctx) {
                        Err(CommandError::Disabled) => self.walk_to(tile, ctx),
                        other => other,
                    }
                } else {
                    self.walk_to(tile, ctx)
                }
            }
            Goal::Patrol { waypoint } => {
                let mut waypoint = waypoint;
                if self.tile() == waypoint {
                    if let Some(patrol) = self.patrol.as_mut() {
                        patrol.advance();
                        waypoint = patrol.current().unwrap_or(waypoint);
                    }
                }
                self.walk_to(waypoint, ctx)
            }
            Goal::Idle => Ok(()),
        }
    }

    /// Selects and pursues a goal if the character is idle. Failures are
    /// logged and dropped; an idle NPC simply tries again next tick.
    pub(crate) fn think(&mut self, ctx: &mut SimContext<'_>) {
        if !self.is_idle_for_goals() {
            return;
        }
        let goal = GoalSelector::select(self, &ctx.env);
        if let Err(error) = self.pursue_goal(goal, ctx) {
            tracing::trace!("{} could not pursue {:?}: {}", self.id, goal, error);
        }
    }
}
