//! Attack pursuit, attack and magic states.
//!
//! A commanded attack is remembered as a [`PendingAttack`] and re-evaluated
//! whenever the character stands or reaches a waypoint: fire from the
//! use-distance, approach when too far, back off when too close.

use glam::Vec2;

use super::CommandError;
use super::movement::walkable;
use crate::combat::{
    AbilityRef, AbilitySlot, AttackPlan, closest_use_distance, nearest_viable,
    pick_with_use_distance, plan_attack,
};
use crate::env::{
    CharacterDirectory, HostEvent, RollContext, SimContext, has_line_of_sight, tile_at_distance,
    tile_vector, to_pixel, view_distance,
};
use crate::state::{
    ActionState, AttackRelease, AttackTarget, Character, DisabledActions, EntityId, MagicCast,
    PendingAttack, Position,
};

/// Resolved target of a pursuit for this tick.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AimPoint {
    pub tile: Position,
    pub character: Option<EntityId>,
}

impl Character {
    fn check_attack_allowed(&self) -> Result<(), CommandError> {
        self.ensure_can_act()?;
        if self.disabled.contains(DisabledActions::FIGHT) {
            return Err(CommandError::Disabled);
        }
        if !self.role.can_perform_attack(self) {
            return Err(CommandError::RoleRefused);
        }
        Ok(())
    }

    /// Attacks whatever stands on `tile`, approaching or backing off first.
    pub fn attack_at(
        &mut self,
        tile: Position,
        run: bool,
        ctx: &mut SimContext<'_>,
    ) -> Result<(), CommandError> {
        self.check_attack_allowed()?;
        self.start_pursuit(AttackTarget::Tile(tile), run, ctx)
    }

    /// Attacks another character, following it as it moves.
    pub fn attack_character(
        &mut self,
        target: EntityId,
        run: bool,
        ctx: &mut SimContext<'_>,
    ) -> Result<(), CommandError> {
        self.check_attack_allowed()?;
        let targetable = ctx
            .env
            .directory()
            .actor(target)
            .is_some_and(|actor| actor.is_targetable());
        if target == self.id || !targetable {
            return Err(CommandError::TargetGone);
        }
        self.start_pursuit(AttackTarget::Character(target), run, ctx)
    }

    fn start_pursuit(
        &mut self,
        target: AttackTarget,
        run: bool,
        ctx: &mut SimContext<'_>,
    ) -> Result<(), CommandError> {
        let already_moving = (self.path.is_some() || self.fixed_line.is_some())
            && (self.state.is_walking() || self.state.is_running());
        if !already_moving {
            self.state_initialize(true);
        }
        self.pending_interaction = None;
        self.pending_attack = Some(PendingAttack { target, run });
        self.pursue_attack(ctx)
    }

    /// Where the pending attack points this tick. Drops the pursuit when its
    /// character target is gone.
    pub(crate) fn attack_aim(&mut self, directory: &dyn CharacterDirectory) -> Option<AimPoint> {
        let pending = self.pending_attack?;
        match pending.target {
            AttackTarget::Tile(tile) => Some(AimPoint {
                tile,
                character: None,
            }),
            AttackTarget::Character(id) => {
                match directory.actor(id).filter(|actor| actor.is_targetable()) {
                    Some(actor) => Some(AimPoint {
                        tile: actor.tile,
                        character: Some(id),
                    }),
                    None => {
                        tracing::debug!("{}: attack target {} is gone", self.id, id);
                        self.pending_attack = None;
                        None
                    }
                }
            }
        }
    }

    /// Use-distance the pursuit aims for from `distance`. Characters without
    /// abilities strike from their attack radius.
    pub(crate) fn preferred_use_distance(&self, distance: u32) -> u32 {
        closest_use_distance(self.abilities.slots(), distance)
            .unwrap_or_else(|| self.attack_radius.max(1))
    }

    /// Whether the pursuit can fire from the current tile.
    pub(crate) fn attack_in_position(&self, aim: AimPoint, ctx: &SimContext<'_>) -> bool {
        let distance = view_distance(self.tile(), aim.tile);
        let use_distance = self.preferred_use_distance(distance);
        distance == use_distance && self.sees(aim.tile, use_distance, ctx)
    }

    fn sees(&self, tile: Position, use_distance: u32, ctx: &SimContext<'_>) -> bool {
        has_line_of_sight(
            ctx.env.map(),
            self.tile(),
            tile,
            self.vision_radius.max(use_distance),
        )
    }

    /// Evaluates the pending attack: fire, approach or retreat.
    pub(crate) fn pursue_attack(&mut self, ctx: &mut SimContext<'_>) -> Result<(), CommandError> {
        let Some(pending) = self.pending_attack else {
            return Ok(());
        };
        let Some(aim) = self.attack_aim(ctx.env.directory()) else {
            return Err(CommandError::TargetGone);
        };

        let distance = view_distance(self.tile(), aim.tile);
        let use_distance = self.preferred_use_distance(distance);
        let line_of_sight = self.sees(aim.tile, use_distance, ctx);

        match plan_attack(distance, use_distance, line_of_sight) {
            AttackPlan::Fire => {
                let slot = self.choose_slot(use_distance, ctx);
                self.enter_attack(aim, slot, ctx);
                Ok(())
            }
            AttackPlan::Approach => {
                let result = self.travel_to(aim.tile, pending.run, ctx);
                if result.is_err() {
                    self.pending_attack = None;
                }
                result
            }
            AttackPlan::Retreat { shortfall } => {
                let away = tile_vector(aim.tile, self.tile());
                let refuge = tile_at_distance(self.tile(), away, shortfall);
                if walkable(ctx.env.map(), refuge)
                    && self.travel_to(refuge, pending.run, ctx).is_ok()
                {
                    return Ok(());
                }
                tracing::trace!("{}: retreat to {} blocked, firing", self.id, refuge);
                let slot = nearest_viable(self.abilities.slots(), distance).cloned();
                self.enter_attack(aim, slot, ctx);
                Ok(())
            }
        }
    }

    /// Picks an ability with exactly `use_distance`, at random among ties.
    fn choose_slot(&mut self, use_distance: u32, ctx: &SimContext<'_>) -> Option<AbilitySlot> {
        let matching = self
            .abilities
            .slots()
            .iter()
            .filter(|slot| slot.use_distance == use_distance)
            .count() as u32;
        let pick = if matching > 1 {
            self.roll(&ctx.env, RollContext::AbilityChoice, matching)
        } else {
            0
        };
        pick_with_use_distance(self.abilities.slots(), use_distance, |_| pick).cloned()
    }

    /// Attacks toward `destination` at once, using the ability best suited to
    /// the distance.
    pub fn attacking(
        &mut self,
        destination: Position,
        ctx: &mut SimContext<'_>,
    ) -> Result<(), CommandError> {
        self.check_attack_allowed()?;
        let distance = view_distance(self.tile(), destination);
        let use_distance = self.preferred_use_distance(distance);
        let slot = self.choose_slot(use_distance, ctx);
        let aim = AimPoint {
            tile: destination,
            character: None,
        };
        self.enter_attack(aim, slot, ctx);
        Ok(())
    }

    /// Enters one of the attack states and arms the shot released when the
    /// animation completes.
    fn enter_attack(&mut self, aim: AimPoint, slot: Option<AbilitySlot>, ctx: &mut SimContext<'_>) {
        self.state_initialize(false);
        let destination = to_pixel(aim.tile);
        self.face_point(destination);
        self.engage();
        self.attack_release = Some(AttackRelease {
            ability: slot.map(|slot| (slot.ability, slot.level)),
            destination,
            target: aim.character,
        });

        let variant = self.attack_variant(ctx);
        tracing::debug!("{}: {} toward {}", self.id, variant, aim.tile);
        if self.set_state(variant, ctx.host) {
            self.play_once();
        } else {
            self.complete_attack(ctx);
        }
    }

    /// `Attack1` or `Attack2` one time in three each when defined.
    fn attack_variant(&mut self, ctx: &SimContext<'_>) -> ActionState {
        let roll = self.roll(&ctx.env, RollContext::AttackVariant, 3);
        let candidate = match roll {
            1 => ActionState::Attack1,
            2 => ActionState::Attack2,
            _ => ActionState::Attack,
        };
        if self.resources.contains(candidate) {
            candidate
        } else {
            ActionState::Attack
        }
    }

    /// Releases the armed shot, runs the role hook and comes to rest.
    pub(crate) fn complete_attack(&mut self, ctx: &mut SimContext<'_>) {
        self.play_state_sound(ctx);
        if let Some(release) = self.attack_release.take() {
            let melee_target = match &release.ability {
                Some((ability, level)) => {
                    ctx.host.emit(HostEvent::AbilityUsed {
                        caster: self.id,
                        ability: ability.clone(),
                        level: *level,
                        origin: self.position,
                        destination: release.destination,
                        target: release.target,
                    });
                    None
                }
                None => release.target.or_else(|| {
                    ctx.env
                        .directory()
                        .actors()
                        .iter()
                        .find(|actor| {
                            actor.id != self.id
                                && actor.is_targetable()
                                && actor.position.distance(release.destination) < 1.0
                        })
                        .map(|actor| actor.id)
                }),
            };
            ctx.host.emit(HostEvent::AttackCompleted {
                attacker: self.id,
                state: self.state,
                destination: release.destination,
                melee_target,
            });
        }
        let role = self.role;
        role.on_attacking(self, ctx.env.config());
        self.settle(ctx);
    }

    /// Casts `ability` toward `destination` once the magic animation ends.
    pub fn use_magic(
        &mut self,
        ability: AbilityRef,
        destination: Vec2,
        target: Option<EntityId>,
        ctx: &mut SimContext<'_>,
    ) -> Result<(), CommandError> {
        self.ensure_can_act()?;
        if !self.resources.contains(ActionState::Magic) {
            return Err(CommandError::MissingAnimation);
        }
        let role = self.role;
        if !role.can_use_magic(self, &ability) {
            return Err(CommandError::RoleRefused);
        }
        role.on_magic_cast(self, &ability);

        self.state_initialize(true);
        self.face_point(destination);
        self.engage();
        let level = ability.level_for(self.combat.attack_level);
        tracing::debug!("{}: casting {} level {}", self.id, ability.name, level);
        self.magic_cast = Some(MagicCast {
            ability,
            level,
            destination,
            target,
        });
        self.set_state(ActionState::Magic, ctx.host);
        self.play_once();
        Ok(())
    }

    pub(crate) fn complete_magic(&mut self, ctx: &mut SimContext<'_>) {
        self.play_state_sound(ctx);
        if let Some(cast) = self.magic_cast.take() {
            ctx.host.emit(HostEvent::AbilityUsed {
                caster: self.id,
                ability: cast.ability,
                level: cast.level,
                origin: self.position,
                destination: cast.destination,
                target: cast.target,
            });
        }
        self.settle(ctx);
    }

    /// Plays the current state's sound once, as attack and magic do on completion.
    fn play_state_sound(&self, ctx: &mut SimContext<'_>) {
        if let Some(sound) = self.resources.get(self.state).and_then(|asset| asset.sound.as_ref()) {
            ctx.host.play_sound_once(sound);
        }
    }
}
