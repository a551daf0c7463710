//! Damage, hurting, experience and the death sequence.

use glam::Vec2;

use super::LifecycleError;
use crate::config::SimConfig;
use crate::env::{HostEvent, SimContext};
use crate::state::{ActionState, Character, DeathAim, EntityId, SpeedBoost};

impl Character {
    /// Lowers life by `amount`. Dies at zero, otherwise plays the hurt animation.
    pub fn take_damage(
        &mut self,
        amount: i32,
        attacker: Option<EntityId>,
        ctx: &mut SimContext<'_>,
    ) -> Result<(), LifecycleError> {
        if self.death_invoked {
            return Ok(());
        }
        if attacker.is_some() {
            self.last_attacker = attacker;
        }
        self.vitals.life.add(-amount.max(0));
        tracing::debug!("{} takes {} damage, life {}", self.id, amount, self.life());
        if self.vitals.life.is_empty() {
            self.death(ctx)
        } else {
            self.hurting(ctx);
            Ok(())
        }
    }

    /// Interrupts the current action with the hurt animation.
    pub fn hurting(&mut self, ctx: &mut SimContext<'_>) {
        if self.death_invoked
            || self.status.is_petrified()
            || !self.resources.contains(ActionState::Hurt)
        {
            return;
        }
        self.state_initialize(false);
        self.set_state(ActionState::Hurt, ctx.host);
        self.play_once();
    }

    /// Adds experience and applies every level it reaches.
    pub fn add_exp(&mut self, amount: i32) {
        self.progression.exp = self.progression.exp.saturating_add(amount);
        while self.progression.can_level_up() {
            let next = self.progression.level + 1;
            let Some(detail) = self
                .level_table
                .as_ref()
                .and_then(|table| table.get(next))
                .copied()
            else {
                break;
            };
            self.progression.level = next;
            self.progression.level_up_exp = detail.level_up_exp;
            self.vitals.life.set_maximum(detail.life_max);
            self.vitals.thew.set_maximum(detail.thew_max);
            self.vitals.mana.set_maximum(detail.mana_max);
            self.vitals.refill();
            self.combat.attack = detail.attack;
            self.combat.defend = detail.defend;
            self.combat.evade = detail.evade;
            self.abilities.rederive_levels(self.combat.attack_level);
            tracing::debug!("{} reached level {}", self.id, next);
        }
    }

    /// Multiplies walk speed by `fold` for `seconds`.
    pub fn boost_speed(&mut self, fold: f32, seconds: f32) {
        if self.death_invoked || fold <= 0.0 || seconds <= 0.0 {
            return;
        }
        self.speed_boost = Some(SpeedBoost {
            fold,
            remaining: seconds,
        });
    }

    /// Starts the death sequence. Calling it again does nothing.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::ControllerMissing`] when the character was remotely
    /// controlled but nobody holds the controls.
    pub fn death(&mut self, ctx: &mut SimContext<'_>) -> Result<(), LifecycleError> {
        if self.death_invoked {
            return Ok(());
        }
        self.death_invoked = true;
        tracing::debug!("{}: death invoked", self.id);
        ctx.host.emit(HostEvent::DeathStarted { actor: self.id });
        self.speed_boost = None;

        if let Some(script) = self.death_script.clone() {
            ctx.host.run_script(&script, self.id);
        }

        if let Some(ability) = self.death_ability.clone() {
            let aim = self.death_aim_vector(ctx);
            let level = ability.level_for(self.combat.attack_level);
            ctx.host.emit(HostEvent::AbilityUsed {
                caster: self.id,
                ability,
                level,
                origin: self.position,
                destination: self.position + aim * SimConfig::TILE_SIZE,
                target: None,
            });
        }

        if let Some(control) = self.remote_control.take() {
            let Some(controller) = control.controller else {
                tracing::error!("{}: remote control ended without a controller", self.id);
                return Err(LifecycleError::controller_missing(self.id));
            };
            ctx.host.emit(HostEvent::ControlReleased {
                actor: self.id,
                controller,
            });
        }

        self.state_initialize(true);
        self.external = None;

        if let Some(summoner) = self.summoner {
            self.is_death = true;
            self.stop_loop_sound(ctx);
            ctx.host.emit(HostEvent::SummonEffectDestroyed {
                actor: self.id,
                summoner: summoner.owner,
                effect: summoner.effect,
            });
            ctx.host.emit(self.died_event());
            return Ok(());
        }

        if self.resources.contains(ActionState::Death) {
            self.death_visual = self.status.death_visual();
            self.set_state(ActionState::Death, ctx.host);
            self.play_once();
        } else {
            self.finish_death(ctx);
        }
        Ok(())
    }

    /// Unit vector the on-death ability is aimed along.
    fn death_aim_vector(&self, ctx: &SimContext<'_>) -> Vec2 {
        let facing = self.direction.unit();
        let aimed = match self.death_aim {
            DeathAim::Facing => None,
            DeathAim::ToLastAttacker => self
                .last_attacker
                .and_then(|id| ctx.env.directory().actor(id))
                .map(|actor| actor.position - self.position),
            DeathAim::OppositeProjectile => self.last_projectile_direction.map(|travel| -travel),
        };
        aimed
            .map(Vec2::normalize_or_zero)
            .filter(|vector| *vector != Vec2::ZERO)
            .unwrap_or(facing)
    }

    /// Terminal step: the character stops simulating. A body is dropped only
    /// when no status texture replaced the death animation.
    pub(crate) fn finish_death(&mut self, ctx: &mut SimContext<'_>) {
        self.is_death = true;
        self.clock.stop();
        self.stop_loop_sound(ctx);
        if self.death_visual.is_none() {
            if let Some(corpse) = self.corpse.clone() {
                ctx.host.emit(HostEvent::CorpseSpawned {
                    actor: self.id,
                    corpse,
                    position: self.position,
                    direction: self.direction,
                });
            }
        }
        tracing::debug!("{}: died at {}", self.id, self.tile());
        ctx.host.emit(self.died_event());
    }

    fn died_event(&self) -> HostEvent {
        HostEvent::Died {
            actor: self.id,
            position: self.position,
            direction: self.direction,
        }
    }

    fn stop_loop_sound(&mut self, ctx: &mut SimContext<'_>) {
        if let Some(handle) = self.loop_sound.take() {
            ctx.host.stop_sound(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::AbilityRef;
    use crate::env::{
        CorpseRef, DirectorySnapshot, FixedRng, GridMap, GridPathFinder, MapDimensions,
        RecordingHost, SimEnv,
    };
    use crate::state::{
        CharacterConfig, DeathVisual, EffectId, Position, StateAsset, StateResources, Summoner,
    };
    use crate::stats::{LevelDetail, LevelTable};

    fn mortal(with_death_animation: bool) -> Character {
        let mut config = CharacterConfig::new("mortal");
        config.tile = Position::new(3, 3);
        config.corpse = Some(CorpseRef("bones".into()));
        let mut resources = StateResources::new()
            .with(ActionState::Stand, StateAsset::new(4, 0.1))
            .with(ActionState::Hurt, StateAsset::new(2, 0.1));
        if with_death_animation {
            resources.insert(ActionState::Death, StateAsset::new(5, 0.1));
        }
        config.resources = resources;
        Character::from_config(EntityId(4), &config)
    }

    fn run<R>(host: &mut RecordingHost, f: impl FnOnce(&mut SimContext<'_>) -> R) -> R {
        let map = GridMap::new(MapDimensions::new(8, 8));
        let directory = DirectorySnapshot::new();
        let config = SimConfig::new();
        let env = SimEnv::new(&map, &GridPathFinder, &directory, &FixedRng(0), &config);
        let mut ctx = SimContext::new(env, host);
        f(&mut ctx)
    }

    #[test]
    fn damage_hurts_then_kills() {
        let mut host = RecordingHost::new();
        let mut character = mortal(true);
        run(&mut host, |ctx| character.take_damage(30, Some(EntityId(9)), ctx)).unwrap();
        assert_eq!(character.state(), ActionState::Hurt);
        assert_eq!(character.last_attacker(), Some(EntityId(9)));

        run(&mut host, |ctx| character.take_damage(500, None, ctx)).unwrap();
        assert_eq!(character.life(), 0);
        assert!(character.is_death_invoked());
        assert_eq!(character.state(), ActionState::Death);
        assert!(!character.is_death());
    }

    #[test]
    fn death_without_animation_is_immediate_and_drops_a_corpse() {
        let mut host = RecordingHost::new();
        let mut character = mortal(false);
        run(&mut host, |ctx| character.death(ctx)).unwrap();
        assert!(character.is_death());
        assert_eq!(
            host.count(|event| matches!(event, HostEvent::CorpseSpawned { .. })),
            1
        );
        assert_eq!(host.count(|event| matches!(event, HostEvent::Died { .. })), 1);
    }

    #[test]
    fn death_is_idempotent() {
        let mut host = RecordingHost::new();
        let mut character = mortal(false);
        run(&mut host, |ctx| character.death(ctx)).unwrap();
        let after_first = format!("{character:?}");
        let events = host.events.len();
        run(&mut host, |ctx| character.death(ctx)).unwrap();
        assert_eq!(format!("{character:?}"), after_first);
        assert_eq!(host.events.len(), events);
    }

    #[test]
    fn status_textures_suppress_the_corpse() {
        let mut host = RecordingHost::new();
        let mut character = mortal(true);
        character.set_frozen(3.0, true);
        run(&mut host, |ctx| character.death(ctx)).unwrap();
        assert_eq!(character.death_visual(), Some(DeathVisual::Frozen));
        run(&mut host, |ctx| character.finish_death(ctx));
        assert_eq!(
            host.count(|event| matches!(event, HostEvent::CorpseSpawned { .. })),
            0
        );
    }

    #[test]
    fn summoned_characters_destroy_the_summoning_effect() {
        let mut host = RecordingHost::new();
        let mut character = mortal(true);
        character.set_summoner(Some(Summoner {
            owner: EntityId(1),
            effect: EffectId(77),
        }));
        run(&mut host, |ctx| character.death(ctx)).unwrap();
        assert!(character.is_death());
        assert_eq!(character.state(), ActionState::Stand);
        assert!(host.events.contains(&HostEvent::SummonEffectDestroyed {
            actor: EntityId(4),
            summoner: EntityId(1),
            effect: EffectId(77),
        }));
    }

    #[test]
    fn losing_the_controller_is_fatal() {
        let mut host = RecordingHost::new();
        let mut character = mortal(false);
        character.set_controlled_by(None);
        let error = run(&mut host, |ctx| character.death(ctx)).unwrap_err();
        assert!(matches!(error, LifecycleError::ControllerMissing { .. }));

        let mut piloted = mortal(false);
        piloted.set_controlled_by(Some(EntityId::PLAYER));
        run(&mut host, |ctx| piloted.death(ctx)).unwrap();
        assert!(host.events.contains(&HostEvent::ControlReleased {
            actor: EntityId(4),
            controller: EntityId::PLAYER,
        }));
    }

    #[test]
    fn on_death_ability_follows_the_facing() {
        let mut host = RecordingHost::new();
        let mut config = CharacterConfig::new("bomber");
        config.tile = Position::new(3, 3);
        config.death_ability = Some(AbilityRef::new("blast"));
        let mut character = Character::from_config(EntityId(2), &config);
        run(&mut host, |ctx| character.death(ctx)).unwrap();
        let destination = host.events.iter().find_map(|event| match event {
            HostEvent::AbilityUsed { destination, .. } => Some(*destination),
            _ => None,
        });
        assert_eq!(
            destination,
            Some(character.position() + Vec2::new(0.0, SimConfig::TILE_SIZE))
        );
    }

    #[test]
    fn experience_walks_the_level_table() {
        let detail = |exp, life| LevelDetail {
            level_up_exp: exp,
            life_max: life,
            thew_max: 50,
            mana_max: 50,
            attack: 20,
            defend: 5,
            evade: 3,
        };
        let mut config = CharacterConfig::new("hero");
        config.level_up_exp = 100;
        config.level_table = Some(LevelTable::new().with(2, detail(300, 150)).with(3, detail(0, 200)));
        let mut character = Character::from_config(EntityId(0), &config);
        character.add_exp(350);
        assert_eq!(character.progression().level, 3);
        assert_eq!(character.life_max(), 200);
        assert_eq!(character.life(), 200);
        assert_eq!(character.combat_stats().attack, 20);
    }
}
