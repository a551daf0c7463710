//! The owning collection of one map's characters.
//!
//! A [`Scene`] is the only place where one character's update can affect
//! another. Before each update it rebuilds the directory snapshot and the
//! map's occupancy from the live characters. After each update it drains the
//! host's events and resolves them: melee hits become damage on the target,
//! interaction requests start the target's entry point, deaths are removed
//! from their summoner's dependents.

use std::collections::BTreeMap;

use glam::Vec2;

use actor_core::env::{CorpseRef, ScriptHandle, ScriptRef};
use actor_core::state::{CarrierId, EffectId, Summoner};
use actor_core::{
    AbilityRef, Character, CharacterConfig, CharacterKind, Direction8, DirectorySnapshot,
    EntityId, GridMap, GridPathFinder, HostEvent, InteractTarget, ObjectId, ObjectSnapshot,
    PcgRng, Position, SimConfig, SimContext, SimEnv, SimHost,
};

use crate::api::{Result, SceneError};
use crate::host::SceneHost;

/// Dispatch rounds allowed per update before the scene gives up.
const MAX_DISPATCH_ROUNDS: usize = 32;

/// An inert interactable (chest, sign, door).
#[derive(Clone, Debug, PartialEq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub tile: Position,
    pub interact_distance: u32,
    /// Run with the initiator as context when someone interacts.
    pub script: Option<ScriptRef>,
}

impl SceneObject {
    fn snapshot(&self) -> ObjectSnapshot {
        ObjectSnapshot {
            id: self.id,
            tile: self.tile,
            interact_distance: self.interact_distance,
        }
    }
}

/// A released ability, handed to whatever plays magic.
#[derive(Clone, Debug, PartialEq)]
pub struct AbilityUse {
    pub tick: u64,
    pub caster: EntityId,
    pub ability: AbilityRef,
    pub level: u32,
    pub origin: Vec2,
    pub destination: Vec2,
    pub target: Option<EntityId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeleeHit {
    pub tick: u64,
    pub attacker: EntityId,
    pub target: EntityId,
    pub damage: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Corpse {
    pub actor: EntityId,
    pub corpse: CorpseRef,
    pub position: Vec2,
    pub direction: Direction8,
}

/// Everything the scene resolved, in order.
#[derive(Clone, Debug, Default)]
pub struct SceneLog {
    pub abilities: Vec<AbilityUse>,
    pub melee_hits: Vec<MeleeHit>,
    pub interactions: Vec<(EntityId, InteractTarget)>,
    pub deaths: Vec<EntityId>,
    pub corpses: Vec<Corpse>,
    /// `(summoned, effect)` pairs whose effect has to be torn down.
    pub destroyed_effects: Vec<(EntityId, EffectId)>,
    /// `(actor, controller)` pairs where remote control ended.
    pub released_controls: Vec<(EntityId, EntityId)>,
}

/// An interaction whose initiator waits for the target's script.
#[derive(Clone, Copy, Debug)]
struct OpenInteraction {
    initiator: EntityId,
    script: ScriptHandle,
}

pub struct Scene {
    map: GridMap,
    config: SimConfig,
    rng: PcgRng,
    characters: BTreeMap<EntityId, Character>,
    objects: Vec<SceneObject>,
    carriers: BTreeMap<CarrierId, Vec2>,
    host: SceneHost,
    log: SceneLog,
    open_interactions: Vec<OpenInteraction>,
    next_id: u32,
    ticks: u64,
    elapsed: f32,
}

impl Scene {
    pub fn new(map: GridMap, config: SimConfig) -> Self {
        Self {
            map,
            config,
            rng: PcgRng,
            characters: BTreeMap::new(),
            objects: Vec::new(),
            carriers: BTreeMap::new(),
            host: SceneHost::new(0.0),
            log: SceneLog::default(),
            open_interactions: Vec::new(),
            next_id: 1,
            ticks: 0,
            elapsed: 0.0,
        }
    }

    /// Builds a character from `config` and adds it. Players take
    /// [`EntityId::PLAYER`] while it is free.
    pub fn spawn(&mut self, config: &CharacterConfig) -> EntityId {
        let id = if config.kind == CharacterKind::Player
            && !self.characters.contains_key(&EntityId::PLAYER)
        {
            EntityId::PLAYER
        } else {
            self.allocate_id()
        };
        tracing::debug!("spawning {} as {} at {}", config.name, id, config.tile);
        self.characters.insert(id, Character::from_config(id, config));
        id
    }

    /// Adds an already built character under its own id.
    pub fn insert(&mut self, character: Character) -> Result<()> {
        let id = character.id();
        if self.characters.contains_key(&id) {
            return Err(SceneError::DuplicateCharacter(id));
        }
        self.next_id = self.next_id.max(id.0.saturating_add(1));
        self.characters.insert(id, character);
        Ok(())
    }

    /// Spawns a character kept alive by `owner`'s magic effect.
    pub fn summon(
        &mut self,
        owner: EntityId,
        effect: EffectId,
        config: &CharacterConfig,
    ) -> Result<EntityId> {
        if !self.characters.contains_key(&owner) {
            return Err(SceneError::UnknownCharacter(owner));
        }
        let id = self.allocate_id();
        let mut character = Character::from_config(id, config);
        character.set_summoner(Some(Summoner { owner, effect }));
        self.characters.insert(id, character);
        if let Some(summoner) = self.characters.get_mut(&owner) {
            summoner.add_dependent(id);
        }
        Ok(id)
    }

    /// Drops a character without running its death sequence.
    pub fn remove(&mut self, id: EntityId) -> Option<Character> {
        let removed = self.characters.remove(&id)?;
        self.detach_from_summoner(id, removed.summoner());
        self.open_interactions.retain(|open| open.initiator != id);
        Some(removed)
    }

    pub fn add_object(&mut self, object: SceneObject) {
        self.objects.retain(|existing| existing.id != object.id);
        self.objects.push(object);
    }

    pub fn remove_object(&mut self, id: ObjectId) -> Option<SceneObject> {
        let index = self.objects.iter().position(|object| object.id == id)?;
        Some(self.objects.remove(index))
    }

    /// Moves a carrying sprite, or removes it with `None`.
    pub fn set_carrier(&mut self, carrier: CarrierId, position: Option<Vec2>) {
        match position {
            Some(position) => {
                self.carriers.insert(carrier, position);
            }
            None => {
                self.carriers.remove(&carrier);
            }
        }
    }

    pub fn character(&self, id: EntityId) -> Option<&Character> {
        self.characters.get(&id)
    }

    /// Direct access for setup and for effects applied outside an update.
    pub fn character_mut(&mut self, id: EntityId) -> Option<&mut Character> {
        self.characters.get_mut(&id)
    }

    /// Characters in id order.
    pub fn characters(&self) -> impl Iterator<Item = &Character> {
        self.characters.values()
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn map(&self) -> &GridMap {
        &self.map
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn host(&self) -> &SceneHost {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut SceneHost {
        &mut self.host
    }

    pub fn log(&self) -> &SceneLog {
        &self.log
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Runs `f` against one character with a fresh context, then resolves
    /// the events it emitted.
    ///
    /// ```ignore
    /// scene.command(hero, |hero, ctx| hero.walk_to(Position::new(4, 2), ctx))??;
    /// ```
    pub fn command<R>(
        &mut self,
        id: EntityId,
        f: impl FnOnce(&mut Character, &mut SimContext<'_>) -> R,
    ) -> Result<R> {
        let output = self.with_context(id, f)?;
        self.dispatch()?;
        Ok(output)
    }

    /// Advances every live character by `elapsed` seconds in id order.
    ///
    /// # Errors
    ///
    /// Stops at the first fatal lifecycle error. Characters after the failing
    /// one are not updated this tick.
    pub fn tick(&mut self, elapsed: f32) -> Result<()> {
        self.host.advance_scripts(elapsed);
        self.close_finished_interactions();

        let ids: Vec<EntityId> = self.characters.keys().copied().collect();
        for id in ids {
            let active = self
                .characters
                .get(&id)
                .is_some_and(|character| !character.is_death());
            if !active {
                continue;
            }
            self.with_context(id, |character, ctx| character.update(elapsed, ctx))??;
            self.dispatch()?;
        }

        self.ticks += 1;
        self.elapsed += elapsed;
        Ok(())
    }

    fn allocate_id(&mut self) -> EntityId {
        while self.characters.contains_key(&EntityId(self.next_id)) {
            self.next_id += 1;
        }
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    fn directory(&self) -> DirectorySnapshot {
        let mut directory = DirectorySnapshot::new();
        for character in self.characters.values() {
            directory.upsert_actor(character.snapshot());
        }
        for object in &self.objects {
            directory.push_object(object.snapshot());
        }
        for (carrier, position) in &self.carriers {
            directory.set_carrier(*carrier, Some(*position));
        }
        directory
    }

    /// Marks every blocking character's tile except the updating one's.
    fn prepare_map(&mut self, updating: EntityId) {
        self.map.clear_occupants();
        for character in self.characters.values() {
            if character.id() != updating && character.is_obstacle() {
                self.map.occupy(character.tile(), character.id());
            }
        }
    }

    fn with_context<R>(
        &mut self,
        id: EntityId,
        f: impl FnOnce(&mut Character, &mut SimContext<'_>) -> R,
    ) -> Result<R> {
        if !self.characters.contains_key(&id) {
            return Err(SceneError::UnknownCharacter(id));
        }
        let directory = self.directory();
        self.prepare_map(id);
        let character = self
            .characters
            .get_mut(&id)
            .ok_or(SceneError::UnknownCharacter(id))?;
        let env = SimEnv::new(
            &self.map,
            &GridPathFinder,
            &directory,
            &self.rng,
            &self.config,
        );
        let mut ctx = SimContext::new(env, &mut self.host);
        Ok(f(character, &mut ctx))
    }

    fn dispatch(&mut self) -> Result<()> {
        for _ in 0..MAX_DISPATCH_ROUNDS {
            if !self.host.has_pending_events() {
                return Ok(());
            }
            for event in self.host.drain_events() {
                self.resolve(event)?;
            }
        }
        if self.host.has_pending_events() {
            return Err(SceneError::EventCascade {
                rounds: MAX_DISPATCH_ROUNDS,
            });
        }
        Ok(())
    }

    fn resolve(&mut self, event: HostEvent) -> Result<()> {
        match event {
            HostEvent::AbilityUsed {
                caster,
                ability,
                level,
                origin,
                destination,
                target,
            } => {
                tracing::debug!("{} releases {} (level {})", caster, ability.name, level);
                self.log.abilities.push(AbilityUse {
                    tick: self.ticks,
                    caster,
                    ability,
                    level,
                    origin,
                    destination,
                    target,
                });
            }
            HostEvent::AttackCompleted {
                attacker,
                melee_target: Some(target),
                ..
            } => self.resolve_melee(attacker, target)?,
            HostEvent::AttackCompleted { .. } => {}
            HostEvent::InteractionRequested { initiator, target } => {
                self.log.interactions.push((initiator, target));
                self.start_interaction(initiator, target)?;
            }
            HostEvent::DeathStarted { actor } => {
                tracing::debug!("{} is dying", actor);
            }
            HostEvent::Died { actor, .. } => {
                let summoner = self.characters.get(&actor).and_then(Character::summoner);
                self.detach_from_summoner(actor, summoner);
                self.log.deaths.push(actor);
            }
            HostEvent::CorpseSpawned {
                actor,
                corpse,
                position,
                direction,
            } => self.log.corpses.push(Corpse {
                actor,
                corpse,
                position,
                direction,
            }),
            HostEvent::SummonEffectDestroyed { actor, effect, .. } => {
                self.log.destroyed_effects.push((actor, effect));
            }
            HostEvent::ControlReleased { actor, controller } => {
                tracing::debug!("{} hands control back to {}", actor, controller);
                self.log.released_controls.push((actor, controller));
            }
        }
        Ok(())
    }

    fn resolve_melee(&mut self, attacker: EntityId, target: EntityId) -> Result<()> {
        let Some(stats) = self.characters.get(&attacker).map(|c| *c.combat_stats()) else {
            return Ok(());
        };
        let damage = match self.characters.get(&target) {
            Some(defender) if !defender.is_death_invoked() => {
                stats.melee_damage(defender.combat_stats())
            }
            _ => {
                tracing::trace!("{}: melee target {} is gone", attacker, target);
                return Ok(());
            }
        };
        self.log.melee_hits.push(MeleeHit {
            tick: self.ticks,
            attacker,
            target,
            damage,
        });
        self.with_context(target, |defender, ctx| {
            defender.take_damage(damage, Some(attacker), ctx)
        })??;
        Ok(())
    }

    fn start_interaction(&mut self, initiator: EntityId, target: InteractTarget) -> Result<()> {
        let script = match target {
            InteractTarget::Character(id) => {
                if !self.characters.contains_key(&id) {
                    None
                } else {
                    self.with_context(id, |target, ctx| target.begin_interaction(initiator, ctx))?
                }
            }
            InteractTarget::Object(id) => self
                .objects
                .iter()
                .find(|object| object.id == id)
                .and_then(|object| object.script.clone())
                .map(|script| self.host.run_script(&script, initiator)),
        };
        match script {
            Some(script) => self
                .open_interactions
                .push(OpenInteraction { initiator, script }),
            None => self.end_interaction(initiator),
        }
        Ok(())
    }

    fn close_finished_interactions(&mut self) {
        let (finished, open): (Vec<_>, Vec<_>) = self
            .open_interactions
            .drain(..)
            .partition(|interaction| self.host.is_script_end(interaction.script));
        self.open_interactions = open;
        for interaction in finished {
            self.end_interaction(interaction.initiator);
        }
    }

    fn end_interaction(&mut self, initiator: EntityId) {
        if let Some(character) = self.characters.get_mut(&initiator) {
            character.end_interaction();
        }
    }

    fn detach_from_summoner(&mut self, id: EntityId, summoner: Option<Summoner>) {
        if let Some(owner) = summoner.and_then(|summoner| self.characters.get_mut(&summoner.owner)) {
            owner.remove_dependent(id);
        }
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("characters", &self.characters.len())
            .field("objects", &self.objects.len())
            .field("ticks", &self.ticks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actor_core::{MapDimensions, Relation};

    fn scene() -> Scene {
        Scene::new(GridMap::new(MapDimensions::new(10, 10)), SimConfig::new())
    }

    fn config(kind: CharacterKind, tile: Position) -> CharacterConfig {
        let mut config = CharacterConfig::new("someone");
        config.kind = kind;
        config.relation = Relation::Neutral;
        config.tile = tile;
        config
    }

    #[test]
    fn players_take_the_player_id_once() {
        let mut scene = scene();
        let npc = scene.spawn(&config(CharacterKind::Normal, Position::new(1, 1)));
        let hero = scene.spawn(&config(CharacterKind::Player, Position::new(2, 2)));
        let twin = scene.spawn(&config(CharacterKind::Player, Position::new(3, 3)));
        assert_eq!(npc, EntityId(1));
        assert_eq!(hero, EntityId::PLAYER);
        assert_eq!(twin, EntityId(2));
    }

    #[test]
    fn inserting_a_taken_id_fails() {
        let mut scene = scene();
        let id = scene.spawn(&config(CharacterKind::Normal, Position::new(1, 1)));
        let copy = Character::from_config(id, &config(CharacterKind::Normal, Position::new(2, 2)));
        assert!(matches!(
            scene.insert(copy),
            Err(SceneError::DuplicateCharacter(taken)) if taken == id
        ));
    }

    #[test]
    fn commands_on_unknown_characters_fail() {
        let mut scene = scene();
        let result = scene.command(EntityId(42), |character, _| character.life());
        assert!(matches!(result, Err(SceneError::UnknownCharacter(EntityId(42)))));
    }

    #[test]
    fn occupancy_excludes_the_updating_character() {
        let mut scene = scene();
        let a = scene.spawn(&config(CharacterKind::Normal, Position::new(1, 1)));
        let b = scene.spawn(&config(CharacterKind::Normal, Position::new(2, 1)));
        scene.prepare_map(a);
        assert_eq!(scene.map().occupant(Position::new(1, 1)), None);
        assert_eq!(scene.map().occupant(Position::new(2, 1)), Some(b));
    }
}
