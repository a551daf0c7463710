//! The simulated character.
//!
//! # Structure
//!
//! This file holds the data and the plain accessors. Behaviour lives next to
//! the concern it implements:
//!
//! - `action::*`: commands, transitions, combat, interaction, lifecycle
//! - `engine::*`: the per-tick update, motion and external displacement
//! - `role`: per-role hooks and goal selection
//!
//! # Invariants
//!
//! - Only the pixel position is stored; [`Character::tile`] derives the tile.
//! - Vitals are clamped by [`ResourceMeter`](crate::stats::ResourceMeter).
//! - Once `is_death` is set the character never changes again.

use glam::Vec2;

use crate::combat::AbilityTable;
use crate::env::{
    ActorSnapshot, CorpseRef, Direction8, InteractTarget, PathStyle, RollContext, ScriptHandle,
    ScriptRef, SimEnv, SoundHandle, compute_seed, to_pixel, to_tile,
};
use crate::role::Role;
use crate::state::types::{
    ActionState, AnimationClock, AttackRelease, CharacterConfig, DeathAim, DeathVisual,
    ExternalMotion, FightingFlag, FixedLine, MagicCast, Path, Patrol, PendingAttack,
    PendingInteraction, RemoteControl, SpeedBoost, StateResources, StatusTracker, StepMove,
    Summoner, TileTarget, TimerScript,
};
use crate::state::{EntityId, Position};
use crate::stats::{CombatStats, LevelTable, Progression, ResourceMeter, Vitals};
use crate::traits::{CharacterKind, Relation};

bitflags::bitflags! {
    /// Externally settable gates checked by the matching commands.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct DisabledActions: u8 {
        const FIGHT = 1 << 0;
        const JUMP  = 1 << 1;
        const RUN   = 1 << 2;
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Character {
    // === Identity ===
    pub(crate) id: EntityId,
    pub(crate) name: String,
    pub(crate) kind: CharacterKind,
    pub(crate) relation: Relation,
    pub(crate) role: Role,
    pub(crate) path_style: PathStyle,
    pub(crate) vision_radius: u32,
    pub(crate) dialog_radius: u32,
    pub(crate) attack_radius: u32,
    pub(crate) walk_speed: u32,

    // === Stats ===
    pub(crate) vitals: Vitals,
    pub(crate) combat: CombatStats,
    pub(crate) progression: Progression,
    pub(crate) level_table: Option<LevelTable>,

    // === Placement and motion ===
    pub(crate) position: Vec2,
    pub(crate) direction: Direction8,
    pub(crate) path: Option<Path>,
    pub(crate) destination: Option<TileTarget>,
    pub(crate) fixed_line: Option<FixedLine>,
    pub(crate) step_move: Option<StepMove>,
    pub(crate) stand_at_next_step: bool,
    pub(crate) external: Option<ExternalMotion>,
    pub(crate) speed_boost: Option<SpeedBoost>,

    // === Action state ===
    pub(crate) state: ActionState,
    pub(crate) resources: StateResources,
    pub(crate) clock: AnimationClock,
    pub(crate) loop_sound: Option<SoundHandle>,
    pub(crate) fighting: FightingFlag,
    pub(crate) disabled: DisabledActions,
    pub(crate) status: StatusTracker,

    // === Combat ===
    pub(crate) abilities: AbilityTable,
    pub(crate) pending_attack: Option<PendingAttack>,
    pub(crate) attack_release: Option<AttackRelease>,
    pub(crate) magic_cast: Option<MagicCast>,
    pub(crate) last_attacker: Option<EntityId>,
    pub(crate) last_projectile_direction: Option<Vec2>,

    // === Interaction and scripts ===
    pub(crate) pending_interaction: Option<PendingInteraction>,
    pub(crate) interacting_with: Option<InteractTarget>,
    pub(crate) script: Option<ScriptRef>,
    pub(crate) running_script: Option<ScriptHandle>,
    pub(crate) timer_script: Option<TimerScript>,
    pub(crate) patrol: Option<Patrol>,

    // === Relationships ===
    pub(crate) follow_target: Option<EntityId>,
    pub(crate) summoner: Option<Summoner>,
    pub(crate) dependents: Vec<EntityId>,
    pub(crate) remote_control: Option<RemoteControl>,

    // === Lifecycle ===
    pub(crate) death_script: Option<ScriptRef>,
    pub(crate) death_ability: Option<crate::combat::AbilityRef>,
    pub(crate) death_aim: DeathAim,
    pub(crate) corpse: Option<CorpseRef>,
    pub(crate) death_visual: Option<DeathVisual>,
    pub(crate) death_invoked: bool,
    pub(crate) is_death: bool,
    pub(crate) hidden: bool,
    pub(crate) in_transport: bool,

    /// Roll counter mixed into every random seed.
    pub(crate) rolls: u64,
}

impl Character {
    /// Builds a character standing on `config.tile`.
    pub fn from_config(id: EntityId, config: &CharacterConfig) -> Self {
        let mut vitals = Vitals {
            life: ResourceMeter::new(config.life, config.life_max),
            thew: ResourceMeter::new(config.thew, config.thew_max),
            mana: ResourceMeter::new(config.mana, config.mana_max),
        };
        let combat = CombatStats {
            attack: config.attack,
            defend: config.defend,
            evade: config.evade,
            attack_level: config.attack_level,
        };
        let mut progression = Progression {
            level: config.level,
            exp: config.exp,
            level_up_exp: config.level_up_exp,
            exp_bonus: config.exp_bonus,
        };
        if progression.level_up_exp == 0 {
            if let Some(detail) = config
                .level_table
                .as_ref()
                .and_then(|table| table.get(config.level))
            {
                progression.level_up_exp = detail.level_up_exp;
            }
        }
        if vitals.life.maximum() == 0 {
            vitals.life = ResourceMeter::full(1);
        }

        let mut abilities = AbilityTable::new();
        for binding in config
            .primary_ability
            .iter()
            .chain(config.secondary_ability.iter())
            .chain(config.extra_abilities.iter())
        {
            abilities.insert(
                binding.ability.clone(),
                binding.use_distance,
                config.attack_level,
            );
        }

        let mut disabled = DisabledActions::empty();
        disabled.set(DisabledActions::FIGHT, config.fight_disabled);
        disabled.set(DisabledActions::JUMP, config.jump_disabled);
        disabled.set(DisabledActions::RUN, config.run_disabled);

        let timer_script = config.timer_script.clone().map(|script| TimerScript {
            script,
            interval: config.timer_interval.max(0.0),
            elapsed: 0.0,
            running: None,
        });

        let follow_target = match (config.follow_target, config.kind) {
            (Some(target), _) => Some(target),
            (None, CharacterKind::Follower) if !id.is_player() => Some(EntityId::PLAYER),
            (None, _) => None,
        };

        Self {
            id,
            name: config.name.clone(),
            kind: config.kind,
            relation: config.relation,
            role: Role::for_kind(config.kind),
            path_style: config.path_style,
            vision_radius: config.vision_radius,
            dialog_radius: config.dialog_radius,
            attack_radius: config.attack_radius,
            walk_speed: config.walk_speed.max(1),
            vitals,
            combat,
            progression,
            level_table: config.level_table.clone(),
            position: to_pixel(config.tile),
            direction: config.direction,
            path: None,
            destination: None,
            fixed_line: None,
            step_move: None,
            stand_at_next_step: false,
            external: None,
            speed_boost: None,
            state: ActionState::Stand,
            resources: config.resources.clone(),
            clock: AnimationClock::default(),
            loop_sound: None,
            fighting: FightingFlag::default(),
            disabled,
            status: StatusTracker::default(),
            abilities,
            pending_attack: None,
            attack_release: None,
            magic_cast: None,
            last_attacker: None,
            last_projectile_direction: None,
            pending_interaction: None,
            interacting_with: None,
            script: config.script.clone(),
            running_script: None,
            timer_script,
            patrol: Patrol::new(config.patrol.clone()),
            follow_target,
            summoner: None,
            dependents: Vec::new(),
            remote_control: None,
            death_script: config.death_script.clone(),
            death_ability: config.death_ability.clone(),
            death_aim: config.death_aim,
            corpse: config.corpse.clone(),
            death_visual: None,
            death_invoked: false,
            is_death: false,
            hidden: false,
            in_transport: false,
            rolls: 0,
        }
    }

    // ===== identity =====

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> CharacterKind {
        self.kind
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn set_relation(&mut self, relation: Relation) {
        self.relation = relation;
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn path_style(&self) -> PathStyle {
        self.path_style
    }

    pub fn vision_radius(&self) -> u32 {
        self.vision_radius
    }

    pub fn dialog_radius(&self) -> u32 {
        self.dialog_radius
    }

    pub fn attack_radius(&self) -> u32 {
        self.attack_radius
    }

    pub fn walk_speed(&self) -> u32 {
        self.walk_speed
    }

    pub fn set_walk_speed(&mut self, speed: u32) {
        self.walk_speed = speed.max(1);
    }

    /// Whether other characters treat this one as blocking its tile.
    pub fn is_obstacle(&self) -> bool {
        self.kind.is_obstacle() && !self.is_death && !self.hidden && !self.in_transport
    }

    // ===== stats =====

    pub fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    pub fn life(&self) -> i32 {
        self.vitals.life.current()
    }

    pub fn life_max(&self) -> i32 {
        self.vitals.life.maximum()
    }

    pub fn thew(&self) -> i32 {
        self.vitals.thew.current()
    }

    pub fn mana(&self) -> i32 {
        self.vitals.mana.current()
    }

    /// Sets life directly. Use [`Character::take_damage`] for hits, which also
    /// handles hurting and death.
    pub fn set_life(&mut self, value: i32) {
        self.vitals.life.set_current(value);
    }

    pub fn set_life_max(&mut self, value: i32) {
        self.vitals.life.set_maximum(value);
    }

    pub fn set_thew(&mut self, value: i32) {
        self.vitals.thew.set_current(value);
    }

    pub fn set_thew_max(&mut self, value: i32) {
        self.vitals.thew.set_maximum(value);
    }

    pub fn set_mana(&mut self, value: i32) {
        self.vitals.mana.set_current(value);
    }

    pub fn set_mana_max(&mut self, value: i32) {
        self.vitals.mana.set_maximum(value);
    }

    pub fn combat_stats(&self) -> &CombatStats {
        &self.combat
    }

    /// Changes the attack level and re-derives every ability level.
    pub fn set_attack_level(&mut self, level: u32) {
        self.combat.attack_level = level;
        self.abilities.rederive_levels(level);
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn abilities(&self) -> &AbilityTable {
        &self.abilities
    }

    /// Replaces the ability table; levels are derived from the current attack level.
    pub fn set_abilities(&mut self, mut abilities: AbilityTable) {
        abilities.rederive_levels(self.combat.attack_level);
        self.abilities = abilities;
    }

    // ===== placement =====

    /// World position in pixels.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Tile containing the world position.
    pub fn tile(&self) -> Position {
        to_tile(self.position)
    }

    pub fn direction(&self) -> Direction8 {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction8) {
        self.direction = direction;
    }

    /// Faces along `vector`; the zero vector keeps the current facing.
    pub fn face(&mut self, vector: Vec2) {
        if let Some(direction) = Direction8::from_vector(vector) {
            self.direction = direction;
        }
    }

    /// Teleports to the centre of `tile`, dropping any path in progress.
    pub fn set_tile(&mut self, tile: Position) {
        self.position = to_pixel(tile);
        self.path = None;
        self.fixed_line = None;
        self.destination = None;
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    pub fn destination(&self) -> Option<TileTarget> {
        self.destination
    }

    pub fn fixed_line(&self) -> Option<&FixedLine> {
        self.fixed_line.as_ref()
    }

    pub fn external_motion(&self) -> Option<ExternalMotion> {
        self.external
    }

    pub fn speed_boost(&self) -> Option<SpeedBoost> {
        self.speed_boost
    }

    // ===== action state =====

    pub fn state(&self) -> ActionState {
        self.state
    }

    pub fn resources(&self) -> &StateResources {
        &self.resources
    }

    pub fn animation(&self) -> &AnimationClock {
        &self.clock
    }

    /// Handle of the looping walk/run sound, if one is playing.
    pub fn loop_sound(&self) -> Option<SoundHandle> {
        self.loop_sound
    }

    pub fn is_fighting(&self) -> bool {
        self.fighting.active
    }

    pub fn is_sitting(&self) -> bool {
        self.state == ActionState::Sit
    }

    pub fn disabled_actions(&self) -> DisabledActions {
        self.disabled
    }

    pub fn set_fight_disabled(&mut self, disabled: bool) {
        self.disabled.set(DisabledActions::FIGHT, disabled);
    }

    pub fn set_jump_disabled(&mut self, disabled: bool) {
        self.disabled.set(DisabledActions::JUMP, disabled);
    }

    pub fn set_run_disabled(&mut self, disabled: bool) {
        self.disabled.set(DisabledActions::RUN, disabled);
    }

    pub fn status(&self) -> &StatusTracker {
        &self.status
    }

    // ===== combat and interaction =====

    pub fn pending_attack(&self) -> Option<PendingAttack> {
        self.pending_attack
    }

    pub fn pending_interaction(&self) -> Option<PendingInteraction> {
        self.pending_interaction
    }

    pub fn interacting_with(&self) -> Option<InteractTarget> {
        self.interacting_with
    }

    pub fn last_attacker(&self) -> Option<EntityId> {
        self.last_attacker
    }

    /// Remembers the travel direction of a projectile that just hit.
    pub fn record_projectile_hit(&mut self, travel: Vec2) {
        self.last_projectile_direction = Some(travel);
    }

    /// Whether a target-side interaction script is still running.
    pub fn is_in_script(&self) -> bool {
        self.running_script.is_some()
    }

    pub fn patrol(&self) -> Option<&Patrol> {
        self.patrol.as_ref()
    }

    // ===== relationships =====

    pub fn follow_target(&self) -> Option<EntityId> {
        self.follow_target
    }

    pub fn set_follow_target(&mut self, target: Option<EntityId>) {
        self.follow_target = target;
    }

    pub fn summoner(&self) -> Option<Summoner> {
        self.summoner
    }

    pub fn set_summoner(&mut self, summoner: Option<Summoner>) {
        self.summoner = summoner;
    }

    pub fn dependents(&self) -> &[EntityId] {
        &self.dependents
    }

    pub fn add_dependent(&mut self, dependent: EntityId) {
        if !self.dependents.contains(&dependent) {
            self.dependents.push(dependent);
        }
    }

    pub fn remove_dependent(&mut self, dependent: EntityId) {
        self.dependents.retain(|id| *id != dependent);
    }

    pub fn remote_control(&self) -> Option<RemoteControl> {
        self.remote_control
    }

    /// Puts the character under remote control. `None` records a control
    /// link whose controller reference has been lost.
    pub fn set_controlled_by(&mut self, controller: Option<EntityId>) {
        self.remote_control = Some(RemoteControl { controller });
    }

    // ===== lifecycle =====

    /// True once the death sequence has started.
    pub fn is_death_invoked(&self) -> bool {
        self.death_invoked
    }

    /// True once the death sequence has completed. The character is inert.
    pub fn is_death(&self) -> bool {
        self.is_death
    }

    pub fn death_visual(&self) -> Option<DeathVisual> {
        self.death_visual
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn is_in_transport(&self) -> bool {
        self.in_transport
    }

    pub fn set_in_transport(&mut self, in_transport: bool) {
        self.in_transport = in_transport;
    }

    /// What other characters see of this one.
    pub fn snapshot(&self) -> ActorSnapshot {
        ActorSnapshot {
            id: self.id,
            tile: self.tile(),
            position: self.position,
            kind: self.kind,
            relation: self.relation,
            alive: !self.death_invoked,
            visible: !self.hidden && !self.in_transport,
            life: self.life(),
            life_max: self.life_max(),
            interact_distance: self.dialog_radius,
        }
    }

    /// Draws a value in `0..bound` from the deterministic roll stream.
    pub(crate) fn roll(&mut self, env: &SimEnv<'_>, context: RollContext, bound: u32) -> u32 {
        let seed = compute_seed(
            env.config().game_seed,
            self.rolls,
            self.id.0,
            context as u32,
        );
        self.rolls += 1;
        env.rng().below(seed, bound)
    }
}
