//! End-to-end character scenarios driven through `Character::update`.
//!
//! Each scenario builds a small open map, rebuilds the directory snapshot
//! before every update the way a scene does, and inspects the recorded host
//! events afterwards.

use actor_core::env::ActorSnapshot;
use actor_core::{
    AbilityBinding, AbilityRef, AbilityTable, ActionState, Character, CharacterConfig,
    CharacterKind, CommandError, Direction8, DirectorySnapshot, EntityId, FixedRng, GridMap,
    GridPathFinder, HostEvent, LifecycleError, MapDimensions, Position, RecordingHost, Relation,
    SimConfig, SimContext, SimEnv, StateAsset, StateResources, TerrainKind,
};

struct World {
    map: GridMap,
    config: SimConfig,
    host: RecordingHost,
    /// Characters that are seen but not simulated.
    bystanders: Vec<ActorSnapshot>,
}

impl World {
    fn open(width: u32, height: u32) -> Self {
        Self {
            map: GridMap::new(MapDimensions::new(width, height)),
            config: SimConfig::new(),
            host: RecordingHost::new(),
            bystanders: Vec::new(),
        }
    }

    fn directory(&self, characters: &[&Character]) -> DirectorySnapshot {
        let mut directory = DirectorySnapshot::new();
        for bystander in &self.bystanders {
            directory.upsert_actor(bystander.clone());
        }
        for character in characters {
            directory.upsert_actor(character.snapshot());
        }
        directory
    }

    fn with_ctx<R>(
        &mut self,
        character: &mut Character,
        f: impl FnOnce(&mut Character, &mut SimContext<'_>) -> R,
    ) -> R {
        let directory = self.directory(&[character]);
        let env = SimEnv::new(
            &self.map,
            &GridPathFinder,
            &directory,
            &FixedRng(0),
            &self.config,
        );
        let mut ctx = SimContext::new(env, &mut self.host);
        f(character, &mut ctx)
    }

    fn tick(&mut self, character: &mut Character, dt: f32) -> Result<(), LifecycleError> {
        self.with_ctx(character, |character, ctx| character.update(dt, ctx))
    }

    fn tick_all(&mut self, characters: &mut [Character], dt: f32) -> Result<(), LifecycleError> {
        for index in 0..characters.len() {
            let directory = {
                let all: Vec<&Character> = characters.iter().collect();
                self.directory(&all)
            };
            let env = SimEnv::new(
                &self.map,
                &GridPathFinder,
                &directory,
                &FixedRng(0),
                &self.config,
            );
            let mut ctx = SimContext::new(env, &mut self.host);
            characters[index].update(dt, &mut ctx)?;
        }
        Ok(())
    }
}

fn resources() -> StateResources {
    StateResources::new()
        .with(ActionState::Stand, StateAsset::new(4, 0.25))
        .with(ActionState::Walk, StateAsset::new(4, 0.1).with_sound("footsteps"))
        .with(ActionState::Attack, StateAsset::new(5, 0.1).with_sound("swing"))
        .with(ActionState::Magic, StateAsset::new(5, 0.1))
}

fn character(id: u32, kind: CharacterKind, relation: Relation, tile: Position) -> Character {
    character_with(id, kind, relation, tile, resources())
}

fn character_with(
    id: u32,
    kind: CharacterKind,
    relation: Relation,
    tile: Position,
    resources: StateResources,
) -> Character {
    let mut config = CharacterConfig::new(format!("actor-{id}"));
    config.kind = kind;
    config.relation = relation;
    config.tile = tile;
    config.resources = resources;
    Character::from_config(EntityId(id), &config)
}

fn archer_at(tile: Position, abilities: &[(&str, u32)]) -> Character {
    let mut archer = player_at(tile);
    let mut table = AbilityTable::new();
    for (name, distance) in abilities {
        table.insert(AbilityRef::new(*name), *distance, 1);
    }
    archer.set_abilities(table);
    archer
}

fn fired_abilities(host: &RecordingHost) -> Vec<String> {
    host.events
        .iter()
        .filter_map(|event| match event {
            HostEvent::AbilityUsed { ability, .. } => Some(ability.name.clone()),
            _ => None,
        })
        .collect()
}

fn player_at(tile: Position) -> Character {
    character(0, CharacterKind::Player, Relation::Friend, tile)
}

#[test]
fn walking_three_tiles_at_speed_two() {
    let mut world = World::open(12, 12);
    let mut hero = player_at(Position::new(5, 5));
    hero.set_walk_speed(2);

    world
        .with_ctx(&mut hero, |hero, ctx| hero.walk_to(Position::new(5, 8), ctx))
        .unwrap();
    assert_eq!(hero.state(), ActionState::Walk);

    // 96 px at 200 px/s is 0.48 s: twelve ticks of 40 ms.
    for _ in 0..11 {
        world.tick(&mut hero, 0.04).unwrap();
    }
    assert_eq!(hero.state(), ActionState::Walk);
    world.tick(&mut hero, 0.04).unwrap();

    assert_eq!(hero.tile(), Position::new(5, 8));
    assert_eq!(hero.state(), ActionState::Stand);
    assert!(hero.path().is_none());
    assert!(world.host.playing_loops().is_empty());
}

#[test]
fn motion_is_independent_of_tick_size() {
    let mut coarse_world = World::open(12, 12);
    let mut fine_world = World::open(12, 12);
    let mut coarse = player_at(Position::new(1, 1));
    let mut fine = player_at(Position::new(1, 1));
    for (world, hero) in [(&mut coarse_world, &mut coarse), (&mut fine_world, &mut fine)] {
        world
            .with_ctx(hero, |hero, ctx| hero.walk_to(Position::new(7, 4), ctx))
            .unwrap();
    }

    for _ in 0..5 {
        coarse_world.tick(&mut coarse, 0.1).unwrap();
    }
    for _ in 0..40 {
        fine_world.tick(&mut fine, 0.0125).unwrap();
    }
    assert!(coarse.position().distance(fine.position()) < 0.01);

    for _ in 0..50 {
        coarse_world.tick(&mut coarse, 0.1).unwrap();
    }
    for _ in 0..400 {
        fine_world.tick(&mut fine, 0.0125).unwrap();
    }
    assert_eq!(coarse.tile(), Position::new(7, 4));
    assert_eq!(coarse.position(), fine.position());
}

#[test]
fn ranged_attack_approaches_to_use_distance_then_fires_once() {
    let mut world = World::open(16, 12);
    let target = character(7, CharacterKind::Normal, Relation::Enemy, Position::new(8, 5));
    world.bystanders.push(target.snapshot());

    let mut hero = player_at(Position::new(2, 5));
    let mut abilities = actor_core::AbilityTable::new();
    abilities.insert(AbilityRef::new("arrow"), 3, 1);
    hero.set_abilities(abilities);

    world
        .with_ctx(&mut hero, |hero, ctx| hero.attack_character(EntityId(7), false, ctx))
        .unwrap();
    assert_eq!(hero.state(), ActionState::Walk);

    let mut ticks = 0;
    while !hero.state().is_attacking() && ticks < 200 {
        world.tick(&mut hero, 0.05).unwrap();
        ticks += 1;
    }
    assert!(hero.state().is_attacking());
    assert_eq!(hero.tile(), Position::new(5, 5));
    assert_eq!(world.host.ability_uses(), 0);

    for _ in 0..40 {
        world.tick(&mut hero, 0.05).unwrap();
    }
    assert_eq!(world.host.ability_uses(), 1);
    assert!(world.host.events.iter().any(|event| matches!(
        event,
        HostEvent::AbilityUsed { target: Some(EntityId(7)), .. }
    )));
    assert_eq!(hero.state(), ActionState::Stand);
    assert!(hero.is_fighting());
}

#[test]
fn poison_damages_once_over_four_quarter_second_ticks() {
    let mut world = World::open(8, 8);
    let mut hero = player_at(Position::new(3, 3));
    assert!(hero.set_poisoned(1.0, true));
    for _ in 0..4 {
        world.tick(&mut hero, 0.25).unwrap();
    }
    assert_eq!(hero.life(), 90);
    assert!(!hero.status().is_poisoned());
}

#[test]
fn commands_are_ignored_while_attacking() {
    let mut world = World::open(10, 10);
    let mut hero = player_at(Position::new(4, 4));
    world
        .with_ctx(&mut hero, |hero, ctx| hero.attacking(Position::new(5, 4), ctx))
        .unwrap();
    assert_eq!(hero.state(), ActionState::Attack);

    let rejected = world.with_ctx(&mut hero, |hero, ctx| {
        (
            hero.walk_to(Position::new(8, 8), ctx),
            hero.run_to(Position::new(8, 8), ctx),
            hero.jump_to(Position::new(6, 4), ctx),
            hero.use_magic(AbilityRef::new("fire"), hero.position(), None, ctx),
            hero.attacking(Position::new(3, 4), ctx),
        )
    });
    assert_eq!(rejected.0, Err(CommandError::ActionLocked));
    assert_eq!(rejected.1, Err(CommandError::ActionLocked));
    assert_eq!(rejected.2, Err(CommandError::ActionLocked));
    assert_eq!(rejected.3, Err(CommandError::ActionLocked));
    assert_eq!(rejected.4, Err(CommandError::ActionLocked));
    assert_eq!(hero.state(), ActionState::Attack);
    assert!(hero.path().is_none());

    for _ in 0..12 {
        world.tick(&mut hero, 0.05).unwrap();
    }
    assert_eq!(hero.state(), ActionState::Stand);
    assert_eq!(
        world
            .host
            .count(|event| matches!(event, HostEvent::AttackCompleted { .. })),
        1
    );
    assert_eq!(world.host.sounds_once.len(), 1);
}

#[test]
fn vitals_stay_within_bounds() {
    let mut hero = player_at(Position::new(1, 1));
    hero.set_life(500);
    assert_eq!(hero.life(), 100);
    hero.set_life_max(40);
    assert_eq!(hero.life(), 40);
    hero.set_mana(-5);
    assert_eq!(hero.mana(), 0);
    hero.set_thew_max(-10);
    assert_eq!(hero.thew(), 0);
}

#[test]
fn magic_releases_the_ability_when_the_cast_completes() {
    let mut world = World::open(10, 10);
    let mut hero = player_at(Position::new(4, 4));
    hero.set_mana(30);
    let fire = AbilityRef::new("fire").with_mana_cost(20);

    world
        .with_ctx(&mut hero, |hero, ctx| {
            hero.use_magic(fire.clone(), hero.position(), None, ctx)
        })
        .unwrap();
    assert_eq!(hero.mana(), 10);
    assert_eq!(hero.state(), ActionState::Magic);

    let locked = world.with_ctx(&mut hero, |hero, ctx| {
        hero.use_magic(fire.clone(), hero.position(), None, ctx)
    });
    assert_eq!(locked, Err(CommandError::ActionLocked));
    assert_eq!(hero.mana(), 10);

    for _ in 0..12 {
        world.tick(&mut hero, 0.05).unwrap();
    }
    assert_eq!(world.host.ability_uses(), 1);

    let refused = world.with_ctx(&mut hero, |hero, ctx| {
        hero.use_magic(fire.clone(), hero.position(), None, ctx)
    });
    assert_eq!(refused, Err(CommandError::RoleRefused));
}

#[test]
fn fighters_hunt_down_hostiles_in_view() {
    let mut world = World::open(12, 12);
    let mut config = CharacterConfig::new("bandit");
    config.kind = CharacterKind::Fighter;
    config.relation = Relation::Enemy;
    config.tile = Position::new(5, 9);
    config.resources = resources();
    let bandit = Character::from_config(EntityId(3), &config);
    let mut characters = vec![player_at(Position::new(5, 5)), bandit];

    let mut ticks = 0;
    while world
        .host
        .count(|event| matches!(event, HostEvent::AttackCompleted { .. }))
        == 0
        && ticks < 200
    {
        world.tick_all(&mut characters, 0.05).unwrap();
        ticks += 1;
    }

    let swing = world.host.events.iter().find_map(|event| match event {
        HostEvent::AttackCompleted {
            attacker,
            melee_target,
            ..
        } => Some((*attacker, *melee_target)),
        _ => None,
    });
    assert_eq!(swing, Some((EntityId(3), Some(EntityId::PLAYER))));
    assert_eq!(characters[1].tile(), Position::new(5, 6));
}

#[test]
fn primary_abilities_from_config_drive_targeting() {
    let mut config = CharacterConfig::new("archer");
    config.primary_ability = Some(AbilityBinding::new(AbilityRef::new("arrow"), 4));
    config.secondary_ability = Some(AbilityBinding::new(AbilityRef::new("stab"), 1));
    let archer = Character::from_config(EntityId(2), &config);
    let distances: Vec<u32> = archer
        .abilities()
        .slots()
        .iter()
        .map(|slot| slot.use_distance)
        .collect();
    assert_eq!(distances, vec![1, 4]);
}

#[test]
fn walks_stop_short_of_a_destination_that_fills_up() {
    let mut world = World::open(10, 10);
    let mut hero = player_at(Position::new(1, 1));
    world
        .with_ctx(&mut hero, |hero, ctx| hero.walk_to(Position::new(1, 6), ctx))
        .unwrap();
    world.map.occupy(Position::new(1, 6), EntityId(9));

    for _ in 0..40 {
        world.tick(&mut hero, 0.05).unwrap();
    }
    assert_eq!(hero.tile(), Position::new(1, 5));
    assert_eq!(hero.state(), ActionState::Stand);
    assert!(hero.path().is_none());
    assert!(hero.destination().is_none());
}

#[test]
fn walks_route_around_a_tile_blocked_mid_way() {
    let mut world = World::open(10, 10);
    let mut hero = player_at(Position::new(2, 1));
    world
        .with_ctx(&mut hero, |hero, ctx| hero.walk_to(Position::new(2, 7), ctx))
        .unwrap();
    let blocker = Position::new(2, 4);
    world.map.occupy(blocker, EntityId(9));

    let mut visited = Vec::new();
    for _ in 0..80 {
        world.tick(&mut hero, 0.05).unwrap();
        visited.push(hero.tile());
    }
    assert!(!visited.contains(&blocker));
    assert_eq!(hero.tile(), Position::new(2, 7));
    assert_eq!(hero.state(), ActionState::Stand);
}

#[test]
fn flyers_cross_walls_on_a_fixed_line() {
    let mut world = World::open(12, 6);
    world.map.set_terrain(Position::new(5, 2), TerrainKind::Wall);
    let mut bat = character(4, CharacterKind::Flyer, Relation::Neutral, Position::new(2, 2));

    world
        .with_ctx(&mut bat, |bat, ctx| bat.walk_to(Position::new(8, 2), ctx))
        .unwrap();
    assert!(bat.fixed_line().is_some());
    assert!(bat.path().is_none());

    // Twice walk speed: 200 px/s, so half a second covers 100 px.
    for _ in 0..10 {
        world.tick(&mut bat, 0.05).unwrap();
    }
    assert_eq!(bat.tile(), Position::new(5, 2));
    assert_eq!(bat.state(), ActionState::Walk);

    for _ in 0..10 {
        world.tick(&mut bat, 0.05).unwrap();
    }
    assert_eq!(bat.tile(), Position::new(8, 2));
    assert_eq!(bat.state(), ActionState::Stand);
    assert!(bat.fixed_line().is_none());
}

#[test]
fn jumps_land_early_on_a_trap() {
    let mut world = World::open(10, 6);
    let mut hero = character_with(
        0,
        CharacterKind::Player,
        Relation::Friend,
        Position::new(2, 2),
        resources().with(ActionState::Jump, StateAsset::new(4, 0.1)),
    );
    world
        .with_ctx(&mut hero, |hero, ctx| hero.jump_to(Position::new(6, 2), ctx))
        .unwrap();

    // 800 px/s: the first 50 ms carry the jumper into the next tile.
    world.tick(&mut hero, 0.05).unwrap();
    assert_eq!(hero.tile(), Position::new(3, 2));
    world.map.set_trap(Position::new(3, 2), true);
    world.tick(&mut hero, 0.05).unwrap();

    assert_eq!(hero.tile(), Position::new(3, 2));
    assert!(hero.path().is_none());
    assert_eq!(hero.state(), ActionState::Jump);

    for _ in 0..8 {
        world.tick(&mut hero, 0.05).unwrap();
    }
    assert_eq!(hero.state(), ActionState::Stand);
    assert_eq!(hero.tile(), Position::new(3, 2));
}

#[test]
fn attackers_back_off_to_their_use_distance() {
    let mut world = World::open(16, 12);
    world
        .bystanders
        .push(character(7, CharacterKind::Normal, Relation::Enemy, Position::new(5, 5)).snapshot());
    let mut hero = archer_at(Position::new(4, 5), &[("arrow", 3)]);

    world
        .with_ctx(&mut hero, |hero, ctx| hero.attack_character(EntityId(7), false, ctx))
        .unwrap();
    assert_eq!(hero.state(), ActionState::Walk);
    assert_eq!(
        hero.destination().map(|target| target.tile()),
        Some(Position::new(2, 5))
    );

    let mut ticks = 0;
    while !hero.state().is_attacking() && ticks < 100 {
        world.tick(&mut hero, 0.05).unwrap();
        ticks += 1;
    }
    assert_eq!(hero.tile(), Position::new(2, 5));
    for _ in 0..20 {
        world.tick(&mut hero, 0.05).unwrap();
    }
    assert_eq!(fired_abilities(&world.host), vec!["arrow".to_string()]);
}

#[test]
fn cornered_attackers_fire_the_nearest_viable_ability() {
    let mut world = World::open(16, 12);
    world
        .bystanders
        .push(character(7, CharacterKind::Normal, Relation::Enemy, Position::new(3, 5)).snapshot());
    // From 3 tiles the bow (4) is the closer match, but backing off one tile
    // would leave the map.
    let mut hero = archer_at(Position::new(0, 5), &[("stab", 1), ("bow", 4)]);

    world
        .with_ctx(&mut hero, |hero, ctx| hero.attack_character(EntityId(7), false, ctx))
        .unwrap();
    assert!(hero.state().is_attacking());
    assert_eq!(hero.tile(), Position::new(0, 5));

    for _ in 0..20 {
        world.tick(&mut hero, 0.05).unwrap();
    }
    assert_eq!(fired_abilities(&world.host), vec!["stab".to_string()]);
}

#[test]
fn step_moves_walk_tile_by_tile_until_blocked() {
    let mut world = World::open(10, 6);
    let mut hero = player_at(Position::new(2, 2));
    world
        .with_ctx(&mut hero, |hero, ctx| hero.walk_in_direction(Direction8::East, 3, ctx))
        .unwrap();
    for _ in 0..30 {
        world.tick(&mut hero, 0.05).unwrap();
    }
    assert_eq!(hero.tile(), Position::new(5, 2));
    assert_eq!(hero.state(), ActionState::Stand);

    world.map.occupy(Position::new(7, 2), EntityId(9));
    world
        .with_ctx(&mut hero, |hero, ctx| hero.walk_in_direction(Direction8::East, 3, ctx))
        .unwrap();
    for _ in 0..30 {
        world.tick(&mut hero, 0.05).unwrap();
    }
    assert_eq!(hero.tile(), Position::new(6, 2));
    assert_eq!(hero.state(), ActionState::Stand);
}

#[test]
fn stop_at_next_step_ends_the_walk_at_the_next_waypoint() {
    let mut world = World::open(10, 10);
    let mut hero = player_at(Position::new(2, 2));
    world
        .with_ctx(&mut hero, |hero, ctx| hero.walk_to(Position::new(2, 8), ctx))
        .unwrap();
    world.tick(&mut hero, 0.05).unwrap();
    hero.stop_at_next_step();

    for _ in 0..20 {
        world.tick(&mut hero, 0.05).unwrap();
    }
    assert_eq!(hero.tile(), Position::new(2, 3));
    assert_eq!(hero.state(), ActionState::Stand);
    assert!(hero.path().is_none());
}

#[test]
fn frozen_walkers_move_at_half_speed() {
    let mut world = World::open(10, 10);
    let mut thawed = player_at(Position::new(2, 2));
    let mut frozen = player_at(Position::new(2, 2));
    for hero in [&mut thawed, &mut frozen] {
        world
            .with_ctx(hero, |hero, ctx| hero.walk_to(Position::new(2, 8), ctx))
            .unwrap();
    }
    assert!(frozen.set_frozen(1.0, false));
    let start = frozen.position();

    world.tick(&mut thawed, 0.1).unwrap();
    world.tick(&mut frozen, 0.1).unwrap();

    assert!((thawed.position().distance(start) - 10.0).abs() < 1e-3);
    assert!((frozen.position().distance(start) - 5.0).abs() < 1e-3);
    assert!((frozen.status().frozen().seconds() - 0.9).abs() < 1e-4);
}
