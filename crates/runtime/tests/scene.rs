//! Scene-level behaviour: cross-character effects resolved through host
//! events, tick ordering and scenario files.

use std::fs;
use std::path::Path;

use actor_content::ContentFactory;
use actor_core::env::{CorpseRef, ScriptRef};
use actor_core::state::EffectId;
use actor_core::{
    ActionState, CharacterConfig, CharacterKind, EntityId, ErrorSeverity, GameError, GridMap,
    InteractTarget, MapDimensions, ObjectId, Position, Relation, SimConfig, StateAsset,
    StateResources,
};
use actor_runtime::{MeleeHit, Scenario, Scene, SceneError, SceneObject};

fn resources() -> StateResources {
    StateResources::new()
        .with(ActionState::Stand, StateAsset::new(4, 0.25))
        .with(ActionState::Walk, StateAsset::new(4, 0.1))
        .with(ActionState::Attack, StateAsset::new(5, 0.1))
}

fn definition(name: &str, kind: CharacterKind, relation: Relation, tile: Position) -> CharacterConfig {
    let mut config = CharacterConfig::new(name);
    config.kind = kind;
    config.relation = relation;
    config.tile = tile;
    config.resources = resources();
    config
}

fn open_scene() -> Scene {
    Scene::new(GridMap::new(MapDimensions::new(12, 12)), SimConfig::new())
}

fn run(scene: &mut Scene, ticks: usize, dt: f32) {
    for _ in 0..ticks {
        scene.tick(dt).unwrap();
    }
}

#[test]
fn melee_swings_damage_their_target() {
    let mut scene = open_scene();
    let hero = scene.spawn(&definition(
        "hero",
        CharacterKind::Player,
        Relation::Friend,
        Position::new(4, 4),
    ));
    let dummy = scene.spawn(&definition(
        "dummy",
        CharacterKind::Normal,
        Relation::Neutral,
        Position::new(5, 4),
    ));

    scene
        .command(hero, |hero, ctx| hero.attack_character(dummy, false, ctx))
        .unwrap()
        .unwrap();
    run(&mut scene, 12, 0.05);

    assert_eq!(scene.log().melee_hits.len(), 1);
    let hit = scene.log().melee_hits[0];
    assert_eq!(
        (hit.attacker, hit.target, hit.damage),
        (hero, dummy, 10)
    );
    let dummy = scene.character(dummy).unwrap();
    assert_eq!(dummy.life(), 90);
    assert_eq!(dummy.last_attacker(), Some(hero));
}

#[test]
fn lethal_hits_drop_a_corpse() {
    let mut scene = open_scene();
    let hero = scene.spawn(&definition(
        "hero",
        CharacterKind::Player,
        Relation::Friend,
        Position::new(4, 4),
    ));
    let mut rat = definition("rat", CharacterKind::Normal, Relation::Enemy, Position::new(4, 5));
    rat.life = 5;
    rat.corpse = Some(CorpseRef("rat-body".into()));
    let rat = scene.spawn(&rat);

    scene
        .command(hero, |hero, ctx| hero.attack_character(rat, false, ctx))
        .unwrap()
        .unwrap();
    run(&mut scene, 12, 0.05);

    assert_eq!(scene.log().deaths, vec![rat]);
    assert_eq!(scene.log().corpses.len(), 1);
    assert_eq!(scene.log().corpses[0].corpse, CorpseRef("rat-body".into()));
    assert!(scene.character(rat).unwrap().is_death());
}

#[test]
fn fighters_close_in_and_hit_the_player() {
    let mut scene = open_scene();
    let hero = scene.spawn(&definition(
        "hero",
        CharacterKind::Player,
        Relation::Friend,
        Position::new(5, 5),
    ));
    let bandit = scene.spawn(&definition(
        "bandit",
        CharacterKind::Fighter,
        Relation::Enemy,
        Position::new(5, 9),
    ));

    run(&mut scene, 60, 0.05);

    assert!(
        scene
            .log()
            .melee_hits
            .iter()
            .any(|hit| hit.attacker == bandit && hit.target == hero)
    );
    assert!(scene.character(hero).unwrap().life() < 100);
}

#[test]
fn talking_runs_the_target_script_until_it_ends() {
    let mut scene = open_scene();
    scene.host_mut().set_script_seconds(0.5);
    let hero = scene.spawn(&definition(
        "hero",
        CharacterKind::Player,
        Relation::Friend,
        Position::new(2, 2),
    ));
    let mut elder = definition("elder", CharacterKind::Normal, Relation::Friend, Position::new(3, 2));
    elder.script = Some(ScriptRef("talk.txt".into()));
    let elder = scene.spawn(&elder);

    scene
        .command(hero, |hero, ctx| {
            hero.interact_with(InteractTarget::Character(elder), false, ctx)
        })
        .unwrap()
        .unwrap();

    assert_eq!(
        scene.log().interactions,
        vec![(hero, InteractTarget::Character(elder))]
    );
    let scripts = scene.host().script_log();
    assert_eq!(scripts.len(), 1);
    assert_eq!(scripts[0].script, ScriptRef("talk.txt".into()));
    assert_eq!(scripts[0].context, elder);
    assert!(scene.character(elder).unwrap().is_in_script());
    assert_eq!(
        scene.character(hero).unwrap().interacting_with(),
        Some(InteractTarget::Character(elder))
    );

    run(&mut scene, 2, 0.25);
    assert_eq!(scene.character(hero).unwrap().interacting_with(), None);
    assert!(!scene.character(elder).unwrap().is_in_script());
}

#[test]
fn objects_run_their_script_for_the_initiator() {
    let mut scene = open_scene();
    let hero = scene.spawn(&definition(
        "hero",
        CharacterKind::Player,
        Relation::Friend,
        Position::new(2, 2),
    ));
    scene.add_object(SceneObject {
        id: ObjectId(5),
        tile: Position::new(2, 3),
        interact_distance: 1,
        script: Some(ScriptRef("chest.txt".into())),
    });

    scene
        .command(hero, |hero, ctx| {
            hero.interact_with(InteractTarget::Object(ObjectId(5)), false, ctx)
        })
        .unwrap()
        .unwrap();

    let scripts = scene.host().script_log();
    assert_eq!(scripts.len(), 1);
    assert_eq!(scripts[0].script, ScriptRef("chest.txt".into()));
    assert_eq!(scripts[0].context, hero);
}

#[test]
fn dead_summons_leave_their_summoner() {
    let mut scene = open_scene();
    let hero = scene.spawn(&definition(
        "hero",
        CharacterKind::Player,
        Relation::Friend,
        Position::new(2, 2),
    ));
    let wolf = scene
        .summon(
            hero,
            EffectId(3),
            &definition("wolf", CharacterKind::Follower, Relation::Friend, Position::new(3, 3)),
        )
        .unwrap();
    assert_eq!(scene.character(hero).unwrap().dependents(), &[wolf]);

    scene
        .command(wolf, |wolf, ctx| wolf.take_damage(1_000, None, ctx))
        .unwrap()
        .unwrap();

    assert!(scene.character(hero).unwrap().dependents().is_empty());
    assert_eq!(scene.log().destroyed_effects, vec![(wolf, EffectId(3))]);
    assert_eq!(scene.log().deaths, vec![wolf]);
}

#[test]
fn losing_the_controller_aborts_the_tick() {
    let mut scene = open_scene();
    let puppet = scene.spawn(&definition(
        "puppet",
        CharacterKind::Normal,
        Relation::Neutral,
        Position::new(6, 6),
    ));
    let puppet_state = scene.character_mut(puppet).unwrap();
    puppet_state.set_controlled_by(None);
    puppet_state.set_life(10);
    assert!(puppet_state.set_poisoned(5.0, false));

    let error = scene.tick(0.3).unwrap_err();
    assert!(matches!(error, SceneError::Lifecycle(_)));
    assert_eq!(error.severity(), ErrorSeverity::Fatal);
    assert_eq!(scene.ticks(), 0);
}

#[test]
fn identical_scenes_replay_identically() {
    fn play() -> (Vec<(EntityId, Position, i32)>, Vec<MeleeHit>) {
        let mut scene = open_scene();
        scene.spawn(&definition(
            "hero",
            CharacterKind::Player,
            Relation::Friend,
            Position::new(5, 5),
        ));
        for (x, y) in [(2, 9), (8, 9), (5, 1)] {
            scene.spawn(&definition(
                "bandit",
                CharacterKind::Fighter,
                Relation::Enemy,
                Position::new(x, y),
            ));
        }
        run(&mut scene, 80, 1.0 / 30.0);
        let characters = scene
            .characters()
            .map(|c| (c.id(), c.tile(), c.life()))
            .collect();
        (characters, scene.log().melee_hits.clone())
    }

    let first = play();
    assert!(!first.1.is_empty());
    assert_eq!(first, play());
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn scenarios_load_and_run_from_a_data_directory() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "maps/field.ron", "(dimensions: (10, 6))");
    write(
        root,
        "npcres/person.ron",
        "{ Stand: (frames: 4, frame_interval: 0.25), Walk: (frames: 4, frame_interval: 0.1) }",
    );
    write(
        root,
        "npc/hero.ini",
        "[Init]\nName=Hero\nKind=2\nRelation=0\nMapX=1\nMapY=1\nNpcIni=person.ron\n",
    );
    write(
        root,
        "npc/elder.ini",
        "[Init]\nName=Elder\nKind=0\nRelation=0\nMapX=6\nMapY=1\nNpcIni=person.ron\nScriptFile=talk.txt\n",
    );
    write(
        root,
        "field.scenario.ron",
        r#"Scenario(
            map: "field.ron",
            characters: [
                (definition: "hero.ini"),
                (definition: "elder.ini"),
            ],
            commands: [
                (tick: 0, actor: 0, command: WalkTo((1, 1))),
                (tick: 1, actor: 0, command: Interact(target: 1)),
            ],
        )"#,
    );

    let scenario = Scenario::load(&root.join("field.scenario.ron")).unwrap();
    let mut scene = scenario.build(&ContentFactory::new(root)).unwrap();
    scenario.run(&mut scene, 120, 1.0 / 60.0).unwrap();

    let hero = scene.character(EntityId::PLAYER).unwrap();
    assert_eq!(hero.name(), "Hero");
    assert_eq!(hero.tile(), Position::new(5, 1));
    let scripts = scene.host().script_log();
    assert_eq!(scripts.len(), 1);
    assert_eq!(scripts[0].script, ScriptRef("talk.txt".into()));
    assert_eq!(scripts[0].context, EntityId(1));
}

#[test]
fn scenarios_with_unknown_maps_fail_to_build() {
    let dir = tempfile::tempdir().unwrap();
    let scenario = Scenario::parse("Scenario(map: \"nowhere.ron\")").unwrap();
    let error = scenario.build(&ContentFactory::new(dir.path())).unwrap_err();
    assert!(matches!(error, SceneError::InvalidScenario(_)));
}
