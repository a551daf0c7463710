//! Headless harness: loads a scenario, runs it, prints what happened.
use std::path::PathBuf;

use actor_content::ContentFactory;
use actor_runtime::{Scenario, Scene, logging};
use anyhow::{Context, Result};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "actor-sim", about = "Run a character scenario without a renderer")]
struct Args {
    /// Content directory holding maps/, npc/, npcres/, level/ and config.toml
    #[arg(long, default_value = "data")]
    data: PathBuf,

    /// Scenario file (RON)
    #[arg(long)]
    scenario: PathBuf,

    /// Number of ticks to run
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Seconds per tick
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();

    let scenario = Scenario::load(&args.scenario)
        .with_context(|| format!("loading {}", args.scenario.display()))?;
    let factory = ContentFactory::new(&args.data);
    let mut scene = scenario.build(&factory).context("building the scene")?;

    scenario
        .run(&mut scene, args.ticks, args.dt)
        .with_context(|| format!("running {}", args.scenario.display()))?;

    print_summary(&scene);
    Ok(())
}

fn print_summary(scene: &Scene) {
    println!(
        "{} ticks, {:.2}s simulated",
        scene.ticks(),
        scene.elapsed()
    );
    for character in scene.characters() {
        println!(
            "  {:>3} {:<16} {:<10} tile {:<8} life {}/{}",
            character.id(),
            character.name(),
            character.state(),
            character.tile(),
            character.life(),
            character.life_max()
        );
    }

    let log = scene.log();
    println!(
        "abilities {}, melee hits {}, interactions {}, deaths {}, corpses {}",
        log.abilities.len(),
        log.melee_hits.len(),
        log.interactions.len(),
        log.deaths.len(),
        log.corpses.len()
    );
    for script in scene.host().script_log() {
        println!("  script {} for {}", script.script.0, script.context);
    }
}
