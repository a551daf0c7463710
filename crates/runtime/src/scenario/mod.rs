//! Scenario system for character placement and scripted input.
//!
//! A scenario names a map, places character definitions and objects on it,
//! and schedules commands by tick. Map terrain comes from the content
//! directory; everything that moves comes from the scenario.
//!
//! ```text
//! Scenario(
//!     map: "yard.ron",
//!     characters: [
//!         (definition: "hero.ini", tile: Some((2, 2))),
//!         (definition: "bandit.ini"),
//!     ],
//!     objects: [(id: 1, tile: (6, 2), script: Some("chest.txt"))],
//!     commands: [(tick: 0, actor: 0, command: WalkTo((6, 3)))],
//! )
//! ```
mod command;

pub use command::Command;

use std::path::Path;

use actor_content::ContentFactory;
use actor_core::env::ScriptRef;
use actor_core::{Character, EntityId, ObjectId, Position};
use serde::{Deserialize, Serialize};

use crate::api::{Result, SceneError};
use crate::scene::{Scene, SceneObject};

/// A character definition placed on the map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// File under the content directory's `npc/`.
    pub definition: String,
    /// Overrides the definition's `MapX`/`MapY`.
    #[serde(default)]
    pub tile: Option<(i32, i32)>,
    /// Fixed id; allocated by the scene when absent.
    #[serde(default)]
    pub id: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectPlacement {
    pub id: u32,
    pub tile: (i32, i32),
    #[serde(default = "default_interact_distance")]
    pub interact_distance: u32,
    #[serde(default)]
    pub script: Option<String>,
}

fn default_interact_distance() -> u32 {
    1
}

/// A command issued to `actor` right before tick number `tick` runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduledCommand {
    pub tick: u64,
    pub actor: u32,
    pub command: Command,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// File under the content directory's `maps/`.
    pub map: String,
    #[serde(default)]
    pub characters: Vec<Placement>,
    #[serde(default)]
    pub objects: Vec<ObjectPlacement>,
    #[serde(default)]
    pub commands: Vec<ScheduledCommand>,
    /// Simulated seconds every script keeps running.
    #[serde(default)]
    pub script_seconds: f32,
}

impl Scenario {
    pub fn parse(content: &str) -> Result<Self> {
        ron::from_str(content).map_err(|e| {
            SceneError::InvalidScenario(format!("Failed to parse scenario RON: {}", e))
        })
    }

    /// Load scenario from a RON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SceneError::InvalidScenario(format!(
                "Failed to read scenario file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content)
    }

    /// Loads the map, tuning and every placed definition into a new scene.
    pub fn build(&self, factory: &ContentFactory) -> Result<Scene> {
        let config = factory
            .load_config()
            .map_err(|e| SceneError::InvalidScenario(format!("{:#}", e)))?;
        let map = factory.load_map(&self.map).map_err(|e| {
            SceneError::InvalidScenario(format!("Failed to load map '{}': {:#}", self.map, e))
        })?;

        let mut scene = Scene::new(map, config);
        scene.host_mut().set_script_seconds(self.script_seconds);

        tracing::info!(
            "Building scene on {} with {} characters and {} objects",
            self.map,
            self.characters.len(),
            self.objects.len()
        );

        for placement in &self.characters {
            let mut definition = factory.load_character(&placement.definition).map_err(|e| {
                SceneError::InvalidScenario(format!(
                    "Failed to load character '{}': {:#}",
                    placement.definition, e
                ))
            })?;
            if let Some((x, y)) = placement.tile {
                definition.tile = Position::new(x, y);
            }
            match placement.id {
                Some(id) => scene.insert(Character::from_config(EntityId(id), &definition))?,
                None => {
                    scene.spawn(&definition);
                }
            }
        }

        for object in &self.objects {
            scene.add_object(SceneObject {
                id: ObjectId(object.id),
                tile: Position::new(object.tile.0, object.tile.1),
                interact_distance: object.interact_distance,
                script: object.script.clone().map(ScriptRef),
            });
        }

        Ok(scene)
    }

    /// Runs `ticks` ticks of `dt` seconds, issuing each scheduled command
    /// right before its tick.
    ///
    /// Rejected commands are logged and skipped. Commands for characters
    /// that are not in the scene are errors.
    pub fn run(&self, scene: &mut Scene, ticks: u64, dt: f32) -> Result<()> {
        for _ in 0..ticks {
            let now = scene.ticks();
            for scheduled in self.commands.iter().filter(|c| c.tick == now) {
                let actor = EntityId(scheduled.actor);
                let issued =
                    scene.command(actor, |character, ctx| scheduled.command.apply(character, ctx))??;
                if let Err(error) = issued {
                    tracing::debug!(
                        "tick {}: {} rejected {:?}: {}",
                        now,
                        actor,
                        scheduled.command,
                        error
                    );
                }
            }
            scene.tick(dt)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_scenario_uses_defaults() {
        let scenario = Scenario::parse("Scenario(map: \"empty.ron\")").unwrap();
        assert_eq!(scenario.map, "empty.ron");
        assert!(scenario.characters.is_empty());
        assert!(scenario.commands.is_empty());
        assert_eq!(scenario.script_seconds, 0.0);
    }

    #[test]
    fn object_distance_defaults_to_one() {
        let scenario = Scenario::parse(
            "Scenario(map: \"m.ron\", objects: [(id: 4, tile: (2, 3))], \
             characters: [(definition: \"a.ini\", id: Some(9))])",
        )
        .unwrap();
        assert_eq!(scenario.objects[0].interact_distance, 1);
        assert_eq!(scenario.objects[0].script, None);
        assert_eq!(scenario.characters[0].id, Some(9));
        assert_eq!(scenario.characters[0].tile, None);
    }

    #[test]
    fn malformed_files_are_invalid_scenarios() {
        let error = Scenario::parse("Scenario(").unwrap_err();
        assert!(matches!(error, SceneError::InvalidScenario(_)));
    }
}
