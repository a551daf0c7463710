//! Scripted commands a scenario issues to its characters.

use actor_core::env::to_pixel;
use actor_core::{
    AbilityRef, Character, CommandError, Direction8, EntityId, InteractTarget, LifecycleError,
    ObjectId, Position, SimContext,
};
use serde::{Deserialize, Serialize};

/// One command, as written in a scenario file.
///
/// Tiles are `(x, y)` pairs; characters and objects are referenced by id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    WalkTo((i32, i32)),
    RunTo((i32, i32)),
    JumpTo((i32, i32)),
    AttackAt {
        tile: (i32, i32),
        #[serde(default)]
        run: bool,
    },
    AttackCharacter {
        target: u32,
        #[serde(default)]
        run: bool,
    },
    Cast {
        ability: String,
        tile: (i32, i32),
        #[serde(default)]
        mana_cost: i32,
        #[serde(default)]
        target: Option<u32>,
    },
    Interact {
        target: u32,
        #[serde(default)]
        run: bool,
    },
    InteractObject {
        object: u32,
        #[serde(default)]
        run: bool,
    },
    SitDown,
    StopAtNextStep,
    WalkInDirection {
        direction: Direction8,
        steps: u32,
    },
    TakeDamage(i32),
    Poison(f32),
    Freeze(f32),
    Petrify(f32),
}

impl Command {
    /// Issues the command.
    ///
    /// The outer error is fatal and aborts the scenario. The inner one is a
    /// rejected command, which leaves the character as it was.
    pub fn apply(
        &self,
        character: &mut Character,
        ctx: &mut SimContext<'_>,
    ) -> Result<Result<(), CommandError>, LifecycleError> {
        let issued = match self {
            Self::WalkTo(tile) => character.walk_to(tile_of(*tile), ctx),
            Self::RunTo(tile) => character.run_to(tile_of(*tile), ctx),
            Self::JumpTo(tile) => character.jump_to(tile_of(*tile), ctx),
            Self::AttackAt { tile, run } => character.attack_at(tile_of(*tile), *run, ctx),
            Self::AttackCharacter { target, run } => {
                character.attack_character(EntityId(*target), *run, ctx)
            }
            Self::Cast {
                ability,
                tile,
                mana_cost,
                target,
            } => character.use_magic(
                AbilityRef::new(ability.clone()).with_mana_cost(*mana_cost),
                to_pixel(tile_of(*tile)),
                target.map(EntityId),
                ctx,
            ),
            Self::Interact { target, run } => {
                character.interact_with(InteractTarget::Character(EntityId(*target)), *run, ctx)
            }
            Self::InteractObject { object, run } => {
                character.interact_with(InteractTarget::Object(ObjectId(*object)), *run, ctx)
            }
            Self::SitDown => character.sit_down(ctx),
            Self::StopAtNextStep => {
                character.stop_at_next_step();
                Ok(())
            }
            Self::WalkInDirection { direction, steps } => {
                character.walk_in_direction(*direction, *steps, ctx)
            }
            Self::TakeDamage(amount) => {
                character.take_damage(*amount, None, ctx)?;
                Ok(())
            }
            Self::Poison(seconds) => applied(character.set_poisoned(*seconds, true)),
            Self::Freeze(seconds) => applied(character.set_frozen(*seconds, true)),
            Self::Petrify(seconds) => applied(character.set_petrified(*seconds, true)),
        };
        Ok(issued)
    }
}

fn tile_of((x, y): (i32, i32)) -> Position {
    Position::new(x, y)
}

/// Status setters report refusal with `false`; a dead or petrified
/// character refuses everything.
fn applied(accepted: bool) -> Result<(), CommandError> {
    if accepted {
        Ok(())
    } else {
        Err(CommandError::Disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_every_shape_from_ron() {
        let commands: Vec<Command> = ron::from_str(
            "[
                WalkTo((3, 4)),
                AttackAt(tile: (1, 1)),
                AttackCharacter(target: 2, run: true),
                Cast(ability: \"fireball\", tile: (6, 6), mana_cost: 10),
                InteractObject(object: 7),
                WalkInDirection(direction: NorthEast, steps: 2),
                SitDown,
                Poison(1.5),
            ]",
        )
        .unwrap();
        assert_eq!(commands[0], Command::WalkTo((3, 4)));
        assert_eq!(
            commands[1],
            Command::AttackAt {
                tile: (1, 1),
                run: false
            }
        );
        assert_eq!(
            commands[3],
            Command::Cast {
                ability: "fireball".into(),
                tile: (6, 6),
                mana_cost: 10,
                target: None,
            }
        );
        assert_eq!(
            commands[5],
            Command::WalkInDirection {
                direction: Direction8::NorthEast,
                steps: 2
            }
        );
        assert_eq!(commands[7], Command::Poison(1.5));
    }
}
