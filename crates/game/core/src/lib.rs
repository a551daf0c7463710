//! Deterministic per-character simulation for a tile-based action RPG.
//!
//! `actor-core` defines one character's behavioural state machine: motion
//! along planned paths, the action states and their transitions, combat
//! targeting, status effects, interaction and death. Everything the character
//! needs from the rest of the world comes in through the collaborator traits
//! in [`env`]; everything it does to the world goes out as [`env::HostEvent`]s.
//! Characters are driven by [`Character::update`] once per tick and by the
//! command methods in [`action`].
pub mod action;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod role;
pub mod state;
pub mod stats;
pub mod traits;

pub use action::{CommandError, LifecycleError};
pub use combat::{AbilityBinding, AbilityRef, AbilitySlot, AbilityTable, AttackPlan};
pub use config::SimConfig;
pub use env::{
    ActorSnapshot, CharacterDirectory, Direction8, DirectorySnapshot, FixedRng, GridMap,
    GridPathFinder, HostEvent, InteractTarget, MapDimensions, MapOracle, ObjectSnapshot,
    PathFinder, PathStyle, PcgRng, RecordingHost, RngOracle, SimContext, SimEnv, SimHost,
    StaticTile, TerrainKind,
};
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use role::{Goal, GoalSelector, Role};
pub use state::{
    ActionState, Character, CharacterConfig, DeathAim, DeathVisual, DisabledActions, EntityId,
    ObjectId, Position, StateAsset, StateResources,
};
pub use stats::{CombatStats, LevelDetail, LevelTable, Progression, ResourceMeter, Vitals};
pub use traits::{CharacterKind, Relation};
