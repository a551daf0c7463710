//! Scene orchestration for the per-character simulation.
//!
//! This crate owns the characters of one map and drives them tick by tick.
//! The [`Scene`] is the single authority for cross-character effects: it
//! rebuilds the directory snapshot and map occupancy before every character
//! update, then resolves the host events the update emitted (melee damage,
//! interaction entry points, summon bookkeeping, corpses).
//!
//! Modules are organized by responsibility:
//! - [`scene`] hosts the character collection and event dispatch
//! - [`host`] implements the core's side-effect sink for a scene
//! - [`scenario`] loads scripted scenarios for the `actor-sim` harness
//! - [`api`] exposes the error types downstream callers handle
//! - [`logging`] sets up the tracing subscriber
pub mod api;
pub mod host;
pub mod logging;
pub mod scenario;
pub mod scene;

pub use api::{Result, SceneError};
pub use host::{ScriptRecord, SceneHost};
pub use scenario::{Command, ObjectPlacement, Placement, Scenario, ScheduledCommand};
pub use scene::{AbilityUse, Corpse, MeleeHit, Scene, SceneLog, SceneObject};
