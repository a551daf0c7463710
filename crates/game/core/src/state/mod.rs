//! Character state representation.
//!
//! [`Character`] owns everything one simulated actor remembers between ticks.
//! The supporting value types (paths, status timers, resources, pending
//! intents) live in [`types`].
pub mod character;
pub mod types;

pub use character::{Character, DisabledActions};
pub use types::{
    ActionState, AnimationClock, AttackRelease, AttackTarget, CarrierId, CharacterConfig,
    DeathAim, DeathVisual, EffectId, EntityId, ExternalMotion, FightingFlag, FixedLine, MagicCast,
    ObjectId, Path, Patrol, PendingAttack, PendingInteraction, Position, RemoteControl,
    SpeedBoost, StateAsset, StateResources, StatusTimer, StatusTracker, StepMove, Summoner,
    TileTarget, TimerScript,
};
