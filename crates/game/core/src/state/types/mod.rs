pub mod action_state;
pub mod appearance;
pub mod common;
pub mod config;
pub mod intent;
pub mod motion;
pub mod path;
pub mod status;

pub use action_state::ActionState;
pub use appearance::{AnimationClock, StateAsset, StateResources};
pub use common::{CarrierId, EffectId, EntityId, ObjectId, Position, TileTarget};
pub use config::{CharacterConfig, DeathAim};
pub use intent::{
    AttackRelease, AttackTarget, FightingFlag, MagicCast, Patrol, PendingAttack,
    PendingInteraction, RemoteControl, Summoner, TimerScript,
};
pub use motion::{ExternalMotion, FixedLine, SpeedBoost, StepMove};
pub use path::Path;
pub use status::{DeathVisual, StatusTimer, StatusTracker};
