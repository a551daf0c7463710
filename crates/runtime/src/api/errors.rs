//! Unified error type surfaced by the scene API.
//!
//! Wraps lifecycle failures raised inside character updates together with
//! the scene's own bookkeeping and scenario loading failures.
use actor_core::{EntityId, ErrorSeverity, GameError, LifecycleError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SceneError>;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("no character with id {0}")]
    UnknownCharacter(EntityId),

    #[error("character id {0} is already in the scene")]
    DuplicateCharacter(EntityId),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("host events still pending after {rounds} dispatch rounds")]
    EventCascade { rounds: usize },
}

impl GameError for SceneError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownCharacter(_) | Self::DuplicateCharacter(_) | Self::InvalidScenario(_) => {
                ErrorSeverity::Validation
            }
            Self::Lifecycle(error) => error.severity(),
            Self::EventCascade { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCharacter(_) => "SCENE_UNKNOWN_CHARACTER",
            Self::DuplicateCharacter(_) => "SCENE_DUPLICATE_CHARACTER",
            Self::Lifecycle(error) => error.error_code(),
            Self::InvalidScenario(_) => "SCENE_INVALID_SCENARIO",
            Self::EventCascade { .. } => "SCENE_EVENT_CASCADE",
        }
    }
}
