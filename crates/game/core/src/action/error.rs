//! Command and lifecycle errors.
//!
//! A rejected command leaves the character untouched apart from the
//! documented "no path, back to standing" fallback. Callers are free to
//! ignore `CommandError`; it exists for diagnostics and tests.

use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::state::EntityId;

// ============================================================================
// Command Errors
// ============================================================================

/// Why a command was not carried out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandError {
    /// A locking state, petrification, transport, carry or knockback is active.
    #[error("character cannot act right now")]
    ActionLocked,

    /// The destination is the tile the character already stands on.
    #[error("destination is the current tile")]
    SameTile,

    /// The pathfinder found no route.
    #[error("no path to destination")]
    NoPath,

    /// The matching fight, jump or run gate is closed.
    #[error("action is disabled")]
    Disabled,

    /// The state needed for the command has no animation resource.
    #[error("no animation for the requested state")]
    MissingAnimation,

    /// The destination tile is an obstacle.
    #[error("destination is blocked")]
    Blocked,

    /// The target no longer exists or cannot be targeted.
    #[error("target is gone")]
    TargetGone,

    /// Every tile around the interaction target is blocked.
    #[error("no free tile to approach the target from")]
    NoApproach,

    /// The role hook refused (not enough mana, neutral non-fighter).
    #[error("refused by role")]
    RoleRefused,

    /// The death sequence has started.
    #[error("character is dying")]
    Dying,
}

impl GameError for CommandError {
    fn severity(&self) -> ErrorSeverity {
        use CommandError::*;
        match self {
            ActionLocked | NoPath | Blocked | NoApproach | RoleRefused => {
                ErrorSeverity::Recoverable
            }
            SameTile | Disabled | MissingAnimation | TargetGone | Dying => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        use CommandError::*;
        match self {
            ActionLocked => "COMMAND_ACTION_LOCKED",
            SameTile => "COMMAND_SAME_TILE",
            NoPath => "COMMAND_NO_PATH",
            Disabled => "COMMAND_DISABLED",
            MissingAnimation => "COMMAND_MISSING_ANIMATION",
            Blocked => "COMMAND_BLOCKED",
            TargetGone => "COMMAND_TARGET_GONE",
            NoApproach => "COMMAND_NO_APPROACH",
            RoleRefused => "COMMAND_ROLE_REFUSED",
            Dying => "COMMAND_DYING",
        }
    }
}

// ============================================================================
// Lifecycle Errors
// ============================================================================

/// Invariant violations surfaced by the death sequence.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LifecycleError {
    /// Remote control ended but nobody holds the controls.
    #[error("{actor} was remotely controlled without a controller reference")]
    ControllerMissing {
        actor: EntityId,
        #[cfg_attr(feature = "serde", serde(skip))]
        context: ErrorContext,
    },
}

impl LifecycleError {
    pub fn controller_missing(actor: EntityId) -> Self {
        Self::ControllerMissing {
            actor,
            context: ErrorContext::for_actor(actor).noting("control released without a controller"),
        }
    }
}

impl GameError for LifecycleError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ControllerMissing { .. } => ErrorSeverity::Fatal,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::ControllerMissing { context, .. } => Some(context),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ControllerMissing { .. } => "LIFECYCLE_CONTROLLER_MISSING",
        }
    }
}
