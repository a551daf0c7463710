//! Severity and context shared by every actor-core error.
//!
//! The concrete errors live next to the operations that raise them:
//! [`CommandError`](crate::CommandError) for rejected commands and
//! [`LifecycleError`](crate::LifecycleError) for broken lifecycle invariants.
//! A rejected command never leaves a character half-updated, so callers are
//! free to ignore it. Only lifecycle invariants are `Fatal`.

use crate::state::EntityId;

/// How a caller should treat an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum ErrorSeverity {
    /// Might succeed on a later tick: no path yet, locked by an animation.
    Recoverable,
    /// Meaningless for the character right now: same tile, missing animation.
    Validation,
    /// Bookkeeping went out of sync.
    Internal,
    /// Content or engine bug. The simulation has to stop.
    Fatal,
}

impl ErrorSeverity {
    pub const fn is_fatal(self) -> bool {
        matches!(self, Self::Fatal)
    }

    /// Internal and fatal errors point at a bug rather than a game situation.
    pub const fn is_bug(self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Diagnostics attached to an error. Not serialized.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ErrorContext {
    pub actor: Option<EntityId>,
    pub note: Option<&'static str>,
}

impl ErrorContext {
    #[must_use]
    pub const fn for_actor(actor: EntityId) -> Self {
        Self {
            actor: Some(actor),
            note: None,
        }
    }

    #[must_use]
    pub const fn noting(mut self, note: &'static str) -> Self {
        self.note = Some(note);
        self
    }
}

/// Implemented by every error enum in the workspace.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Stable identifier for logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
