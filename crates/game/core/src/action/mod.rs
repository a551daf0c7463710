//! Commands and state transitions of a character.
//!
//! # Module Structure
//!
//! - `transition`: the action guard, state entry and coming to rest
//! - `movement`: walk, run, jump, step-moves, sitting
//! - `combat`: attack pursuit, attack and magic states
//! - `interact`: interaction with characters and objects
//! - `lifecycle`: damage, hurting, experience and death
//! - `status`: frozen, poisoned and petrified entry points
//! - `error`: [`CommandError`] and [`LifecycleError`]
//!
//! Every command is an inherent method on [`Character`](crate::state::Character)
//! taking a [`SimContext`](crate::env::SimContext). Commands check
//! [`perform_action_ok`](crate::state::Character::perform_action_ok) first and
//! return an error without touching the character when it fails.

mod combat;
pub mod error;
mod interact;
mod lifecycle;
mod movement;
mod status;
mod transition;

pub use error::{CommandError, LifecycleError};

pub(crate) use combat::AimPoint;
