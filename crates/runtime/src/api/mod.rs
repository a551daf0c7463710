//! Types downstream callers of the scene interact with.
mod errors;

pub use errors::{Result, SceneError};
