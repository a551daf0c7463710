//! Content definitions and loaders for the character simulation.
//!
//! This crate turns authored data files into `actor-core` types:
//! - Character definitions (`Key=Value` files with optional sections)
//! - Level tables (`[LevelN]` sections)
//! - Patrol waypoint strings (`FixedPos=` hex)
//! - Per-state animation and sound tables (RON)
//! - Map layouts (RON)
//! - Simulation tuning (TOML)
//!
//! The text formats in [`ini`] and [`patrol`] have no dependencies beyond the
//! core. Everything that touches the filesystem or serde lives in [`loaders`].

pub mod ini;
pub mod patrol;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use ini::{IniDocument, IniSection};
pub use patrol::{decode_fixed_pos, encode_fixed_pos};

#[cfg(feature = "loaders")]
pub use loaders::{
    CharacterLoader, ConfigLoader, ContentFactory, LevelTableLoader, MapLoader, ResourceLoader,
};
