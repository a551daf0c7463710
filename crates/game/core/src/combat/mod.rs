//! Ability tables and the pure targeting rules built on them.
//!
//! - `AbilityTable`: abilities sorted by use-distance with derived levels
//! - `closest_use_distance` / `pick_with_use_distance` / `nearest_viable`:
//!   which ability to use from a given tile distance
//! - `plan_attack`: fire, approach or retreat

pub mod abilities;
pub mod targeting;

pub use abilities::{AbilityBinding, AbilityRef, AbilitySlot, AbilityTable};
pub use targeting::{
    AttackPlan, closest_use_distance, nearest_viable, pick_with_use_distance, plan_attack,
};
