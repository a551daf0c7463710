//! Read-only view of the other characters and objects in the scene.
//!
//! A character never touches another character directly. It sees them through
//! the [`CharacterDirectory`] snapshot rebuilt by the owning scene before each
//! update, and asks for cross-character effects through host events.

use std::collections::BTreeMap;

use glam::Vec2;

use crate::state::{CarrierId, EntityId, ObjectId, Position};
use crate::traits::{CharacterKind, Relation};

/// What a character may interact with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InteractTarget {
    Character(EntityId),
    Object(ObjectId),
}

/// Snapshot of another character as seen by the updating one.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorSnapshot {
    pub id: EntityId,
    pub tile: Position,
    pub position: Vec2,
    pub kind: CharacterKind,
    pub relation: Relation,
    /// False once the death sequence has started.
    pub alive: bool,
    /// Hidden or transported characters are not valid targets.
    pub visible: bool,
    pub life: i32,
    pub life_max: i32,
    /// Tile distance at which this character can be talked to.
    pub interact_distance: u32,
}

impl ActorSnapshot {
    /// Whether this character can be attacked or talked to right now.
    pub fn is_targetable(&self) -> bool {
        self.alive && self.visible
    }
}

/// Snapshot of an inert interactable object.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectSnapshot {
    pub id: ObjectId,
    pub tile: Position,
    pub interact_distance: u32,
}

/// Everything a character can look up about its surroundings.
pub trait CharacterDirectory {
    /// All characters in the scene, ordered by id.
    fn actors(&self) -> &[ActorSnapshot];

    fn objects(&self) -> &[ObjectSnapshot];

    /// Current pixel position of a carrying magic sprite.
    fn carrier_position(&self, carrier: CarrierId) -> Option<Vec2>;

    fn actor(&self, id: EntityId) -> Option<&ActorSnapshot> {
        self.actors().iter().find(|actor| actor.id == id)
    }

    fn object(&self, id: ObjectId) -> Option<&ObjectSnapshot> {
        self.objects().iter().find(|object| object.id == id)
    }

    /// Tile and interaction distance of an interaction target, if it still exists.
    fn interact_info(&self, target: InteractTarget) -> Option<(Position, u32)> {
        match target {
            InteractTarget::Character(id) => self
                .actor(id)
                .filter(|actor| actor.is_targetable())
                .map(|actor| (actor.tile, actor.interact_distance)),
            InteractTarget::Object(id) => self
                .object(id)
                .map(|object| (object.tile, object.interact_distance)),
        }
    }
}

/// Owned directory built by the scene each tick.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectorySnapshot {
    pub actors: Vec<ActorSnapshot>,
    pub objects: Vec<ObjectSnapshot>,
    pub carriers: BTreeMap<CarrierId, Vec2>,
}

impl DirectorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the snapshot for `actor.id`, keeping id order.
    pub fn upsert_actor(&mut self, actor: ActorSnapshot) {
        match self.actors.binary_search_by_key(&actor.id, |a| a.id) {
            Ok(index) => self.actors[index] = actor,
            Err(index) => self.actors.insert(index, actor),
        }
    }

    pub fn push_object(&mut self, object: ObjectSnapshot) {
        self.objects.push(object);
    }

    pub fn set_carrier(&mut self, carrier: CarrierId, position: Option<Vec2>) {
        match position {
            Some(position) => {
                self.carriers.insert(carrier, position);
            }
            None => {
                self.carriers.remove(&carrier);
            }
        }
    }
}

impl CharacterDirectory for DirectorySnapshot {
    fn actors(&self) -> &[ActorSnapshot] {
        &self.actors
    }

    fn objects(&self) -> &[ObjectSnapshot] {
        &self.objects
    }

    fn carrier_position(&self, carrier: CarrierId) -> Option<Vec2> {
        self.carriers.get(&carrier).copied()
    }
}
