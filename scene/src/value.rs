//! Node property values.
//!
//! [`Value`] is the format-agnostic representation of a node property. It
//! can hold references to other entities, which are collected and remapped
//! when a subtree is pasted with fresh identities.

use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// Property value stored on a scene node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    String(String),
    List(Vec<Value>),
    Map(Vec<(String, Value)>),
    /// An entity reference (serialized for later remapping).
    Entity { index: u32, spawn_tick: u64 },
}

impl Value {
    /// Wraps an entity reference.
    pub fn entity(entity: Entity) -> Self {
        Self::Entity {
            index: entity.index(),
            spawn_tick: entity.spawn_tick(),
        }
    }

    /// Returns the referenced entity if this is an entity reference.
    pub fn as_entity(&self) -> Option<Entity> {
        match *self {
            Self::Entity { index, spawn_tick } => Some(Entity::new(index, spawn_tick)),
            _ => None,
        }
    }

    /// Remap entity references stored in this value.
    pub fn remap_entities(&mut self, map: &mut dyn FnMut(Entity) -> Entity) {
        match self {
            Self::Entity { .. } => {
                if let Some(entity) = self.as_entity() {
                    *self = Self::entity(map(entity));
                }
            }
            Self::List(items) => items.iter_mut().for_each(|v| v.remap_entities(map)),
            Self::Map(entries) => entries
                .iter_mut()
                .for_each(|(_, v)| v.remap_entities(map)),
            _ => {}
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::I64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Entity> for Value {
    fn from(entity: Entity) -> Self {
        Self::entity(entity)
    }
}
