//! Serialized subtree data structures.
//!
//! A [`SerializedSubtree`] is the on-wire representation of one scene node
//! and all its descendants. It can be encoded to RON or bincode via the
//! [`format`](super::format) module.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use super::error::FormatError;
use crate::components::AssetRef;
use crate::entity::Entity;
use crate::value::Value;

/// A fully serialized subtree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializedSubtree {
    /// Serialized nodes in pre-order. Index 0 is the root.
    pub nodes: Vec<SerializedNode>,
}

/// A single node's serialized data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializedNode {
    /// The original entity index (for identity restore and remapping).
    pub entity_index: u32,
    /// The original entity spawn tick (for identity restore and remapping).
    pub entity_spawn_tick: u64,
    /// Index of the parent within [`SerializedSubtree::nodes`]; `None` for the root.
    pub parent: Option<u32>,
    pub name: String,
    /// Properties in key order.
    pub properties: Vec<(String, Value)>,
    pub asset: Option<AssetRef>,
}

impl SerializedNode {
    /// Returns the entity this node was captured from.
    pub fn entity(&self) -> Entity {
        Entity::new(self.entity_index, self.entity_spawn_tick)
    }
}

impl SerializedSubtree {
    /// Returns the number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the root node.
    pub fn root(&self) -> Option<&SerializedNode> {
        self.nodes.first()
    }

    /// Returns every asset referenced anywhere in the subtree.
    pub fn assets(&self) -> BTreeSet<AssetRef> {
        self.nodes.iter().filter_map(|n| n.asset.clone()).collect()
    }

    /// Checks the structural invariants decoded data must satisfy.
    ///
    /// The first node is the only one without a parent, every parent index
    /// points at an earlier node, and no entity appears twice.
    pub fn validate(&self) -> Result<(), FormatError> {
        let Some(root) = self.root() else {
            return Err(FormatError::Malformed("subtree has no nodes".into()));
        };
        if root.parent.is_some() {
            return Err(FormatError::Malformed("root node has a parent".into()));
        }

        let mut seen = HashSet::with_capacity(self.nodes.len());
        for (index, node) in self.nodes.iter().enumerate() {
            if !seen.insert(node.entity()) {
                return Err(FormatError::Malformed(format!(
                    "{:?} appears twice",
                    node.entity()
                )));
            }
            if index == 0 {
                continue;
            }
            match node.parent {
                Some(parent) if (parent as usize) < index => {}
                Some(parent) => {
                    return Err(FormatError::Malformed(format!(
                        "node {index} has parent {parent} which does not precede it"
                    )));
                }
                None => {
                    return Err(FormatError::Malformed(format!(
                        "node {index} has no parent"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(index: u32, parent: Option<u32>) -> SerializedNode {
        SerializedNode {
            entity_index: index,
            entity_spawn_tick: 0,
            parent,
            name: format!("n{index}"),
            properties: Vec::new(),
            asset: None,
        }
    }

    #[test]
    fn well_formed_subtree_validates() {
        let subtree = SerializedSubtree {
            nodes: vec![node(4, None), node(5, Some(0)), node(6, Some(1))],
        };
        assert!(subtree.validate().is_ok());
        assert_eq!(subtree.root().unwrap().entity(), Entity::new(4, 0));
    }

    #[test]
    fn rejects_empty_and_forward_parents() {
        let empty = SerializedSubtree { nodes: Vec::new() };
        assert!(matches!(empty.validate(), Err(FormatError::Malformed(_))));

        let forward = SerializedSubtree {
            nodes: vec![node(1, None), node(2, Some(2)), node(3, Some(0))],
        };
        assert!(matches!(forward.validate(), Err(FormatError::Malformed(_))));
    }

    #[test]
    fn rejects_duplicate_entities() {
        let subtree = SerializedSubtree {
            nodes: vec![node(1, None), node(1, Some(0))],
        };
        assert!(matches!(subtree.validate(), Err(FormatError::Malformed(_))));
    }

    #[test]
    fn collects_assets() {
        let mut root = node(1, None);
        root.asset = Some(AssetRef::new("fonts/title.ttf"));
        let mut child = node(2, Some(0));
        child.asset = Some(AssetRef::new("fonts/title.ttf"));
        let subtree = SerializedSubtree {
            nodes: vec![root, child],
        };
        assert_eq!(subtree.assets().len(), 1);
    }
}
