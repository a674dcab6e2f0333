//! In-memory scene hierarchy.
//!
//! A [`Scene`] owns named nodes with ordered children, a property map per
//! node, and an optional asset reference. It implements
//! [`HierarchyTree`] so the snapshot engine can capture and replay
//! subtrees of it.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use snapclip_core::{HierarchyTree, IdentityPolicy, Result, SnapshotError};

use crate::components::{AssetRef, Name};
use crate::entity::{Entity, EntityAllocator};
use crate::serialize::{SerializedNode, SerializedSubtree};
use crate::value::Value;

#[derive(Clone)]
pub(crate) struct Node {
    pub(crate) name: Name,
    pub(crate) properties: BTreeMap<String, Value>,
    pub(crate) asset: Option<AssetRef>,
    pub(crate) parent: Option<Entity>,
    pub(crate) children: Vec<Entity>,
}

/// An editable tree of entities.
#[derive(Clone, Default)]
pub struct Scene {
    allocator: EntityAllocator,
    nodes: HashMap<Entity, Node>,
    roots: Vec<Entity>,
    /// Assets kept loaded on behalf of the nodes and restored snapshots.
    assets: BTreeSet<AssetRef>,
    tick: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a new root node, appended after the existing roots.
    ///
    /// Fails with [`SnapshotError::Tree`] once the entity index space is
    /// exhausted.
    pub fn spawn(&mut self, name: impl Into<String>) -> Result<Entity> {
        let entity = self.allocate()?;
        self.insert_node(entity, Name::new(name), None);
        self.roots.push(entity);
        Ok(entity)
    }

    /// Spawns a new node as the last child of `parent`.
    pub fn spawn_child(&mut self, parent: Entity, name: impl Into<String>) -> Result<Entity> {
        if !self.is_alive(parent) {
            return Err(SnapshotError::not_found(parent));
        }
        let entity = self.allocate()?;
        self.insert_node(entity, Name::new(name), Some(parent));
        self.attach(entity, Some(parent), None);
        Ok(entity)
    }

    fn allocate(&mut self) -> Result<Entity> {
        self.tick += 1;
        self.allocator.allocate(self.tick).ok_or_else(index_space_exhausted)
    }

    fn insert_node(&mut self, entity: Entity, name: Name, parent: Option<Entity>) {
        self.nodes.insert(
            entity,
            Node {
                name,
                properties: BTreeMap::new(),
                asset: None,
                parent,
                children: Vec::new(),
            },
        );
    }

    /// Returns whether the entity is currently alive.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.allocator.is_alive(entity)
    }

    /// Returns the number of alive entities.
    pub fn entity_count(&self) -> u32 {
        self.allocator.count()
    }

    /// Returns the ordered root entities.
    pub fn roots(&self) -> &[Entity] {
        &self.roots
    }

    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.nodes.get(&entity).and_then(|n| n.parent)
    }

    /// Returns the ordered children of `entity` (empty for dead entities).
    pub fn children(&self, entity: Entity) -> &[Entity] {
        self.nodes
            .get(&entity)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Iterates from the parent of `entity` up to its root.
    pub fn ancestors(&self, entity: Entity) -> impl Iterator<Item = Entity> + '_ {
        std::iter::successors(self.parent(entity), move |&e| self.parent(e))
    }

    /// Returns `entity` and all its descendants in pre-order.
    pub fn descendants(&self, entity: Entity) -> Vec<Entity> {
        let mut out = Vec::new();
        let mut stack = vec![entity];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(&current) {
                out.push(current);
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    pub fn name(&self, entity: Entity) -> Option<&Name> {
        self.nodes.get(&entity).map(|n| &n.name)
    }

    pub fn set_name(&mut self, entity: Entity, name: impl Into<String>) -> Result<()> {
        self.node_mut(entity)?.name = Name::new(name);
        Ok(())
    }

    /// Returns the first entity named `name` in document order.
    pub fn find(&self, name: &str) -> Option<Entity> {
        self.roots
            .iter()
            .flat_map(|&root| self.descendants(root))
            .find(|&e| self.name(e).is_some_and(|n| n.as_str() == name))
    }

    pub fn property(&self, entity: Entity, key: &str) -> Option<&Value> {
        self.nodes.get(&entity).and_then(|n| n.properties.get(key))
    }

    pub fn set_property(
        &mut self,
        entity: Entity,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<()> {
        self.node_mut(entity)?
            .properties
            .insert(key.into(), value.into());
        Ok(())
    }

    pub fn remove_property(&mut self, entity: Entity, key: &str) -> Result<Option<Value>> {
        Ok(self.node_mut(entity)?.properties.remove(key))
    }

    pub fn asset(&self, entity: Entity) -> Option<&AssetRef> {
        self.nodes.get(&entity).and_then(|n| n.asset.as_ref())
    }

    /// Sets the asset of `entity`, loading it into the registry.
    pub fn set_asset(&mut self, entity: Entity, asset: Option<AssetRef>) -> Result<()> {
        if let Some(asset) = &asset {
            self.assets.insert(asset.clone());
        }
        self.node_mut(entity)?.asset = asset;
        Ok(())
    }

    /// Returns the assets currently loaded.
    pub fn loaded_assets(&self) -> &BTreeSet<AssetRef> {
        &self.assets
    }

    pub fn is_asset_loaded(&self, asset: &AssetRef) -> bool {
        self.assets.contains(asset)
    }

    /// Drops an asset from the registry.
    pub fn unload_asset(&mut self, asset: &AssetRef) -> bool {
        self.assets.remove(asset)
    }

    fn node_mut(&mut self, entity: Entity) -> Result<&mut Node> {
        self.nodes
            .get_mut(&entity)
            .ok_or_else(|| SnapshotError::not_found(entity))
    }

    // ---- structural primitives shared with `hierarchy` ----

    /// Unlinks `entity` from its parent's children (or from the roots).
    pub(crate) fn detach(&mut self, entity: Entity) {
        let Some(parent) = self.nodes.get(&entity).map(|n| n.parent) else {
            return;
        };
        match parent {
            Some(parent) => {
                if let Some(node) = self.nodes.get_mut(&parent) {
                    node.children.retain(|&e| e != entity);
                }
            }
            None => self.roots.retain(|&e| e != entity),
        }
        if let Some(node) = self.nodes.get_mut(&entity) {
            node.parent = None;
        }
    }

    /// Links a detached `entity` under `parent`, before `before` if that is
    /// one of its children, otherwise last.
    pub(crate) fn attach(&mut self, entity: Entity, parent: Option<Entity>, before: Option<Entity>) {
        if let Some(node) = self.nodes.get_mut(&entity) {
            node.parent = parent;
        }
        let siblings = match parent {
            Some(parent) => match self.nodes.get_mut(&parent) {
                Some(node) => &mut node.children,
                None => return,
            },
            None => &mut self.roots,
        };
        let at = before
            .and_then(|b| siblings.iter().position(|&s| s == b))
            .unwrap_or(siblings.len());
        siblings.insert(at, entity);
    }

    /// Despawns `entity` and its descendants. The caller detaches it first.
    pub(crate) fn despawn_subtree(&mut self, entity: Entity) {
        let Some(node) = self.nodes.remove(&entity) else {
            return;
        };
        for child in node.children {
            self.despawn_subtree(child);
        }
        self.allocator.deallocate(entity);
    }

    // ---- snapshots ----

    /// Serializes `root` and its descendants, or `None` if `root` is dead.
    pub fn extract_subtree(&self, root: Entity) -> Option<SerializedSubtree> {
        if !self.is_alive(root) {
            return None;
        }
        let mut nodes = Vec::new();
        let mut stack = vec![(root, None)];
        while let Some((entity, parent)) = stack.pop() {
            let node = self.nodes.get(&entity)?;
            let index = nodes.len() as u32;
            nodes.push(SerializedNode {
                entity_index: entity.index(),
                entity_spawn_tick: entity.spawn_tick(),
                parent,
                name: node.name.0.clone(),
                properties: node
                    .properties
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
                asset: node.asset.clone(),
            });
            for &child in node.children.iter().rev() {
                stack.push((child, Some(index)));
            }
        }
        Some(SerializedSubtree { nodes })
    }

    /// Spawns a copy of `subtree` with new identities under `parent`,
    /// before `before` (or last).
    ///
    /// Entity references that point inside the subtree are remapped to the
    /// new entities. References that point outside are left unchanged.
    ///
    /// Returns the new root.
    pub fn instantiate_subtree(
        &mut self,
        subtree: SerializedSubtree,
        parent: Option<Entity>,
        before: Option<Entity>,
    ) -> Result<Entity> {
        subtree.validate()?;
        if let Some(parent) = parent
            && !self.is_alive(parent)
        {
            return Err(SnapshotError::not_found(parent));
        }

        self.tick += 1;
        let fresh = self
            .allocator
            .allocate_many(subtree.len(), self.tick)
            .ok_or_else(index_space_exhausted)?;
        let mapping: HashMap<Entity, Entity> = subtree
            .nodes
            .iter()
            .map(|n| n.entity())
            .zip(fresh.iter().copied())
            .collect();

        for (index, mut node) in subtree.nodes.into_iter().enumerate() {
            for (_, value) in &mut node.properties {
                value.remap_entities(&mut |e| *mapping.get(&e).unwrap_or(&e));
            }
            let entity = fresh[index];
            match node.parent {
                None => {
                    self.write_node(entity, node, parent);
                    self.attach(entity, parent, before);
                }
                Some(p) => {
                    let node_parent = fresh[p as usize];
                    self.write_node(entity, node, Some(node_parent));
                    self.push_child(node_parent, entity);
                }
            }
        }

        Ok(fresh[0])
    }

    /// Creates or overwrites the node data of `entity`, keeping its children.
    fn write_node(&mut self, entity: Entity, node: SerializedNode, parent: Option<Entity>) {
        if let Some(asset) = &node.asset {
            self.assets.insert(asset.clone());
        }
        let children = self
            .nodes
            .remove(&entity)
            .map(|n| n.children)
            .unwrap_or_default();
        self.nodes.insert(
            entity,
            Node {
                name: Name(node.name),
                properties: node.properties.into_iter().collect(),
                asset: node.asset,
                parent,
                children,
            },
        );
    }

    fn push_child(&mut self, parent: Entity, child: Entity) {
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
    }

    /// Returns the identities recorded in `nodes`, checking each is alive or
    /// can be revived in this scene.
    fn recorded_entities(&self, nodes: &[SerializedNode]) -> Result<Vec<Entity>> {
        nodes
            .iter()
            .map(|node| {
                let entity = node.entity();
                if self.is_alive(entity) || self.allocator.can_revive(entity) {
                    Ok(entity)
                } else {
                    Err(SnapshotError::Tree(format!(
                        "{entity:?} was never spawned in this scene"
                    )))
                }
            })
            .collect()
    }

    /// Fails if `entity` or one of its ancestors would be rebuilt as a
    /// descendant of the restored subtree.
    fn check_not_inside(&self, entity: Entity, keep: &HashSet<Entity>) -> Result<()> {
        if std::iter::once(entity)
            .chain(self.ancestors(entity))
            .any(|e| keep.contains(&e))
        {
            return Err(SnapshotError::Tree(format!(
                "{entity:?} lies inside the subtree being restored"
            )));
        }
        Ok(())
    }

    /// Empties the child list of `entity`, recursively. Descendants in
    /// `keep` stay alive but detached; all others are despawned.
    fn release_children(&mut self, entity: Entity, keep: &HashSet<Entity>) {
        let children = self
            .nodes
            .get_mut(&entity)
            .map(|n| std::mem::take(&mut n.children))
            .unwrap_or_default();
        for child in children {
            self.release_children(child, keep);
            if keep.contains(&child) {
                if let Some(node) = self.nodes.get_mut(&child) {
                    node.parent = None;
                }
            } else {
                self.nodes.remove(&child);
                self.allocator.deallocate(child);
            }
        }
    }

    /// Rebuilds the recorded descendants under their recorded identities.
    ///
    /// `descendants` yields `nodes[1..]` of a validated subtree; `ids[0]`
    /// must already be in place.
    fn rebuild_descendants(
        &mut self,
        ids: &[Entity],
        descendants: impl Iterator<Item = SerializedNode>,
    ) {
        for (index, node) in (1..).zip(descendants) {
            let entity = ids[index];
            if !self.is_alive(entity) {
                self.allocator.revive(entity);
            }
            // Parent indices precede their children (checked by `validate`).
            let parent = node.parent.map_or(ids[0], |p| ids[p as usize]);
            self.write_node(entity, node, Some(parent));
            self.push_child(parent, entity);
        }
    }

    /// Detaches every live descendant recorded in the snapshot from wherever
    /// it currently sits, so it can be rebuilt in place.
    fn gather_recorded(&mut self, ids: &[Entity], keep: &HashSet<Entity>) {
        for &entity in &ids[1..] {
            if self.is_alive(entity) {
                self.detach(entity);
                self.release_children(entity, keep);
            }
        }
    }

    fn replace_with(&mut self, id: Entity, subtree: SerializedSubtree) -> Result<()> {
        subtree.validate()?;
        if !self.is_alive(id) {
            return Err(SnapshotError::not_found(id));
        }
        let mut ids = vec![id];
        ids.extend(self.recorded_entities(&subtree.nodes[1..])?);
        let keep: HashSet<Entity> = ids.iter().copied().collect();
        let keep_below: HashSet<Entity> = ids[1..].iter().copied().collect();
        self.check_not_inside(id, &keep_below)?;

        self.release_children(id, &keep);
        self.gather_recorded(&ids, &keep);

        let mut nodes = subtree.nodes.into_iter();
        if let Some(root) = nodes.next() {
            let parent = self.parent(id);
            self.write_node(id, root, parent);
        }
        self.rebuild_descendants(&ids, nodes);
        Ok(())
    }

    fn insert_preserved(
        &mut self,
        subtree: SerializedSubtree,
        parent: Option<Entity>,
        before: Option<Entity>,
    ) -> Result<Entity> {
        subtree.validate()?;
        if let Some(parent) = parent
            && !self.is_alive(parent)
        {
            return Err(SnapshotError::not_found(parent));
        }
        let ids = self.recorded_entities(&subtree.nodes)?;
        let root = ids[0];
        if self.is_alive(root) {
            return Err(SnapshotError::Tree(format!("{root:?} is still alive")));
        }
        let keep: HashSet<Entity> = ids.iter().copied().collect();
        if let Some(parent) = parent {
            self.check_not_inside(parent, &keep)?;
        }

        self.gather_recorded(&ids, &keep);

        let mut nodes = subtree.nodes.into_iter();
        if let Some(root_node) = nodes.next() {
            self.allocator.revive(root);
            self.write_node(root, root_node, parent);
            self.attach(root, parent, before);
        }
        self.rebuild_descendants(&ids, nodes);
        Ok(root)
    }
}

fn index_space_exhausted() -> SnapshotError {
    SnapshotError::Tree("entity index space exhausted".into())
}

impl HierarchyTree for Scene {
    type Id = Entity;
    type RefId = AssetRef;
    type Content = SerializedSubtree;
    type Checkpoint = Box<Scene>;

    fn contains(&self, id: Entity) -> bool {
        self.is_alive(id)
    }

    fn parent_of(&self, id: Entity) -> Option<Entity> {
        self.parent(id)
    }

    fn children_of(&self, parent: Option<Entity>) -> &[Entity] {
        match parent {
            Some(parent) => self.children(parent),
            None => &self.roots,
        }
    }

    fn replace_content(
        &mut self,
        id: Entity,
        content: SerializedSubtree,
        refs: &BTreeSet<AssetRef>,
    ) -> Result<()> {
        self.replace_with(id, content)?;
        self.assets.extend(refs.iter().cloned());
        Ok(())
    }

    fn insert_subtree(
        &mut self,
        parent: Option<Entity>,
        anchor: Option<Entity>,
        content: SerializedSubtree,
        identity: IdentityPolicy,
    ) -> Result<Entity> {
        match identity {
            IdentityPolicy::Preserve => self.insert_preserved(content, parent, anchor),
            IdentityPolicy::Fresh => self.instantiate_subtree(content, parent, anchor),
        }
    }

    fn remove_subtree(&mut self, id: Entity) -> Result<()> {
        if crate::hierarchy::despawn_recursive(self, id) {
            Ok(())
        } else {
            Err(SnapshotError::not_found(id))
        }
    }

    fn checkpoint(&self) -> Box<Scene> {
        Box::new(self.clone())
    }

    fn rollback(&mut self, checkpoint: Box<Scene>) {
        *self = *checkpoint;
    }
}
