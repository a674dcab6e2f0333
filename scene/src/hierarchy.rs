//! Parent-child hierarchy operations.
//!
//! All operations keep each node's parent link consistent with its
//! parent's ordered child list (or with the scene's root list).
//!
//! # Usage
//!
//! ```ignore
//! set_parent(&mut scene, child, parent)?;
//! move_before(&mut scene, child, Some(parent), Some(sibling))?;
//! remove_parent(&mut scene, child)?;
//! despawn_recursive(&mut scene, entity);
//! ```

use snapclip_core::{Result, SnapshotError};

use crate::{Entity, Scene};

/// Sets `entity` as the last child of `parent`.
///
/// If `entity` already has a different parent, it is removed from the old
/// parent's children first. Does nothing if `parent` is already its parent.
///
/// Fails if either entity is dead, or if `parent` is `entity` itself or one
/// of its descendants.
pub fn set_parent(scene: &mut Scene, entity: Entity, parent: Entity) -> Result<()> {
    if scene.parent(entity) == Some(parent) && scene.is_alive(entity) {
        return Ok(());
    }
    move_before(scene, entity, Some(parent), None)
}

/// Moves `entity` under `parent` (`None` for the root level), immediately
/// before `before`, or last if `before` is `None` or not a child of
/// `parent`.
pub fn move_before(
    scene: &mut Scene,
    entity: Entity,
    parent: Option<Entity>,
    before: Option<Entity>,
) -> Result<()> {
    if !scene.is_alive(entity) {
        return Err(SnapshotError::not_found(entity));
    }
    if let Some(parent) = parent {
        if !scene.is_alive(parent) {
            return Err(SnapshotError::not_found(parent));
        }
        if parent == entity || scene.ancestors(parent).any(|a| a == entity) {
            return Err(SnapshotError::Tree(format!(
                "cannot parent {entity} under its own subtree ({parent})"
            )));
        }
    }
    if before == Some(entity) {
        return Ok(());
    }

    scene.detach(entity);
    scene.attach(entity, parent, before);
    Ok(())
}

/// Turns `entity` into the last root.
///
/// Does nothing if `entity` is already a root.
pub fn remove_parent(scene: &mut Scene, entity: Entity) -> Result<()> {
    if !scene.is_alive(entity) {
        return Err(SnapshotError::not_found(entity));
    }
    if scene.parent(entity).is_none() {
        return Ok(());
    }
    scene.detach(entity);
    scene.attach(entity, None, None);
    Ok(())
}

/// Despawns an entity and all its descendants recursively.
///
/// First removes the entity from its parent's children list (or the
/// roots), then despawns the entity and all descendants depth-first.
/// Returns `false` if the entity was not alive.
pub fn despawn_recursive(scene: &mut Scene, entity: Entity) -> bool {
    if !scene.is_alive(entity) {
        return false;
    }
    scene.detach(entity);
    scene.despawn_subtree(entity);
    true
}
