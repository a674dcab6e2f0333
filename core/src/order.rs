//! Hierarchy order index and top-level selection reduction.
//!
//! Snapshot order must not depend on the order in which the user clicked
//! nodes, so every capture sorts its nodes by document order: roots in root
//! order, then each parent's children left to right, recursively
//! (pre-order).

use std::collections::HashSet;

use crate::error::{Result, SnapshotError};
use crate::tree::HierarchyTree;

/// Returns the sibling-index path from the root level down to `id`.
///
/// Comparing paths lexicographically yields pre-order document order.
fn hierarchy_path<T: HierarchyTree + ?Sized>(tree: &T, id: T::Id) -> Result<Vec<usize>> {
    if !tree.contains(id) {
        return Err(SnapshotError::not_found(id));
    }

    let mut path = Vec::new();
    let mut current = id;
    loop {
        let index = tree.sibling_index(current).ok_or_else(|| {
            SnapshotError::Tree(format!("{current:?} is missing from its parent's children"))
        })?;
        path.push(index);
        match tree.parent_of(current) {
            Some(parent) => current = parent,
            None => break,
        }
    }
    path.reverse();
    Ok(path)
}

/// Orders `ids` by their position in the tree.
///
/// Duplicates collapse to a single occurrence. Fails with
/// [`SnapshotError::NotFound`] if any id is not in the tree.
pub fn sort_by_hierarchy_order<T: HierarchyTree + ?Sized>(
    tree: &T,
    ids: &[T::Id],
) -> Result<Vec<T::Id>> {
    let mut seen = HashSet::with_capacity(ids.len());
    let mut keyed = Vec::with_capacity(ids.len());
    for &id in ids {
        if seen.insert(id) {
            keyed.push((hierarchy_path(tree, id)?, id));
        }
    }
    keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(keyed.into_iter().map(|(_, id)| id).collect())
}

/// Returns `true` if any strict ancestor of `id` is in `set`.
fn has_selected_ancestor<T: HierarchyTree + ?Sized>(
    tree: &T,
    id: T::Id,
    set: &HashSet<T::Id>,
) -> bool {
    let mut current = tree.parent_of(id);
    while let Some(ancestor) = current {
        if set.contains(&ancestor) {
            return true;
        }
        current = tree.parent_of(ancestor);
    }
    false
}

/// Reduces a selection to its top-level nodes in hierarchy order.
///
/// A node is dropped if one of its ancestors is also selected, since its
/// content is already part of the ancestor's snapshot.
pub fn top_level_selection<T: HierarchyTree + ?Sized>(
    tree: &T,
    selection: &[T::Id],
) -> Result<Vec<T::Id>> {
    let set: HashSet<T::Id> = selection.iter().copied().collect();
    let mut top_level = Vec::with_capacity(selection.len());
    for &id in selection {
        if !tree.contains(id) {
            return Err(SnapshotError::not_found(id));
        }
        if !has_selected_ancestor(tree, id, &set) {
            top_level.push(id);
        }
    }
    sort_by_hierarchy_order(tree, &top_level)
}
