//! Restore operations.
//!
//! Restoring is all-or-nothing. Every identity is validated and every blob
//! is decoded before the first mutation, and the mutations themselves run
//! inside a tree checkpoint, so any failure leaves the tree as it was.

use std::collections::HashSet;

use crate::codec::SnapshotCodec;
use crate::engine::{SnapshotEngine, TreeEntryList};
use crate::entry::RestoreSide;
use crate::error::{Result, SnapshotError};
use crate::selection::SelectionModel;
use crate::tree::{HierarchyTree, IdentityPolicy, transact};

/// Returns the first entry id that is not a live node.
fn first_missing<T: HierarchyTree + ?Sized>(list: &TreeEntryList<T>, tree: &T) -> Option<T::Id> {
    list.iter().map(|e| e.id).find(|&id| !tree.contains(id))
}

/// Collects `id` and all its live descendants.
fn collect_subtree<T: HierarchyTree + ?Sized>(tree: &T, id: T::Id, out: &mut HashSet<T::Id>) {
    out.insert(id);
    for &child in tree.children_of(Some(id)) {
        collect_subtree(tree, child, out);
    }
}

impl<C> SnapshotEngine<C> {
    /// Returns `true` if every entry of `list` names a live node of `tree`.
    pub fn validate<T>(&self, list: &TreeEntryList<T>, tree: &T) -> bool
    where
        T: HierarchyTree + ?Sized,
    {
        match first_missing(list, tree) {
            Some(id) => {
                log::debug!("Snapshot no longer applies: {id:?} is gone");
                false
            }
            None => true,
        }
    }

    fn decode_side<T>(&self, list: &TreeEntryList<T>, side: RestoreSide) -> Result<Vec<T::Content>>
    where
        T: HierarchyTree + ?Sized,
        C: SnapshotCodec<T>,
    {
        list.iter()
            .map(|entry| {
                let blob = entry.blob(side).ok_or_else(|| {
                    SnapshotError::ContractViolation(format!(
                        "no {side:?} state captured for {:?}",
                        entry.id
                    ))
                })?;
                self.codec().decode(blob)
            })
            .collect()
    }

    /// Replaces the content of every entry's node with its `side` state.
    ///
    /// Fails with [`SnapshotError::NotFound`] without touching the tree if
    /// any entry's node is gone. Returns the restored identities in capture
    /// order, which become the new selection.
    pub fn restore<T>(
        &self,
        list: &TreeEntryList<T>,
        tree: &mut T,
        side: RestoreSide,
    ) -> Result<Vec<T::Id>>
    where
        T: HierarchyTree + ?Sized,
        C: SnapshotCodec<T>,
    {
        if let Some(id) = first_missing(list, tree) {
            return Err(SnapshotError::not_found(id));
        }
        let contents = self.decode_side(list, side)?;

        transact(tree, |tree| {
            for (entry, content) in list.iter().zip(contents) {
                tree.replace_content(entry.id, content, &entry.external_refs)?;
            }
            Ok(())
        })?;

        log::debug!("Restored {:?} state of {} entities", side, list.len());
        Ok(list.ids())
    }

    /// Recreates every entry's subtree at its recorded position.
    ///
    /// Used when the captured nodes were deleted outright. Nodes that still
    /// exist are removed first, then each subtree is inserted with its
    /// original identities under its recorded parent, before its recorded
    /// anchor sibling. A stale anchor falls back to appending as the last
    /// child.
    ///
    /// Every recorded parent must be live and must not be removed by the
    /// restore itself.
    pub fn restore_with_reinsertion<T>(
        &self,
        list: &TreeEntryList<T>,
        tree: &mut T,
        side: RestoreSide,
    ) -> Result<Vec<T::Id>>
    where
        T: HierarchyTree + ?Sized,
        C: SnapshotCodec<T>,
    {
        let mut removed = HashSet::new();
        for entry in list {
            if tree.contains(entry.id) {
                collect_subtree(tree, entry.id, &mut removed);
            }
        }
        for entry in list {
            let Some(parent) = entry.parent_id else {
                continue;
            };
            if removed.contains(&parent) {
                return Err(SnapshotError::ContractViolation(format!(
                    "parent {parent:?} of {:?} is itself being restored",
                    entry.id
                )));
            }
            if !tree.contains(parent) {
                return Err(SnapshotError::not_found(parent));
            }
        }
        let contents = self.decode_side(list, side)?;

        transact(tree, |tree| {
            for entry in list {
                if tree.contains(entry.id) {
                    tree.remove_subtree(entry.id)?;
                }
            }

            // Reverse order: an anchor that is itself a restored entry comes
            // later in hierarchy order and must be back in place first.
            for (entry, content) in list.iter().zip(contents).rev() {
                let anchor = entry.anchor();
                if anchor.is_stale(tree) {
                    log::warn!(
                        "Anchor {:?} of {:?} is gone, appending to {:?} instead",
                        entry.anchor_id,
                        entry.id,
                        entry.parent_id
                    );
                }
                let before = anchor.live_next_sibling(tree);
                let id =
                    tree.insert_subtree(entry.parent_id, before, content, IdentityPolicy::Preserve)?;
                if id != entry.id {
                    return Err(SnapshotError::Tree(format!(
                        "{:?} was reinserted as {id:?}",
                        entry.id
                    )));
                }
            }
            Ok(())
        })?;

        log::debug!("Reinserted {:?} state of {} entities", side, list.len());
        Ok(list.ids())
    }

    /// [`restore`](Self::restore), then selects the restored nodes.
    ///
    /// The selection is left unchanged on failure.
    pub fn restore_into_selection<T, S>(
        &self,
        list: &TreeEntryList<T>,
        tree: &mut T,
        side: RestoreSide,
        selection: &mut S,
    ) -> Result<Vec<T::Id>>
    where
        T: HierarchyTree + ?Sized,
        C: SnapshotCodec<T>,
        S: SelectionModel<T::Id> + ?Sized,
    {
        let restored = self.restore(list, tree, side)?;
        selection.set_selected(restored.clone());
        Ok(restored)
    }

    /// [`restore_with_reinsertion`](Self::restore_with_reinsertion), then
    /// selects the restored nodes.
    pub fn restore_with_reinsertion_into_selection<T, S>(
        &self,
        list: &TreeEntryList<T>,
        tree: &mut T,
        side: RestoreSide,
        selection: &mut S,
    ) -> Result<Vec<T::Id>>
    where
        T: HierarchyTree + ?Sized,
        C: SnapshotCodec<T>,
        S: SelectionModel<T::Id> + ?Sized,
    {
        let restored = self.restore_with_reinsertion(list, tree, side)?;
        selection.set_selected(restored.clone());
        Ok(restored)
    }
}
