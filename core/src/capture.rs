//! Capture operations.
//!
//! Capturing happens in two passes for one logical edit: [`capture_undo`]
//! before the edit records each top-level node with its anchor and its
//! "before" state; [`capture_redo`] after the edit fills in the "after"
//! state of the same entries, matched by identity.
//!
//! [`capture_undo`]: SnapshotEngine::capture_undo
//! [`capture_redo`]: SnapshotEngine::capture_redo

use crate::anchor::resolve_anchor;
use crate::codec::{Blob, SnapshotCodec, join_blobs};
use crate::engine::{SnapshotEngine, TreeEntryList};
use crate::entry::{Entry, EntryList};
use crate::error::{Result, SnapshotError};
use crate::order::{sort_by_hierarchy_order, top_level_selection};
use crate::tree::HierarchyTree;

impl<C> SnapshotEngine<C> {
    /// Captures the pre-edit state of the top-level nodes of `selection`.
    ///
    /// Read-only on the tree. An empty selection yields an empty list.
    pub fn capture_undo<T>(&self, tree: &T, selection: &[T::Id]) -> Result<TreeEntryList<T>>
    where
        T: HierarchyTree + ?Sized,
        C: SnapshotCodec<T>,
    {
        let items = top_level_selection(tree, selection)?;
        self.capture_ordered(tree, &items)
    }

    /// Captures the pre-edit state of an explicit list of nodes.
    ///
    /// Unlike [`capture_undo`](Self::capture_undo) the list is not reduced to
    /// top-level nodes; it is only put in hierarchy order.
    pub fn capture_undo_items<T>(&self, tree: &T, items: &[T::Id]) -> Result<TreeEntryList<T>>
    where
        T: HierarchyTree + ?Sized,
        C: SnapshotCodec<T>,
    {
        let items = sort_by_hierarchy_order(tree, items)?;
        self.capture_ordered(tree, &items)
    }

    fn capture_ordered<T>(&self, tree: &T, items: &[T::Id]) -> Result<TreeEntryList<T>>
    where
        T: HierarchyTree + ?Sized,
        C: SnapshotCodec<T>,
    {
        let mut list = EntryList::new();
        for &id in items {
            let anchor = resolve_anchor(tree, id)?;
            let (undo_blob, external_refs) = self.codec.encode(tree, id)?;
            list.push(Entry {
                id,
                parent_id: anchor.parent,
                anchor_id: anchor.next_sibling,
                undo_blob,
                redo_blob: None,
                external_refs,
            })?;
        }
        log::debug!("Captured undo state of {} entities", list.len());
        Ok(list)
    }

    /// Captures the post-edit state of the top-level nodes of `selection`
    /// into the entries recorded by a previous [`capture_undo`](Self::capture_undo).
    ///
    /// Every top-level node must already have an entry in `list`; otherwise
    /// the call fails with [`SnapshotError::ContractViolation`] and `list` is
    /// left untouched. An empty selection is a no-op.
    pub fn capture_redo<'l, T>(
        &self,
        tree: &T,
        selection: &[T::Id],
        list: &'l mut TreeEntryList<T>,
    ) -> Result<&'l mut TreeEntryList<T>>
    where
        T: HierarchyTree + ?Sized,
        C: SnapshotCodec<T>,
    {
        let items = top_level_selection(tree, selection)?;
        self.capture_redo_ordered(tree, &items, list)
    }

    /// Explicit-list counterpart of [`capture_redo`](Self::capture_redo).
    pub fn capture_redo_items<'l, T>(
        &self,
        tree: &T,
        items: &[T::Id],
        list: &'l mut TreeEntryList<T>,
    ) -> Result<&'l mut TreeEntryList<T>>
    where
        T: HierarchyTree + ?Sized,
        C: SnapshotCodec<T>,
    {
        let items = sort_by_hierarchy_order(tree, items)?;
        self.capture_redo_ordered(tree, &items, list)
    }

    fn capture_redo_ordered<'l, T>(
        &self,
        tree: &T,
        items: &[T::Id],
        list: &'l mut TreeEntryList<T>,
    ) -> Result<&'l mut TreeEntryList<T>>
    where
        T: HierarchyTree + ?Sized,
        C: SnapshotCodec<T>,
    {
        if items.is_empty() {
            return Ok(list);
        }
        if list.is_empty() {
            log::error!("Redo capture of {} entities without an undo capture", items.len());
            return Err(SnapshotError::ContractViolation(
                "redo capture on an empty entry list".into(),
            ));
        }

        let mut positions = Vec::with_capacity(items.len());
        for &id in items {
            let Some(position) = list.position(id) else {
                log::error!("Redo capture of {id:?} which has no undo entry");
                return Err(SnapshotError::ContractViolation(format!(
                    "{id:?} was not captured for undo"
                )));
            };
            positions.push(position);
        }

        let mut blobs = Vec::with_capacity(items.len());
        for (&id, position) in items.iter().zip(positions) {
            let (blob, _) = self.codec.encode(tree, id)?;
            blobs.push((position, blob));
        }
        for (position, blob) in blobs {
            list.set_redo_blob(position, blob);
        }

        log::debug!("Captured redo state of {} entities", items.len());
        Ok(list)
    }

    /// Captures the top-level nodes of `selection` into one transportable
    /// blob, without identity or anchor bookkeeping.
    ///
    /// Returns `None` when nothing is selected.
    pub fn capture_for_transport<T>(&self, tree: &T, selection: &[T::Id]) -> Result<Option<Blob>>
    where
        T: HierarchyTree + ?Sized,
        C: SnapshotCodec<T>,
    {
        let items = top_level_selection(tree, selection)?;
        self.encode_sequence(tree, &items)
    }

    /// Captures every root subtree into one blob, for comparing the whole
    /// document before and after an operation.
    pub fn capture_document<T>(&self, tree: &T) -> Result<Option<Blob>>
    where
        T: HierarchyTree + ?Sized,
        C: SnapshotCodec<T>,
    {
        let roots = tree.children_of(None).to_vec();
        self.encode_sequence(tree, &roots)
    }

    fn encode_sequence<T>(&self, tree: &T, items: &[T::Id]) -> Result<Option<Blob>>
    where
        T: HierarchyTree + ?Sized,
        C: SnapshotCodec<T>,
    {
        if items.is_empty() {
            return Ok(None);
        }
        let blobs = items
            .iter()
            .map(|&id| self.codec.encode(tree, id).map(|(blob, _)| blob))
            .collect::<Result<Vec<_>>>()?;
        join_blobs(&blobs).map(Some)
    }
}
