//! Live-tree collaborator interface.
//!
//! The engine never owns nodes. It reads identities and sibling order from
//! a [`HierarchyTree`] and asks it to replace, insert or remove subtrees.

use std::collections::BTreeSet;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::Result;

/// How [`HierarchyTree::insert_subtree`] assigns identities to the inserted nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityPolicy {
    /// Resurrect the identities recorded in the snapshot (undo of a deletion).
    Preserve,
    /// Mint new identities and remap references internal to the subtree (paste).
    Fresh,
}

/// A tree of addressable entities that snapshots can be captured from and
/// replayed into.
///
/// Root nodes have no parent; `children_of(None)` lists them in document
/// order.
///
/// The engine applies several mutations per restore or paste. It takes a
/// [`checkpoint`](Self::checkpoint) first and rolls back to it if any
/// mutation fails, so a batch is never left half applied.
pub trait HierarchyTree {
    /// Stable identity of one entity for the lifetime of an edit session.
    type Id: Copy + Eq + Hash + Debug;

    /// Opaque identifier of an external dependency (e.g. a shared asset).
    type RefId: Clone + Ord + Debug;

    /// Decoded subtree content, as produced by the codec.
    type Content;

    /// Saved tree state that [`rollback`](Self::rollback) returns to.
    type Checkpoint;

    /// Returns `true` if `id` names a live node.
    fn contains(&self, id: Self::Id) -> bool;

    /// Returns the parent of `id`, or `None` for roots and unknown ids.
    fn parent_of(&self, id: Self::Id) -> Option<Self::Id>;

    /// Returns the ordered children of `parent`, or the ordered roots for `None`.
    ///
    /// Unknown parents have no children.
    fn children_of(&self, parent: Option<Self::Id>) -> &[Self::Id];

    /// Replaces the content (including all descendants) of the live node `id`.
    ///
    /// `refs` lists the external references the content depends on, so the
    /// tree can keep them resolvable.
    fn replace_content(
        &mut self,
        id: Self::Id,
        content: Self::Content,
        refs: &BTreeSet<Self::RefId>,
    ) -> Result<()>;

    /// Inserts a decoded subtree under `parent` immediately before `anchor`
    /// (or as the last child when `anchor` is `None`).
    ///
    /// Returns the identity of the inserted top-level node.
    fn insert_subtree(
        &mut self,
        parent: Option<Self::Id>,
        anchor: Option<Self::Id>,
        content: Self::Content,
        identity: IdentityPolicy,
    ) -> Result<Self::Id>;

    /// Removes `id` and all its descendants from the tree.
    fn remove_subtree(&mut self, id: Self::Id) -> Result<()>;

    /// Records the current state before a batch of mutations.
    fn checkpoint(&self) -> Self::Checkpoint;

    /// Returns the tree to the state recorded by `checkpoint`, discarding
    /// every mutation made since.
    fn rollback(&mut self, checkpoint: Self::Checkpoint);

    /// Returns the position of `id` among its siblings.
    fn sibling_index(&self, id: Self::Id) -> Option<usize> {
        self.children_of(self.parent_of(id))
            .iter()
            .position(|&sibling| sibling == id)
    }
}

/// Runs `apply` on `tree`, rolling the tree back if it fails.
pub(crate) fn transact<T, R>(tree: &mut T, apply: impl FnOnce(&mut T) -> Result<R>) -> Result<R>
where
    T: HierarchyTree + ?Sized,
{
    let checkpoint = tree.checkpoint();
    let result = apply(tree);
    if let Err(err) = &result {
        log::warn!("Rolling back partially applied batch: {err}");
        tree.rollback(checkpoint);
    }
    result
}
