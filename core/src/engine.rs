//! The snapshot engine.
//!
//! [`SnapshotEngine`] owns the codec and exposes the capture operations
//! (see [`capture`](crate::capture)) and the restore operations
//! (see [`restore`](crate::restore)). The tree is passed to every call, so
//! one engine can serve several documents.

use crate::entry::EntryList;
use crate::tree::HierarchyTree;

/// Entry list keyed by the identities of tree `T`.
pub type TreeEntryList<T> = EntryList<<T as HierarchyTree>::Id, <T as HierarchyTree>::RefId>;

/// Capture/restore engine parameterized by a snapshot codec.
#[derive(Debug, Clone, Default)]
pub struct SnapshotEngine<C> {
    pub(crate) codec: C,
}

impl<C> SnapshotEngine<C> {
    /// Creates an engine that encodes and decodes subtrees with `codec`.
    pub fn new(codec: C) -> Self {
        Self { codec }
    }

    /// Returns the codec.
    pub fn codec(&self) -> &C {
        &self.codec
    }
}
