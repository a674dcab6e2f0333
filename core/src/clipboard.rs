//! Clipboard adapter.
//!
//! [`HierarchyClipboard`] moves blob sequences between the capture engine
//! and a [`ClipboardTransport`]. Payloads are tagged so that data placed on
//! the transport by other producers is never mistaken for a hierarchy
//! snapshot.

use std::fmt::Debug;

use crate::anchor::resolve_anchor;
use crate::codec::{Blob, SnapshotCodec, split_blobs};
use crate::config::ClipboardConfig;
use crate::engine::SnapshotEngine;
use crate::error::{Result, SnapshotError};
use crate::order::top_level_selection;
use crate::selection::SelectionModel;
use crate::tree::{HierarchyTree, IdentityPolicy, transact};

/// Payload tag used when no other tag is configured.
pub const DEFAULT_PAYLOAD_TAG: &str = "application/x-snapclip-hierarchy";

/// Byte transport holding at most one payload per tag.
pub trait ClipboardTransport {
    /// Stores `bytes` under `tag`, replacing whatever the transport held.
    fn set_payload(&mut self, tag: &str, bytes: Vec<u8>);

    /// Returns `true` if a payload tagged `tag` is present.
    fn has_payload(&self, tag: &str) -> bool;

    /// Returns a copy of the payload tagged `tag`.
    fn payload(&self, tag: &str) -> Option<Vec<u8>>;
}

/// Where pasted subtrees are inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteTarget<Id> {
    /// Appended as new roots.
    Root,
    /// Appended as the last children of the node.
    ChildOf(Id),
    /// Inserted under the node's parent, right after the node.
    SiblingOf(Id),
}

impl<Id: Copy + Eq + Debug> PasteTarget<Id> {
    /// Derives the paste target from the current selection.
    ///
    /// With `as_child` the subtrees go under the first top-level selected
    /// node, otherwise right after the last one. Nothing selected pastes
    /// at the root.
    pub fn from_selection<T>(tree: &T, selection: &[Id], as_child: bool) -> Result<Self>
    where
        T: HierarchyTree<Id = Id> + ?Sized,
    {
        let top = top_level_selection(tree, selection)?;
        let target = if as_child {
            top.first().map(|&id| Self::ChildOf(id))
        } else {
            top.last().map(|&id| Self::SiblingOf(id))
        };
        Ok(target.unwrap_or(Self::Root))
    }

    /// Returns the parent and insert-before sibling for this target.
    fn resolve<T>(&self, tree: &T) -> Result<(Option<Id>, Option<Id>)>
    where
        T: HierarchyTree<Id = Id> + ?Sized,
    {
        match *self {
            Self::Root => Ok((None, None)),
            Self::ChildOf(parent) => {
                if !tree.contains(parent) {
                    return Err(SnapshotError::not_found(parent));
                }
                Ok((Some(parent), None))
            }
            Self::SiblingOf(id) => {
                let anchor = resolve_anchor(tree, id)?;
                Ok((anchor.parent, anchor.next_sibling))
            }
        }
    }
}

/// Copy/paste of hierarchy snapshots through a tagged transport.
#[derive(Debug, Clone)]
pub struct HierarchyClipboard<X> {
    transport: X,
    tag: String,
}

impl<X: ClipboardTransport> HierarchyClipboard<X> {
    /// Creates an adapter using [`DEFAULT_PAYLOAD_TAG`].
    pub fn new(transport: X) -> Self {
        Self::with_tag(transport, DEFAULT_PAYLOAD_TAG)
    }

    pub fn with_tag(transport: X, tag: impl Into<String>) -> Self {
        Self {
            transport,
            tag: tag.into(),
        }
    }

    pub fn from_config(transport: X, config: &ClipboardConfig) -> Self {
        Self::with_tag(transport, config.payload_tag.clone())
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn transport(&self) -> &X {
        &self.transport
    }

    /// Places `blob` on the transport under this adapter's tag.
    pub fn publish(&mut self, blob: Blob) {
        log::info!("Publishing {} bytes as {}", blob.len(), self.tag);
        self.transport.set_payload(&self.tag, blob.into_bytes());
    }

    /// Returns `true` if the transport holds a payload with our tag.
    pub fn is_ours(&self) -> bool {
        self.transport.has_payload(&self.tag)
    }

    /// Returns the tagged payload, if any.
    pub fn fetch(&self) -> Option<Blob> {
        self.transport.payload(&self.tag).map(Blob::new)
    }

    /// Copies the top-level nodes of `selection` to the transport.
    ///
    /// Returns `false` when nothing was selected; the transport is left as
    /// it was in that case.
    pub fn copy<T, C>(
        &mut self,
        engine: &SnapshotEngine<C>,
        tree: &T,
        selection: &[T::Id],
    ) -> Result<bool>
    where
        T: HierarchyTree + ?Sized,
        C: SnapshotCodec<T>,
    {
        match engine.capture_for_transport(tree, selection)? {
            Some(blob) => {
                self.publish(blob);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Inserts the clipboard contents at `target` with fresh identities.
    ///
    /// Every subtree is decoded before the tree is touched, and a failed
    /// insert rolls back the ones before it. Returns the
    /// identities of the pasted top-level nodes in copy order; an empty or
    /// foreign clipboard pastes nothing.
    pub fn paste<T, C>(
        &self,
        engine: &SnapshotEngine<C>,
        tree: &mut T,
        target: PasteTarget<T::Id>,
    ) -> Result<Vec<T::Id>>
    where
        T: HierarchyTree + ?Sized,
        C: SnapshotCodec<T>,
    {
        let Some(blob) = self.fetch() else {
            log::warn!("Clipboard holds no {} payload, nothing to paste", self.tag);
            return Ok(Vec::new());
        };
        let contents = split_blobs(&blob)?
            .iter()
            .map(|part| engine.codec().decode(part))
            .collect::<Result<Vec<_>>>()?;
        let (parent, before) = target.resolve(tree)?;

        let pasted = transact(tree, |tree| {
            contents
                .into_iter()
                .map(|content| tree.insert_subtree(parent, before, content, IdentityPolicy::Fresh))
                .collect::<Result<Vec<_>>>()
        })?;

        log::info!("Pasted {} entities under {:?}", pasted.len(), parent);
        Ok(pasted)
    }

    /// Pastes relative to the current selection, then selects the pasted
    /// nodes.
    pub fn paste_into_selection<T, C, S>(
        &self,
        engine: &SnapshotEngine<C>,
        tree: &mut T,
        selection: &mut S,
        as_child: bool,
    ) -> Result<Vec<T::Id>>
    where
        T: HierarchyTree + ?Sized,
        C: SnapshotCodec<T>,
        S: SelectionModel<T::Id> + ?Sized,
    {
        let target = PasteTarget::from_selection(tree, &selection.selected(), as_child)?;
        let pasted = self.paste(engine, tree, target)?;
        if !pasted.is_empty() {
            selection.set_selected(pasted.clone());
        }
        Ok(pasted)
    }
}
