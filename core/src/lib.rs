//! # snapclip core
//!
//! Snapshot-based copy/paste and undo/redo for trees of addressable
//! entities.
//!
//! Instead of replaying discrete edit operations, every affected subtree is
//! captured as a serialized [`Blob`] together with its identity and its
//! position (parent plus following sibling). Restoring replays the blob
//! into the live tree. Clipboard transfers and undo/redo share the same
//! [`EntryList`] format and the same replay path.
//!
//! The crate owns no tree data. Callers supply a [`HierarchyTree`], a
//! [`SnapshotCodec`] for it, and optionally a [`SelectionModel`] and a
//! [`ClipboardTransport`].
//!
//! ```ignore
//! let engine = SnapshotEngine::new(codec);
//! let mut list = engine.capture_undo(&tree, &selection)?;
//! edit(&mut tree);
//! engine.capture_redo(&tree, &selection, &mut list)?;
//!
//! engine.restore(&list, &mut tree, RestoreSide::Undo)?;
//! ```

pub mod anchor;
pub mod capture;
pub mod clipboard;
pub mod codec;
pub mod config;
pub mod engine;
pub mod entry;
pub mod error;
pub mod order;
pub mod restore;
pub mod selection;
pub mod tree;

#[cfg(test)]
mod testing;

pub use anchor::{Anchor, resolve_anchor};
pub use clipboard::{ClipboardTransport, DEFAULT_PAYLOAD_TAG, HierarchyClipboard, PasteTarget};
pub use codec::{Blob, SnapshotCodec, join_blobs, split_blobs};
pub use config::{
    ClipboardConfig, CodecConfig, CodecFormat, SnapshotConfig, load_config, load_or_default,
};
pub use engine::{SnapshotEngine, TreeEntryList};
pub use entry::{Entry, EntryList, RestoreSide};
pub use error::{Result, SnapshotError};
pub use order::{sort_by_hierarchy_order, top_level_selection};
pub use selection::SelectionModel;
pub use tree::{HierarchyTree, IdentityPolicy};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
