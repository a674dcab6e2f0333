//! Serialization of scene subtrees.
//!
//! This module provides:
//!
//! - [`SerializedSubtree`] / [`SerializedNode`]: on-wire subtree representation
//! - [`Format`] / [`encode`] / [`decode`]: format-specific I/O (feature-gated)
//! - [`SceneCodec`]: the snapshot codec for [`Scene`](crate::Scene)

mod codec;
mod error;
mod format;
mod subtree_io;

pub use codec::SceneCodec;
pub use error::FormatError;
pub use format::Format;
pub use subtree_io::{SerializedNode, SerializedSubtree};

// Re-export format functions
pub use format::{decode, encode, encode_pretty};
