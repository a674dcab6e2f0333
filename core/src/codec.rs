//! Snapshot codec boundary and blob framing.
//!
//! A [`SnapshotCodec`] turns a live subtree into an opaque [`Blob`] and back.
//! Several blobs can be concatenated into one self-delimiting blob with
//! [`join_blobs`] and split back with [`split_blobs`]; each blob is framed
//! by a 4-byte little-endian length.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{Result, SnapshotError};
use crate::tree::HierarchyTree;

/// An encoded subtree snapshot.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Blob(Vec<u8>);

impl Blob {
    /// Wraps raw bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Returns the encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the blob, returning the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Returns the encoded size in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the blob holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Blob {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blob({} bytes)", self.0.len())
    }
}

/// Serializes subtrees of a [`HierarchyTree`] to blobs and back.
///
/// Implementations must round-trip: `decode(encode(x))` reconstructs content
/// behaviorally equivalent to `x`, including every descendant and every
/// reference identifier the subtree depends on.
pub trait SnapshotCodec<T: HierarchyTree + ?Sized> {
    /// Encodes the subtree rooted at `root`.
    ///
    /// Returns the blob and the set of external references used by the subtree.
    fn encode(&self, tree: &T, root: T::Id) -> Result<(Blob, BTreeSet<T::RefId>)>;

    /// Decodes a blob produced by [`encode`](Self::encode).
    fn decode(&self, blob: &Blob) -> Result<T::Content>;
}

const FRAME_HEADER: usize = 4;

/// Concatenates blobs into one self-delimiting blob.
pub fn join_blobs<'a>(blobs: impl IntoIterator<Item = &'a Blob>) -> Result<Blob> {
    let mut out = Vec::new();
    for blob in blobs {
        let len = u32::try_from(blob.len()).map_err(|_| {
            SnapshotError::Framing(format!("blob of {} bytes is too large", blob.len()))
        })?;
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(blob.as_bytes());
    }
    Ok(Blob(out))
}

/// Splits a blob built by [`join_blobs`] back into its parts.
pub fn split_blobs(joined: &Blob) -> Result<Vec<Blob>> {
    let mut rest = joined.as_bytes();
    let mut blobs = Vec::new();
    while !rest.is_empty() {
        let Some((header, body)) = rest.split_first_chunk::<FRAME_HEADER>() else {
            return Err(SnapshotError::Framing(format!(
                "truncated frame header ({} trailing bytes)",
                rest.len()
            )));
        };
        let len = u32::from_le_bytes(*header) as usize;
        if body.len() < len {
            return Err(SnapshotError::Framing(format!(
                "frame declares {len} bytes but only {} remain",
                body.len()
            )));
        }
        let (frame, tail) = body.split_at(len);
        blobs.push(Blob(frame.to_vec()));
        rest = tail;
    }
    Ok(blobs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_and_split_preserve_count_and_order() {
        let parts = vec![
            Blob::new(b"alpha".to_vec()),
            Blob::new(Vec::new()),
            Blob::new(b"gamma".to_vec()),
        ];
        let joined = join_blobs(&parts).unwrap();
        assert_eq!(joined.len(), 3 * FRAME_HEADER + 10);
        assert_eq!(split_blobs(&joined).unwrap(), parts);
    }

    #[test]
    fn split_empty_blob_is_empty_sequence() {
        assert!(split_blobs(&Blob::default()).unwrap().is_empty());
    }

    #[test]
    fn split_rejects_truncated_header() {
        let err = split_blobs(&Blob::new(vec![1, 0])).unwrap_err();
        assert!(matches!(err, SnapshotError::Framing(_)));
    }

    #[test]
    fn split_rejects_truncated_body() {
        let mut bytes = 10u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(b"short");
        let err = split_blobs(&Blob::new(bytes)).unwrap_err();
        assert!(matches!(err, SnapshotError::Framing(_)));
    }

    #[test]
    fn blob_debug_hides_contents() {
        assert_eq!(format!("{:?}", Blob::new(vec![0; 3])), "Blob(3 bytes)");
    }
}
