use std::collections::BTreeSet;

use snapclip_core::{Blob, CodecConfig, Result, SnapshotCodec, SnapshotError};

use super::format::{Format, decode, encode, encode_pretty};
use super::subtree_io::SerializedSubtree;
use crate::components::AssetRef;
use crate::entity::Entity;
use crate::scene::Scene;

/// Snapshot codec for [`Scene`] subtrees.
///
/// Blobs hold one [`SerializedSubtree`] in the configured [`Format`].
/// Decoded subtrees are validated before they are handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneCodec {
    format: Format,
    pretty: bool,
}

impl SceneCodec {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    /// Pretty-print text formats.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Builds a codec from configuration.
    ///
    /// Fails with [`SnapshotError::Config`] if the configured format is not
    /// compiled in.
    pub fn from_config(config: &CodecConfig) -> Result<Self> {
        let format = Format::from_config(config.format)?;
        Ok(Self::new(format).with_pretty(config.pretty))
    }

    pub fn format(&self) -> Format {
        self.format
    }
}

impl SnapshotCodec<Scene> for SceneCodec {
    fn encode(&self, scene: &Scene, root: Entity) -> Result<(Blob, BTreeSet<AssetRef>)> {
        let subtree = scene
            .extract_subtree(root)
            .ok_or_else(|| SnapshotError::not_found(root))?;
        let bytes = if self.pretty {
            encode_pretty(&subtree, self.format)?
        } else {
            encode(&subtree, self.format)?
        };
        Ok((Blob::new(bytes), subtree.assets()))
    }

    fn decode(&self, blob: &Blob) -> Result<SerializedSubtree> {
        let subtree: SerializedSubtree = decode(blob.as_bytes(), self.format)?;
        subtree.validate()?;
        Ok(subtree)
    }
}
