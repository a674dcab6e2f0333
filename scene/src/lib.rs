//! # snapclip scene
//!
//! Reference collaborators for [`snapclip_core`]: an in-memory [`Scene`]
//! hierarchy, the [`SceneCodec`] that snapshots its subtrees in RON or
//! bincode, a [`MemoryClipboard`] transport and a [`SceneSelection`].
//!
//! ```ignore
//! let mut scene = Scene::new();
//! let root = scene.spawn("Root")?;
//! let button = scene.spawn_child(root, "Button")?;
//!
//! let engine = SnapshotEngine::new(SceneCodec::new(Format::Ron));
//! let mut clipboard = HierarchyClipboard::new(MemoryClipboard::new());
//! clipboard.copy(&engine, &scene, &[button])?;
//! clipboard.paste(&engine, &mut scene, PasteTarget::ChildOf(root))?;
//! ```

pub mod clipboard;
pub mod components;
pub mod entity;
pub mod hierarchy;
pub mod scene;
pub mod selection;
pub mod serialize;
pub mod value;

pub use clipboard::MemoryClipboard;
pub use components::{AssetRef, Name};
pub use entity::Entity;
pub use hierarchy::{despawn_recursive, move_before, remove_parent, set_parent};
pub use scene::Scene;
pub use selection::SceneSelection;
pub use serialize::{Format, FormatError, SceneCodec, SerializedNode, SerializedSubtree};
pub use value::Value;
