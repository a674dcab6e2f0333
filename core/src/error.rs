//! Error types for snapshot capture and restore.

use thiserror::Error;

/// Errors produced by the capture/restore engine and its collaborators.
///
/// Identities are rendered with their `Debug` representation so the error
/// type stays independent of the concrete tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// An identity referenced by an entry or a selection is not in the live tree.
    #[error("entity not found: {0}")]
    NotFound(String),

    /// The calling transaction broke the capture protocol
    /// (e.g. redo capture without a matching undo capture).
    #[error("contract violation: {0}")]
    ContractViolation(String),

    /// A blob could not be encoded or decoded.
    #[error("codec failure: {0}")]
    Codec(String),

    /// A blob sequence is truncated or malformed.
    #[error("malformed blob sequence: {0}")]
    Framing(String),

    /// The tree collaborator refused an operation.
    #[error("tree operation failed: {0}")]
    Tree(String),

    /// A configuration file could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),
}

impl SnapshotError {
    /// Builds a [`SnapshotError::NotFound`] from any debuggable identity.
    pub fn not_found(id: impl std::fmt::Debug) -> Self {
        Self::NotFound(format!("{id:?}"))
    }

    /// Returns `true` for errors caused by a missing entity.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type for snapshot operations.
pub type Result<T, E = SnapshotError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            SnapshotError::not_found(42u32).to_string(),
            "entity not found: 42"
        );
        assert_eq!(
            SnapshotError::ContractViolation("empty entry list".into()).to_string(),
            "contract violation: empty entry list"
        );
        assert_eq!(
            SnapshotError::Codec("bad header".into()).to_string(),
            "codec failure: bad header"
        );
    }

    #[test]
    fn not_found_predicate() {
        assert!(SnapshotError::not_found("x").is_not_found());
        assert!(!SnapshotError::Tree("locked".into()).is_not_found());
    }
}
