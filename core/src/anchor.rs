//! Reinsertion anchors.
//!
//! An [`Anchor`] records where a node sat at capture time: its parent and
//! the sibling that immediately followed it. Recording the following
//! sibling instead of a numeric index survives insertions and deletions
//! elsewhere in the tree, as long as the anchor sibling itself survives.

use crate::error::{Result, SnapshotError};
use crate::tree::HierarchyTree;

/// Parent and following sibling of a node at capture time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor<Id> {
    /// Parent at capture time (`None` for roots).
    pub parent: Option<Id>,
    /// Sibling that immediately followed the node (`None` if it was last).
    pub next_sibling: Option<Id>,
}

impl<Id: Copy + Eq> Anchor<Id> {
    /// Returns the recorded following sibling if it is still usable as an
    /// insertion point: alive and still a child of the recorded parent.
    ///
    /// `None` means "append as the last child of `parent`".
    pub fn live_next_sibling<T>(&self, tree: &T) -> Option<Id>
    where
        T: HierarchyTree<Id = Id> + ?Sized,
    {
        let sibling = self.next_sibling?;
        if tree.contains(sibling) && tree.parent_of(sibling) == self.parent {
            Some(sibling)
        } else {
            None
        }
    }

    /// Returns `true` if a following sibling was recorded but can no longer
    /// be used, so reinsertion will append instead.
    pub fn is_stale<T>(&self, tree: &T) -> bool
    where
        T: HierarchyTree<Id = Id> + ?Sized,
    {
        self.next_sibling.is_some() && self.live_next_sibling(tree).is_none()
    }
}

/// Computes the reinsertion anchor of the live node `id`.
pub fn resolve_anchor<T: HierarchyTree + ?Sized>(tree: &T, id: T::Id) -> Result<Anchor<T::Id>> {
    if !tree.contains(id) {
        return Err(SnapshotError::not_found(id));
    }
    let parent = tree.parent_of(id);
    let siblings = tree.children_of(parent);
    let index = siblings.iter().position(|&s| s == id).ok_or_else(|| {
        SnapshotError::Tree(format!("{id:?} is missing from its parent's children"))
    })?;
    Ok(Anchor {
        parent,
        next_sibling: siblings.get(index + 1).copied(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{TestTree, abc_tree};

    #[test]
    fn middle_child_anchors_on_next_sibling() {
        let (tree, root, _, b, c) = abc_tree();
        let anchor = resolve_anchor(&tree, b).unwrap();
        assert_eq!(anchor.parent, Some(root));
        assert_eq!(anchor.next_sibling, Some(c));
    }

    #[test]
    fn last_child_has_no_anchor() {
        let (tree, root, _, _, c) = abc_tree();
        let anchor = resolve_anchor(&tree, c).unwrap();
        assert_eq!(anchor.parent, Some(root));
        assert_eq!(anchor.next_sibling, None);
    }

    #[test]
    fn roots_anchor_on_next_root() {
        let mut tree = TestTree::new();
        let first = tree.add(None, "First");
        let second = tree.add(None, "Second");
        let anchor = resolve_anchor(&tree, first).unwrap();
        assert_eq!(anchor.parent, None);
        assert_eq!(anchor.next_sibling, Some(second));
    }

    #[test]
    fn deleted_anchor_is_stale() {
        let (mut tree, _, _, b, c) = abc_tree();
        let anchor = resolve_anchor(&tree, b).unwrap();
        assert!(!anchor.is_stale(&tree));

        tree.remove_subtree(c).unwrap();
        assert!(anchor.is_stale(&tree));
        assert_eq!(anchor.live_next_sibling(&tree), None);
    }

    #[test]
    fn reparented_anchor_is_stale() {
        let (mut tree, _, a, b, c) = abc_tree();
        let anchor = resolve_anchor(&tree, b).unwrap();

        // Move C under A by removing it and re-adding the same label elsewhere.
        tree.remove_subtree(c).unwrap();
        let moved = tree.add(Some(a), "C");
        let moved_anchor = Anchor {
            parent: anchor.parent,
            next_sibling: Some(moved),
        };
        assert!(moved_anchor.is_stale(&tree));
    }

    #[test]
    fn missing_node_is_not_found() {
        let (tree, ..) = abc_tree();
        assert!(resolve_anchor(&tree, 77).unwrap_err().is_not_found());
    }
}
