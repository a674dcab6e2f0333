//! Entries and entry lists.
//!
//! An [`EntryList`] is the unit of record shared by undo/redo and the
//! clipboard. It keeps entries in hierarchy order as captured and indexes
//! them by identity so a redo capture can find its undo entry in O(1).

use std::collections::{BTreeSet, HashMap};
use std::fmt::Debug;
use std::hash::Hash;

use crate::anchor::Anchor;
use crate::codec::Blob;
use crate::error::{Result, SnapshotError};

/// Which captured state of an entry to replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreSide {
    /// The state before the edit.
    Undo,
    /// The state after the edit.
    Redo,
}

/// Snapshot record of one top-level entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<Id, R: Ord> {
    /// Entity this entry restores.
    pub id: Id,
    /// Parent at capture time (`None` for roots).
    pub parent_id: Option<Id>,
    /// Sibling that followed the entity at capture time (`None` = append).
    pub anchor_id: Option<Id>,
    /// Encoded subtree before the edit.
    pub undo_blob: Blob,
    /// Encoded subtree after the edit, filled by the redo capture.
    pub redo_blob: Option<Blob>,
    /// External references the subtree depends on.
    pub external_refs: BTreeSet<R>,
}

impl<Id: Copy, R: Ord> Entry<Id, R> {
    /// Returns the blob recorded for `side`, if any.
    pub fn blob(&self, side: RestoreSide) -> Option<&Blob> {
        match side {
            RestoreSide::Undo => Some(&self.undo_blob),
            RestoreSide::Redo => self.redo_blob.as_ref(),
        }
    }

    /// Returns the recorded reinsertion anchor.
    pub fn anchor(&self) -> Anchor<Id> {
        Anchor {
            parent: self.parent_id,
            next_sibling: self.anchor_id,
        }
    }

    /// Returns `true` once both the undo and the redo state are recorded.
    pub fn is_complete(&self) -> bool {
        self.redo_blob.is_some()
    }
}

/// Ordered, identity-indexed sequence of [`Entry`] records.
#[derive(Debug, Clone)]
pub struct EntryList<Id, R: Ord> {
    entries: Vec<Entry<Id, R>>,
    index: HashMap<Id, usize>,
}

impl<Id, R> EntryList<Id, R>
where
    Id: Copy + Eq + Hash + Debug,
    R: Ord,
{
    /// Creates an empty entry list.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Appends an entry.
    ///
    /// Fails with [`SnapshotError::ContractViolation`] if an entry with the
    /// same id is already present.
    pub fn push(&mut self, entry: Entry<Id, R>) -> Result<()> {
        if self.index.contains_key(&entry.id) {
            return Err(SnapshotError::ContractViolation(format!(
                "duplicate entry for {:?}",
                entry.id
            )));
        }
        self.index.insert(entry.id, self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry for `id`.
    pub fn get(&self, id: Id) -> Option<&Entry<Id, R>> {
        self.index.get(&id).map(|&i| &self.entries[i])
    }

    /// Returns the position of `id` in capture order.
    pub fn position(&self, id: Id) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Returns `true` if the list holds an entry for `id`.
    pub fn contains(&self, id: Id) -> bool {
        self.index.contains_key(&id)
    }

    /// Iterates over entries in capture order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry<Id, R>> {
        self.entries.iter()
    }

    /// Returns the entity ids in capture order.
    pub fn ids(&self) -> Vec<Id> {
        self.entries.iter().map(|e| e.id).collect()
    }

    /// Returns `true` if every entry has its redo state recorded.
    pub fn is_complete(&self) -> bool {
        !self.entries.is_empty() && self.entries.iter().all(|e| e.redo_blob.is_some())
    }

    pub(crate) fn set_redo_blob(&mut self, position: usize, blob: Blob) {
        self.entries[position].redo_blob = Some(blob);
    }
}

impl<Id, R> Default for EntryList<Id, R>
where
    Id: Copy + Eq + Hash + Debug,
    R: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, Id, R: Ord> IntoIterator for &'a EntryList<Id, R> {
    type Item = &'a Entry<Id, R>;
    type IntoIter = std::slice::Iter<'a, Entry<Id, R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u32, anchor: Option<u32>) -> Entry<u32, String> {
        Entry {
            id,
            parent_id: Some(1),
            anchor_id: anchor,
            undo_blob: Blob::new(vec![id as u8]),
            redo_blob: None,
            external_refs: BTreeSet::new(),
        }
    }

    #[test]
    fn push_keeps_capture_order() {
        let mut list = EntryList::new();
        list.push(entry(7, None)).unwrap();
        list.push(entry(3, Some(7))).unwrap();

        assert_eq!(list.ids(), vec![7, 3]);
        assert_eq!(list.position(3), Some(1));
        assert_eq!(list.get(7).unwrap().undo_blob.as_bytes(), &[7]);
    }

    #[test]
    fn duplicate_id_is_contract_violation() {
        let mut list = EntryList::new();
        list.push(entry(2, None)).unwrap();
        let err = list.push(entry(2, None)).unwrap_err();
        assert!(matches!(err, SnapshotError::ContractViolation(_)));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn blob_by_side() {
        let mut e = entry(4, None);
        assert!(e.blob(RestoreSide::Redo).is_none());
        assert!(!e.is_complete());

        e.redo_blob = Some(Blob::new(vec![40]));
        assert_eq!(e.blob(RestoreSide::Undo).unwrap().as_bytes(), &[4]);
        assert_eq!(e.blob(RestoreSide::Redo).unwrap().as_bytes(), &[40]);
        assert!(e.is_complete());
    }

    #[test]
    fn anchor_mirrors_fields() {
        let e = entry(5, Some(6));
        let anchor = e.anchor();
        assert_eq!(anchor.parent, Some(1));
        assert_eq!(anchor.next_sibling, Some(6));
    }

    #[test]
    fn list_completeness() {
        let mut list = EntryList::new();
        assert!(!list.is_complete());
        list.push(entry(1, None)).unwrap();
        assert!(!list.is_complete());
        list.set_redo_blob(0, Blob::new(vec![9]));
        assert!(list.is_complete());
    }
}
