//! Selection collaborator interface.

/// Supplies the current selection and accepts the new one after a restore
/// or paste.
pub trait SelectionModel<Id> {
    /// Returns the selected identities in the order they were selected.
    fn selected(&self) -> Vec<Id>;

    /// Replaces the selection.
    fn set_selected(&mut self, ids: Vec<Id>);

    /// Clears the selection.
    fn clear(&mut self) {
        self.set_selected(Vec::new());
    }
}

impl<Id: Clone> SelectionModel<Id> for Vec<Id> {
    fn selected(&self) -> Vec<Id> {
        self.clone()
    }

    fn set_selected(&mut self, ids: Vec<Id>) {
        *self = ids;
    }
}
