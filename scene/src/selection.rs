//! Selection model for scene entities.

use snapclip_core::SelectionModel;

use crate::Entity;

/// Ordered set of selected entities, in the order they were selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneSelection {
    entities: Vec<Entity>,
}

impl SceneSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the selection with a single entity.
    pub fn select(&mut self, entity: Entity) {
        self.entities.clear();
        self.entities.push(entity);
    }

    /// Adds `entity` to the selection if it is not already selected.
    pub fn add(&mut self, entity: Entity) {
        if !self.contains(entity) {
            self.entities.push(entity);
        }
    }

    /// Adds `entity` if unselected, removes it otherwise.
    pub fn toggle(&mut self, entity: Entity) {
        if self.contains(entity) {
            self.remove(entity);
        } else {
            self.entities.push(entity);
        }
    }

    pub fn remove(&mut self, entity: Entity) {
        self.entities.retain(|&e| e != entity);
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }
}

impl SelectionModel<Entity> for SceneSelection {
    fn selected(&self) -> Vec<Entity> {
        self.entities.clone()
    }

    fn set_selected(&mut self, ids: Vec<Entity>) {
        self.entities.clear();
        for id in ids {
            self.add(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Scene;

    #[test]
    fn keeps_selection_order_without_duplicates() {
        let mut scene = Scene::new();
        let a = scene.spawn("A").unwrap();
        let b = scene.spawn("B").unwrap();

        let mut selection = SceneSelection::new();
        selection.add(b);
        selection.add(a);
        selection.add(b);
        assert_eq!(selection.entities(), &[b, a]);

        selection.toggle(b);
        assert_eq!(selection.entities(), &[a]);
        selection.select(b);
        assert_eq!(selection.entities(), &[b]);
    }

    #[test]
    fn set_selected_dedups() {
        let mut scene = Scene::new();
        let a = scene.spawn("A").unwrap();
        let mut selection = SceneSelection::new();
        selection.set_selected(vec![a, a]);
        assert_eq!(selection.len(), 1);

        selection.clear();
        assert!(selection.is_empty());
    }
}
