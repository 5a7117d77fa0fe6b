use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::net::EntityId;

use super::entity::Entity;

#[derive(Debug, Default)]
pub struct EntityStore {
    entities: HashMap<EntityId, Entity>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `entity` unless its id is already known. Returns whether it
    /// was inserted; an existing entry is left untouched.
    pub fn upsert(&mut self, entity: Entity) -> bool {
        match self.entities.entry(entity.id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(entity);
                true
            }
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn find_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::snapshot::Color;

    #[test]
    fn duplicate_upsert_is_ignored() {
        let mut store = EntityStore::new();
        let first = Entity::new(7, Color(0xff0000ff), Vec2::new(1.0, 1.0), 0.0);
        let second = Entity::new(7, Color(0x00ff00ff), Vec2::new(9.0, 9.0), 3.0);

        assert!(store.upsert(first.clone()));
        assert!(!store.upsert(second));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(7), Some(&first));
    }

    #[test]
    fn find_mut_edits_in_place() {
        let mut store = EntityStore::new();
        store.upsert(Entity::new(1, Color::default(), Vec2::ZERO, 0.0));

        assert!(store.find_mut(2).is_none());

        if let Some(entity) = store.find_mut(1) {
            entity.set_pose(Vec2::new(3.0, 4.0), 1.0);
        }
        assert_eq!(store.get(1).map(|e| e.position), Some(Vec2::new(3.0, 4.0)));
    }

    #[test]
    fn iterates_every_entity() {
        let mut store = EntityStore::new();
        for id in 0..5 {
            store.upsert(Entity::new(id, Color::default(), Vec2::ZERO, 0.0));
        }

        let mut ids: Vec<_> = store.iter().map(|e| e.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }
}
