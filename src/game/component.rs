//! Component Storage
//!
//! Components are plain attribute bags attached to entities. Every kind has
//! a fixed slot on the `World` (no type-indexed maps), and `ComponentKind`
//! names those slots for code that needs to talk about a kind generically.
//!
//! Storage is sparse: a `Vec<Option<T>>` indexed by entity slot. Arena
//! rounds have a handful of players plus a few dozen items, so holes are
//! cheap and lookups are a bounds check.

use super::entity::Entity;
use super::world::World;

/// Every component kind an entity can carry (at most one of each).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Physics,
    Health,
    Animation,
    Input,
    Sprite,
    Player,
    Item,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 7] = [
        ComponentKind::Physics,
        ComponentKind::Health,
        ComponentKind::Animation,
        ComponentKind::Input,
        ComponentKind::Sprite,
        ComponentKind::Player,
        ComponentKind::Item,
    ];
}

/// Ties a component type to its storage slot on the `World`.
///
/// Lets callers write `world.get::<Physics>(e)` without the world
/// knowing anything beyond its fixed field list.
pub trait Component: Sized {
    const KIND: ComponentKind;

    fn storage(world: &World) -> &ComponentStorage<Self>;
    fn storage_mut(world: &mut World) -> &mut ComponentStorage<Self>;
}

/// Sparse storage for a single component type, indexed by `Entity::index()`.
///
/// The slot does not remember the generation; the world only hands out
/// access for ids its allocator still considers alive.
#[derive(Debug, Clone)]
pub struct ComponentStorage<T> {
    data: Vec<Option<T>>,
}

impl<T> ComponentStorage<T> {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    fn ensure_capacity(&mut self, index: usize) {
        if index >= self.data.len() {
            self.data.resize_with(index + 1, || None);
        }
    }

    /// Attach a component, returning whatever it replaced.
    pub fn insert(&mut self, entity: Entity, component: T) -> Option<T> {
        let idx = entity.index() as usize;
        self.ensure_capacity(idx);
        self.data[idx].replace(component)
    }

    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        self.data.get_mut(entity.index() as usize).and_then(Option::take)
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.data.get(entity.index() as usize).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.data.get_mut(entity.index() as usize).and_then(Option::as_mut)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.get(entity).is_some()
    }

    /// Iterate over all (slot index, component) pairs in slot order.
    /// Liveness must be checked separately.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(idx, opt)| opt.as_ref().map(|c| (idx as u32, c)))
    }

    /// Drop whatever sits in a slot. Called by the end-of-frame sweep.
    pub fn clear_slot(&mut self, index: u32) {
        if let Some(slot) = self.data.get_mut(index as usize) {
            *slot = None;
        }
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn count(&self) -> usize {
        self.data.iter().filter(|opt| opt.is_some()).count()
    }
}

impl<T> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_existing() {
        let mut storage: ComponentStorage<i32> = ComponentStorage::new();
        let entity = Entity::new(5, 0);

        assert_eq!(storage.insert(entity, 42), None);
        assert_eq!(storage.insert(entity, 7), Some(42));
        assert_eq!(storage.get(entity), Some(&7));
        assert_eq!(storage.count(), 1);
    }

    #[test]
    fn test_missing_component_is_none() {
        let mut storage: ComponentStorage<i32> = ComponentStorage::new();
        let far = Entity::new(100, 0);

        assert!(storage.get(far).is_none());
        assert!(storage.get_mut(far).is_none());
        assert!(storage.remove(far).is_none());
        assert!(!storage.contains(far));
    }

    #[test]
    fn test_sparse_slots_and_iteration_order() {
        let mut storage: ComponentStorage<&str> = ComponentStorage::new();
        storage.insert(Entity::new(5, 0), "five");
        storage.insert(Entity::new(0, 0), "zero");
        storage.insert(Entity::new(2, 0), "two");

        let items: Vec<_> = storage.iter().collect();
        assert_eq!(items, vec![(0, &"zero"), (2, &"two"), (5, &"five")]);

        storage.clear_slot(2);
        assert!(!storage.contains(Entity::new(2, 0)));
        assert_eq!(storage.count(), 2);
    }
}
