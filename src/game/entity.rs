//! Entity Identity with Generational Indices
//!
//! Entities are lightweight identifiers for actors in the arena.
//! The generational index pattern keeps stale references harmless:
//! - Each entity slot has a generation counter
//! - When an entity is swept, its slot can be reused
//! - The generation increments on reuse, invalidating old references
//!
//! A death event that names a player who was swept the same frame can
//! never be credited to whatever got spawned into the freed slot.

use serde::{Deserialize, Serialize};

/// A unique identifier for a simulated entity.
///
/// Consists of an index (which slot in the storages) and a generation
/// (which version of that slot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// Should only be called by EntityAllocator (and tests).
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index, used for component array access.
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// "No entity" marker, e.g. for environmental kills.
    pub const NULL: Entity = Entity { index: u32::MAX, generation: 0 };

    pub fn is_null(&self) -> bool {
        self.index == u32::MAX
    }
}

impl Default for Entity {
    fn default() -> Self {
        Entity::NULL
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Allocates and tracks entity lifetimes.
///
/// Freed slots are reused LIFO with an incremented generation.
#[derive(Debug, Clone, Default)]
pub struct EntityAllocator {
    generations: Vec<u32>,
    free_indices: Vec<u32>,
    next_fresh: u32,
    alive_count: u32,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> Entity {
        self.alive_count += 1;

        if let Some(index) = self.free_indices.pop() {
            // Generation was already bumped on free
            Entity::new(index, self.generations[index as usize])
        } else {
            let index = self.next_fresh;
            self.next_fresh += 1;
            self.generations.push(0);
            Entity::new(index, 0)
        }
    }

    /// Free an entity, making its slot available for reuse.
    /// Returns true if the entity was alive and is now freed.
    pub fn free(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }

        self.generations[entity.index as usize] += 1;
        self.free_indices.push(entity.index);
        self.alive_count -= 1;
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        if entity.is_null() {
            return false;
        }
        let idx = entity.index as usize;
        idx < self.generations.len() && self.generations[idx] == entity.generation
    }

    pub fn alive_count(&self) -> u32 {
        self.alive_count
    }

    /// Invalidate every outstanding id and make all slots reusable.
    pub fn clear(&mut self) {
        for gen in &mut self.generations {
            *gen += 1;
        }
        self.free_indices.clear();
        self.free_indices.extend((0..self.next_fresh).rev());
        self.alive_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_and_free() {
        let mut alloc = EntityAllocator::new();

        let e1 = alloc.allocate();
        let e2 = alloc.allocate();
        assert_eq!(alloc.alive_count(), 2);

        assert!(alloc.free(e1));
        assert_eq!(alloc.alive_count(), 1);
        assert!(!alloc.is_alive(e1));
        assert!(alloc.is_alive(e2));

        // Double free is a no-op
        assert!(!alloc.free(e1));
        assert_eq!(alloc.alive_count(), 1);
    }

    #[test]
    fn test_generation_prevents_reuse_collision() {
        let mut alloc = EntityAllocator::new();

        let e1 = alloc.allocate();
        alloc.free(e1);

        let e2 = alloc.allocate();
        assert_eq!(e2.index(), e1.index());
        assert_ne!(e2.generation(), e1.generation());
        assert!(!alloc.is_alive(e1));
        assert!(alloc.is_alive(e2));
    }

    #[test]
    fn test_clear_invalidates_everything() {
        let mut alloc = EntityAllocator::new();
        let a = alloc.allocate();
        let b = alloc.allocate();
        alloc.clear();

        assert!(!alloc.is_alive(a));
        assert!(!alloc.is_alive(b));
        assert_eq!(alloc.alive_count(), 0);

        // Slots come back lowest-first
        let c = alloc.allocate();
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn test_null_entity() {
        let alloc = EntityAllocator::new();
        assert!(!alloc.is_alive(Entity::NULL));
        assert!(Entity::NULL.is_null());
        assert_eq!(Entity::default(), Entity::NULL);
    }
}
