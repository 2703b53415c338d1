//! Event System
//!
//! Systems don't call each other; they send events that are drained at
//! fixed points of the frame. Example flow:
//! 1. Interaction pass detects a stomp → sends DeathEvent
//! 2. Lifecycle pass reads the death → spends a life, schedules respawn
//! 3. Game mode drains the deaths → credits the killer
//!
//! Each queue is drained exactly once per frame, so a death is counted once.

use super::components::ItemType;
use super::entity::Entity;

/// A queue for events of a single type.
/// Events are collected during the frame and drained at specific points.
#[derive(Debug, Clone)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    /// Iterate over events without clearing
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    /// Drain all events (returns iterator and clears queue)
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Container for all gameplay events.
#[derive(Debug, Clone, Default)]
pub struct Events {
    pub damage: EventQueue<DamageEvent>,
    pub death: EventQueue<DeathEvent>,
    pub item_collected: EventQueue<ItemCollectedEvent>,
    pub respawn: EventQueue<RespawnEvent>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all event queues. Call at end of frame.
    pub fn clear_all(&mut self) {
        self.damage.clear();
        self.death.clear();
        self.item_collected.clear();
        self.respawn.clear();
    }
}

// =============================================================================
// Event Types
// =============================================================================

/// How a player died.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    /// Landed on by another player
    Stomp,
    /// Touched by a player under a star
    Star,
    /// Touched a hazard tile
    Hazard,
}

/// Damage was dealt to an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageEvent {
    pub target: Entity,
    /// Who dealt the damage (None for the environment)
    pub source: Option<Entity>,
    pub amount: i32,
}

/// A player died. Slots are captured at send time so the event stays
/// meaningful after the entities are swept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeathEvent {
    pub victim: Entity,
    pub victim_slot: usize,
    /// None for environmental deaths
    pub killer: Option<Entity>,
    pub killer_slot: Option<usize>,
    pub cause: DeathCause,
}

impl DeathEvent {
    /// Counts as a kill for someone: a killer exists and isn't the victim.
    pub fn credited_slot(&self) -> Option<usize> {
        self.killer_slot.filter(|&k| k != self.victim_slot)
    }
}

/// A player picked up an item
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemCollectedEvent {
    pub collector: Entity,
    pub slot: usize,
    pub item_type: ItemType,
    pub spawn_index: usize,
}

/// A dead player came back at their spawn point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RespawnEvent {
    pub entity: Entity,
    pub slot: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_queue() {
        let mut queue = EventQueue::new();
        queue.send(1);
        queue.send(2);
        assert_eq!(queue.len(), 2);

        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(drained, vec![1, 2]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_self_kill_is_not_credited() {
        let e = Entity::new(0, 0);
        let own = DeathEvent {
            victim: e,
            victim_slot: 0,
            killer: Some(e),
            killer_slot: Some(0),
            cause: DeathCause::Stomp,
        };
        assert_eq!(own.credited_slot(), None);

        let env = DeathEvent { killer: None, killer_slot: None, cause: DeathCause::Hazard, ..own };
        assert_eq!(env.credited_slot(), None);

        let other = DeathEvent { killer: Some(Entity::new(1, 0)), killer_slot: Some(1), ..own };
        assert_eq!(other.credited_slot(), Some(1));
    }
}
