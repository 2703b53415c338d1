//! Game World
//!
//! The World is the central container for all arena state:
//! - Entity allocation and lifetime tracking
//! - Component storage for all component types
//! - Spawn order, which is also update and draw order
//! - End-of-frame sweep of inactive entities
//!
//! Components are stored in typed fields rather than a HashMap<TypeId, ...>
//! because we know exactly what components we need at compile time.

use macroquad::color::Color;
use macroquad::math::{Rect, Vec2};

use super::component::{Component, ComponentKind, ComponentStorage};
use super::components::*;
use super::entity::{Entity, EntityAllocator};
use crate::config::PhysicsTuning;

/// Per-entity state every entity has regardless of components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityInfo {
    pub position: Vec2,
    /// Mirror of `Physics::velocity`, refreshed after collision
    pub velocity: Vec2,
    /// Inactive entities are skipped by every system and swept at end of frame
    pub active: bool,
    pub visible: bool,
    /// Draw order, lower first
    pub layer: i32,
}

impl EntityInfo {
    pub fn at(position: Vec2) -> Self {
        Self { position, velocity: Vec2::ZERO, active: true, visible: true, layer: 0 }
    }
}

/// Draw layers used by the spawners.
pub mod layers {
    pub const ITEMS: i32 = 1;
    pub const PLAYERS: i32 = 2;
}

/// Player tints by slot.
pub const PLAYER_COLORS: [Color; 4] = [
    macroquad::color::RED,
    macroquad::color::BLUE,
    macroquad::color::GREEN,
    macroquad::color::YELLOW,
];

/// The arena world containing all entities and their components.
#[derive(Debug, Clone, Default)]
pub struct World {
    entities: EntityAllocator,

    /// Live entities in spawn order
    order: Vec<Entity>,

    pub info: ComponentStorage<EntityInfo>,

    // =========================================================================
    // Components
    // =========================================================================
    pub physics: ComponentStorage<Physics>,
    pub health: ComponentStorage<Health>,
    pub animations: ComponentStorage<Animation>,
    pub inputs: ComponentStorage<InputComponent>,
    pub sprites: ComponentStorage<Sprite>,
    pub players: ComponentStorage<Player>,
    pub items: ComponentStorage<Item>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Entity Management
    // =========================================================================

    /// Spawn a bare, active, visible entity.
    pub fn spawn(&mut self, position: Vec2) -> Entity {
        let entity = self.entities.allocate();
        self.info.insert(entity, EntityInfo::at(position));
        self.order.push(entity);
        entity
    }

    /// Mark an entity for removal. It stops updating and drawing now and
    /// is freed by the next `sweep`.
    pub fn despawn(&mut self, entity: Entity) {
        if let Some(info) = self.info_mut(entity) {
            info.active = false;
            info.visible = false;
        }
    }

    /// Free every inactive entity and all its components. Call once at
    /// end of frame. Returns the removed ids in spawn order.
    pub fn sweep(&mut self) -> Vec<Entity> {
        let (dead, live): (Vec<Entity>, Vec<Entity>) = std::mem::take(&mut self.order)
            .into_iter()
            .partition(|&e| !self.info(e).map(|i| i.active).unwrap_or(false));
        self.order = live;

        for &entity in &dead {
            self.free_slot(entity);
        }
        if !dead.is_empty() {
            log::debug!("swept {} entities", dead.len());
        }
        dead
    }

    fn free_slot(&mut self, entity: Entity) {
        if !self.entities.free(entity) {
            return;
        }
        let idx = entity.index();
        self.info.clear_slot(idx);
        self.physics.clear_slot(idx);
        self.health.clear_slot(idx);
        self.animations.clear_slot(idx);
        self.inputs.clear_slot(idx);
        self.sprites.clear_slot(idx);
        self.players.clear_slot(idx);
        self.items.clear_slot(idx);
    }

    /// Drop every entity. Generations survive, so old ids stay stale.
    pub fn clear(&mut self) {
        for entity in std::mem::take(&mut self.order) {
            self.free_slot(entity);
        }
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    pub fn entity_count(&self) -> u32 {
        self.entities.alive_count()
    }

    /// All live entities in spawn order, active or not.
    pub fn entities(&self) -> &[Entity] {
        &self.order
    }

    /// Active entities in spawn order. Collected so systems can mutate
    /// the world while walking it.
    pub fn active_entities(&self) -> Vec<Entity> {
        self.order.iter().copied().filter(|&e| self.is_active(e)).collect()
    }

    pub fn is_active(&self, entity: Entity) -> bool {
        self.info(entity).map(|i| i.active).unwrap_or(false)
    }

    pub fn info(&self, entity: Entity) -> Option<&EntityInfo> {
        if !self.is_alive(entity) {
            return None;
        }
        self.info.get(entity)
    }

    pub fn info_mut(&mut self, entity: Entity) -> Option<&mut EntityInfo> {
        if !self.is_alive(entity) {
            return None;
        }
        self.info.get_mut(entity)
    }

    pub fn position(&self, entity: Entity) -> Option<Vec2> {
        self.info(entity).map(|i| i.position)
    }

    pub fn set_position(&mut self, entity: Entity, position: Vec2) {
        if let Some(info) = self.info_mut(entity) {
            info.position = position;
        }
    }

    // =========================================================================
    // Generic Component Access
    // =========================================================================

    /// Attach a component, replacing any existing one of the same kind.
    /// Returns the replaced value. Ignored for dead ids.
    pub fn insert<T: Component>(&mut self, entity: Entity, component: T) -> Option<T> {
        if !self.is_alive(entity) {
            return None;
        }
        T::storage_mut(self).insert(entity, component)
    }

    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        if !self.is_alive(entity) {
            return None;
        }
        T::storage(self).get(entity)
    }

    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        if !self.is_alive(entity) {
            return None;
        }
        T::storage_mut(self).get_mut(entity)
    }

    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        if !self.is_alive(entity) {
            return None;
        }
        T::storage_mut(self).remove(entity)
    }

    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.get::<T>(entity).is_some()
    }

    pub fn has_component(&self, entity: Entity, kind: ComponentKind) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        match kind {
            ComponentKind::Physics => self.physics.contains(entity),
            ComponentKind::Health => self.health.contains(entity),
            ComponentKind::Animation => self.animations.contains(entity),
            ComponentKind::Input => self.inputs.contains(entity),
            ComponentKind::Sprite => self.sprites.contains(entity),
            ComponentKind::Player => self.players.contains(entity),
            ComponentKind::Item => self.items.contains(entity),
        }
    }

    /// Detach a component by kind. Returns whether one was present.
    pub fn remove_component(&mut self, entity: Entity, kind: ComponentKind) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        match kind {
            ComponentKind::Physics => self.physics.remove(entity).is_some(),
            ComponentKind::Health => self.health.remove(entity).is_some(),
            ComponentKind::Animation => self.animations.remove(entity).is_some(),
            ComponentKind::Input => self.inputs.remove(entity).is_some(),
            ComponentKind::Sprite => self.sprites.remove(entity).is_some(),
            ComponentKind::Player => self.players.remove(entity).is_some(),
            ComponentKind::Item => self.items.remove(entity).is_some(),
        }
    }

    /// Kinds attached to an entity, in `ComponentKind::ALL` order.
    pub fn component_kinds(&self, entity: Entity) -> Vec<ComponentKind> {
        ComponentKind::ALL
            .into_iter()
            .filter(|&kind| self.has_component(entity, kind))
            .collect()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Player entities in spawn order.
    pub fn player_entities(&self) -> Vec<Entity> {
        self.order.iter().copied().filter(|&e| self.players.contains(e)).collect()
    }

    pub fn player_by_slot(&self, slot: usize) -> Option<Entity> {
        self.order
            .iter()
            .copied()
            .find(|&e| self.players.get(e).map(|p| p.slot == slot).unwrap_or(false))
    }

    /// Active item entities in spawn order.
    pub fn item_entities(&self) -> Vec<Entity> {
        self.order
            .iter()
            .copied()
            .filter(|&e| self.items.contains(e) && self.is_active(e))
            .collect()
    }

    /// World-space bounding box, for entities with physics.
    pub fn bounds(&self, entity: Entity) -> Option<Rect> {
        let physics = self.get::<Physics>(entity)?;
        let position = self.position(entity)?;
        Some(physics.world_bounds(position))
    }

    // =========================================================================
    // Convenience Spawners
    // =========================================================================

    /// Spawn a player body with input, health, animation and sprite.
    pub fn spawn_player(&mut self, player: Player, tuning: &PhysicsTuning) -> Entity {
        let position = player.spawn_position;
        let slot = player.slot;
        let entity = self.spawn(position);
        if let Some(info) = self.info_mut(entity) {
            info.layer = layers::PLAYERS;
        }

        let mut physics = Physics::from_tuning(tuning);
        physics.last_position = position;
        self.insert(entity, physics);
        self.insert(entity, Health::new(1));
        self.insert(entity, InputComponent::new(slot));
        self.insert(entity, Animation::player());
        let tint = PLAYER_COLORS.get(slot).copied().unwrap_or(macroquad::color::WHITE);
        self.insert(entity, Sprite::new("player", Rect::new(0.0, 0.0, 32.0, 32.0)).with_tint(tint));
        self.insert(entity, player);
        entity
    }

    /// Spawn a pickup produced by an item spawn.
    pub fn spawn_item(&mut self, item_type: ItemType, spawn_index: usize, position: Vec2) -> Entity {
        let entity = self.spawn(position);
        if let Some(info) = self.info_mut(entity) {
            info.layer = layers::ITEMS;
        }
        let mut physics = Physics::pickup();
        physics.last_position = position;
        self.insert(entity, physics);
        self.insert(
            entity,
            Sprite::new("items", Rect::new(0.0, 0.0, 16.0, 16.0)).with_tint(item_type.color()),
        );
        self.insert(entity, Item { item_type, spawn_index });
        entity
    }
}
