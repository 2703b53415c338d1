//! Arena Simulation
//!
//! A small ECS-inspired core for a fixed-timestep arena platformer,
//! simplified for the one game it runs.
//!
//! Key concepts:
//! - Entity: Generational index for safe entity references
//! - Component: Plain data structs attached to entities
//! - World: Container for all entities and their components
//! - Event: Per-frame queues drained by the round
//! - Round: The per-frame pipeline tying it together
//!
//! Design philosophy:
//! - Simple over flexible (we know what game we're making)
//! - Every system walks entities in spawn order
//! - No runtime type registration (compile-time known components)

pub mod collision;
pub mod component;
pub mod components;
pub mod entity;
pub mod event;
pub mod physics;
pub mod round;
pub mod world;

// Re-export main types
pub use component::ComponentKind;
pub use entity::Entity;
pub use event::Events;
pub use round::{Round, RoundOutcome};
pub use world::World;
