//! STOMPWAR: a local multiplayer arena platformer
//!
//! Up to four players share one screen and one tile map. Jump on someone's
//! head to knock them out, grab power-ups, and play one of four modes:
//! deathmatch, capture the flag, king of the hill, or coin collection.
//!
//! The crate is the simulation core plus a state stack of menus around it.
//! `main.rs` is only the window shell: it polls input, steps the stack on a
//! fixed timestep, and draws through the `Canvas` seam.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod map;
pub mod mode;
pub mod state;
