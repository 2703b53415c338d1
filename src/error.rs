//! Error types
//!
//! Only setup-time failures live here. Gameplay never produces errors:
//! missing components are `None`, out-of-range tiles are Solid, deaths
//! and ties are ordinary state transitions.

use thiserror::Error;

/// A game configuration that cannot be turned into a gameplay context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Player count was zero.
    #[error("at least one player is required")]
    NoPlayers,

    /// More players than there are input slots.
    #[error("too many players: {requested} requested, at most {max} supported")]
    TooManyPlayers { requested: usize, max: usize },

    /// A player slot has no spawn point on the chosen map.
    #[error("player {player} has no spawn point ({available} available on map)")]
    MissingSpawn { player: usize, available: usize },

    /// Fewer names than players.
    #[error("player {0} has no name")]
    MissingName(usize),

    /// Capture the Flag needs a base for each team.
    #[error("capture the flag needs at least two players")]
    NotEnoughTeams,

    /// A physics tuning value that would break the integrator.
    #[error("invalid physics tuning: {0}")]
    InvalidTuning(&'static str),

    /// A round limit that is NaN, infinite or out of range.
    #[error("invalid {0}")]
    InvalidLimit(&'static str),

    /// Map failed validation.
    #[error("invalid map: {0}")]
    InvalidMap(String),
}

/// Failure loading, saving, or validating a map descriptor.
#[derive(Error, Debug)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("serialize error: {0}")]
    Serialize(#[from] ron::Error),

    #[error("map is {width}x{height}, which is outside 1..={max} tiles per side")]
    Dimensions { width: usize, height: usize, max: usize },

    #[error("map declares {expected} tiles but carries {actual}")]
    TileCount { expected: usize, actual: usize },

    #[error("spawn point {index} lies outside the map")]
    SpawnOutOfBounds { index: usize },
}

/// Failure reading a settings file.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}
