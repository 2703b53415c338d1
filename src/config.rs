//! Game configuration
//!
//! `GameSettings` is what the setup menu edits and what a gameplay context
//! is built from. It round-trips through RON so the shell can keep a
//! `settings.ron` next to the binary.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, SettingsError};
use crate::mode::GameModeKind;

/// Input slots the shell can feed (keyboard + three gamepads).
pub const MAX_PLAYERS: usize = 4;

/// Simulation rate. Physics assumes this step and nothing else.
pub const TICKS_PER_SECOND: u32 = 60;

/// Fixed timestep in seconds.
pub const FIXED_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;

/// Longest round or hold limit accepted, in seconds (24 hours).
pub const MAX_TIME_LIMIT: f32 = 86_400.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Expert,
}

/// Movement constants shared by every player body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Per-frame velocity multiplier when no direction is held
    pub friction: f32,
    /// Friction used while standing on ice
    pub ice_friction: f32,
    /// Horizontal speed cap (px/s)
    pub max_speed: f32,
    /// Horizontal acceleration while a direction is held (px/s²)
    pub run_acceleration: f32,
    pub jump_impulse: f32,
    pub terminal_velocity: f32,
    /// Below this |vx| friction snaps to zero
    pub snap_threshold: f32,
    /// Drift applied while standing on a conveyor (px/s)
    pub conveyor_speed: f32,
    pub spring_impulse: f32,
    /// Upward kick given to a player who stomps another
    pub stomp_bounce: f32,
}

impl PhysicsTuning {
    /// Speeds and accelerations must be finite and positive, friction
    /// factors within [0, 1], and the optional kicks finite and not negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("gravity", self.gravity),
            ("max_speed", self.max_speed),
            ("run_acceleration", self.run_acceleration),
            ("jump_impulse", self.jump_impulse),
            ("terminal_velocity", self.terminal_velocity),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidTuning(name));
            }
        }
        for (name, value) in [("friction", self.friction), ("ice_friction", self.ice_friction)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidTuning(name));
            }
        }
        let non_negative = [
            ("snap_threshold", self.snap_threshold),
            ("spring_impulse", self.spring_impulse),
            ("stomp_bounce", self.stomp_bounce),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidTuning(name));
            }
        }
        if !self.conveyor_speed.is_finite() {
            return Err(ConfigError::InvalidTuning("conveyor_speed"));
        }
        Ok(())
    }
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: 800.0,
            friction: 0.9,
            ice_friction: 0.98,
            max_speed: 200.0,
            run_acceleration: 800.0,
            jump_impulse: 400.0,
            terminal_velocity: 600.0,
            snap_threshold: 1.0,
            conveyor_speed: 60.0,
            spring_impulse: 600.0,
            stomp_bounce: 250.0,
        }
    }
}

/// Everything needed to start a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub mode: GameModeKind,
    pub player_count: usize,
    pub player_names: Vec<String>,
    /// Kills needed to win; <= 0 disables the kill-limit condition
    pub kill_limit: i32,
    /// Round length in seconds; <= 0 disables the time-limit condition
    pub time_limit: f32,
    /// Flag captures needed in Capture the Flag; <= 0 disables it
    pub capture_limit: i32,
    /// Seconds of sole hill control needed in King of the Hill; <= 0 disables it
    pub hill_time: f32,
    /// Coins needed in Coin Collection; <= 0 disables it
    pub coin_limit: i32,
    /// Lives per player; 0 means unlimited respawns
    pub lives: u32,
    pub map_name: String,
    pub friendly_fire: bool,
    pub difficulty: Difficulty,
    pub physics: PhysicsTuning,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            mode: GameModeKind::Deathmatch,
            player_count: 2,
            player_names: vec![
                "Red".to_string(),
                "Blue".to_string(),
                "Green".to_string(),
                "Yellow".to_string(),
            ],
            kill_limit: 10,
            time_limit: 300.0,
            capture_limit: 3,
            hill_time: 60.0,
            coin_limit: 20,
            lives: 3,
            map_name: "arena".to_string(),
            friendly_fire: true,
            difficulty: Difficulty::Normal,
            physics: PhysicsTuning::default(),
        }
    }
}

impl GameSettings {
    /// Reject configurations the simulation core must never see.
    /// Spawn-point coverage is checked separately against the chosen map.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.player_count == 0 {
            return Err(ConfigError::NoPlayers);
        }
        if self.player_count > MAX_PLAYERS {
            return Err(ConfigError::TooManyPlayers {
                requested: self.player_count,
                max: MAX_PLAYERS,
            });
        }
        if self.player_names.len() < self.player_count {
            return Err(ConfigError::MissingName(self.player_names.len()));
        }
        if self.mode == GameModeKind::CaptureTheFlag && self.player_count < 2 {
            return Err(ConfigError::NotEnoughTeams);
        }
        // <= 0 still means "no limit"; only values no clock can hold are rejected
        if !self.time_limit.is_finite() || self.time_limit > MAX_TIME_LIMIT {
            return Err(ConfigError::InvalidLimit("time_limit"));
        }
        if !self.hill_time.is_finite() || self.hill_time > MAX_TIME_LIMIT {
            return Err(ConfigError::InvalidLimit("hill_time"));
        }
        self.physics.validate()
    }

    /// Display name for a slot, falling back to "Player N".
    pub fn player_name(&self, slot: usize) -> String {
        self.player_names
            .get(slot)
            .cloned()
            .unwrap_or_else(|| format!("Player {}", slot + 1))
    }

    pub fn from_ron(s: &str) -> Result<Self, SettingsError> {
        let settings: GameSettings = ron::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert_eq!(GameSettings::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_zero_and_too_many_players() {
        let mut settings = GameSettings::default();
        settings.player_count = 0;
        assert_eq!(settings.validate(), Err(ConfigError::NoPlayers));

        settings.player_count = 5;
        assert_eq!(
            settings.validate(),
            Err(ConfigError::TooManyPlayers { requested: 5, max: MAX_PLAYERS })
        );
    }

    #[test]
    fn test_rejects_missing_names() {
        let mut settings = GameSettings::default();
        settings.player_names.truncate(1);
        assert_eq!(settings.validate(), Err(ConfigError::MissingName(1)));
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let settings = GameSettings::from_ron("(player_count: 3, kill_limit: 0)").unwrap();
        assert_eq!(settings.player_count, 3);
        assert_eq!(settings.kill_limit, 0);
        assert_eq!(settings.time_limit, 300.0);
        assert_eq!(settings.physics, PhysicsTuning::default());
    }

    #[test]
    fn test_rejects_bad_physics_tuning() {
        let mut settings = GameSettings::default();
        settings.physics.max_speed = -1.0;
        assert_eq!(settings.validate(), Err(ConfigError::InvalidTuning("max_speed")));

        settings.physics = PhysicsTuning { terminal_velocity: f32::NAN, ..PhysicsTuning::default() };
        assert_eq!(settings.validate(), Err(ConfigError::InvalidTuning("terminal_velocity")));

        settings.physics = PhysicsTuning { friction: 1.5, ..PhysicsTuning::default() };
        assert_eq!(settings.validate(), Err(ConfigError::InvalidTuning("friction")));

        let err = GameSettings::from_ron("(physics: (max_speed: -1.0))").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(ConfigError::InvalidTuning("max_speed"))));
    }

    #[test]
    fn test_rejects_unrepresentable_time_limits() {
        let err = GameSettings::from_ron("(time_limit: 1e20)").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(ConfigError::InvalidLimit("time_limit"))));

        let mut settings = GameSettings::default();
        settings.hill_time = f32::INFINITY;
        assert_eq!(settings.validate(), Err(ConfigError::InvalidLimit("hill_time")));

        // Zero and negative keep meaning "unlimited"
        settings.hill_time = 60.0;
        settings.time_limit = -5.0;
        assert_eq!(settings.validate(), Ok(()));
    }

    #[test]
    fn test_invalid_ron_settings_rejected() {
        let err = GameSettings::from_ron("(player_count: 0)").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(ConfigError::NoPlayers)));
    }
}
