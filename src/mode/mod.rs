//! Game Modes
//!
//! A mode decides what scores and when the round ends. Every mode shares
//! the same per-frame contract: deaths and pickups are fed in as they are
//! drained from the event queues, `update` advances the clock, and
//! `check_win_condition` is asked once per frame after collision.
//!
//! Winner lists are slots in roster order, and ties produce co-winners.
//! Once every player is out of lives the round ends on the mode's tally.

mod coins;
mod ctf;
mod deathmatch;
mod koth;

use std::time::Duration;

use macroquad::color::Color;
use macroquad::math::Rect;
use serde::{Deserialize, Serialize};

use crate::config::GameSettings;
use crate::game::components::ItemType;
use crate::map::GameMap;

pub use coins::CoinCollection;
pub use ctf::{CaptureTheFlag, FlagState};
pub use deathmatch::Deathmatch;
pub use koth::KingOfTheHill;

/// Score awarded to a player for each credited kill.
pub const KILL_BONUS: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameModeKind {
    #[default]
    Deathmatch,
    CaptureTheFlag,
    KingOfTheHill,
    CoinCollection,
}

impl GameModeKind {
    pub const ALL: [GameModeKind; 4] = [
        GameModeKind::Deathmatch,
        GameModeKind::CaptureTheFlag,
        GameModeKind::KingOfTheHill,
        GameModeKind::CoinCollection,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GameModeKind::Deathmatch => "Deathmatch",
            GameModeKind::CaptureTheFlag => "Capture The Flag",
            GameModeKind::KingOfTheHill => "King of the Hill",
            GameModeKind::CoinCollection => "Coin Collection",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            GameModeKind::Deathmatch => "First to reach the kill limit wins!",
            GameModeKind::CaptureTheFlag => "Capture the enemy flag and return it to your base!",
            GameModeKind::KingOfTheHill => "Control the hill to earn points!",
            GameModeKind::CoinCollection => "Grab the most coins before time runs out!",
        }
    }

    /// Cycle forward (`step` = 1) or backward (`step` = -1) through `ALL`.
    pub fn cycle(self, step: i32) -> Self {
        let len = Self::ALL.len() as i32;
        let idx = Self::ALL.iter().position(|&k| k == self).unwrap_or(0) as i32;
        Self::ALL[(idx + step).rem_euclid(len) as usize]
    }

    /// Build the evaluator for a validated configuration.
    pub fn build(self, settings: &GameSettings, map: &GameMap) -> Box<dyn GameMode> {
        let roster = Roster::from_settings(settings);
        match self {
            GameModeKind::Deathmatch => Box::new(Deathmatch::new(roster, settings.kill_limit)),
            GameModeKind::CaptureTheFlag => Box::new(CaptureTheFlag::new(roster, map, settings.capture_limit)),
            GameModeKind::KingOfTheHill => Box::new(KingOfTheHill::new(roster, map, settings.hill_time)),
            GameModeKind::CoinCollection => Box::new(CoinCollection::new(roster, settings.coin_limit)),
        }
    }
}

/// Where a player is this frame, as far as zone-based modes care.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Presence {
    pub slot: usize,
    /// World-space body box
    pub bounds: Rect,
    /// Alive and in play (not waiting to respawn)
    pub alive: bool,
}

/// One HUD scoreboard row.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreLine {
    pub slot: usize,
    pub name: String,
    pub kills: u32,
    /// The mode's own tally (captures, seconds held, coins)
    pub value: f32,
    pub unit: &'static str,
}

/// A zone or object the HUD should draw for the mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub rect: Rect,
    pub color: Color,
    pub label: &'static str,
}

/// Ordered players, kill counters and the round clock. Every mode owns one.
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    slots: Vec<usize>,
    names: Vec<String>,
    kills: Vec<u32>,
    eliminated: Vec<bool>,
    elapsed: f32,
    /// <= 0 disables the time-limit condition
    time_limit: f32,
}

impl Roster {
    pub fn new(names: &[&str], time_limit: f32) -> Self {
        let count = names.len();
        Self {
            slots: (0..count).collect(),
            names: names.iter().map(|n| n.to_string()).collect(),
            kills: vec![0; count],
            eliminated: vec![false; count],
            elapsed: 0.0,
            time_limit,
        }
    }

    pub fn from_settings(settings: &GameSettings) -> Self {
        let names: Vec<String> = (0..settings.player_count).map(|s| settings.player_name(s)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        Self::new(&refs, settings.time_limit)
    }

    fn position(&self, slot: usize) -> Option<usize> {
        self.slots.iter().position(|&s| s == slot)
    }

    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn name(&self, slot: usize) -> &str {
        self.position(slot).map(|i| self.names[i].as_str()).unwrap_or("?")
    }

    pub fn kills(&self, slot: usize) -> u32 {
        self.position(slot).map(|i| self.kills[i]).unwrap_or(0)
    }

    /// Credit a kill. Environmental deaths and self-eliminations award
    /// nothing. Returns whether a kill was credited.
    pub fn record_death(&mut self, victim: usize, killer: Option<usize>) -> bool {
        let Some(killer) = killer.filter(|&k| k != victim) else {
            return false;
        };
        match self.position(killer) {
            Some(i) => {
                self.kills[i] += 1;
                true
            }
            None => false,
        }
    }

    pub fn eliminate(&mut self, slot: usize) {
        if let Some(i) = self.position(slot) {
            self.eliminated[i] = true;
        }
    }

    /// Players still in the round, in roster order.
    pub fn remaining(&self) -> Vec<usize> {
        self.slots
            .iter()
            .zip(&self.eliminated)
            .filter(|&(_, &out)| !out)
            .map(|(&s, _)| s)
            .collect()
    }

    /// Nobody is left to play: every player is out of lives.
    pub fn all_out(&self) -> bool {
        !self.eliminated.is_empty() && self.eliminated.iter().all(|&out| out)
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn time_up(&self) -> bool {
        self.time_limit > 0.0 && self.elapsed >= self.time_limit
    }

    pub fn time_remaining(&self) -> Option<Duration> {
        if self.time_limit <= 0.0 {
            return None;
        }
        Duration::try_from_secs_f32((self.time_limit - self.elapsed).max(0.0)).ok()
    }

    /// Slots whose tally is at least `limit`, in roster order.
    pub fn reaching<T: PartialOrd + Copy>(&self, tally: impl Fn(usize) -> T, limit: T) -> Vec<usize> {
        self.slots.iter().copied().filter(|&s| tally(s) >= limit).collect()
    }

    /// Every slot tied for the highest tally, in roster order.
    pub fn tied_for_max<T: PartialOrd + Copy>(&self, tally: impl Fn(usize) -> T) -> Vec<usize> {
        let best = self.slots.iter().map(|&s| tally(s)).fold(None, |best: Option<T>, v| match best {
            Some(b) if b >= v => Some(b),
            _ => Some(v),
        });
        match best {
            Some(best) => self.slots.iter().copied().filter(|&s| tally(s) == best).collect(),
            None => Vec::new(),
        }
    }

    /// Slot with the highest tally; first in roster order on ties.
    pub fn leader<T: PartialOrd + Copy>(&self, tally: impl Fn(usize) -> T) -> Option<usize> {
        self.tied_for_max(tally).first().copied()
    }
}

/// Win-condition logic plugged into a gameplay round.
pub trait GameMode: std::fmt::Debug {
    fn kind(&self) -> GameModeKind;

    fn roster(&self) -> &Roster;

    fn roster_mut(&mut self) -> &mut Roster;

    fn name(&self) -> &'static str {
        self.kind().name()
    }

    fn description(&self) -> &'static str {
        self.kind().description()
    }

    /// A death drained from the queue. `killer` is None for the environment.
    /// Returns the score the killer earns for it.
    fn on_player_death(&mut self, victim: usize, killer: Option<usize>) -> i32 {
        if self.roster_mut().record_death(victim, killer) {
            KILL_BONUS
        } else {
            0
        }
    }

    /// The player has no lives left.
    fn on_player_eliminated(&mut self, slot: usize) {
        self.roster_mut().eliminate(slot);
    }

    fn on_item_collected(&mut self, _slot: usize, _item: ItemType) {}

    /// Advance the clock, then mode-specific per-frame work.
    fn update(&mut self, dt: f32, players: &[Presence]) {
        self.roster_mut().advance(dt);
        self.on_update(dt, players);
    }

    fn on_update(&mut self, _dt: f32, _players: &[Presence]) {}

    /// `(is_over, winners)`. Winners are slots in roster order.
    fn check_win_condition(&self) -> (bool, Vec<usize>);

    fn time_remaining(&self) -> Option<Duration> {
        self.roster().time_remaining()
    }

    fn status_text(&self) -> String {
        self.name().to_string()
    }

    fn scoreboard(&self) -> Vec<ScoreLine>;

    fn markers(&self) -> Vec<Marker> {
        Vec::new()
    }

    fn kills(&self, slot: usize) -> u32 {
        self.roster().kills(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_and_environment_deaths_award_nothing() {
        let mut roster = Roster::new(&["A", "B"], 0.0);
        assert!(!roster.record_death(0, Some(0)));
        assert!(!roster.record_death(0, None));
        assert_eq!(roster.kills(0), 0);

        assert!(roster.record_death(0, Some(1)));
        assert_eq!(roster.kills(1), 1);
    }

    #[test]
    fn test_unrepresentable_time_left_is_none() {
        let roster = Roster::new(&["A"], 1e20);
        assert_eq!(roster.time_remaining(), None);

        let roster = Roster::new(&["A"], 90.0);
        assert_eq!(roster.time_remaining(), Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_all_out_needs_every_player() {
        let mut roster = Roster::new(&["A", "B"], 0.0);
        roster.eliminate(0);
        assert!(!roster.all_out());
        roster.eliminate(1);
        assert!(roster.all_out());
        assert!(!Roster::new(&[], 0.0).all_out());
    }

    #[test]
    fn test_unknown_killer_is_ignored() {
        let mut roster = Roster::new(&["A"], 0.0);
        assert!(!roster.record_death(0, Some(3)));
    }

    #[test]
    fn test_tied_for_max_keeps_roster_order() {
        let roster = Roster::new(&["A", "B", "C"], 0.0);
        let tally = [2, 1, 2];
        assert_eq!(roster.tied_for_max(|s| tally[s]), vec![0, 2]);
        assert_eq!(roster.leader(|s| tally[s]), Some(0));
        assert_eq!(roster.reaching(|s| tally[s], 2), vec![0, 2]);
    }

    #[test]
    fn test_clock() {
        let mut roster = Roster::new(&["A"], 2.0);
        assert_eq!(roster.time_remaining(), Some(Duration::from_secs(2)));
        roster.advance(1.5);
        assert!(!roster.time_up());
        roster.advance(1.0);
        assert!(roster.time_up());
        assert_eq!(roster.time_remaining(), Some(Duration::ZERO));

        let untimed = Roster::new(&["A"], 0.0);
        assert_eq!(untimed.time_remaining(), None);
        assert!(!untimed.time_up());
    }

    #[test]
    fn test_mode_kind_cycles() {
        assert_eq!(GameModeKind::Deathmatch.cycle(1), GameModeKind::CaptureTheFlag);
        assert_eq!(GameModeKind::Deathmatch.cycle(-1), GameModeKind::CoinCollection);
    }

    #[test]
    fn test_build_uses_configured_kind() {
        let map = GameMap::arena();
        let settings = GameSettings::default();
        for kind in GameModeKind::ALL {
            let mode = kind.build(&settings, &map);
            assert_eq!(mode.kind(), kind);
            assert_eq!(mode.roster().len(), settings.player_count);
        }
    }
}
