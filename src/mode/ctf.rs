use macroquad::color::{BLUE, RED};
use macroquad::math::{vec2, Rect, Vec2};

use super::{GameMode, GameModeKind, Marker, Presence, Roster, ScoreLine, KILL_BONUS};
use crate::map::GameMap;

/// Where a team's flag is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagState {
    AtBase,
    /// Held by this slot
    Carried(usize),
}

#[derive(Debug, Clone, PartialEq)]
struct Team {
    base: Rect,
    flag: FlagState,
    captures: u32,
    /// Last known carrier box, for drawing the flag
    carrier_bounds: Option<Rect>,
}

impl Team {
    fn at(spawn: Vec2) -> Self {
        Self {
            base: Rect::new(spawn.x - 24.0, spawn.y - 48.0, 48.0, 48.0),
            flag: FlagState::AtBase,
            captures: 0,
            carrier_bounds: None,
        }
    }
}

const TEAM_NAMES: [&str; 2] = ["Red", "Blue"];

/// Two teams by slot parity. Touch the enemy flag to take it, bring it
/// to your own base while your flag is home to score.
#[derive(Debug, Clone)]
pub struct CaptureTheFlag {
    roster: Roster,
    teams: [Team; 2],
    /// <= 0 disables the capture-limit condition
    capture_limit: i32,
}

impl CaptureTheFlag {
    /// Bases sit on the first spawn point of each team (slots 0 and 1).
    pub fn new(roster: Roster, map: &GameMap, capture_limit: i32) -> Self {
        let base = |slot: usize, fallback: Vec2| map.spawn_for(slot).map(|s| s.position()).unwrap_or(fallback);
        let floor = map.pixel_height();
        let teams = [
            Team::at(base(0, vec2(48.0, floor))),
            Team::at(base(1, vec2(map.pixel_width() - 48.0, floor))),
        ];
        Self { roster, teams, capture_limit }
    }

    pub fn team_of(slot: usize) -> usize {
        slot % 2
    }

    pub fn flag(&self, team: usize) -> Option<FlagState> {
        self.teams.get(team).map(|t| t.flag)
    }

    pub fn captures(&self, team: usize) -> u32 {
        self.teams.get(team).map(|t| t.captures).unwrap_or(0)
    }

    pub fn base(&self, team: usize) -> Option<Rect> {
        self.teams.get(team).map(|t| t.base)
    }

    fn drop_flags_of(&mut self, slot: usize) {
        for (idx, team) in self.teams.iter_mut().enumerate() {
            if team.flag == FlagState::Carried(slot) {
                team.flag = FlagState::AtBase;
                team.carrier_bounds = None;
                log::info!("{} flag returned", TEAM_NAMES[idx]);
            }
        }
    }

    fn team_slots(&self, teams: &[usize]) -> Vec<usize> {
        self.roster
            .slots()
            .iter()
            .copied()
            .filter(|&s| teams.contains(&Self::team_of(s)))
            .collect()
    }
}

impl GameMode for CaptureTheFlag {
    fn kind(&self) -> GameModeKind {
        GameModeKind::CaptureTheFlag
    }

    fn roster(&self) -> &Roster {
        &self.roster
    }

    fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    fn on_player_death(&mut self, victim: usize, killer: Option<usize>) -> i32 {
        self.drop_flags_of(victim);
        if self.roster.record_death(victim, killer) {
            KILL_BONUS
        } else {
            0
        }
    }

    fn on_player_eliminated(&mut self, slot: usize) {
        self.roster.eliminate(slot);
        self.drop_flags_of(slot);
    }

    fn on_update(&mut self, _dt: f32, players: &[Presence]) {
        for p in players {
            if !p.alive {
                self.drop_flags_of(p.slot);
                continue;
            }
            let own = Self::team_of(p.slot);
            let enemy = 1 - own;

            if self.teams[enemy].flag == FlagState::AtBase && p.bounds.overlaps(&self.teams[enemy].base) {
                self.teams[enemy].flag = FlagState::Carried(p.slot);
                log::info!("{} took the {} flag", self.roster.name(p.slot), TEAM_NAMES[enemy]);
            }

            if self.teams[enemy].flag == FlagState::Carried(p.slot) {
                self.teams[enemy].carrier_bounds = Some(p.bounds);
                let home = self.teams[own].flag == FlagState::AtBase;
                if home && p.bounds.overlaps(&self.teams[own].base) {
                    self.teams[own].captures += 1;
                    self.teams[enemy].flag = FlagState::AtBase;
                    self.teams[enemy].carrier_bounds = None;
                    log::info!("{} captured for {}", self.roster.name(p.slot), TEAM_NAMES[own]);
                }
            }
        }
    }

    fn check_win_condition(&self) -> (bool, Vec<usize>) {
        if self.capture_limit > 0 {
            let limit = self.capture_limit as u32;
            let teams: Vec<usize> = (0..2).filter(|&t| self.teams[t].captures >= limit).collect();
            if !teams.is_empty() {
                return (true, self.team_slots(&teams));
            }
        }

        if self.roster.time_up() || self.roster.all_out() {
            let best = self.teams.iter().map(|t| t.captures).max().unwrap_or(0);
            let teams: Vec<usize> = (0..2).filter(|&t| self.teams[t].captures == best).collect();
            return (true, self.team_slots(&teams));
        }

        (false, Vec::new())
    }

    fn status_text(&self) -> String {
        format!(
            "{} {} - {} {}",
            TEAM_NAMES[0], self.teams[0].captures, self.teams[1].captures, TEAM_NAMES[1]
        )
    }

    fn scoreboard(&self) -> Vec<ScoreLine> {
        self.roster
            .slots()
            .iter()
            .map(|&slot| ScoreLine {
                slot,
                name: self.roster.name(slot).to_string(),
                kills: self.roster.kills(slot),
                value: self.captures(Self::team_of(slot)) as f32,
                unit: "captures",
            })
            .collect()
    }

    fn markers(&self) -> Vec<Marker> {
        let colors = [RED, BLUE];
        let mut markers = Vec::new();
        for (idx, team) in self.teams.iter().enumerate() {
            markers.push(Marker { rect: team.base, color: colors[idx], label: "base" });
            let flag = match (team.flag, team.carrier_bounds) {
                (FlagState::Carried(_), Some(b)) => Rect::new(b.x + b.w * 0.5 - 6.0, b.y - 14.0, 12.0, 12.0),
                _ => Rect::new(team.base.x + 18.0, team.base.y + 8.0, 12.0, 12.0),
            };
            markers.push(Marker { rect: flag, color: colors[idx], label: "flag" });
        }
        markers
    }
}
