use macroquad::color::Color;
use macroquad::math::Rect;

use super::{GameMode, GameModeKind, Marker, Presence, Roster, ScoreLine};
use crate::map::{GameMap, TileType, TILE_SIZE};

const HILL_COLOR: Color = Color::new(0.2, 0.9, 0.3, 0.35);

/// Hold the hill alone to earn time. First to the hold target wins.
#[derive(Debug, Clone)]
pub struct KingOfTheHill {
    roster: Roster,
    hill: Rect,
    /// Seconds held, parallel to the roster slots
    held: Vec<f32>,
    /// <= 0 disables the hold-target condition
    hill_time: f32,
    king: Option<usize>,
}

impl KingOfTheHill {
    pub fn new(roster: Roster, map: &GameMap, hill_time: f32) -> Self {
        let held = vec![0.0; roster.len()];
        Self { roster, hill: Self::hill_zone(map), held, hill_time, king: None }
    }

    /// Bounding box of the map's Goal tiles, or a 4x3 tile zone in the
    /// middle of the map when it has none.
    pub fn hill_zone(map: &GameMap) -> Rect {
        let mut cells = map.cells_of(TileType::Goal);
        let Some((c, r)) = cells.next() else {
            let (w, h) = (4.0 * TILE_SIZE, 3.0 * TILE_SIZE);
            return Rect::new((map.pixel_width() - w) * 0.5, (map.pixel_height() - h) * 0.5, w, h);
        };
        let (mut c0, mut c1, mut r0, mut r1) = (c, c, r, r);
        for (c, r) in cells {
            c0 = c0.min(c);
            c1 = c1.max(c);
            r0 = r0.min(r);
            r1 = r1.max(r);
        }
        Rect::new(
            c0 as f32 * TILE_SIZE,
            r0 as f32 * TILE_SIZE,
            (c1 - c0 + 1) as f32 * TILE_SIZE,
            (r1 - r0 + 1) as f32 * TILE_SIZE,
        )
    }

    pub fn hill(&self) -> Rect {
        self.hill
    }

    pub fn held(&self, slot: usize) -> f32 {
        self.roster
            .slots()
            .iter()
            .position(|&s| s == slot)
            .map(|i| self.held[i])
            .unwrap_or(0.0)
    }

    /// The sole occupant of the hill last frame.
    pub fn king(&self) -> Option<usize> {
        self.king
    }
}

impl GameMode for KingOfTheHill {
    fn kind(&self) -> GameModeKind {
        GameModeKind::KingOfTheHill
    }

    fn roster(&self) -> &Roster {
        &self.roster
    }

    fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    fn on_update(&mut self, dt: f32, players: &[Presence]) {
        let inside: Vec<usize> = players
            .iter()
            .filter(|p| p.alive && p.bounds.overlaps(&self.hill))
            .map(|p| p.slot)
            .collect();

        self.king = match inside.as_slice() {
            [only] => Some(*only),
            _ => None,
        };
        if let Some(king) = self.king {
            if let Some(i) = self.roster.slots().iter().position(|&s| s == king) {
                self.held[i] += dt;
            }
        }
    }

    fn check_win_condition(&self) -> (bool, Vec<usize>) {
        if self.hill_time > 0.0 {
            let winners = self.roster.reaching(|s| self.held(s), self.hill_time);
            if !winners.is_empty() {
                return (true, winners);
            }
        }
        if self.roster.time_up() || self.roster.all_out() {
            return (true, self.roster.tied_for_max(|s| self.held(s)));
        }
        (false, Vec::new())
    }

    fn status_text(&self) -> String {
        match self.king {
            Some(king) => format!("King: {} ({:.0}s)", self.roster.name(king), self.held(king)),
            None => "The hill is contested!".to_string(),
        }
    }

    fn scoreboard(&self) -> Vec<ScoreLine> {
        self.roster
            .slots()
            .iter()
            .map(|&slot| ScoreLine {
                slot,
                name: self.roster.name(slot).to_string(),
                kills: self.roster.kills(slot),
                value: self.held(slot),
                unit: "seconds",
            })
            .collect()
    }

    fn markers(&self) -> Vec<Marker> {
        vec![Marker { rect: self.hill, color: HILL_COLOR, label: "hill" }]
    }
}
