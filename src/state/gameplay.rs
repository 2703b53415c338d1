//! Gameplay context: runs a round and draws the arena and HUD.

use macroquad::color::{Color, WHITE};
use macroquad::math::{vec2, Rect, Vec2};

use super::canvas::Canvas;
use super::menu::{BG_COLOR, MUTED_COLOR, TEXT_COLOR};
use super::menus::{GameOver, Pause};
use super::{GameState, Transition};
use crate::config::MAX_PLAYERS;
use crate::game::components::{Item, Player, Sprite};
use crate::game::world::PLAYER_COLORS;
use crate::game::Round;
use crate::input::FrameInput;
use crate::map::{GameMap, TileLookup, TileType};

const HUD_SIZE: f32 = 22.0;

/// World-to-screen mapping that fits the whole map, letterboxed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub scale: f32,
    pub offset: Vec2,
}

impl View {
    pub fn fit(map: &GameMap, screen: Vec2) -> Self {
        let (w, h) = (map.pixel_width().max(1.0), map.pixel_height().max(1.0));
        let scale = (screen.x / w).min(screen.y / h);
        let offset = vec2((screen.x - w * scale) * 0.5, (screen.y - h * scale) * 0.5);
        Self { scale, offset }
    }

    pub fn rect(&self, r: Rect) -> Rect {
        Rect::new(
            self.offset.x + r.x * self.scale,
            self.offset.y + r.y * self.scale,
            r.w * self.scale,
            r.h * self.scale,
        )
    }
}

/// Draw every non-empty tile.
pub fn draw_tiles(canvas: &mut dyn Canvas, map: &GameMap, view: &View) {
    for row in 0..map.height() as i32 {
        for col in 0..map.width() as i32 {
            let tile = map.tile_at(col, row);
            if tile == TileType::Empty {
                continue;
            }
            canvas.rect(view.rect(GameMap::tile_bounds(col, row)), tile.color());
        }
    }
}

fn format_time(secs: f32) -> String {
    let secs = secs.ceil() as u32;
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[derive(Debug)]
pub struct Gameplay {
    round: Round,
    /// Start buttons held last frame, per slot
    last_start: [bool; MAX_PLAYERS],
}

impl Gameplay {
    pub fn new(round: Round) -> Self {
        Self { round, last_start: [false; MAX_PLAYERS] }
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn initialize(&mut self) {
        log::debug!("gameplay started: {}", self.round.mode().name());
    }

    pub fn cleanup(&mut self) {
        log::debug!("gameplay ended after {:.1}s", self.round.mode().roster().elapsed());
    }

    pub fn update(&mut self, input: &FrameInput, dt: f32) -> Transition {
        let mut pause = false;
        for (slot, last) in self.last_start.iter_mut().enumerate() {
            let held = input.player(slot).start;
            pause |= held && !*last;
            *last = held;
        }
        if pause {
            let settings = self.round.settings().clone();
            let map = self.round.map().clone();
            return Transition::Push(GameState::Pause(Box::new(Pause::new(settings, map))));
        }

        self.round.step(input, dt);
        match self.round.outcome() {
            Some(outcome) => Transition::Replace(GameState::GameOver(GameOver::new(outcome.clone()))),
            None => Transition::None,
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.clear(BG_COLOR);
        let map = self.round.map();
        let view = View::fit(map, canvas.size());
        let world = &self.round.world;

        draw_tiles(canvas, map, &view);
        for marker in self.round.mode().markers() {
            canvas.rect(view.rect(marker.rect), marker.color);
        }

        for entity in world.entities() {
            let Some(info) = world.info(*entity) else { continue };
            if !info.visible {
                continue;
            }
            let Some(bounds) = world.bounds(*entity) else { continue };
            if let Some(item) = world.get::<Item>(*entity) {
                canvas.rect(view.rect(bounds), item.item_type.color());
            } else if let Some(sprite) = world.get::<Sprite>(*entity) {
                let dest = Rect::new(
                    info.position.x - sprite.origin.x * sprite.scale,
                    info.position.y - sprite.origin.y * sprite.scale,
                    sprite.source.w * sprite.scale,
                    sprite.source.h * sprite.scale,
                );
                canvas.sprite(&sprite.sheet, sprite.source, view.rect(dest), sprite.tint, sprite.flip_x);
            }
        }

        self.draw_hud(canvas);
    }

    fn draw_hud(&self, canvas: &mut dyn Canvas) {
        let size = canvas.size();
        canvas.text(&self.round.status_text(), vec2(16.0, 28.0), HUD_SIZE, TEXT_COLOR);
        if let Some(left) = self.round.time_remaining() {
            let text = format_time(left.as_secs_f32());
            canvas.text(&text, vec2(size.x - 90.0, 28.0), HUD_SIZE, TEXT_COLOR);
        }

        let world = &self.round.world;
        for (row, line) in self.round.mode().scoreboard().iter().enumerate() {
            let color: Color = PLAYER_COLORS.get(line.slot).copied().unwrap_or(WHITE);
            let lives = world
                .player_by_slot(line.slot)
                .and_then(|e| world.get::<Player>(e))
                .and_then(|p| p.lives)
                .map(|l| format!("  x{}", l))
                .unwrap_or_default();
            let text = if line.unit == "kills" {
                format!("{}: {} kills{}", line.name, line.kills, lives)
            } else {
                format!("{}: {:.0} {}  {} kills{}", line.name, line.value, line.unit, line.kills, lives)
            };
            let y = size.y - 16.0 - (row as f32) * (HUD_SIZE + 4.0);
            canvas.rect(Rect::new(16.0, y - 14.0, 10.0, 10.0), color);
            canvas.text(&text, vec2(32.0, y), HUD_SIZE, MUTED_COLOR);
        }
    }
}
