//! Tile editor for the selected map.
//!
//! Arrows move the cursor, confirm paints the current palette tile, alt
//! cycles the palette. Back writes the map into the session (and to disk
//! when a path was given on the command line) and returns to the menu.

use macroquad::color::{Color, WHITE};
use macroquad::math::{vec2, Rect};

use super::canvas::Canvas;
use super::gameplay::{draw_tiles, View};
use super::menu::{BG_COLOR, MUTED_COLOR, TEXT_COLOR};
use super::menus::MainMenu;
use super::{GameState, Session, Transition};
use crate::input::FrameInput;
use crate::map::{save_map, validate_map, GameMap, TileType};

const CURSOR_COLOR: Color = Color::new(1.0, 1.0, 1.0, 0.35);
const SPAWN_COLOR: Color = Color::new(1.0, 1.0, 1.0, 0.8);

#[derive(Debug, Clone)]
pub struct LevelEditor {
    map: GameMap,
    cursor: (i32, i32),
    palette_index: usize,
    dirty: bool,
}

impl LevelEditor {
    pub fn new(session: &Session) -> Self {
        Self {
            map: session.selected_map().clone(),
            cursor: (0, 0),
            palette_index: 1,
            dirty: false,
        }
    }

    pub fn map(&self) -> &GameMap {
        &self.map
    }

    pub fn cursor(&self) -> (i32, i32) {
        self.cursor
    }

    pub fn current_tile(&self) -> TileType {
        TileType::EDITOR_PALETTE[self.palette_index % TileType::EDITOR_PALETTE.len()]
    }

    pub fn update(&mut self, input: &FrameInput, session: &mut Session) -> Transition {
        let menu = &input.menu;
        if menu.back {
            self.commit(session);
            return Transition::Replace(GameState::MainMenu(MainMenu::new()));
        }

        let (mut col, mut row) = self.cursor;
        if menu.left {
            col -= 1;
        }
        if menu.right {
            col += 1;
        }
        if menu.up {
            row -= 1;
        }
        if menu.down {
            row += 1;
        }
        let max_col = self.map.width().saturating_sub(1) as i32;
        let max_row = self.map.height().saturating_sub(1) as i32;
        self.cursor = (col.clamp(0, max_col), row.clamp(0, max_row));

        if menu.alt {
            self.palette_index = (self.palette_index + 1) % TileType::EDITOR_PALETTE.len();
        }
        if menu.confirm {
            let (col, row) = self.cursor;
            self.map.set_tile(col, row, self.current_tile());
            self.dirty = true;
        }
        Transition::None
    }

    /// Store the edited map in the session and save it if there's a path.
    fn commit(&mut self, session: &mut Session) {
        if !self.dirty {
            return;
        }
        if let Err(e) = validate_map(&self.map) {
            log::warn!("discarding edits to '{}': {}", self.map.name, e);
            return;
        }
        session.store_selected_map(self.map.clone());
        if let Some(path) = &session.editor_path {
            match save_map(&self.map, path) {
                Ok(()) => log::info!("saved map to {}", path.display()),
                Err(e) => log::error!("failed to save map to {}: {}", path.display(), e),
            }
        }
        self.dirty = false;
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.clear(BG_COLOR);
        let size = canvas.size();
        let view = View::fit(&self.map, vec2(size.x, size.y - 40.0));
        draw_tiles(canvas, &self.map, &view);

        for spawn in &self.map.spawn_points {
            let r = Rect::new(spawn.x - 6.0, spawn.y - 12.0, 12.0, 12.0);
            canvas.rect(view.rect(r), SPAWN_COLOR);
        }

        let (col, row) = self.cursor;
        canvas.rect(view.rect(GameMap::tile_bounds(col, row)), CURSOR_COLOR);

        let tile = self.current_tile();
        let y = size.y - 14.0;
        canvas.rect(Rect::new(16.0, y - 16.0, 16.0, 16.0), if tile == TileType::Empty { WHITE } else { tile.color() });
        let label = format!("{} ({}, {}){}", tile.name(), col, row, if self.dirty { " *" } else { "" });
        canvas.text(&label, vec2(40.0, y), 20.0, TEXT_COLOR);
        canvas.text("Enter: paint  Tab: next tile  Esc: save and exit", vec2(size.x - 480.0, y), 18.0, MUTED_COLOR);
    }
}
