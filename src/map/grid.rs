//! Map descriptor and tile grid
//!
//! A `GameMap` is fully materialized before a gameplay context is built:
//! dimensions, tiles, player spawns, item spawns. How it got here (RON
//! file, editor, built-in) is not the simulation's business.

use macroquad::math::{vec2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::tile::{TileType, TILE_SIZE};
use crate::config::Difficulty;
use crate::game::components::ItemType;

/// Read-only tile access used by the collision resolver.
///
/// Out-of-range coordinates must report `TileType::Solid`.
pub trait TileLookup {
    fn tile_at(&self, col: i32, row: i32) -> TileType;

    /// (columns, rows)
    fn grid_size(&self) -> (usize, usize);
}

/// Where a player slot appears at round start and on respawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
    pub player_index: usize,
}

impl SpawnPoint {
    pub fn position(&self) -> Vec2 {
        vec2(self.x, self.y)
    }
}

/// A spot that produces an item, then waits `respawn_time` seconds after
/// pickup before producing another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemSpawn {
    pub x: f32,
    pub y: f32,
    pub item_type: ItemType,
    #[serde(default = "default_respawn_time")]
    pub respawn_time: f32,
}

fn default_respawn_time() -> f32 {
    10.0
}

impl ItemSpawn {
    pub fn position(&self) -> Vec2 {
        vec2(self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapMetadata {
    pub author: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub theme: String,
    pub tags: Vec<String>,
}

impl Default for MapMetadata {
    fn default() -> Self {
        Self {
            author: "Unknown".to_string(),
            description: String::new(),
            difficulty: Difficulty::Normal,
            theme: "Classic".to_string(),
            tags: Vec::new(),
        }
    }
}

/// Fixed-size tile grid plus spawn data. Tiles are row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMap {
    pub name: String,
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) tiles: Vec<TileType>,
    #[serde(default)]
    pub spawn_points: Vec<SpawnPoint>,
    #[serde(default)]
    pub item_spawns: Vec<ItemSpawn>,
    #[serde(default)]
    pub metadata: MapMetadata,
}

impl GameMap {
    /// An all-Empty map.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            name: "Untitled".to_string(),
            width,
            height,
            tiles: vec![TileType::Empty; width * height],
            spawn_points: Vec::new(),
            item_spawns: Vec::new(),
            metadata: MapMetadata::default(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Width of the playable area in world pixels.
    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * TILE_SIZE
    }

    pub fn pixel_height(&self) -> f32 {
        self.height as f32 * TILE_SIZE
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if self.is_valid_position(col, row) {
            Some(row as usize * self.width + col as usize)
        } else {
            None
        }
    }

    pub fn is_valid_position(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && (col as usize) < self.width && (row as usize) < self.height
    }

    /// Out-of-bounds writes are ignored.
    pub fn set_tile(&mut self, col: i32, row: i32, tile: TileType) {
        if let Some(idx) = self.index(col, row) {
            self.tiles[idx] = tile;
        }
    }

    /// Fill an inclusive rectangle of cells.
    pub fn fill(&mut self, cols: std::ops::RangeInclusive<i32>, rows: std::ops::RangeInclusive<i32>, tile: TileType) {
        for row in rows {
            for col in cols.clone() {
                self.set_tile(col, row, tile);
            }
        }
    }

    pub fn tile_to_world(col: i32, row: i32) -> Vec2 {
        vec2(col as f32 * TILE_SIZE, row as f32 * TILE_SIZE)
    }

    /// Floors, so negative positions land in negative cells.
    pub fn world_to_tile(pos: Vec2) -> (i32, i32) {
        ((pos.x / TILE_SIZE).floor() as i32, (pos.y / TILE_SIZE).floor() as i32)
    }

    pub fn tile_bounds(col: i32, row: i32) -> Rect {
        Rect::new(col as f32 * TILE_SIZE, row as f32 * TILE_SIZE, TILE_SIZE, TILE_SIZE)
    }

    /// Spawn for a player slot: the one tagged with that index, else the
    /// slot-th entry in list order.
    pub fn spawn_for(&self, player_index: usize) -> Option<&SpawnPoint> {
        self.spawn_points
            .iter()
            .find(|s| s.player_index == player_index)
            .or_else(|| self.spawn_points.get(player_index))
    }

    /// Cells of a given type, in row-major order.
    pub fn cells_of(&self, tile: TileType) -> impl Iterator<Item = (i32, i32)> + '_ {
        let width = self.width;
        self.tiles
            .iter()
            .enumerate()
            .filter(move |(_, t)| **t == tile)
            .map(move |(i, _)| ((i % width) as i32, (i / width) as i32))
    }

    /// The built-in four-player arena. Floor with a pit of spikes, side
    /// ledges, an ice shelf carrying the hill, a spring and a conveyor.
    pub fn arena() -> Self {
        let (w, h) = (40usize, 22usize);
        let mut map = GameMap::new(w, h);
        map.name = "Arena".to_string();
        map.metadata.author = "stompwar".to_string();
        map.metadata.description = "Classic four-corner brawl".to_string();

        let last_col = w as i32 - 1;
        let floor = h as i32 - 1;

        map.fill(0..=last_col, floor..=floor, TileType::Solid);
        map.fill(18..=21, floor..=floor, TileType::Hazard);
        map.fill(17..=17, floor - 1..=floor, TileType::Solid);
        map.fill(22..=22, floor - 1..=floor, TileType::Solid);

        // Side ledges
        map.fill(3..=10, 15..=15, TileType::Platform);
        map.fill(29..=36, 15..=15, TileType::Platform);
        // Center shelf
        map.fill(15..=24, 10..=10, TileType::Solid);
        map.fill(16..=23, 9..=9, TileType::Ice);
        // Hill zone above the shelf
        map.fill(19..=20, 8..=8, TileType::Goal);
        // High perches
        map.fill(2..=7, 6..=6, TileType::Platform);
        map.fill(32..=37, 6..=6, TileType::Platform);

        map.set_tile(12, floor - 1, TileType::Spring);
        map.fill(26..=30, floor - 1..=floor - 1, TileType::Conveyor);

        let ground = floor as f32 * TILE_SIZE;
        let ledge = 15.0 * TILE_SIZE;
        map.spawn_points = vec![
            SpawnPoint { x: 100.0, y: ground, player_index: 0 },
            SpawnPoint { x: 1180.0, y: ground, player_index: 1 },
            SpawnPoint { x: 200.0, y: ledge, player_index: 2 },
            SpawnPoint { x: 1080.0, y: ledge, player_index: 3 },
        ];

        let shelf = 9.0 * TILE_SIZE;
        map.item_spawns = vec![
            ItemSpawn { x: 640.0, y: shelf, item_type: ItemType::Star, respawn_time: 30.0 },
            ItemSpawn { x: 150.0, y: 6.0 * TILE_SIZE, item_type: ItemType::Coin, respawn_time: 5.0 },
            ItemSpawn { x: 1130.0, y: 6.0 * TILE_SIZE, item_type: ItemType::Coin, respawn_time: 5.0 },
            ItemSpawn { x: 420.0, y: ground, item_type: ItemType::Coin, respawn_time: 5.0 },
            ItemSpawn { x: 860.0, y: ground, item_type: ItemType::Coin, respawn_time: 5.0 },
            ItemSpawn { x: 640.0, y: ground - 64.0, item_type: ItemType::Mushroom, respawn_time: 20.0 },
        ];
        map
    }
}

impl TileLookup for GameMap {
    fn tile_at(&self, col: i32, row: i32) -> TileType {
        match self.index(col, row) {
            Some(idx) => self.tiles[idx],
            None => TileType::Solid,
        }
    }

    fn grid_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}
