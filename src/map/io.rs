//! Map loading and saving
//!
//! Uses RON for human-readable map files. Every load goes through
//! `validate_map` so a hand-edited file can't hand the simulation a grid
//! whose tile vector disagrees with its declared size.

use std::fs;
use std::path::Path;

use super::grid::GameMap;
use crate::error::MapError;

/// Validation limits to keep hostile files from allocating the world.
pub mod limits {
    /// Largest width or height, in tiles
    pub const MAX_MAP_SIZE: usize = 512;
}

pub fn validate_map(map: &GameMap) -> Result<(), MapError> {
    let (width, height) = (map.width(), map.height());
    if width == 0 || height == 0 || width > limits::MAX_MAP_SIZE || height > limits::MAX_MAP_SIZE {
        return Err(MapError::Dimensions { width, height, max: limits::MAX_MAP_SIZE });
    }

    let expected = width * height;
    if map.tiles.len() != expected {
        return Err(MapError::TileCount { expected, actual: map.tiles.len() });
    }

    let (max_x, max_y) = (map.pixel_width(), map.pixel_height());
    for (index, spawn) in map.spawn_points.iter().enumerate() {
        let inside = spawn.x.is_finite()
            && spawn.y.is_finite()
            && (0.0..=max_x).contains(&spawn.x)
            && (0.0..=max_y).contains(&spawn.y);
        if !inside {
            return Err(MapError::SpawnOutOfBounds { index });
        }
    }

    Ok(())
}

pub fn load_map_from_str(s: &str) -> Result<GameMap, MapError> {
    let map: GameMap = ron::from_str(s)?;
    validate_map(&map)?;
    Ok(map)
}

pub fn load_map<P: AsRef<Path>>(path: P) -> Result<GameMap, MapError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let map = load_map_from_str(&contents)?;
    log::info!("loaded map '{}' ({}x{}) from {}", map.name, map.width(), map.height(), path.display());
    Ok(map)
}

pub fn serialize_map(map: &GameMap) -> Result<String, MapError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(3)
        .indentor("  ".to_string());
    Ok(ron::ser::to_string_pretty(map, config)?)
}

pub fn save_map<P: AsRef<Path>>(map: &GameMap, path: P) -> Result<(), MapError> {
    validate_map(map)?;
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, serialize_map(map)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{TileLookup, TileType};

    #[test]
    fn test_save_and_load_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maps").join("arena.ron");

        let map = GameMap::arena();
        save_map(&map, &path).unwrap();
        let loaded = load_map(&path).unwrap();

        assert_eq!(loaded, map);
        assert_eq!(loaded.tile_at(19, 21), TileType::Hazard);
    }

    #[test]
    fn test_rejects_tile_count_mismatch() {
        let mut map = GameMap::new(3, 2);
        map.tiles.pop();
        let text = serialize_map(&map).unwrap();

        match load_map_from_str(&text) {
            Err(MapError::TileCount { expected: 6, actual: 5 }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_zero_size() {
        let map = GameMap::new(0, 4);
        assert!(matches!(validate_map(&map), Err(MapError::Dimensions { .. })));
    }

    #[test]
    fn test_rejects_spawn_outside_map() {
        let mut map = GameMap::new(4, 4);
        map.spawn_points.push(crate::map::SpawnPoint { x: 500.0, y: 10.0, player_index: 0 });
        assert!(matches!(validate_map(&map), Err(MapError::SpawnOutOfBounds { index: 0 })));
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        assert!(matches!(load_map_from_str("not a map"), Err(MapError::Parse(_))));
    }
}
