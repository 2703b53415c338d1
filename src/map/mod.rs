//! Arena maps: tile types, the tile grid, and map files.

mod grid;
mod io;
mod tile;

pub use grid::{GameMap, ItemSpawn, MapMetadata, SpawnPoint, TileLookup};
pub use io::{limits, load_map, load_map_from_str, save_map, serialize_map, validate_map};
pub use tile::{PassDirection, TileInfo, TileType, TILE_SIZE};
