//! Tile types and their static properties
//!
//! Properties belong to the type, never to the cell: a grid stores only
//! the `TileType` discriminant and everything else is looked up here.

use macroquad::color::{
    Color, BLANK, BLUE, BROWN, DARKGRAY, GOLD, GRAY, GREEN, LIME, ORANGE, PURPLE, RED, SKYBLUE,
    YELLOW,
};
use serde::{Deserialize, Serialize};

/// Edge length of one tile in world pixels.
pub const TILE_SIZE: f32 = 32.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileType {
    #[default]
    Empty = 0,
    Solid = 1,
    /// Jump-through platform, lands from above
    Platform = 2,
    Breakable = 3,
    Coin = 4,
    /// Spikes, lava: hurts but never pushes
    Hazard = 5,
    Water = 6,
    Ice = 7,
    Conveyor = 8,
    Spring = 9,
    OneWayLeft = 10,
    OneWayRight = 11,
    OneWayUp = 12,
    OneWayDown = 13,
    Goal = 14,
    Checkpoint = 15,
}

/// Direction a one-way tile lets bodies travel through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassDirection {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileInfo {
    pub name: &'static str,
    pub color: Color,
    pub solid: bool,
    pub breakable: bool,
    pub collectible: bool,
}

const fn info(name: &'static str, color: Color, solid: bool, breakable: bool, collectible: bool) -> TileInfo {
    TileInfo { name, color, solid, breakable, collectible }
}

impl TileType {
    pub const ALL: [TileType; 16] = [
        TileType::Empty,
        TileType::Solid,
        TileType::Platform,
        TileType::Breakable,
        TileType::Coin,
        TileType::Hazard,
        TileType::Water,
        TileType::Ice,
        TileType::Conveyor,
        TileType::Spring,
        TileType::OneWayLeft,
        TileType::OneWayRight,
        TileType::OneWayUp,
        TileType::OneWayDown,
        TileType::Goal,
        TileType::Checkpoint,
    ];

    /// The palette offered by the level editor.
    pub const EDITOR_PALETTE: [TileType; 10] = [
        TileType::Empty,
        TileType::Solid,
        TileType::Platform,
        TileType::Breakable,
        TileType::Coin,
        TileType::Hazard,
        TileType::Water,
        TileType::Ice,
        TileType::Spring,
        TileType::Goal,
    ];

    pub fn info(self) -> TileInfo {
        match self {
            TileType::Empty => info("Empty", BLANK, false, false, false),
            TileType::Solid => info("Solid Block", BROWN, true, false, false),
            TileType::Platform => info("Platform", ORANGE, true, false, false),
            TileType::Breakable => info("Breakable Block", YELLOW, true, true, false),
            TileType::Coin => info("Coin", GOLD, false, false, true),
            TileType::Hazard => info("Hazard", RED, false, false, false),
            TileType::Water => info("Water", BLUE, false, false, false),
            TileType::Ice => info("Ice", SKYBLUE, true, false, false),
            TileType::Conveyor => info("Conveyor Belt", GRAY, true, false, false),
            TileType::Spring => info("Spring", GREEN, true, false, false),
            TileType::OneWayLeft => info("One-Way Left", PURPLE, true, false, false),
            TileType::OneWayRight => info("One-Way Right", PURPLE, true, false, false),
            TileType::OneWayUp => info("One-Way Up", PURPLE, true, false, false),
            TileType::OneWayDown => info("One-Way Down", PURPLE, true, false, false),
            TileType::Goal => info("Goal", LIME, false, false, true),
            TileType::Checkpoint => info("Checkpoint", DARKGRAY, false, false, true),
        }
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn color(self) -> Color {
        self.info().color
    }

    pub fn is_solid(self) -> bool {
        self.info().solid
    }

    pub fn is_breakable(self) -> bool {
        self.info().breakable
    }

    pub fn is_collectible(self) -> bool {
        self.info().collectible
    }

    pub fn is_hazard(self) -> bool {
        self == TileType::Hazard
    }

    /// `Some` for tiles that only block in one direction.
    pub fn pass_direction(self) -> Option<PassDirection> {
        match self {
            TileType::Platform | TileType::OneWayUp => Some(PassDirection::Up),
            TileType::OneWayDown => Some(PassDirection::Down),
            TileType::OneWayLeft => Some(PassDirection::Left),
            TileType::OneWayRight => Some(PassDirection::Right),
            _ => None,
        }
    }

    /// Blocks in every direction.
    pub fn is_fully_solid(self) -> bool {
        self.is_solid() && self.pass_direction().is_none()
    }

    /// A body can stand on top of this tile.
    pub fn supports_from_above(self) -> bool {
        self.is_fully_solid() || self.pass_direction() == Some(PassDirection::Up)
    }

    /// Numeric code, stable across versions.
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<TileType> {
        TileType::ALL.get(code as usize).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        for (i, tile) in TileType::ALL.iter().enumerate() {
            assert_eq!(tile.code() as usize, i);
            assert_eq!(TileType::from_code(i as u8), Some(*tile));
        }
        assert_eq!(TileType::from_code(16), None);
    }

    #[test]
    fn test_properties_by_type() {
        assert!(TileType::Solid.is_solid());
        assert!(TileType::Breakable.is_breakable());
        assert!(TileType::Coin.is_collectible());
        assert!(!TileType::Hazard.is_solid());
        assert!(TileType::Hazard.is_hazard());
        assert!(!TileType::Water.is_solid());
    }

    #[test]
    fn test_one_way_classification() {
        assert!(TileType::Platform.supports_from_above());
        assert!(TileType::OneWayUp.supports_from_above());
        assert!(!TileType::OneWayDown.supports_from_above());
        assert!(!TileType::OneWayLeft.supports_from_above());
        assert!(TileType::Ice.supports_from_above());
        assert!(!TileType::Platform.is_fully_solid());
        assert!(TileType::Spring.is_fully_solid());
    }
}
