//! Collision System
//!
//! AABB bodies against the tile grid. Resolution is axis-separated:
//! horizontal motion first (at the previous height), then vertical (at
//! the corrected x). A tile only blocks when the body's previous edge was
//! on its blocking side, which is what makes one-way tiles work and keeps
//! a body that is already embedded from being flung out sideways.
//!
//! The resolver is a pure function of the grid, the body and its
//! positions, so resolving an already-resolved body changes nothing.

use macroquad::math::{Rect, Vec2};

use super::components::{Physics, Player};
use super::entity::Entity;
use super::world::World;
use crate::map::{GameMap, PassDirection, TileLookup, TileType, TILE_SIZE};

/// Slack for "resting on" and "was outside" comparisons.
const CONTACT_EPSILON: f32 = 0.01;

/// Horizontal limits the body's box is clamped into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub left: f32,
    pub right: f32,
}

impl WorldBounds {
    pub fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    /// The map's full pixel width.
    pub fn from_map(map: &GameMap) -> Self {
        Self::new(0.0, map.pixel_width())
    }

    pub fn unbounded() -> Self {
        Self::new(f32::NEG_INFINITY, f32::INFINITY)
    }
}

/// Result of resolving one body against the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Corrected position
    pub position: Vec2,
    /// Velocity with blocked components zeroed (or bounced)
    pub velocity: Vec2,
    /// Lower edge rests on a supporting tile
    pub grounded: bool,
    /// The supporting tile, when grounded
    pub ground_tile: Option<TileType>,
    pub hit_wall: bool,
    pub hit_ceiling: bool,
    /// Overlapping a hazard tile (no positional correction)
    pub hazard: bool,
    pub touched_coin: bool,
    pub touched_goal: bool,
    pub touched_checkpoint: bool,
    /// Box was entirely off the grid and got reverted
    pub out_of_grid: bool,
}

/// Inclusive cell range a box strictly overlaps. Touching an edge is not overlap.
fn cell_span(min: f32, max: f32) -> (i32, i32) {
    let first = (min / TILE_SIZE).floor() as i32;
    let last = (max / TILE_SIZE).ceil() as i32 - 1;
    (first, last.max(first))
}

fn cells(rect: &Rect) -> impl Iterator<Item = (i32, i32)> {
    let (c0, c1) = cell_span(rect.x, rect.x + rect.w);
    let (r0, r1) = cell_span(rect.y, rect.y + rect.h);
    (r0..=r1).flat_map(move |row| (c0..=c1).map(move |col| (col, row)))
}

fn fully_outside<G: TileLookup + ?Sized>(grid: &G, rect: &Rect) -> bool {
    let (cols, rows) = grid.grid_size();
    let (w, h) = (cols as f32 * TILE_SIZE, rows as f32 * TILE_SIZE);
    rect.x + rect.w <= 0.0 || rect.x >= w || rect.y + rect.h <= 0.0 || rect.y >= h
}

/// Does this tile stop travel in the given direction?
fn blocks(tile: TileType, travel: PassDirection) -> bool {
    if !tile.is_solid() {
        return false;
    }
    match tile.pass_direction() {
        None => true,
        Some(pass) => pass == opposite(travel),
    }
}

fn opposite(dir: PassDirection) -> PassDirection {
    match dir {
        PassDirection::Left => PassDirection::Right,
        PassDirection::Right => PassDirection::Left,
        PassDirection::Up => PassDirection::Down,
        PassDirection::Down => PassDirection::Up,
    }
}

/// Resolve a body that moved from `physics.last_position` to `position`.
pub fn resolve<G: TileLookup + ?Sized>(
    grid: &G,
    physics: &Physics,
    position: Vec2,
    bounds: &WorldBounds,
) -> CollisionResult {
    let previous = physics.last_position;
    let mut result = CollisionResult {
        position,
        velocity: physics.velocity,
        grounded: false,
        ground_tile: None,
        hit_wall: false,
        hit_ceiling: false,
        hazard: false,
        touched_coin: false,
        touched_goal: false,
        touched_checkpoint: false,
        out_of_grid: false,
    };

    if fully_outside(grid, &physics.world_bounds(position)) {
        result.position = previous;
        result.velocity = Vec2::ZERO;
        result.out_of_grid = true;
        detect_ground(grid, physics, &mut result);
        return result;
    }

    clamp_to_bounds(physics, bounds, &mut result);
    resolve_horizontal(grid, physics, previous, &mut result);
    resolve_vertical(grid, physics, previous, &mut result);
    detect_ground(grid, physics, &mut result);
    scan_overlaps(grid, physics, &mut result);
    result
}

fn clamp_to_bounds(physics: &Physics, bounds: &WorldBounds, result: &mut CollisionResult) {
    let min_x = bounds.left - physics.bbox.x;
    let max_x = bounds.right - (physics.bbox.x + physics.bbox.w);
    if result.position.x < min_x {
        result.position.x = min_x;
        result.velocity.x = result.velocity.x.max(0.0);
        result.hit_wall = true;
    } else if result.position.x > max_x {
        result.position.x = max_x;
        result.velocity.x = result.velocity.x.min(0.0);
        result.hit_wall = true;
    }
}

fn resolve_horizontal<G: TileLookup + ?Sized>(
    grid: &G,
    physics: &Physics,
    previous: Vec2,
    result: &mut CollisionResult,
) {
    let dx = result.position.x - previous.x;
    if dx == 0.0 {
        return;
    }
    let before = physics.world_bounds(previous);
    let moved = physics.world_bounds(Vec2::new(result.position.x, previous.y));

    if dx > 0.0 {
        let mut wall: Option<f32> = None;
        for (col, row) in cells(&moved) {
            let tile_left = col as f32 * TILE_SIZE;
            let was_outside = before.x + before.w <= tile_left + CONTACT_EPSILON;
            if was_outside && blocks(grid.tile_at(col, row), PassDirection::Right) {
                wall = Some(wall.map_or(tile_left, |w: f32| w.min(tile_left)));
            }
        }
        if let Some(left) = wall {
            result.position.x = left - (physics.bbox.x + physics.bbox.w);
            result.velocity.x = 0.0;
            result.hit_wall = true;
        }
    } else {
        let mut wall: Option<f32> = None;
        for (col, row) in cells(&moved) {
            let tile_right = (col + 1) as f32 * TILE_SIZE;
            let was_outside = before.x >= tile_right - CONTACT_EPSILON;
            if was_outside && blocks(grid.tile_at(col, row), PassDirection::Left) {
                wall = Some(wall.map_or(tile_right, |w: f32| w.max(tile_right)));
            }
        }
        if let Some(right) = wall {
            result.position.x = right - physics.bbox.x;
            result.velocity.x = 0.0;
            result.hit_wall = true;
        }
    }
}

fn resolve_vertical<G: TileLookup + ?Sized>(
    grid: &G,
    physics: &Physics,
    previous: Vec2,
    result: &mut CollisionResult,
) {
    let dy = result.position.y - previous.y;
    if dy == 0.0 {
        return;
    }
    let before = physics.world_bounds(Vec2::new(result.position.x, previous.y));
    let moved = physics.world_bounds(result.position);

    if dy > 0.0 {
        let mut floor: Option<f32> = None;
        for (col, row) in cells(&moved) {
            let tile_top = row as f32 * TILE_SIZE;
            let was_above = before.y + before.h <= tile_top + CONTACT_EPSILON;
            if was_above && blocks(grid.tile_at(col, row), PassDirection::Down) {
                floor = Some(floor.map_or(tile_top, |f: f32| f.min(tile_top)));
            }
        }
        if let Some(top) = floor {
            result.position.y = top - (physics.bbox.y + physics.bbox.h);
            result.velocity.y = if physics.bounciness > 0.0 {
                -result.velocity.y * physics.bounciness
            } else {
                0.0
            };
        }
    } else {
        let mut ceiling: Option<f32> = None;
        for (col, row) in cells(&moved) {
            let tile_bottom = (row + 1) as f32 * TILE_SIZE;
            let was_below = before.y >= tile_bottom - CONTACT_EPSILON;
            if was_below && blocks(grid.tile_at(col, row), PassDirection::Up) {
                ceiling = Some(ceiling.map_or(tile_bottom, |c: f32| c.max(tile_bottom)));
            }
        }
        if let Some(bottom) = ceiling {
            result.position.y = bottom - physics.bbox.y;
            result.velocity.y = 0.0;
            result.hit_ceiling = true;
        }
    }
}

/// Grounded iff not moving up and the lower edge sits on a tile top that
/// supports from above.
fn detect_ground<G: TileLookup + ?Sized>(grid: &G, physics: &Physics, result: &mut CollisionResult) {
    result.grounded = false;
    result.ground_tile = None;
    if result.velocity.y < 0.0 {
        return;
    }

    let body = physics.world_bounds(result.position);
    let bottom = body.y + body.h;
    let row = (bottom / TILE_SIZE).round();
    if (bottom - row * TILE_SIZE).abs() > CONTACT_EPSILON {
        return;
    }
    let row = row as i32;

    let (c0, c1) = cell_span(body.x, body.x + body.w);
    let center_col = ((body.x + body.w * 0.5) / TILE_SIZE).floor() as i32;
    let supporting = |col: i32| {
        let tile = grid.tile_at(col, row);
        tile.supports_from_above().then_some(tile)
    };

    let tile = supporting(center_col).or_else(|| (c0..=c1).find_map(supporting));
    if let Some(tile) = tile {
        result.grounded = true;
        result.ground_tile = Some(tile);
    }
}

fn scan_overlaps<G: TileLookup + ?Sized>(grid: &G, physics: &Physics, result: &mut CollisionResult) {
    for (col, row) in cells(&physics.world_bounds(result.position)) {
        match grid.tile_at(col, row) {
            TileType::Hazard => result.hazard = true,
            TileType::Coin => result.touched_coin = true,
            TileType::Goal => result.touched_goal = true,
            TileType::Checkpoint => result.touched_checkpoint = true,
            _ => {}
        }
    }
}

/// Resolve every active, moving body in spawn order and write the
/// corrections back. Returns each body's result for the interaction pass.
pub fn run<G: TileLookup + ?Sized>(
    world: &mut World,
    grid: &G,
    bounds: &WorldBounds,
) -> Vec<(Entity, CollisionResult)> {
    let mut results = Vec::new();
    for entity in world.active_entities() {
        if world.get::<Player>(entity).map(|p| p.dead).unwrap_or(false) {
            continue;
        }
        let Some(position) = world.position(entity) else { continue };
        let Some(physics) = world.physics.get_mut(entity) else { continue };
        if physics.is_static {
            continue;
        }

        let result = resolve(grid, physics, position, bounds);
        physics.velocity = result.velocity;
        physics.on_ground = result.grounded;
        physics.ground_tile = result.ground_tile;

        if let Some(info) = world.info_mut(entity) {
            info.position = result.position;
            info.velocity = result.velocity;
        }
        if result.out_of_grid {
            log::warn!("entity {} left the grid, reverted", entity);
        }
        results.push((entity, result));
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PhysicsTuning, FIXED_DT};
    use crate::game::physics::integrate;
    use crate::input::PlayerInput;
    use macroquad::math::vec2;

    /// 10x10 map with a solid floor on row 9.
    fn floor_map() -> GameMap {
        let mut map = GameMap::new(10, 10);
        map.fill(0..=9, 9..=9, TileType::Solid);
        map
    }

    fn body_at(previous: Vec2, velocity: Vec2) -> Physics {
        let mut physics = Physics::default();
        physics.last_position = previous;
        physics.velocity = velocity;
        physics
    }

    fn settle(map: &GameMap, start: Vec2) -> (Physics, Vec2) {
        let mut physics = body_at(start, Vec2::ZERO);
        let mut pos = start;
        let tuning = PhysicsTuning::default();
        let bounds = WorldBounds::from_map(map);
        for _ in 0..120 {
            integrate(&mut physics, &mut pos, &PlayerInput::default(), &tuning, FIXED_DT);
            let r = resolve(map, &physics, pos, &bounds);
            pos = r.position;
            physics.velocity = r.velocity;
            physics.on_ground = r.grounded;
            physics.ground_tile = r.ground_tile;
        }
        (physics, pos)
    }

    #[test]
    fn test_lands_on_floor() {
        let map = floor_map();
        let physics = body_at(vec2(80.0, 285.0), vec2(0.0, 300.0));
        let r = resolve(&map, &physics, vec2(80.0, 290.0), &WorldBounds::from_map(&map));
        assert_eq!(r.position, vec2(80.0, 288.0));
        assert_eq!(r.velocity.y, 0.0);
        assert!(r.grounded);
        assert_eq!(r.ground_tile, Some(TileType::Solid));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let map = floor_map();
        let bounds = WorldBounds::from_map(&map);
        let physics = body_at(vec2(80.0, 285.0), vec2(40.0, 300.0));
        let first = resolve(&map, &physics, vec2(81.0, 290.0), &bounds);

        let mut again = physics.clone();
        again.last_position = first.position;
        again.velocity = first.velocity;
        let second = resolve(&map, &again, first.position, &bounds);
        assert_eq!(second, first);
    }

    #[test]
    fn test_not_grounded_after_jump() {
        let map = floor_map();
        let (mut physics, mut pos) = settle(&map, vec2(80.0, 200.0));
        assert!(physics.on_ground);
        assert_eq!(pos.y, 288.0);

        let jump = PlayerInput { jump: true, jump_pressed: true, ..Default::default() };
        integrate(&mut physics, &mut pos, &jump, &PhysicsTuning::default(), FIXED_DT);
        let r = resolve(&map, &physics, pos, &WorldBounds::from_map(&map));
        assert!(!r.grounded);
        assert!(r.velocity.y < 0.0);
    }

    #[test]
    fn test_walks_off_ledge() {
        let mut map = GameMap::new(10, 10);
        map.fill(0..=3, 9..=9, TileType::Solid);
        let physics = body_at(vec2(140.0, 288.0), Vec2::ZERO);
        let r = resolve(&map, &physics, vec2(140.0, 288.0), &WorldBounds::from_map(&map));
        assert!(!r.grounded);

        // Box 122..138 still overlaps column 3
        let edge = body_at(vec2(130.0, 288.0), Vec2::ZERO);
        let r = resolve(&map, &edge, vec2(130.0, 288.0), &WorldBounds::from_map(&map));
        assert!(r.grounded);
    }

    #[test]
    fn test_wall_stops_horizontal_motion() {
        let mut map = floor_map();
        map.fill(5..=5, 0..=8, TileType::Solid);
        let physics = body_at(vec2(150.0, 288.0), vec2(200.0, 0.0));
        let r = resolve(&map, &physics, vec2(155.0, 288.0), &WorldBounds::from_map(&map));
        assert_eq!(r.position.x, 152.0);
        assert_eq!(r.velocity.x, 0.0);
        assert!(r.hit_wall);
        assert!(r.grounded);
    }

    #[test]
    fn test_head_bump() {
        let mut map = floor_map();
        map.fill(0..=9, 4..=4, TileType::Solid);
        let physics = body_at(vec2(80.0, 194.0), vec2(0.0, -400.0));
        let r = resolve(&map, &physics, vec2(80.0, 188.0), &WorldBounds::from_map(&map));
        assert_eq!(r.position.y, 192.0);
        assert_eq!(r.velocity.y, 0.0);
        assert!(r.hit_ceiling);
    }

    #[test]
    fn test_platform_lands_from_above_and_passes_from_below() {
        let mut map = GameMap::new(10, 10);
        map.fill(0..=9, 5..=5, TileType::Platform);
        let bounds = WorldBounds::from_map(&map);

        let falling = body_at(vec2(80.0, 158.0), vec2(0.0, 300.0));
        let r = resolve(&map, &falling, vec2(80.0, 165.0), &bounds);
        assert_eq!(r.position.y, 160.0);
        assert!(r.grounded);

        let rising = body_at(vec2(80.0, 200.0), vec2(0.0, -400.0));
        let r = resolve(&map, &rising, vec2(80.0, 190.0), &bounds);
        assert_eq!(r.position.y, 190.0);
        assert!(!r.hit_ceiling);

        // Inside the platform and still falling: no snap upward
        let inside = body_at(vec2(80.0, 170.0), vec2(0.0, 300.0));
        let r = resolve(&map, &inside, vec2(80.0, 175.0), &bounds);
        assert_eq!(r.position.y, 175.0);
    }

    #[test]
    fn test_one_way_down_blocks_rising_only() {
        let mut map = GameMap::new(10, 10);
        map.fill(0..=9, 5..=5, TileType::OneWayDown);
        let bounds = WorldBounds::from_map(&map);

        let falling = body_at(vec2(80.0, 158.0), vec2(0.0, 300.0));
        assert_eq!(resolve(&map, &falling, vec2(80.0, 165.0), &bounds).position.y, 165.0);

        let rising = body_at(vec2(80.0, 226.0), vec2(0.0, -400.0));
        let r = resolve(&map, &rising, vec2(80.0, 220.0), &bounds);
        assert_eq!(r.position.y, 224.0);
        assert!(r.hit_ceiling);
    }

    #[test]
    fn test_one_way_horizontal() {
        let mut map = floor_map();
        map.fill(5..=5, 0..=8, TileType::OneWayRight);
        let bounds = WorldBounds::from_map(&map);

        // Travelling right passes
        let right = body_at(vec2(150.0, 288.0), vec2(200.0, 0.0));
        assert_eq!(resolve(&map, &right, vec2(155.0, 288.0), &bounds).position.x, 155.0);

        // Travelling left from the far side is blocked at the tile's right edge
        let left = body_at(vec2(202.0, 288.0), vec2(-200.0, 0.0));
        let r = resolve(&map, &left, vec2(198.0, 288.0), &bounds);
        assert_eq!(r.position.x, 200.0);
        assert!(r.hit_wall);
    }

    #[test]
    fn test_hazard_flags_without_correction() {
        let mut map = floor_map();
        map.fill(2..=3, 8..=8, TileType::Hazard);
        let physics = body_at(vec2(80.0, 280.0), vec2(0.0, 100.0));
        let r = resolve(&map, &physics, vec2(80.0, 284.0), &WorldBounds::from_map(&map));
        assert!(r.hazard);
        assert_eq!(r.position.y, 284.0);
    }

    #[test]
    fn test_out_of_grid_reverts() {
        let map = floor_map();
        let physics = body_at(vec2(80.0, 100.0), vec2(0.0, 600.0));
        let r = resolve(&map, &physics, vec2(80.0, 900.0), &WorldBounds::unbounded());
        assert!(r.out_of_grid);
        assert_eq!(r.position, vec2(80.0, 100.0));
        assert_eq!(r.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_world_bounds_clamp() {
        let map = floor_map();
        let physics = body_at(vec2(10.0, 288.0), vec2(-200.0, 0.0));
        let r = resolve(&map, &physics, vec2(4.0, 288.0), &WorldBounds::from_map(&map));
        assert_eq!(r.position.x, 8.0);
        assert_eq!(r.velocity.x, 0.0);
    }
}
