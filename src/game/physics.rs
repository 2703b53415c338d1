//! Physics Integrator
//!
//! Fixed-step movement for every active body, run for all entities before
//! any collision is resolved. Order within a step:
//! 1. Horizontal input: accelerate while a direction is held, else friction
//! 2. Jump (or spring launch) from the ground
//! 3. Accumulated forces, then gravity while airborne
//! 4. Clamp to max speed and terminal velocity
//! 5. position += velocity * dt
//!
//! Nothing here looks at tiles except through `Physics::ground_tile`, which
//! the collision resolver wrote on the previous frame.

use macroquad::math::Vec2;

use super::components::{Health, InputComponent, Physics, Player};
use super::world::World;
use crate::config::PhysicsTuning;
use crate::input::PlayerInput;
use crate::map::TileType;

/// Advance one body by `dt`. Static bodies don't move.
pub fn integrate(
    physics: &mut Physics,
    position: &mut Vec2,
    input: &PlayerInput,
    tuning: &PhysicsTuning,
    dt: f32,
) {
    physics.last_position = *position;
    if physics.is_static {
        physics.velocity = Vec2::ZERO;
        physics.acceleration = Vec2::ZERO;
        return;
    }

    let ground = if physics.on_ground { physics.ground_tile } else { None };

    // Horizontal
    let direction = input.horizontal();
    if direction != 0 {
        physics.velocity.x += direction as f32 * physics.run_acceleration * dt;
    } else {
        let friction = if ground == Some(TileType::Ice) { tuning.ice_friction } else { physics.friction };
        physics.velocity.x *= friction;
        if physics.velocity.x.abs() < tuning.snap_threshold {
            physics.velocity.x = 0.0;
        }
    }

    // Jump
    if physics.on_ground {
        if ground == Some(TileType::Spring) {
            physics.velocity.y = -tuning.spring_impulse;
            physics.on_ground = false;
        } else if input.jump_pressed {
            physics.velocity.y = -physics.jump_power;
            physics.on_ground = false;
        }
    }

    physics.velocity += physics.acceleration * dt;
    physics.acceleration = Vec2::ZERO;

    if physics.affected_by_gravity && !physics.on_ground {
        physics.velocity.y += physics.gravity * dt;
    }

    physics.clamp_velocity();

    *position += physics.velocity * dt;
    if physics.on_ground && ground == Some(TileType::Conveyor) {
        position.x += tuning.conveyor_speed * dt;
    }
}

/// Integrate every active, living body in spawn order.
pub fn run(world: &mut World, tuning: &PhysicsTuning, dt: f32) {
    for entity in world.active_entities() {
        if world.get::<Player>(entity).map(|p| p.dead).unwrap_or(false) {
            continue;
        }
        if world.get::<Health>(entity).map(Health::is_dead).unwrap_or(false) {
            continue;
        }
        let input = world
            .get::<InputComponent>(entity)
            .map(|i| i.current)
            .unwrap_or_default();

        let Some(mut position) = world.position(entity) else { continue };
        let Some(physics) = world.physics.get_mut(entity) else { continue };
        integrate(physics, &mut position, &input, tuning, dt);
        let velocity = physics.velocity;

        if let Some(info) = world.info_mut(entity) {
            info.position = position;
            info.velocity = velocity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FIXED_DT;
    use macroquad::math::vec2;

    fn step(physics: &mut Physics, position: &mut Vec2, input: PlayerInput) {
        integrate(physics, position, &input, &PhysicsTuning::default(), FIXED_DT);
    }

    fn right() -> PlayerInput {
        PlayerInput { right: true, ..Default::default() }
    }

    #[test]
    fn test_velocity_stays_clamped_under_any_input() {
        let mut physics = Physics::default();
        let mut pos = Vec2::ZERO;
        let inputs = [
            right(),
            PlayerInput { left: true, jump: true, jump_pressed: true, ..Default::default() },
            PlayerInput::default(),
        ];
        for frame in 0..600 {
            step(&mut physics, &mut pos, inputs[frame % 7 % 3]);
            assert!(physics.velocity.x.abs() <= physics.max_speed);
            assert!(physics.velocity.y <= physics.terminal_velocity);
        }
    }

    #[test]
    fn test_gravity_only_while_airborne() {
        let mut physics = Physics::default();
        let mut pos = Vec2::ZERO;
        step(&mut physics, &mut pos, PlayerInput::default());
        assert!((physics.velocity.y - 800.0 * FIXED_DT).abs() < 1e-4);

        let mut grounded = Physics { on_ground: true, ..Physics::default() };
        step(&mut grounded, &mut pos, PlayerInput::default());
        assert_eq!(grounded.velocity.y, 0.0);
    }

    #[test]
    fn test_jump_requires_ground() {
        let jump = PlayerInput { jump: true, jump_pressed: true, ..Default::default() };

        let mut airborne = Physics::default();
        let mut pos = Vec2::ZERO;
        step(&mut airborne, &mut pos, jump);
        assert!(airborne.velocity.y > 0.0);

        let mut grounded = Physics { on_ground: true, ..Physics::default() };
        step(&mut grounded, &mut pos, jump);
        assert!(!grounded.on_ground);
        // Gravity is applied on the same frame once airborne
        assert!((grounded.velocity.y - (-400.0 + 800.0 * FIXED_DT)).abs() < 1e-3);
    }

    #[test]
    fn test_friction_snaps_to_zero() {
        let mut physics = Physics { on_ground: true, ..Physics::default() };
        physics.velocity.x = 100.0;
        let mut pos = Vec2::ZERO;
        for _ in 0..200 {
            step(&mut physics, &mut pos, PlayerInput::default());
        }
        assert_eq!(physics.velocity.x, 0.0);
    }

    #[test]
    fn test_ice_is_slipperier() {
        let mut normal = Physics { on_ground: true, ground_tile: Some(TileType::Solid), ..Physics::default() };
        let mut ice = Physics { on_ground: true, ground_tile: Some(TileType::Ice), ..Physics::default() };
        normal.velocity.x = 100.0;
        ice.velocity.x = 100.0;
        let mut pos = Vec2::ZERO;
        step(&mut normal, &mut pos, PlayerInput::default());
        step(&mut ice, &mut pos, PlayerInput::default());
        assert!((normal.velocity.x - 90.0).abs() < 1e-3);
        assert!((ice.velocity.x - 98.0).abs() < 1e-3);
    }

    #[test]
    fn test_spring_launches_without_input() {
        let mut physics = Physics { on_ground: true, ground_tile: Some(TileType::Spring), ..Physics::default() };
        let mut pos = Vec2::ZERO;
        step(&mut physics, &mut pos, PlayerInput::default());
        assert!(!physics.on_ground);
        assert!(physics.velocity.y < -500.0);
    }

    #[test]
    fn test_conveyor_drifts_position() {
        let mut physics = Physics { on_ground: true, ground_tile: Some(TileType::Conveyor), ..Physics::default() };
        let mut pos = vec2(100.0, 0.0);
        step(&mut physics, &mut pos, PlayerInput::default());
        assert!((pos.x - (100.0 + 60.0 * FIXED_DT)).abs() < 1e-3);
        assert_eq!(physics.velocity.x, 0.0);
    }

    #[test]
    fn test_static_bodies_stay_put() {
        let mut physics = Physics::pickup();
        let mut pos = vec2(10.0, 10.0);
        step(&mut physics, &mut pos, right());
        assert_eq!(pos, vec2(10.0, 10.0));
        assert_eq!(physics.last_position, pos);
    }

    #[test]
    fn test_run_skips_dead_players() {
        let mut world = World::new();
        let tuning = PhysicsTuning::default();
        let alive = world.spawn_player(Player::new(0, "Red", 3, vec2(50.0, 50.0)), &tuning);
        let dead = world.spawn_player(Player::new(1, "Blue", 3, vec2(90.0, 50.0)), &tuning);
        if let Some(p) = world.get_mut::<Player>(dead) {
            p.dead = true;
        }

        run(&mut world, &tuning, FIXED_DT);
        assert!(world.position(alive).unwrap().y > 50.0);
        assert_eq!(world.position(dead), Some(vec2(90.0, 50.0)));
        assert_eq!(world.info(alive).map(|i| i.velocity.y), world.get::<Physics>(alive).map(|p| p.velocity.y));
    }
}
