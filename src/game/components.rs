//! Game Components
//!
//! All the component types an arena entity can carry.
//! Components are plain data structs - behavior lives in systems
//! (physics, collision, interactions, lifecycle).

use std::collections::HashMap;

use macroquad::color::{Color, WHITE};
use macroquad::math::{vec2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::component::{Component, ComponentKind, ComponentStorage};
use super::world::World;
use crate::config::PhysicsTuning;
use crate::input::PlayerInput;
use crate::map::TileType;

// =============================================================================
// Physics / Movement
// =============================================================================

/// Collision layers an entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LayerMask(pub u8);

impl LayerMask {
    pub const NONE: Self = Self(0);
    pub const PLAYER: Self = Self(1 << 0);
    pub const ENEMY: Self = Self(1 << 1);
    pub const PROJECTILE: Self = Self(1 << 2);
    pub const COLLECTIBLE: Self = Self(1 << 3);
    pub const ENVIRONMENT: Self = Self(1 << 4);
    pub const TRIGGER: Self = Self(1 << 5);

    pub const ALL: Self = Self(
        Self::PLAYER.0
            | Self::ENEMY.0
            | Self::PROJECTILE.0
            | Self::COLLECTIBLE.0
            | Self::ENVIRONMENT.0
            | Self::TRIGGER.0,
    );

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }
}

impl std::ops::BitOr for LayerMask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Rigid-body state for anything that moves or stands on tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct Physics {
    pub velocity: Vec2,
    /// Accumulated force/mass, consumed and reset by the integrator
    pub acceleration: Vec2,
    pub friction: f32,
    pub gravity: f32,
    pub affected_by_gravity: bool,
    /// Bounding box relative to the entity position (origin at the feet for players)
    pub bbox: Rect,
    pub on_ground: bool,
    /// Tile under the feet while grounded
    pub ground_tile: Option<TileType>,
    pub max_speed: f32,
    pub run_acceleration: f32,
    pub jump_power: f32,
    pub terminal_velocity: f32,
    pub mass: f32,
    pub bounciness: f32,
    pub is_static: bool,
    /// Position before this frame's integration, used by the resolver
    pub last_position: Vec2,
    pub collision_mask: LayerMask,
}

impl Default for Physics {
    fn default() -> Self {
        Self::from_tuning(&PhysicsTuning::default())
    }
}

impl Physics {
    /// Player body: 16x32 box standing on its origin.
    pub fn from_tuning(tuning: &PhysicsTuning) -> Self {
        Self {
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            friction: tuning.friction,
            gravity: tuning.gravity,
            affected_by_gravity: true,
            bbox: Rect::new(-8.0, -32.0, 16.0, 32.0),
            on_ground: false,
            ground_tile: None,
            max_speed: tuning.max_speed,
            run_acceleration: tuning.run_acceleration,
            jump_power: tuning.jump_impulse,
            terminal_velocity: tuning.terminal_velocity,
            mass: 1.0,
            bounciness: 0.0,
            is_static: false,
            last_position: Vec2::ZERO,
            collision_mask: LayerMask::PLAYER,
        }
    }

    /// Pickup body: static, centered 16x16 box.
    pub fn pickup() -> Self {
        Self {
            bbox: Rect::new(-8.0, -16.0, 16.0, 16.0),
            affected_by_gravity: false,
            is_static: true,
            collision_mask: LayerMask::COLLECTIBLE,
            ..Self::default()
        }
    }

    pub fn with_bbox(mut self, bbox: Rect) -> Self {
        self.bbox = bbox;
        self
    }

    /// Continuous force, integrated next frame. No-op on static bodies.
    pub fn add_force(&mut self, force: Vec2) {
        if self.is_static || self.mass <= 0.0 {
            return;
        }
        self.acceleration += force / self.mass;
    }

    /// Instant velocity change. No-op on static bodies.
    pub fn add_impulse(&mut self, impulse: Vec2) {
        if self.is_static || self.mass <= 0.0 {
            return;
        }
        self.velocity += impulse / self.mass;
    }

    /// |vx| <= max speed, vy <= terminal velocity (upward speed is not capped).
    pub fn clamp_velocity(&mut self) {
        self.velocity.x = self.velocity.x.clamp(-self.max_speed, self.max_speed);
        if self.velocity.y > self.terminal_velocity {
            self.velocity.y = self.terminal_velocity;
        }
    }

    /// Bounding box in world space for a given entity position.
    pub fn world_bounds(&self, position: Vec2) -> Rect {
        Rect::new(position.x + self.bbox.x, position.y + self.bbox.y, self.bbox.w, self.bbox.h)
    }
}

// =============================================================================
// Combat
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub max: i32,
    pub current: i32,
    pub invincible: bool,
    pub invincibility_timer: f32,
    dead: bool,
}

impl Health {
    pub fn new(max: i32) -> Self {
        let max = max.max(1);
        Self { max, current: max, invincible: false, invincibility_timer: 0.0, dead: false }
    }

    /// Apply damage. Returns true exactly once per death: on the hit that
    /// takes `current` to zero.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if self.dead || self.invincible || amount <= 0 {
            return false;
        }
        self.current = (self.current - amount).max(0);
        if self.current == 0 {
            self.dead = true;
            return true;
        }
        false
    }

    pub fn heal(&mut self, amount: i32) {
        if self.dead {
            return;
        }
        self.current = (self.current + amount.max(0)).min(self.max);
    }

    /// Raise the cap and fill to it.
    pub fn grow(&mut self, max: i32) {
        self.max = self.max.max(max);
        self.current = self.max;
    }

    /// Back to full health with a fresh death notification.
    pub fn revive(&mut self) {
        self.current = self.max;
        self.dead = false;
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn set_invincible(&mut self, seconds: f32) {
        self.invincible = seconds > 0.0;
        self.invincibility_timer = seconds.max(0.0);
    }

    pub fn tick(&mut self, dt: f32) {
        if !self.invincible {
            return;
        }
        self.invincibility_timer -= dt;
        if self.invincibility_timer <= 0.0 {
            self.invincibility_timer = 0.0;
            self.invincible = false;
        }
    }
}

// =============================================================================
// Presentation
// =============================================================================

/// One named animation: frames played at a fixed rate.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub frames: Vec<Rect>,
    /// Seconds per frame
    pub frame_duration: f32,
    pub looping: bool,
}

impl AnimationClip {
    pub fn new(frames: Vec<Rect>, frame_duration: f32, looping: bool) -> Self {
        Self { frames, frame_duration, looping }
    }

    /// `count` frames laid out left to right on one sheet row.
    pub fn strip(row: Rect, count: usize, frame_duration: f32, looping: bool) -> Self {
        let frames = (0..count)
            .map(|i| Rect::new(row.x + i as f32 * row.w, row.y, row.w, row.h))
            .collect();
        Self::new(frames, frame_duration, looping)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Animation {
    clips: HashMap<String, AnimationClip>,
    current: Option<String>,
    elapsed: f32,
    frame: usize,
    finished: bool,
}

impl Animation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Player clips on one 32px sheet row: idle, walk x3, jump, fall.
    pub fn player() -> Self {
        let frame = |col: f32| Rect::new(col * 32.0, 0.0, 32.0, 32.0);
        let mut anim = Self::new();
        anim.add_clip("idle", AnimationClip::new(vec![frame(0.0)], 1.0, true));
        anim.add_clip("walk", AnimationClip::strip(frame(1.0), 3, 0.15, true));
        anim.add_clip("jump", AnimationClip::new(vec![frame(4.0)], 1.0, false));
        anim.add_clip("fall", AnimationClip::new(vec![frame(5.0)], 1.0, false));
        anim.play("idle");
        anim
    }

    pub fn add_clip(&mut self, name: &str, clip: AnimationClip) {
        self.clips.insert(name.to_string(), clip);
    }

    /// Switch clips. Replaying the current clip keeps its progress.
    pub fn play(&mut self, name: &str) -> bool {
        if self.current.as_deref() == Some(name) {
            return true;
        }
        if !self.clips.contains_key(name) {
            return false;
        }
        self.current = Some(name.to_string());
        self.elapsed = 0.0;
        self.frame = 0;
        self.finished = false;
        true
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn frame_index(&self) -> usize {
        self.frame
    }

    /// Non-looping clip reached its last frame.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn advance(&mut self, dt: f32) {
        let Some(clip) = self.current.as_ref().and_then(|name| self.clips.get(name)) else {
            return;
        };
        if clip.frames.is_empty() || clip.frame_duration <= 0.0 || self.finished {
            return;
        }

        self.elapsed += dt;
        while self.elapsed >= clip.frame_duration {
            self.elapsed -= clip.frame_duration;
            if self.frame + 1 < clip.frames.len() {
                self.frame += 1;
            } else if clip.looping {
                self.frame = 0;
            } else {
                self.frame = clip.frames.len() - 1;
                self.finished = true;
                self.elapsed = 0.0;
                break;
            }
        }
    }

    pub fn current_frame_rect(&self) -> Option<Rect> {
        let clip = self.clips.get(self.current.as_ref()?)?;
        clip.frames.get(self.frame).copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub sheet: String,
    /// Default source rectangle when no animation frame applies
    pub source: Rect,
    pub tint: Color,
    pub scale: f32,
    pub flip_x: bool,
    /// Pivot within the frame, in frame pixels
    pub origin: Vec2,
}

impl Sprite {
    pub fn new(sheet: &str, source: Rect) -> Self {
        Self {
            sheet: sheet.to_string(),
            source,
            tint: WHITE,
            scale: 1.0,
            flip_x: false,
            origin: vec2(source.w * 0.5, source.h),
        }
    }

    pub fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }

    /// Face the direction of travel; standing still keeps the last facing.
    pub fn face_velocity(&mut self, vx: f32) {
        if vx < 0.0 {
            self.flip_x = true;
        } else if vx > 0.0 {
            self.flip_x = false;
        }
    }
}

// =============================================================================
// Input
// =============================================================================

/// Current and previous snapshot for one player slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputComponent {
    pub slot: usize,
    pub current: PlayerInput,
    pub previous: PlayerInput,
}

impl InputComponent {
    pub fn new(slot: usize) -> Self {
        Self { slot, ..Default::default() }
    }

    /// Shift in this frame's snapshot. Edges the device layer didn't
    /// report are derived from the previous frame.
    pub fn push(&mut self, snapshot: PlayerInput) {
        let derived = snapshot.with_edges_from(&self.current);
        self.previous = self.current;
        self.current = PlayerInput {
            jump_pressed: snapshot.jump_pressed || derived.jump_pressed,
            action_pressed: snapshot.action_pressed || derived.action_pressed,
            ..snapshot
        };
    }

    pub fn jump_pressed(&self) -> bool {
        self.current.jump_pressed
    }

    pub fn start_pressed(&self) -> bool {
        self.current.start && !self.previous.start
    }
}

// =============================================================================
// Entity Type Markers
// =============================================================================

/// Active power-up on a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PowerUp {
    #[default]
    None,
    /// Survives one extra hit
    Super,
    Fire,
    Ice,
    /// Invincible until the timer runs out
    Star,
}

/// Marks a player-controlled entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub slot: usize,
    pub name: String,
    /// None = unlimited respawns
    pub lives: Option<u32>,
    pub score: i32,
    pub power_up: PowerUp,
    pub dead: bool,
    pub respawn_timer: f32,
    pub spawn_position: Vec2,
}

impl Player {
    pub const RESPAWN_DELAY: f32 = 3.0;

    pub fn new(slot: usize, name: &str, lives: u32, spawn_position: Vec2) -> Self {
        Self {
            slot,
            name: name.to_string(),
            lives: if lives == 0 { None } else { Some(lives) },
            score: 0,
            power_up: PowerUp::None,
            dead: false,
            respawn_timer: 0.0,
            spawn_position,
        }
    }

    /// Out of the round for good.
    pub fn is_eliminated(&self) -> bool {
        self.dead && self.lives == Some(0)
    }

    /// Mark dead and spend a life. Returns true if a respawn will follow.
    pub fn die(&mut self) -> bool {
        self.dead = true;
        self.power_up = PowerUp::None;
        if let Some(lives) = self.lives.as_mut() {
            *lives = lives.saturating_sub(1);
            if *lives == 0 {
                return false;
            }
        }
        self.respawn_timer = Self::RESPAWN_DELAY;
        true
    }
}

/// Collectible kinds an item spawn can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    Coin,
    Mushroom,
    FireFlower,
    IceFlower,
    Star,
    OneUp,
}

impl ItemType {
    pub fn color(self) -> Color {
        use macroquad::color::{GOLD, GREEN, ORANGE, RED, SKYBLUE, YELLOW};
        match self {
            ItemType::Coin => GOLD,
            ItemType::Mushroom => RED,
            ItemType::FireFlower => ORANGE,
            ItemType::IceFlower => SKYBLUE,
            ItemType::Star => YELLOW,
            ItemType::OneUp => GREEN,
        }
    }

    /// Score awarded on pickup.
    pub fn score(self) -> i32 {
        match self {
            ItemType::Coin => 10,
            ItemType::OneUp => 0,
            _ => 50,
        }
    }
}

/// Marks a collectible pickup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    pub item_type: ItemType,
    /// Which map item spawn produced it
    pub spawn_index: usize,
}

// =============================================================================
// Storage wiring
// =============================================================================

macro_rules! impl_component {
    ($ty:ty, $kind:ident, $field:ident) => {
        impl Component for $ty {
            const KIND: ComponentKind = ComponentKind::$kind;

            fn storage(world: &World) -> &ComponentStorage<Self> {
                &world.$field
            }

            fn storage_mut(world: &mut World) -> &mut ComponentStorage<Self> {
                &mut world.$field
            }
        }
    };
}

impl_component!(Physics, Physics, physics);
impl_component!(Health, Health, health);
impl_component!(Animation, Animation, animations);
impl_component!(InputComponent, Input, inputs);
impl_component!(Sprite, Sprite, sprites);
impl_component!(Player, Player, players);
impl_component!(Item, Item, items);
