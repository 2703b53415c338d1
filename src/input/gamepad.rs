//! Gamepad support for players 2-4
//!
//! Native: gilrs, one pad per player slot in connection order
//! WASM: no pads; every slot beyond the keyboard stays idle
//!
//! Pads are read as a button bitmask plus the left stick, then mapped to a
//! `PlayerInput` by `player_input`. Edges are derived later by the input
//! component, so only held state comes out of here.

use macroquad::prelude::Vec2;

use super::actions::PlayerInput;

// Standard gamepad button indices (Web Gamepad API standard mapping)
pub mod button {
    pub const A: u32 = 0; // South
    pub const B: u32 = 1; // East
    pub const X: u32 = 2; // West
    pub const Y: u32 = 3; // North
    pub const SELECT: u32 = 8;
    pub const START: u32 = 9;
    pub const DPAD_UP: u32 = 12;
    pub const DPAD_DOWN: u32 = 13;
    pub const DPAD_LEFT: u32 = 14;
    pub const DPAD_RIGHT: u32 = 15;
}

/// Stick deflection that counts as a d-pad press.
const STICK_PRESS: f32 = 0.5;

fn down(mask: u32, button: u32) -> bool {
    mask & (1 << button) != 0
}

/// Map one pad's held state to a player snapshot.
pub fn player_input(mask: u32, stick: Vec2) -> PlayerInput {
    PlayerInput {
        left: down(mask, button::DPAD_LEFT) || stick.x < -STICK_PRESS,
        right: down(mask, button::DPAD_RIGHT) || stick.x > STICK_PRESS,
        jump: down(mask, button::A),
        action: down(mask, button::X) || down(mask, button::B),
        start: down(mask, button::START),
        ..Default::default()
    }
}

/// Held menu directions for one pad: (up, down, left, right, confirm, back).
pub fn menu_buttons(mask: u32, stick: Vec2) -> [bool; 6] {
    [
        down(mask, button::DPAD_UP) || stick.y > STICK_PRESS,
        down(mask, button::DPAD_DOWN) || stick.y < -STICK_PRESS,
        down(mask, button::DPAD_LEFT) || stick.x < -STICK_PRESS,
        down(mask, button::DPAD_RIGHT) || stick.x > STICK_PRESS,
        down(mask, button::A) || down(mask, button::START),
        down(mask, button::B) || down(mask, button::SELECT),
    ]
}

// ============================================================================
// WASM Implementation
// ============================================================================

#[cfg(target_arch = "wasm32")]
mod platform {
    use super::*;

    #[derive(Default)]
    pub struct Gamepads;

    impl Gamepads {
        pub fn new() -> Self {
            Self
        }

        pub fn poll(&mut self) {}

        pub fn count(&self) -> usize {
            0
        }

        pub fn buttons(&self, _pad: usize) -> u32 {
            0
        }

        pub fn left_stick(&self, _pad: usize) -> Vec2 {
            Vec2::ZERO
        }
    }
}

// ============================================================================
// Native Implementation (gilrs)
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
mod platform {
    use super::*;
    use gilrs::{Axis, Button as GilrsButton, Gilrs};

    pub struct Gamepads {
        gilrs: Option<Gilrs>,
        deadzone: f32,
    }

    impl Gamepads {
        pub fn new() -> Self {
            let gilrs = match Gilrs::new() {
                Ok(gilrs) => Some(gilrs),
                Err(e) => {
                    log::warn!("gamepad support unavailable: {}", e);
                    None
                }
            };
            Self { gilrs, deadzone: 0.15 }
        }

        pub fn poll(&mut self) {
            let Some(gilrs) = self.gilrs.as_mut() else { return };
            while let Some(event) = gilrs.next_event() {
                match event.event {
                    gilrs::EventType::Connected => log::info!("gamepad {} connected", event.id),
                    gilrs::EventType::Disconnected => log::info!("gamepad {} disconnected", event.id),
                    _ => {}
                }
            }
        }

        fn pad(&self, pad: usize) -> Option<gilrs::Gamepad<'_>> {
            self.gilrs.as_ref()?.gamepads().nth(pad).map(|(_, gp)| gp)
        }

        pub fn count(&self) -> usize {
            self.gilrs.as_ref().map(|g| g.gamepads().count()).unwrap_or(0)
        }

        pub fn buttons(&self, pad: usize) -> u32 {
            let Some(gp) = self.pad(pad) else { return 0 };
            let mapping = [
                (GilrsButton::South, button::A),
                (GilrsButton::East, button::B),
                (GilrsButton::West, button::X),
                (GilrsButton::North, button::Y),
                (GilrsButton::Select, button::SELECT),
                (GilrsButton::Start, button::START),
                (GilrsButton::DPadUp, button::DPAD_UP),
                (GilrsButton::DPadDown, button::DPAD_DOWN),
                (GilrsButton::DPadLeft, button::DPAD_LEFT),
                (GilrsButton::DPadRight, button::DPAD_RIGHT),
            ];
            mapping
                .iter()
                .filter(|(b, _)| gp.is_pressed(*b))
                .fold(0, |mask, (_, bit)| mask | (1 << bit))
        }

        pub fn left_stick(&self, pad: usize) -> Vec2 {
            let Some(gp) = self.pad(pad) else { return Vec2::ZERO };
            apply_deadzone(gp.value(Axis::LeftStickX), gp.value(Axis::LeftStickY), self.deadzone)
        }
    }

    impl Default for Gamepads {
        fn default() -> Self {
            Self::new()
        }
    }
}

/// Apply radial deadzone with linear rescaling
#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
fn apply_deadzone(x: f32, y: f32, deadzone: f32) -> Vec2 {
    let len = (x * x + y * y).sqrt();
    if len < deadzone {
        return Vec2::ZERO;
    }
    let scale = (len - deadzone) / (1.0 - deadzone) / len;
    Vec2::new(x * scale, y * scale)
}

pub use platform::Gamepads;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dpad_and_face_buttons() {
        let mask = (1 << button::DPAD_LEFT) | (1 << button::A) | (1 << button::START);
        let input = player_input(mask, Vec2::ZERO);
        assert!(input.left && input.jump && input.start);
        assert!(!input.right && !input.action);
        assert!(!input.jump_pressed);
    }

    #[test]
    fn test_stick_counts_past_half_deflection() {
        assert!(player_input(0, Vec2::new(0.8, 0.0)).right);
        assert!(!player_input(0, Vec2::new(0.3, 0.0)).right);
        assert!(menu_buttons(0, Vec2::new(0.0, 0.9))[0]);
    }

    #[test]
    fn test_deadzone() {
        assert_eq!(apply_deadzone(0.1, 0.0, 0.15), Vec2::ZERO);
        let v = apply_deadzone(1.0, 0.0, 0.15);
        assert!((v.x - 1.0).abs() < 1e-5);
    }
}
