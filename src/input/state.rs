//! Device polling
//!
//! Reads the keyboard (macroquad) and gamepads once per frame and folds
//! them into a `FrameInput`. Player 1 is the keyboard, pads fill slots
//! 2-4 in connection order. Menus listen to every device.

use macroquad::prelude::*;

use super::actions::{FrameInput, MenuInput, PlayerInput};
use super::gamepad::{self, Gamepads};
use crate::config::MAX_PLAYERS;

/// Unified input state for keyboard and gamepads
pub struct InputState {
    gamepads: Gamepads,
    /// Held menu buttons from pads last frame, for edge detection
    last_pad_menu: [bool; 6],
}

impl InputState {
    pub fn new() -> Self {
        Self { gamepads: Gamepads::new(), last_pad_menu: [false; 6] }
    }

    /// Call once per frame.
    pub fn poll(&mut self) -> FrameInput {
        self.gamepads.poll();

        let mut frame = FrameInput::default();
        frame.players[0] = keyboard_player();

        let mut pad_menu = [false; 6];
        for pad in 0..self.gamepads.count() {
            let mask = self.gamepads.buttons(pad);
            let stick = self.gamepads.left_stick(pad);
            if let Some(slot) = frame.players.get_mut(pad + 1) {
                *slot = gamepad::player_input(mask, stick);
            }
            for (held, now) in pad_menu.iter_mut().zip(gamepad::menu_buttons(mask, stick)) {
                *held |= now;
            }
        }

        let edge = |i: usize| pad_menu[i] && !self.last_pad_menu[i];
        let keys = keyboard_menu();
        frame.menu = MenuInput {
            up: keys.up || edge(0),
            down: keys.down || edge(1),
            left: keys.left || edge(2),
            right: keys.right || edge(3),
            confirm: keys.confirm || edge(4),
            back: keys.back || edge(5),
            alt: keys.alt,
        };
        self.last_pad_menu = pad_menu;
        frame
    }

    /// Connected pads, capped at the slots they can drive.
    pub fn gamepad_count(&self) -> usize {
        self.gamepads.count().min(MAX_PLAYERS - 1)
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

fn any_down(keys: &[KeyCode]) -> bool {
    keys.iter().any(|&k| is_key_down(k))
}

fn any_pressed(keys: &[KeyCode]) -> bool {
    keys.iter().any(|&k| is_key_pressed(k))
}

fn keyboard_player() -> PlayerInput {
    PlayerInput {
        left: any_down(&[KeyCode::A, KeyCode::Left]),
        right: any_down(&[KeyCode::D, KeyCode::Right]),
        jump: any_down(&[KeyCode::W, KeyCode::Up, KeyCode::Space]),
        action: any_down(&[KeyCode::S, KeyCode::Down, KeyCode::LeftControl]),
        start: any_down(&[KeyCode::Enter, KeyCode::Escape]),
        jump_pressed: any_pressed(&[KeyCode::W, KeyCode::Up, KeyCode::Space]),
        action_pressed: any_pressed(&[KeyCode::S, KeyCode::Down, KeyCode::LeftControl]),
    }
}

fn keyboard_menu() -> MenuInput {
    MenuInput {
        up: any_pressed(&[KeyCode::W, KeyCode::Up]),
        down: any_pressed(&[KeyCode::S, KeyCode::Down]),
        left: any_pressed(&[KeyCode::A, KeyCode::Left]),
        right: any_pressed(&[KeyCode::D, KeyCode::Right]),
        confirm: any_pressed(&[KeyCode::Enter, KeyCode::Space]),
        back: any_pressed(&[KeyCode::Escape, KeyCode::Backspace]),
        alt: any_pressed(&[KeyCode::Tab]),
    }
}
