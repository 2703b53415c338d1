//! Normalized input snapshots
//!
//! What the simulation sees of a player's controller: five held buttons
//! plus two edge-triggered "just pressed" derivations. The shell builds
//! one `PlayerInput` per slot per frame; the core never mutates it.
//!
//! Keyboard (player 1)        Gamepad (players 2-4)
//! - A / Left   = left        - D-pad left / stick left
//! - D / Right  = right       - D-pad right / stick right
//! - W / Up / Space = jump    - A (South)
//! - S / Down / LCtrl = action - X (West) / B (East)
//! - Enter / Escape = start   - Start

use crate::config::MAX_PLAYERS;

/// One player's controller state for a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub action: bool,
    pub start: bool,
    /// Jump went down this frame
    pub jump_pressed: bool,
    /// Action went down this frame
    pub action_pressed: bool,
}

impl PlayerInput {
    /// -1 left, +1 right, 0 idle. Left wins when both are held.
    pub fn horizontal(&self) -> i8 {
        if self.left {
            -1
        } else if self.right {
            1
        } else {
            0
        }
    }

    /// Fill the edge-triggered fields from the previous frame's held state.
    pub fn with_edges_from(mut self, previous: &PlayerInput) -> Self {
        self.jump_pressed = self.jump && !previous.jump;
        self.action_pressed = self.action && !previous.action;
        self
    }
}

/// Edge-triggered menu navigation, shared by every menu context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub confirm: bool,
    pub back: bool,
    /// Secondary button (editor: cycle tile, menus: unused)
    pub alt: bool,
}

/// Everything the state stack consumes for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameInput {
    pub players: [PlayerInput; MAX_PLAYERS],
    pub menu: MenuInput,
}

impl FrameInput {
    /// Input for a slot; slots past the array are idle.
    pub fn player(&self, slot: usize) -> PlayerInput {
        self.players.get(slot).copied().unwrap_or_default()
    }

    pub fn with_menu(menu: MenuInput) -> Self {
        Self { menu, ..Self::default() }
    }

    pub fn with_player(slot: usize, input: PlayerInput) -> Self {
        let mut frame = Self::default();
        if let Some(p) = frame.players.get_mut(slot) {
            *p = input;
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_wins_over_right() {
        let input = PlayerInput { left: true, right: true, ..Default::default() };
        assert_eq!(input.horizontal(), -1);
        assert_eq!(PlayerInput::default().horizontal(), 0);
    }

    #[test]
    fn test_edges_only_on_transition() {
        let held = PlayerInput { jump: true, action: true, ..Default::default() };
        let first = held.with_edges_from(&PlayerInput::default());
        assert!(first.jump_pressed && first.action_pressed);

        let second = held.with_edges_from(&held);
        assert!(!second.jump_pressed && !second.action_pressed);
    }

    #[test]
    fn test_missing_slot_is_idle() {
        let frame = FrameInput::default();
        assert_eq!(frame.player(99), PlayerInput::default());
    }
}
