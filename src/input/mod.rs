//! Input handling with gamepad support
//!
//! The simulation only ever sees `FrameInput` snapshots. `InputState`
//! builds them from the keyboard and gamepads on the presentation side.
//!
//! Native: Uses gilrs crate for cross-platform gamepad input
//! WASM: keyboard only

mod actions;
mod gamepad;
mod state;

pub use actions::{FrameInput, MenuInput, PlayerInput};
pub use gamepad::{button, Gamepads};
pub use state::InputState;
