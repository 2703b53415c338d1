//! Game State Stack
//!
//! Menus, gameplay and overlays are interactive contexts on a stack. Only
//! the top context is updated and drawn. A context asks for a change by
//! returning a `Transition` from `update`; the stack applies it once the
//! context has finished its frame, so the change shows up next frame.
//!
//! Pushing pause over gameplay keeps the round exactly as it was: popping
//! resumes it without re-initialization.

mod canvas;
mod editor;
mod gameplay;
mod loading;
mod menu;
mod menus;
mod setup;
mod stack;

use std::path::PathBuf;

use crate::config::GameSettings;
use crate::input::FrameInput;
use crate::map::GameMap;

pub use canvas::{Canvas, DrawCommand, DrawList};
pub use editor::LevelEditor;
pub use gameplay::Gameplay;
pub use loading::Loading;
pub use menu::Menu;
pub use menus::{Credits, GameOver, MainMenu, Pause};
pub use setup::GameSetup;
pub use stack::GameStateStack;

/// Data every context can read and write: the settings being edited in
/// setup and the maps on offer.
#[derive(Debug, Clone)]
pub struct Session {
    pub settings: GameSettings,
    /// Never empty
    maps: Vec<GameMap>,
    pub selected_map: usize,
    /// Where the level editor saves. None keeps edits in memory.
    pub editor_path: Option<PathBuf>,
}

impl Session {
    /// Falls back to the built-in arena when no maps are given.
    pub fn new(settings: GameSettings, mut maps: Vec<GameMap>) -> Self {
        if maps.is_empty() {
            maps.push(GameMap::arena());
        }
        let selected_map = maps
            .iter()
            .position(|m| m.name.eq_ignore_ascii_case(&settings.map_name))
            .unwrap_or(0);
        Self { settings, maps, selected_map, editor_path: None }
    }

    pub fn maps(&self) -> &[GameMap] {
        &self.maps
    }

    /// `selected_map` clamped onto the list.
    pub fn selected_index(&self) -> usize {
        self.selected_map.min(self.maps.len().saturating_sub(1))
    }

    pub fn selected_map(&self) -> &GameMap {
        &self.maps[self.selected_index()]
    }

    /// Overwrite the selected map, e.g. with the editor's copy.
    pub fn store_selected_map(&mut self, map: GameMap) {
        let index = self.selected_index();
        self.maps[index] = map;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(GameSettings::default(), Vec::new())
    }
}

/// The closed set of interactive contexts.
#[derive(Debug)]
pub enum GameState {
    MainMenu(MainMenu),
    GameSetup(GameSetup),
    Loading(Box<Loading>),
    Gameplay(Box<Gameplay>),
    Pause(Box<Pause>),
    GameOver(GameOver),
    LevelEditor(Box<LevelEditor>),
    Credits(Credits),
}

/// What a context wants the stack to do after its frame.
#[derive(Debug)]
pub enum Transition {
    None,
    Push(GameState),
    Pop,
    /// Pop the top, then push
    Replace(GameState),
    /// Pop the top, then replace the one beneath (pause -> restart round)
    PopThenReplace(GameState),
    /// Clear the stack down to a new root
    Reset(GameState),
    Quit,
}

/// Applied transitions, for the presentation layer to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum StateEvent {
    Pushed(&'static str),
    Popped(&'static str),
    Replaced { from: &'static str, to: &'static str },
    RoundOver { winners: Vec<usize> },
    QuitRequested,
}

impl GameState {
    pub fn main_menu() -> Self {
        GameState::MainMenu(MainMenu::new())
    }

    pub fn name(&self) -> &'static str {
        match self {
            GameState::MainMenu(_) => "MainMenu",
            GameState::GameSetup(_) => "GameSetup",
            GameState::Loading(_) => "Loading",
            GameState::Gameplay(_) => "Gameplay",
            GameState::Pause(_) => "Pause",
            GameState::GameOver(_) => "GameOver",
            GameState::LevelEditor(_) => "LevelEditor",
            GameState::Credits(_) => "Credits",
        }
    }

    /// Called once when the context becomes the top by push or replace.
    pub fn initialize(&mut self) {
        match self {
            GameState::Loading(loading) => loading.restart(),
            GameState::Gameplay(gameplay) => gameplay.initialize(),
            _ => {}
        }
    }

    pub fn update(&mut self, input: &FrameInput, dt: f32, session: &mut Session) -> Transition {
        match self {
            GameState::MainMenu(s) => s.update(input, session),
            GameState::GameSetup(s) => s.update(input, session),
            GameState::Loading(s) => s.update(dt),
            GameState::Gameplay(s) => s.update(input, dt),
            GameState::Pause(s) => s.update(input),
            GameState::GameOver(s) => s.update(input, session),
            GameState::LevelEditor(s) => s.update(input, session),
            GameState::Credits(s) => s.update(input),
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, session: &Session) {
        match self {
            GameState::MainMenu(s) => s.draw(canvas),
            GameState::GameSetup(s) => s.draw(canvas, session),
            GameState::Loading(s) => s.draw(canvas),
            GameState::Gameplay(s) => s.draw(canvas),
            GameState::Pause(s) => s.draw(canvas),
            GameState::GameOver(s) => s.draw(canvas),
            GameState::LevelEditor(s) => s.draw(canvas),
            GameState::Credits(s) => s.draw(canvas),
        }
    }

    /// Called once when the context leaves the stack.
    pub fn cleanup(&mut self) {
        if let GameState::Gameplay(gameplay) = self {
            gameplay.cleanup();
        }
    }
}
