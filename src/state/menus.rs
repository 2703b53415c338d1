//! Menu-only contexts: main menu, pause overlay, round results, credits.

use macroquad::color::{Color, WHITE};
use macroquad::math::{vec2, Rect};

use super::canvas::Canvas;
use super::editor::LevelEditor;
use super::gameplay::Gameplay;
use super::menu::{centered_text, Menu, ACCENT_COLOR, BG_COLOR, ITEM_SIZE, MUTED_COLOR, TEXT_COLOR};
use super::setup::GameSetup;
use super::{GameState, Session, Transition};
use crate::config::GameSettings;
use crate::game::world::PLAYER_COLORS;
use crate::game::{Round, RoundOutcome};
use crate::input::FrameInput;
use crate::map::GameMap;

const OVERLAY_COLOR: Color = Color::new(0.0, 0.0, 0.0, 0.6);

#[derive(Debug, Clone)]
pub struct MainMenu {
    menu: Menu,
}

impl MainMenu {
    pub fn new() -> Self {
        Self { menu: Menu::new("STOMPWAR", &["Start Game", "Level Editor", "Credits", "Exit"]) }
    }

    pub fn update(&mut self, input: &FrameInput, session: &mut Session) -> Transition {
        match self.menu.navigate(&input.menu) {
            Some(0) => Transition::Replace(GameState::GameSetup(GameSetup::new(session))),
            Some(1) => Transition::Replace(GameState::LevelEditor(Box::new(LevelEditor::new(session)))),
            Some(2) => Transition::Push(GameState::Credits(Credits)),
            Some(3) => Transition::Quit,
            _ => Transition::None,
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.clear(BG_COLOR);
        self.menu.draw(canvas, 160.0);
        let y = canvas.size().y - 40.0;
        centered_text(canvas, "Arrows to move, Enter to select", y, 18.0, MUTED_COLOR);
    }
}

impl Default for MainMenu {
    fn default() -> Self {
        Self::new()
    }
}

/// Overlay on top of gameplay. Keeps what it needs to restart the round.
#[derive(Debug, Clone)]
pub struct Pause {
    menu: Menu,
    settings: GameSettings,
    map: GameMap,
}

impl Pause {
    pub fn new(settings: GameSettings, map: GameMap) -> Self {
        let menu = Menu::new("PAUSED", &["Resume", "Restart Round", "Main Menu", "Exit"]);
        Self { menu, settings, map }
    }

    pub fn update(&mut self, input: &FrameInput) -> Transition {
        if input.menu.back {
            return Transition::Pop;
        }
        match self.menu.navigate(&input.menu) {
            Some(0) => Transition::Pop,
            Some(1) => match Round::new(self.settings.clone(), self.map.clone()) {
                Ok(round) => Transition::PopThenReplace(GameState::Gameplay(Box::new(Gameplay::new(round)))),
                Err(e) => {
                    log::error!("could not restart round: {}", e);
                    Transition::Reset(GameState::main_menu())
                }
            },
            Some(2) => Transition::Reset(GameState::main_menu()),
            Some(3) => Transition::Quit,
            _ => Transition::None,
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let size = canvas.size();
        canvas.rect(Rect::new(0.0, 0.0, size.x, size.y), OVERLAY_COLOR);
        self.menu.draw(canvas, size.y * 0.3);
    }
}

/// Results screen after a round.
#[derive(Debug, Clone)]
pub struct GameOver {
    pub outcome: RoundOutcome,
    menu: Menu,
}

impl GameOver {
    pub fn new(outcome: RoundOutcome) -> Self {
        Self { outcome, menu: Menu::new("GAME OVER", &["Play Again", "Main Menu", "Exit"]) }
    }

    pub fn update(&mut self, input: &FrameInput, session: &mut Session) -> Transition {
        match self.menu.navigate(&input.menu) {
            Some(0) => Transition::Replace(GameState::GameSetup(GameSetup::new(session))),
            Some(1) => Transition::Reset(GameState::main_menu()),
            Some(2) => Transition::Quit,
            _ => Transition::None,
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.clear(BG_COLOR);
        self.menu.draw(canvas, 100.0);
        let top = 300.0;
        centered_text(canvas, &self.outcome.headline(), top, 36.0, ACCENT_COLOR);

        let mut lines = self.outcome.scoreboard.clone();
        lines.sort_by(|a, b| b.value.total_cmp(&a.value).then(b.kills.cmp(&a.kills)));
        for (i, line) in lines.iter().enumerate() {
            let y = top + 50.0 + i as f32 * 34.0;
            let color = PLAYER_COLORS.get(line.slot).copied().unwrap_or(WHITE);
            let x = canvas.size().x * 0.5 - 180.0;
            canvas.rect(Rect::new(x, y - 16.0, 14.0, 14.0), color);
            let text = format!("{:<10} {:>5.0} {:<8} {:>3} kills", line.name, line.value, line.unit, line.kills);
            canvas.text(&text, vec2(x + 24.0, y), ITEM_SIZE * 0.8, TEXT_COLOR);
        }
    }
}

const CREDITS: [&str; 4] = [
    "A four-player arena platformer",
    "Built on macroquad, gilrs, serde and ron",
    "Stomp to score, grab the star to win fights",
    "Press Enter or Escape to return",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Credits;

impl Credits {
    pub fn update(&mut self, input: &FrameInput) -> Transition {
        if input.menu.back || input.menu.confirm {
            Transition::Pop
        } else {
            Transition::None
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.clear(BG_COLOR);
        centered_text(canvas, "CREDITS", 140.0, 48.0, ACCENT_COLOR);
        for (i, line) in CREDITS.iter().enumerate() {
            centered_text(canvas, line, 240.0 + i as f32 * 40.0, 22.0, TEXT_COLOR);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MenuInput;
    use crate::state::GameStateStack;

    fn press(menu: MenuInput) -> FrameInput {
        FrameInput::with_menu(menu)
    }

    fn down() -> FrameInput {
        press(MenuInput { down: true, ..Default::default() })
    }

    fn confirm() -> FrameInput {
        press(MenuInput { confirm: true, ..Default::default() })
    }

    #[test]
    fn test_main_menu_routes() {
        let mut session = Session::default();
        let mut stack = GameStateStack::with_root(GameState::main_menu());

        stack.update(&confirm(), 0.0, &mut session);
        assert_eq!(stack.top_name(), Some("GameSetup"));
        assert_eq!(stack.depth(), 1);

        let mut stack = GameStateStack::with_root(GameState::main_menu());
        stack.update(&down(), 0.0, &mut session);
        stack.update(&down(), 0.0, &mut session);
        stack.update(&confirm(), 0.0, &mut session);
        assert_eq!(stack.top_name(), Some("Credits"));
        assert_eq!(stack.depth(), 2);

        stack.update(&press(MenuInput { back: true, ..Default::default() }), 0.0, &mut session);
        assert_eq!(stack.top_name(), Some("MainMenu"));
    }

    #[test]
    fn test_exit_requests_quit() {
        let mut session = Session::default();
        let mut stack = GameStateStack::with_root(GameState::main_menu());
        let up = press(MenuInput { up: true, ..Default::default() });
        stack.update(&up, 0.0, &mut session);
        stack.update(&confirm(), 0.0, &mut session);
        assert!(stack.should_quit());
    }

    #[test]
    fn test_game_over_play_again_opens_setup() {
        let outcome = RoundOutcome {
            winners: vec![1],
            winner_names: vec!["Blue".to_string()],
            scoreboard: Vec::new(),
            elapsed: 12.0,
        };
        let mut session = Session::default();
        let mut stack = GameStateStack::with_root(GameState::GameOver(GameOver::new(outcome)));
        stack.update(&confirm(), 0.0, &mut session);
        assert_eq!(stack.top_name(), Some("GameSetup"));
    }
}
