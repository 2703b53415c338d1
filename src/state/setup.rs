//! Round configuration screen.
//!
//! Up/down picks a row, left/right changes it. Nothing reaches the session
//! until Start succeeds, so backing out leaves the previous settings alone.

use macroquad::math::vec2;

use super::canvas::Canvas;
use super::loading::Loading;
use super::menu::{centered_text, ACCENT_COLOR, BG_COLOR, ERROR_COLOR, ITEM_SIZE, MUTED_COLOR, TEXT_COLOR, TITLE_SIZE};
use super::menus::MainMenu;
use super::{GameState, Session, Transition};
use crate::config::{GameSettings, MAX_PLAYERS};
use crate::game::Round;
use crate::input::FrameInput;
use crate::mode::GameModeKind;

const TIME_STEP: f32 = 30.0;
const HILL_STEP: f32 = 10.0;
const MAX_LIVES: u32 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Mode,
    Players,
    Goal,
    Time,
    Lives,
    Map,
    Start,
    Back,
}

const ROWS: [Row; 8] = [Row::Mode, Row::Players, Row::Goal, Row::Time, Row::Lives, Row::Map, Row::Start, Row::Back];

#[derive(Debug, Clone)]
pub struct GameSetup {
    settings: GameSettings,
    map_index: usize,
    map_names: Vec<String>,
    row: usize,
    error: Option<String>,
}

impl GameSetup {
    pub fn new(session: &Session) -> Self {
        Self {
            settings: session.settings.clone(),
            map_index: session.selected_index(),
            map_names: session.maps().iter().map(|m| m.name.clone()).collect(),
            row: 0,
            error: None,
        }
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn update(&mut self, input: &FrameInput, session: &mut Session) -> Transition {
        let menu = &input.menu;
        if menu.back {
            return Transition::Replace(GameState::MainMenu(MainMenu::new()));
        }
        if menu.up {
            self.row = (self.row + ROWS.len() - 1) % ROWS.len();
        }
        if menu.down {
            self.row = (self.row + 1) % ROWS.len();
        }
        let step = match (menu.left, menu.right) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        };
        if step != 0 {
            self.adjust(ROWS[self.row], step);
            self.error = None;
        }
        if !menu.confirm {
            return Transition::None;
        }
        match ROWS[self.row] {
            Row::Start => self.start(session),
            Row::Back => Transition::Replace(GameState::MainMenu(MainMenu::new())),
            _ => Transition::None,
        }
    }

    fn adjust(&mut self, row: Row, step: i32) {
        let s = &mut self.settings;
        match row {
            Row::Mode => s.mode = s.mode.cycle(step),
            Row::Players => {
                s.player_count = (s.player_count as i32 + step).clamp(1, MAX_PLAYERS as i32) as usize;
            }
            Row::Goal => match s.mode {
                GameModeKind::Deathmatch => s.kill_limit = (s.kill_limit + step).max(1),
                GameModeKind::CaptureTheFlag => s.capture_limit = (s.capture_limit + step).max(1),
                GameModeKind::KingOfTheHill => s.hill_time = (s.hill_time + step as f32 * HILL_STEP).max(HILL_STEP),
                GameModeKind::CoinCollection => s.coin_limit = (s.coin_limit + step).max(1),
            },
            Row::Time => s.time_limit = (s.time_limit + step as f32 * TIME_STEP).max(0.0),
            Row::Lives => s.lives = (s.lives as i32 + step).clamp(0, MAX_LIVES as i32) as u32,
            Row::Map => {
                let len = self.map_names.len().max(1) as i32;
                self.map_index = (self.map_index as i32 + step).rem_euclid(len) as usize;
            }
            Row::Start | Row::Back => {}
        }
    }

    fn start(&mut self, session: &mut Session) -> Transition {
        let Some(map) = session.maps().get(self.map_index) else {
            self.error = Some("No map selected".to_string());
            return Transition::None;
        };
        let mut settings = self.settings.clone();
        settings.map_name = map.name.clone();

        match Round::new(settings.clone(), map.clone()) {
            Ok(round) => {
                session.settings = settings;
                session.selected_map = self.map_index;
                Transition::Replace(GameState::Loading(Box::new(Loading::new(round))))
            }
            Err(e) => {
                log::warn!("cannot start round: {}", e);
                self.error = Some(e.to_string());
                Transition::None
            }
        }
    }

    fn row_label(&self, row: Row) -> String {
        let s = &self.settings;
        match row {
            Row::Mode => format!("Mode: {}", s.mode.name()),
            Row::Players => format!("Players: {}", s.player_count),
            Row::Goal => match s.mode {
                GameModeKind::Deathmatch => format!("Kill limit: {}", s.kill_limit),
                GameModeKind::CaptureTheFlag => format!("Captures: {}", s.capture_limit),
                GameModeKind::KingOfTheHill => format!("Hill time: {:.0}s", s.hill_time),
                GameModeKind::CoinCollection => format!("Coins: {}", s.coin_limit),
            },
            Row::Time if s.time_limit <= 0.0 => "Time: unlimited".to_string(),
            Row::Time => format!("Time: {:.0}s", s.time_limit),
            Row::Lives if s.lives == 0 => "Lives: unlimited".to_string(),
            Row::Lives => format!("Lives: {}", s.lives),
            Row::Map => format!("Map: {}", self.map_names.get(self.map_index).map(String::as_str).unwrap_or("?")),
            Row::Start => "Start".to_string(),
            Row::Back => "Back".to_string(),
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, session: &Session) {
        canvas.clear(BG_COLOR);
        centered_text(canvas, "GAME SETUP", 80.0, TITLE_SIZE, ACCENT_COLOR);
        centered_text(canvas, self.settings.mode.description(), 130.0, 20.0, MUTED_COLOR);

        for (i, row) in ROWS.iter().enumerate() {
            let y = 190.0 + i as f32 * 38.0;
            let label = self.row_label(*row);
            if i == self.row {
                centered_text(canvas, &format!("< {} >", label), y, ITEM_SIZE, TEXT_COLOR);
            } else {
                centered_text(canvas, &label, y, ITEM_SIZE, MUTED_COLOR);
            }
        }

        let footer = canvas.size().y - 40.0;
        if let Some(error) = &self.error {
            centered_text(canvas, error, footer - 30.0, 20.0, ERROR_COLOR);
        }
        let current = format!("Last played: {} on {}", session.settings.mode.name(), session.selected_map().name);
        canvas.text(&current, vec2(16.0, footer), 18.0, MUTED_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MenuInput;
    use crate::map::GameMap;

    fn menu(m: MenuInput) -> FrameInput {
        FrameInput::with_menu(m)
    }

    fn select(setup: &mut GameSetup, session: &mut Session, row: Row) {
        let target = ROWS.iter().position(|r| *r == row).unwrap();
        while setup.row != target {
            setup.update(&menu(MenuInput { down: true, ..Default::default() }), session);
        }
    }

    #[test]
    fn test_adjust_rows_clamp() {
        let mut session = Session::default();
        let mut setup = GameSetup::new(&session);
        let right = menu(MenuInput { right: true, ..Default::default() });
        let left = menu(MenuInput { left: true, ..Default::default() });

        select(&mut setup, &mut session, Row::Players);
        for _ in 0..6 {
            setup.update(&right, &mut session);
        }
        assert_eq!(setup.settings().player_count, MAX_PLAYERS);

        select(&mut setup, &mut session, Row::Time);
        for _ in 0..20 {
            setup.update(&left, &mut session);
        }
        assert_eq!(setup.settings().time_limit, 0.0);
        assert_eq!(setup.row_label(Row::Time), "Time: unlimited");

        // Session untouched until Start
        assert_eq!(session.settings.player_count, 2);
    }

    #[test]
    fn test_mode_row_changes_goal_label() {
        let mut session = Session::default();
        let mut setup = GameSetup::new(&session);
        setup.update(&menu(MenuInput { right: true, ..Default::default() }), &mut session);
        assert_eq!(setup.settings().mode, GameModeKind::CaptureTheFlag);
        assert_eq!(setup.row_label(Row::Goal), "Captures: 3");
    }

    #[test]
    fn test_start_commits_settings_and_loads() {
        let mut session = Session::default();
        let mut setup = GameSetup::new(&session);
        select(&mut setup, &mut session, Row::Lives);
        setup.update(&menu(MenuInput { right: true, ..Default::default() }), &mut session);
        select(&mut setup, &mut session, Row::Start);

        let t = setup.update(&menu(MenuInput { confirm: true, ..Default::default() }), &mut session);
        assert!(matches!(t, Transition::Replace(GameState::Loading(_))));
        assert_eq!(session.settings.lives, 4);
    }

    #[test]
    fn test_start_reports_missing_spawn() {
        let mut session = Session::new(GameSettings::default(), vec![GameMap::new(10, 10)]);
        let mut setup = GameSetup::new(&session);
        select(&mut setup, &mut session, Row::Start);

        let t = setup.update(&menu(MenuInput { confirm: true, ..Default::default() }), &mut session);
        assert!(matches!(t, Transition::None));
        assert!(setup.error().is_some());
    }

    #[test]
    fn test_back_returns_to_main_menu() {
        let mut session = Session::default();
        let mut setup = GameSetup::new(&session);
        let t = setup.update(&menu(MenuInput { back: true, ..Default::default() }), &mut session);
        assert!(matches!(t, Transition::Replace(GameState::MainMenu(_))));
    }
}
