//! Short loading screen between setup and gameplay.

use macroquad::color::Color;
use macroquad::math::Rect;

use super::canvas::Canvas;
use super::gameplay::Gameplay;
use super::menu::{centered_text, ACCENT_COLOR, BG_COLOR, MUTED_COLOR, TEXT_COLOR};
use super::{GameState, Transition};
use crate::game::Round;

pub const DURATION: f32 = 2.0;

const BAR_WIDTH: f32 = 400.0;
const BAR_HEIGHT: f32 = 16.0;
const BAR_BG: Color = Color::new(0.2, 0.2, 0.24, 1.0);

#[derive(Debug)]
pub struct Loading {
    round: Option<Round>,
    elapsed: f32,
}

impl Loading {
    pub fn new(round: Round) -> Self {
        Self { round: Some(round), elapsed: 0.0 }
    }

    pub fn restart(&mut self) {
        self.elapsed = 0.0;
    }

    /// 0.0 to 1.0
    pub fn progress(&self) -> f32 {
        (self.elapsed / DURATION).clamp(0.0, 1.0)
    }

    pub fn message(&self) -> &'static str {
        match self.progress() {
            p if p < 0.3 => "Loading level...",
            p if p < 0.6 => "Spawning players...",
            p if p < 0.9 => "Preparing arena...",
            _ => "Ready!",
        }
    }

    pub fn update(&mut self, dt: f32) -> Transition {
        self.elapsed += dt;
        if self.elapsed < DURATION {
            return Transition::None;
        }
        match self.round.take() {
            Some(round) => Transition::Replace(GameState::Gameplay(Box::new(Gameplay::new(round)))),
            None => {
                log::error!("loading finished without a round");
                Transition::Reset(GameState::main_menu())
            }
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.clear(BG_COLOR);
        let size = canvas.size();
        let mid = size.y * 0.5;
        if let Some(round) = &self.round {
            let title = format!("{} - {}", round.mode().name(), round.map().name);
            centered_text(canvas, &title, mid - 60.0, 32.0, TEXT_COLOR);
        }
        let x = (size.x - BAR_WIDTH) * 0.5;
        canvas.rect(Rect::new(x, mid, BAR_WIDTH, BAR_HEIGHT), BAR_BG);
        canvas.rect(Rect::new(x, mid, BAR_WIDTH * self.progress(), BAR_HEIGHT), ACCENT_COLOR);
        centered_text(canvas, self.message(), mid + 50.0, 22.0, MUTED_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameSettings;
    use crate::map::GameMap;

    fn loading() -> Loading {
        Loading::new(Round::new(GameSettings::default(), GameMap::arena()).unwrap())
    }

    #[test]
    fn test_messages_follow_progress() {
        let mut l = loading();
        assert_eq!(l.message(), "Loading level...");
        l.update(1.0);
        assert_eq!(l.message(), "Spawning players...");
        l.update(0.7);
        assert_eq!(l.message(), "Preparing arena...");
    }

    #[test]
    fn test_hands_round_to_gameplay_when_done() {
        let mut l = loading();
        assert!(matches!(l.update(1.9), Transition::None));
        assert!(matches!(l.update(0.2), Transition::Replace(GameState::Gameplay(_))));
        // Round already handed over
        assert!(matches!(l.update(0.1), Transition::Reset(_)));
    }

    #[test]
    fn test_restart_resets_progress() {
        let mut l = loading();
        l.update(1.5);
        l.restart();
        assert_eq!(l.progress(), 0.0);
    }
}
