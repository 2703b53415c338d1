//! Vertical option lists shared by the menu contexts

use macroquad::color::Color;
use macroquad::math::vec2;

use super::canvas::Canvas;
use crate::input::MenuInput;

pub const BG_COLOR: Color = Color::new(0.10, 0.10, 0.12, 1.0);
pub const TEXT_COLOR: Color = Color::new(0.9, 0.9, 0.9, 1.0);
pub const MUTED_COLOR: Color = Color::new(0.6, 0.6, 0.65, 1.0);
pub const ACCENT_COLOR: Color = Color::new(0.0, 0.75, 0.9, 1.0);
pub const ERROR_COLOR: Color = Color::new(0.95, 0.35, 0.3, 1.0);

pub const TITLE_SIZE: f32 = 48.0;
pub const ITEM_SIZE: f32 = 28.0;
const LINE_HEIGHT: f32 = 40.0;

/// Draw text centered horizontally at baseline `y`.
pub fn centered_text(canvas: &mut dyn Canvas, text: &str, y: f32, size: f32, color: Color) {
    // Approximate glyph width, same estimate the landing page uses
    let width = text.chars().count() as f32 * size * 0.55;
    let x = (canvas.size().x - width) * 0.5;
    canvas.text(text, vec2(x.max(0.0), y), size, color);
}

/// Wrapping list of options with a selection cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Menu {
    pub title: &'static str,
    options: Vec<&'static str>,
    selected: usize,
}

impl Menu {
    pub fn new(title: &'static str, options: &[&'static str]) -> Self {
        Self { title, options: options.to_vec(), selected: 0 }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_label(&self) -> &'static str {
        self.options.get(self.selected).copied().unwrap_or("")
    }

    /// Move the cursor; returns the chosen index on confirm.
    pub fn navigate(&mut self, input: &MenuInput) -> Option<usize> {
        let len = self.options.len();
        if len == 0 {
            return None;
        }
        if input.up {
            self.selected = (self.selected + len - 1) % len;
        }
        if input.down {
            self.selected = (self.selected + 1) % len;
        }
        input.confirm.then_some(self.selected)
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, top: f32) {
        centered_text(canvas, self.title, top, TITLE_SIZE, ACCENT_COLOR);
        for (i, option) in self.options.iter().enumerate() {
            let y = top + 80.0 + i as f32 * LINE_HEIGHT;
            if i == self.selected {
                centered_text(canvas, &format!("> {} <", option), y, ITEM_SIZE, TEXT_COLOR);
            } else {
                centered_text(canvas, option, y, ITEM_SIZE, MUTED_COLOR);
            }
        }
    }
}
