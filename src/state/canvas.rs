//! Drawing seam
//!
//! Contexts draw through `Canvas` and never call macroquad directly. The
//! binary implements it on the window; `DrawList` records commands for
//! headless runs and tests.

use macroquad::color::Color;
use macroquad::math::{Rect, Vec2};

pub trait Canvas {
    /// Drawable area in pixels
    fn size(&self) -> Vec2;

    fn clear(&mut self, color: Color);

    fn rect(&mut self, rect: Rect, color: Color);

    /// Draw `source` from a named sheet into `dest`.
    fn sprite(&mut self, sheet: &str, source: Rect, dest: Rect, tint: Color, flip_x: bool);

    /// `pos` is the baseline-left corner.
    fn text(&mut self, text: &str, pos: Vec2, size: f32, color: Color);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Rect(Rect, Color),
    Sprite { sheet: String, source: Rect, dest: Rect, tint: Color, flip_x: bool },
    Text(String, Vec2, f32, Color),
}

/// A canvas that only records what was drawn.
#[derive(Debug, Clone)]
pub struct DrawList {
    pub size: Vec2,
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(width: f32, height: f32) -> Self {
        Self { size: Vec2::new(width, height), commands: Vec::new() }
    }

    /// Every text string drawn, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text(s, ..) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for DrawList {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Rect(rect, color));
    }

    fn sprite(&mut self, sheet: &str, source: Rect, dest: Rect, tint: Color, flip_x: bool) {
        self.commands.push(DrawCommand::Sprite { sheet: sheet.to_string(), source, dest, tint, flip_x });
    }

    fn text(&mut self, text: &str, pos: Vec2, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text(text.to_string(), pos, size, color));
    }
}
