//! Window shell: input in, fixed-step simulation, draw out.
//!
//! Usage: `stompwar [map.ron]`. A map given on the command line is played
//! first and is where the level editor saves.

use std::collections::HashMap;
use std::path::PathBuf;

use macroquad::prelude::*;

use stompwar::config::{GameSettings, FIXED_DT};
use stompwar::input::{FrameInput, InputState};
use stompwar::map::{load_map, GameMap};
use stompwar::state::{Canvas, GameState, GameStateStack, Session, StateEvent};
use stompwar::VERSION;

const SETTINGS_PATH: &str = "settings.ron";
const SPRITE_DIR: &str = "assets/sprites";
const SHEETS: [&str; 2] = ["player", "items"];

/// Cap on simulated time per rendered frame
const MAX_FRAME_TIME: f32 = 0.25;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("STOMPWAR v{}", VERSION),
        window_width: 1280,
        window_height: 720,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// `Canvas` over the macroquad window.
struct Screen {
    textures: HashMap<String, Texture2D>,
}

impl Screen {
    async fn load() -> Self {
        let mut textures = HashMap::new();
        for sheet in SHEETS {
            let path = format!("{}/{}.png", SPRITE_DIR, sheet);
            match load_texture(&path).await {
                Ok(tex) => {
                    tex.set_filter(FilterMode::Nearest);
                    textures.insert(sheet.to_string(), tex);
                }
                Err(e) => log::warn!("no sprite sheet at {} ({}), drawing boxes", path, e),
            }
        }
        Self { textures }
    }
}

impl Canvas for Screen {
    fn size(&self) -> Vec2 {
        vec2(screen_width(), screen_height())
    }

    fn clear(&mut self, color: Color) {
        clear_background(color);
    }

    fn rect(&mut self, rect: Rect, color: Color) {
        draw_rectangle(rect.x, rect.y, rect.w, rect.h, color);
    }

    fn sprite(&mut self, sheet: &str, source: Rect, dest: Rect, tint: Color, flip_x: bool) {
        match self.textures.get(sheet) {
            Some(tex) => draw_texture_ex(
                tex,
                dest.x,
                dest.y,
                tint,
                DrawTextureParams {
                    dest_size: Some(vec2(dest.w, dest.h)),
                    source: Some(source),
                    flip_x,
                    ..Default::default()
                },
            ),
            None => draw_rectangle(dest.x, dest.y, dest.w, dest.h, tint),
        }
    }

    fn text(&mut self, text: &str, pos: Vec2, size: f32, color: Color) {
        draw_text(text, pos.x, pos.y, size, color);
    }
}

fn load_settings() -> GameSettings {
    match GameSettings::load(SETTINGS_PATH) {
        Ok(settings) => {
            log::info!("loaded settings from {}", SETTINGS_PATH);
            settings
        }
        Err(e) => {
            log::warn!("using default settings ({}: {})", SETTINGS_PATH, e);
            GameSettings::default()
        }
    }
}

/// Maps on offer plus where the editor should save.
fn load_maps() -> (Vec<GameMap>, Option<PathBuf>) {
    let mut maps = vec![GameMap::arena()];
    let Some(path) = std::env::args().nth(1).map(PathBuf::from) else {
        return (maps, None);
    };
    match load_map(&path) {
        Ok(map) => maps.insert(0, map),
        Err(e) => log::warn!("could not load {}: {}, it will be created on save", path.display(), e),
    }
    (maps, Some(path))
}

/// Remember this frame's presses until a simulation step consumes them.
fn carry_edges(pending: &mut FrameInput, frame: &FrameInput) {
    let (m, f) = (&mut pending.menu, &frame.menu);
    m.up |= f.up;
    m.down |= f.down;
    m.left |= f.left;
    m.right |= f.right;
    m.confirm |= f.confirm;
    m.back |= f.back;
    m.alt |= f.alt;
    for (p, f) in pending.players.iter_mut().zip(frame.players.iter()) {
        p.jump_pressed |= f.jump_pressed;
        p.action_pressed |= f.action_pressed;
    }
}

/// Held state from `frame`, plus any presses not yet seen by a step.
fn take_edges(pending: &mut FrameInput, frame: &FrameInput) -> FrameInput {
    let mut step = *frame;
    step.menu = pending.menu;
    for (p, edges) in step.players.iter_mut().zip(pending.players.iter()) {
        p.jump_pressed = edges.jump_pressed;
        p.action_pressed = edges.action_pressed;
    }
    *pending = FrameInput::default();
    step
}

#[macroquad::main(window_conf)]
async fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = load_settings();
    let (maps, editor_path) = load_maps();
    let mut session = Session::new(settings, maps);
    session.editor_path = editor_path;

    let mut screen = Screen::load().await;
    let mut input = InputState::new();
    let mut stack = GameStateStack::with_root(GameState::main_menu());
    let mut accumulator = 0.0f32;
    let mut pending = FrameInput::default();

    log::info!("=== STOMPWAR v{} ===", VERSION);

    loop {
        let frame = input.poll();
        carry_edges(&mut pending, &frame);

        // The round steps on a fixed clock; presses wait for the next step
        accumulator += get_frame_time().min(MAX_FRAME_TIME);
        while accumulator >= FIXED_DT {
            let step = take_edges(&mut pending, &frame);
            stack.update(&step, FIXED_DT, &mut session);
            accumulator -= FIXED_DT;
        }

        for event in stack.drain_events() {
            match event {
                StateEvent::RoundOver { winners } => log::info!("round over, winners: {:?}", winners),
                StateEvent::QuitRequested => log::info!("bye"),
                other => log::debug!("{:?}", other),
            }
        }
        if stack.should_quit() {
            break;
        }

        stack.draw(&mut screen, &session);
        next_frame().await;
    }
}
