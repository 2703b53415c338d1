use super::{Canvas, GameState, Session, StateEvent, Transition};
use crate::input::FrameInput;

/// Push/pop/replace stack of contexts. The bottom entry is the root and
/// must never be popped.
#[derive(Debug, Default)]
pub struct GameStateStack {
    states: Vec<GameState>,
    events: Vec<StateEvent>,
    quit: bool,
}

impl GameStateStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stack holding just `root`.
    pub fn with_root(root: GameState) -> Self {
        let mut stack = Self::new();
        stack.push(root);
        stack
    }

    pub fn depth(&self) -> usize {
        self.states.len()
    }

    pub fn top(&self) -> Option<&GameState> {
        self.states.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut GameState> {
        self.states.last_mut()
    }

    pub fn top_name(&self) -> Option<&'static str> {
        self.top().map(GameState::name)
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Take the events recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<StateEvent> {
        std::mem::take(&mut self.events)
    }

    /// Initialize `state` and make it the top. The previous top is kept
    /// as is underneath.
    pub fn push(&mut self, mut state: GameState) {
        state.initialize();
        log::info!("state push: {}", state.name());
        self.events.push(StateEvent::Pushed(state.name()));
        self.states.push(state);
    }

    /// Clean up and remove the top, resuming the one beneath. Popping the
    /// root is a bug: it asserts in debug builds and is ignored otherwise.
    pub fn pop(&mut self) -> Option<GameState> {
        if self.states.len() <= 1 {
            log::error!("refusing to pop the root state");
            debug_assert!(false, "popped the root state");
            return None;
        }
        let mut state = self.states.pop()?;
        state.cleanup();
        log::info!("state pop: {}", state.name());
        self.events.push(StateEvent::Popped(state.name()));
        Some(state)
    }

    /// Pop the top (root included) and push `state` in its place.
    pub fn replace(&mut self, mut state: GameState) {
        if let GameState::GameOver(over) = &state {
            self.events.push(StateEvent::RoundOver { winners: over.outcome.winners.clone() });
        }
        let Some(mut old) = self.states.pop() else {
            self.push(state);
            return;
        };
        old.cleanup();
        state.initialize();
        log::info!("state replace: {} -> {}", old.name(), state.name());
        self.events.push(StateEvent::Replaced { from: old.name(), to: state.name() });
        self.states.push(state);
    }

    /// Clean up everything and start over from `root`.
    pub fn reset(&mut self, root: GameState) {
        while let Some(mut state) = self.states.pop() {
            state.cleanup();
            self.events.push(StateEvent::Popped(state.name()));
        }
        self.push(root);
    }

    pub fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::None => {}
            Transition::Push(state) => self.push(state),
            Transition::Pop => {
                self.pop();
            }
            Transition::Replace(state) => self.replace(state),
            Transition::PopThenReplace(state) => {
                if self.pop().is_some() {
                    self.replace(state);
                }
            }
            Transition::Reset(root) => self.reset(root),
            Transition::Quit => {
                if !self.quit {
                    log::info!("quit requested");
                    self.events.push(StateEvent::QuitRequested);
                }
                self.quit = true;
            }
        }
    }

    /// Update the top context, then apply whatever it asked for.
    pub fn update(&mut self, input: &FrameInput, dt: f32, session: &mut Session) {
        let Some(top) = self.states.last_mut() else { return };
        let transition = top.update(input, dt, session);
        self.apply(transition);
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, session: &Session) {
        if let Some(top) = self.top() {
            top.draw(canvas, session);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameSettings;
    use crate::game::Round;
    use crate::input::{MenuInput, PlayerInput};
    use crate::map::{GameMap, SpawnPoint, TileType};
    use crate::state::{Gameplay, Pause};

    fn stomp_round(kill_limit: i32) -> Round {
        let mut map = GameMap::new(20, 10);
        map.fill(0..=19, 9..=9, TileType::Solid);
        map.spawn_points = vec![
            SpawnPoint { x: 100.0, y: 200.0, player_index: 0 },
            SpawnPoint { x: 100.0, y: 288.0, player_index: 1 },
        ];
        let settings = GameSettings { kill_limit, time_limit: 0.0, ..GameSettings::default() };
        Round::new(settings, map).unwrap()
    }

    fn gameplay(round: Round) -> GameState {
        GameState::Gameplay(Box::new(Gameplay::new(round)))
    }

    fn run(stack: &mut GameStateStack, session: &mut Session, input: FrameInput, frames: usize) {
        for _ in 0..frames {
            stack.update(&input, crate::config::FIXED_DT, session);
        }
    }

    fn kills(stack: &GameStateStack, slot: usize) -> u32 {
        match stack.top() {
            Some(GameState::Gameplay(g)) => g.round().mode().kills(slot),
            other => panic!("expected gameplay on top, got {:?}", other.map(GameState::name)),
        }
    }

    #[test]
    fn test_pause_preserves_gameplay_and_pops_back_to_main() {
        let mut session = Session::default();
        let mut stack = GameStateStack::with_root(GameState::main_menu());
        stack.push(gameplay(stomp_round(10)));
        run(&mut stack, &mut session, FrameInput::default(), 60);
        assert_eq!(kills(&stack, 0), 1);

        let round = stomp_round(10);
        stack.push(GameState::Pause(Box::new(Pause::new(round.settings().clone(), round.map().clone()))));
        assert_eq!(stack.depth(), 3);
        assert!(stack.pop().is_some());

        assert_eq!(stack.top_name(), Some("Gameplay"));
        assert_eq!(kills(&stack, 0), 1);

        assert!(stack.pop().is_some());
        assert_eq!(stack.top_name(), Some("MainMenu"));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_start_button_pushes_pause_and_back_resumes() {
        let mut session = Session::default();
        let mut stack = GameStateStack::with_root(GameState::main_menu());
        stack.push(gameplay(stomp_round(10)));
        stack.drain_events();

        let start = FrameInput::with_player(1, PlayerInput { start: true, ..Default::default() });
        run(&mut stack, &mut session, start, 1);
        assert_eq!(stack.top_name(), Some("Pause"));
        assert_eq!(stack.drain_events(), vec![StateEvent::Pushed("Pause")]);

        let back = FrameInput::with_menu(MenuInput { back: true, ..Default::default() });
        run(&mut stack, &mut session, back, 1);
        assert_eq!(stack.top_name(), Some("Gameplay"));

        // Start still held: no new pause until it's released and pressed again
        run(&mut stack, &mut session, start, 1);
        assert_eq!(stack.top_name(), Some("Gameplay"));
    }

    #[test]
    fn test_restart_from_pause_replaces_the_round() {
        let mut session = Session::default();
        let mut stack = GameStateStack::with_root(GameState::main_menu());
        stack.push(gameplay(stomp_round(10)));
        run(&mut stack, &mut session, FrameInput::default(), 60);
        assert_eq!(kills(&stack, 0), 1);

        let round = stomp_round(10);
        stack.push(GameState::Pause(Box::new(Pause::new(round.settings().clone(), round.map().clone()))));
        let down = FrameInput::with_menu(MenuInput { down: true, ..Default::default() });
        let confirm = FrameInput::with_menu(MenuInput { confirm: true, ..Default::default() });
        run(&mut stack, &mut session, down, 1);
        run(&mut stack, &mut session, confirm, 1);

        assert_eq!(stack.depth(), 2);
        assert_eq!(kills(&stack, 0), 0);
    }

    #[test]
    fn test_round_over_replaces_gameplay_with_game_over() {
        let mut session = Session::default();
        let mut stack = GameStateStack::with_root(GameState::main_menu());
        stack.push(gameplay(stomp_round(1)));
        stack.drain_events();
        run(&mut stack, &mut session, FrameInput::default(), 60);

        assert_eq!(stack.top_name(), Some("GameOver"));
        let events = stack.drain_events();
        assert_eq!(events[0], StateEvent::RoundOver { winners: vec![0] });
        assert_eq!(events[1], StateEvent::Replaced { from: "Gameplay", to: "GameOver" });
    }

    #[test]
    fn test_quit_is_recorded_once() {
        let mut stack = GameStateStack::with_root(GameState::main_menu());
        stack.drain_events();
        stack.apply(Transition::Quit);
        stack.apply(Transition::Quit);
        assert!(stack.should_quit());
        assert_eq!(stack.drain_events(), vec![StateEvent::QuitRequested]);
    }

    #[test]
    fn test_reset_clears_to_new_root() {
        let mut stack = GameStateStack::with_root(GameState::main_menu());
        stack.push(gameplay(stomp_round(10)));
        stack.apply(Transition::Reset(GameState::main_menu()));
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top_name(), Some("MainMenu"));
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "popped the root state"))]
    fn test_popping_root_is_refused() {
        let mut stack = GameStateStack::with_root(GameState::main_menu());
        assert!(stack.pop().is_none());
        assert_eq!(stack.depth(), 1);
    }
}
