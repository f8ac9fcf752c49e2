use std::time::Duration;

use engine::GameLogic;

use crate::scene::yes_button_center;
use crate::state::CardState;

/// Frame step used by scripted headless runs.
pub const SCRIPT_FRAME: Duration = Duration::from_millis(16);

/// Everything that can happen to the card, as a replayable script.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CardInput {
    Tick(Duration),
    PointerEnterNo,
    TouchStartNo,
    ConfirmClick { x: f32, y: f32 },
    Resize { width: u32, height: u32 },
}

#[derive(Debug, Clone, Copy)]
pub struct CardLogic {
    pub seed: u64,
    pub viewport: (u32, u32),
    pub reduce_motion: bool,
}

impl CardLogic {
    pub fn new(seed: u64, viewport: (u32, u32)) -> Self {
        Self {
            seed,
            viewport,
            reduce_motion: false,
        }
    }

    pub fn with_reduce_motion(mut self, reduce_motion: bool) -> Self {
        self.reduce_motion = reduce_motion;
        self
    }
}

pub fn apply_input(state: &mut CardState, input: CardInput) {
    match input {
        CardInput::Tick(dt) => state.advance(dt),
        CardInput::PointerEnterNo | CardInput::TouchStartNo => {
            state.trigger_dodge();
        }
        CardInput::ConfirmClick { x, y } => {
            state.confirm_click(x, y);
        }
        CardInput::Resize { width, height } => state.resize(width, height),
    }
}

impl GameLogic for CardLogic {
    type State = CardState;
    type Input = CardInput;

    fn initial_state(&self) -> Self::State {
        CardState::new(self.seed, self.viewport, self.reduce_motion)
    }

    fn step(&self, state: &Self::State, input: Self::Input) -> Self::State {
        let mut next = state.clone();
        apply_input(&mut next, input);
        next
    }
}

/// Runs the card headless until `at`, ticking in `SCRIPT_FRAME` steps. When `confirm_at` is
/// given, the YES button is clicked at its centre on the first frame at or after that time.
///
/// Only the latest state is kept; use a `HeadlessRunner` over `CardLogic` when the history matters.
pub fn run_until(logic: CardLogic, at: Duration, confirm_at: Option<Duration>) -> CardState {
    let mut state = logic.initial_state();
    let mut pending_confirm = confirm_at;
    while state.clock() < at {
        if pending_confirm.is_some_and(|when| state.clock() >= when) {
            pending_confirm = None;
            click_yes(&mut state);
        }
        let dt = SCRIPT_FRAME.min(at - state.clock());
        apply_input(&mut state, CardInput::Tick(dt));
    }
    if pending_confirm.is_some_and(|when| when <= at) {
        click_yes(&mut state);
    }
    state
}

fn click_yes(state: &mut CardState) {
    if let Some((x, y)) = yes_button_center(state) {
        apply_input(state, CardInput::ConfirmClick { x, y });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render_state;
    use crate::screen::Screen;
    use engine::HeadlessRunner;

    #[test]
    fn step_leaves_the_previous_state_untouched() {
        let logic = CardLogic::new(5, (640, 480));
        let start = logic.initial_state();
        let clicked = logic.step(&start, CardInput::ConfirmClick { x: 1.0, y: 2.0 });
        let later = logic.step(&clicked, CardInput::Tick(Duration::from_millis(800)));

        assert_eq!(start.pending_timers(), 0);
        assert_eq!(clicked.screen(), Screen::Prompt);
        assert_eq!(later.screen(), Screen::Success);
    }

    #[test]
    fn touch_and_pointer_enter_both_dodge() {
        let logic = CardLogic::new(5, (640, 480));
        let s = logic.step(&logic.initial_state(), CardInput::TouchStartNo);
        let s = logic.step(&s, CardInput::PointerEnterNo);
        assert_eq!(s.prompt().map(|p| p.dodge.triggers()), Some(2));
    }

    #[test]
    fn run_until_lands_exactly_on_the_requested_time() {
        let state = run_until(CardLogic::new(9, (800, 600)), Duration::from_millis(1000), None);
        assert_eq!(state.clock(), Duration::from_millis(1000));
        assert_eq!(state.screen(), Screen::Prompt);
    }

    #[test]
    fn run_until_clicks_yes_and_swaps_after_the_delay() {
        let logic = CardLogic::new(9, (800, 600));
        let state = run_until(logic, Duration::from_millis(1299), Some(Duration::from_millis(500)));
        assert_eq!(state.screen(), Screen::Prompt);

        let state = run_until(logic, Duration::from_millis(1312), Some(Duration::from_millis(500)));
        assert_eq!(state.screen(), Screen::Success);
    }

    #[test]
    fn run_until_matches_a_recorded_run_of_the_same_script() {
        let logic = CardLogic::new(21, (640, 480));
        let mut runner = HeadlessRunner::new(logic);
        for _ in 0..20 {
            runner.step(CardInput::Tick(SCRIPT_FRAME));
        }
        let (x, y) = yes_button_center(runner.state()).expect("yes button");
        runner.step(CardInput::ConfirmClick { x, y });
        for _ in 0..100 {
            runner.step(CardInput::Tick(SCRIPT_FRAME));
        }

        let state = run_until(logic, SCRIPT_FRAME * 120, Some(SCRIPT_FRAME * 20));
        assert_eq!(state.clock(), runner.state().clock());
        assert_eq!(state.screen(), Screen::Success);
        assert_eq!(render_state(&state).frame(), render_state(runner.state()).frame());
    }

    #[test]
    fn long_runs_reach_the_requested_time() {
        let at = Duration::from_secs(60);
        let state = run_until(CardLogic::new(4, (320, 240)), at, Some(Duration::from_millis(10)));
        assert_eq!(state.clock(), at);
        assert_eq!(state.success().map(|s| s.rain.len()), Some(25));
    }
}
