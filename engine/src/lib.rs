pub mod app;
pub mod graphics;
pub mod pixels_renderer;
pub mod snapshot;
pub mod surface;
pub mod ui;
pub mod ui_tree;
pub mod view_tree;

/// Linear record of every state a headless run went through.
///
/// Frame 0 is the initial state; each recorded step appends one frame.
#[derive(Debug)]
pub struct TimeMachine<State> {
    states: Vec<State>,
}

impl<State> TimeMachine<State> {
    pub fn new(initial_state: State) -> Self {
        Self {
            states: vec![initial_state],
        }
    }

    pub fn frame(&self) -> usize {
        self.states.len() - 1
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn state(&self) -> &State {
        &self.states[self.frame()]
    }

    pub fn state_at(&self, frame: usize) -> Option<&State> {
        self.states.get(frame)
    }

    pub fn history(&self) -> &[State] {
        &self.states
    }

    pub fn record(&mut self, state: State) -> usize {
        self.states.push(state);
        self.frame()
    }
}

pub trait GameLogic {
    type State;
    type Input;

    fn initial_state(&self) -> Self::State;
    fn step(&self, state: &Self::State, input: Self::Input) -> Self::State;
}

/// Drives a `GameLogic` without a window, keeping the full state history.
#[derive(Debug)]
pub struct HeadlessRunner<G: GameLogic> {
    game: G,
    timemachine: TimeMachine<G::State>,
}

impl<G: GameLogic> HeadlessRunner<G> {
    pub fn new(game: G) -> Self {
        let initial_state = game.initial_state();
        Self {
            game,
            timemachine: TimeMachine::new(initial_state),
        }
    }

    pub fn frame(&self) -> usize {
        self.timemachine.frame()
    }

    pub fn state(&self) -> &G::State {
        self.timemachine.state()
    }

    pub fn history(&self) -> &[G::State] {
        self.timemachine.history()
    }

    pub fn timemachine(&self) -> &TimeMachine<G::State> {
        &self.timemachine
    }

    pub fn step(&mut self, input: G::Input) -> usize {
        let next_state = self.game.step(self.timemachine.state(), input);
        self.timemachine.record(next_state)
    }

    pub fn run<I>(&mut self, inputs: I) -> usize
    where
        I: IntoIterator<Item = G::Input>,
    {
        let mut last_frame = self.frame();
        for input in inputs {
            last_frame = self.step(input);
        }
        last_frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Additive;

    impl GameLogic for Additive {
        type State = i32;
        type Input = i32;

        fn initial_state(&self) -> Self::State {
            0
        }

        fn step(&self, state: &Self::State, input: Self::Input) -> Self::State {
            *state + input
        }
    }

    #[test]
    fn timemachine_records_frames_in_order() {
        let mut tm = TimeMachine::new(0);
        assert_eq!(tm.frame(), 0);
        tm.record(1);
        tm.record(2);
        assert_eq!(tm.state(), &2);
        assert_eq!(tm.history(), &[0, 1, 2]);
        assert_eq!(tm.state_at(1), Some(&1));
        assert_eq!(tm.state_at(9), None);
    }

    #[test]
    fn runner_steps_through_inputs() {
        let mut runner = HeadlessRunner::new(Additive);
        let last = runner.run([1, 2, 3]);
        assert_eq!(last, 3);
        assert_eq!(runner.state(), &6);
        assert_eq!(runner.history(), &[0, 1, 3, 6]);
    }

    #[test]
    fn runner_with_no_inputs_stays_on_initial_frame() {
        let mut runner = HeadlessRunner::new(Additive);
        assert_eq!(runner.run(Vec::<i32>::new()), 0);
        assert_eq!(runner.timemachine().len(), 1);
    }
}
