//! The windowed card, driven by the engine's event loop.

use std::time::Duration;

use engine::app::{AppContext, GameApp, InputFrame};
use engine::graphics::Renderer2d;
use engine::view_tree::{Triggered, ViewTree};
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::ControlFlow;

use crate::render::draw_scene;
use crate::scene::{CardAction, build_scene};
use crate::state::CardState;

// Long stalls (window drags, breakpoints) advance the card by at most this much per frame.
const MAX_FRAME_STEP: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy)]
pub struct CardApp {
    pub seed: u64,
    pub reduce_motion: bool,
}

impl CardApp {
    pub fn new(seed: u64, reduce_motion: bool) -> Self {
        Self {
            seed,
            reduce_motion,
        }
    }
}

/// Applies one frame's triggered actions, then advances the clock by `dt`.
pub fn apply_frame(state: &mut CardState, triggered: &[Triggered<CardAction>], dt: Duration) {
    for t in triggered {
        match t.action {
            CardAction::Dodge => {
                state.trigger_dodge();
            }
            CardAction::Confirm => {
                state.confirm_click(t.pos.0 as f32, t.pos.1 as f32);
            }
        }
    }
    state.advance(dt.min(MAX_FRAME_STEP));
}

impl GameApp for CardApp {
    type State = CardState;
    type Action = CardAction;

    fn init_state(&mut self, ctx: &mut AppContext) -> Self::State {
        let size = ctx.surface_size;
        tracing::info!(seed = self.seed, reduce_motion = self.reduce_motion, "card started");
        CardState::new(self.seed, (size.width, size.height), self.reduce_motion)
    }

    fn build_view(&self, state: &Self::State, _ctx: &AppContext) -> ViewTree<Self::Action> {
        build_scene(state)
    }

    fn update_state(
        &mut self,
        state: &mut Self::State,
        _input: InputFrame,
        dt: Duration,
        triggered: &[Triggered<Self::Action>],
        ctx: &mut AppContext,
    ) {
        let size = ctx.surface_size;
        if state.viewport() != (size.width, size.height) {
            state.resize(size.width, size.height);
        }
        apply_frame(state, triggered, dt);
    }

    fn render(&mut self, view: &ViewTree<Self::Action>, renderer: &mut dyn Renderer2d) {
        draw_scene(view, renderer);
    }

    fn handle_event(
        &mut self,
        event: &Event<()>,
        _state: &mut Self::State,
        _ctx: &mut AppContext,
        control_flow: &mut ControlFlow,
    ) -> bool {
        if let Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(VirtualKeyCode::Escape),
                            ..
                        },
                    ..
                },
            ..
        } = event
        {
            *control_flow = ControlFlow::Exit;
            return true;
        }
        false
    }
}
