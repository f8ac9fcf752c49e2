use std::error::Error;
use std::time::{Duration, Instant};

use pixels::{PixelsBuilder, SurfaceTexture};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, MouseButton, TouchPhase, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::graphics::Renderer2d;
use crate::pixels_renderer::PixelsRenderer2d;
use crate::surface::SurfaceSize;
use crate::ui_tree::{UiInput, UiTree};
use crate::view_tree::{triggered_actions, Triggered, ViewTree};

pub struct AppConfig {
    pub title: String,
    pub desired_size: PhysicalSize<u32>,
    pub clamp_to_monitor: bool,
    pub vsync: bool,
}

pub struct AppContext {
    pub window: Window,
    pub renderer: PixelsRenderer2d,
    pub surface_size: SurfaceSize,
}

/// Pointer input accumulated between two redraws.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputFrame {
    pub mouse_pos: Option<(u32, u32)>,
    pub mouse_down: bool,
    pub mouse_up: bool,
    pub touch_start: Option<(u32, u32)>,
    pub touch_end: Option<(u32, u32)>,
}

impl InputFrame {
    fn ui_input(&self) -> UiInput {
        UiInput {
            mouse_pos: self.mouse_pos,
            mouse_down: self.mouse_down,
            mouse_up: self.mouse_up,
            touch_start: self.touch_start,
            touch_end: self.touch_end,
        }
    }

    fn clear_edges(&mut self) {
        self.mouse_down = false;
        self.mouse_up = false;
        self.touch_start = None;
        self.touch_end = None;
    }
}

pub trait GameApp {
    type State;
    type Action: Clone;

    fn init_state(&mut self, ctx: &mut AppContext) -> Self::State;

    fn build_view(&self, state: &Self::State, ctx: &AppContext) -> ViewTree<Self::Action>;

    fn update_state(
        &mut self,
        state: &mut Self::State,
        input: InputFrame,
        dt: Duration,
        triggered: &[Triggered<Self::Action>],
        ctx: &mut AppContext,
    );

    fn render(&mut self, view: &ViewTree<Self::Action>, renderer: &mut dyn Renderer2d);

    /// Returns `true` when the event was fully handled and default processing should be skipped.
    fn handle_event(
        &mut self,
        _event: &Event<()>,
        _state: &mut Self::State,
        _ctx: &mut AppContext,
        _control_flow: &mut ControlFlow,
    ) -> bool {
        false
    }
}

fn open_window(config: AppConfig, event_loop: &EventLoop<()>) -> Result<AppContext, Box<dyn Error>> {
    let monitor_size = if config.clamp_to_monitor {
        event_loop.primary_monitor().map(|m| m.size())
    } else {
        None
    };
    let initial_size = match monitor_size {
        Some(monitor) => PhysicalSize::new(
            config.desired_size.width.min(monitor.width),
            config.desired_size.height.min(monitor.height),
        ),
        None => config.desired_size,
    };
    let window = WindowBuilder::new()
        .with_title(config.title)
        .with_inner_size(initial_size)
        .build(event_loop)?;

    let window_size = window.inner_size();
    let surface_size = SurfaceSize::new(window_size.width.max(1), window_size.height.max(1));

    let surface_texture = SurfaceTexture::new(surface_size.width, surface_size.height, &window);
    let pixels = PixelsBuilder::new(surface_size.width, surface_size.height, surface_texture)
        .enable_vsync(config.vsync)
        .build()?;
    let renderer = PixelsRenderer2d::new(pixels, surface_size)?;

    Ok(AppContext {
        window,
        renderer,
        surface_size,
    })
}

/// Opens a window and drives `game` until the window closes.
///
/// Each redraw builds the view, routes pointer input against its buttons, lets the game update
/// with the triggered actions, then rebuilds the view and draws it.
pub fn run_game<G: GameApp + 'static>(config: AppConfig, mut game: G) -> Result<(), Box<dyn Error>> {
    let event_loop = EventLoop::new();
    let mut ctx = open_window(config, &event_loop)?;
    tracing::info!(
        width = ctx.surface_size.width,
        height = ctx.surface_size.height,
        "window opened"
    );

    let mut state = game.init_state(&mut ctx);
    let mut input = InputFrame::default();
    let mut ui_tree = UiTree::new();
    let mut last_frame = Instant::now();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        if game.handle_event(&event, &mut state, &mut ctx, control_flow) {
            return;
        }

        match &event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    let next = SurfaceSize::new(size.width, size.height);
                    if let Err(err) = ctx.renderer.resize(next) {
                        tracing::error!("resize failed: {err}");
                    }
                    ctx.surface_size = ctx.renderer.size();
                    ctx.window.request_redraw();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    input.mouse_pos = Some((position.x.max(0.0) as u32, position.y.max(0.0) as u32));
                }
                WindowEvent::CursorLeft { .. } => {
                    input.mouse_pos = None;
                }
                WindowEvent::MouseInput {
                    state: ElementState::Pressed,
                    button: MouseButton::Left,
                    ..
                } => {
                    input.mouse_down = true;
                }
                WindowEvent::MouseInput {
                    state: ElementState::Released,
                    button: MouseButton::Left,
                    ..
                } => {
                    input.mouse_up = true;
                }
                WindowEvent::Touch(touch) => {
                    let pos = (
                        touch.location.x.max(0.0) as u32,
                        touch.location.y.max(0.0) as u32,
                    );
                    match touch.phase {
                        TouchPhase::Started => input.touch_start = Some(pos),
                        TouchPhase::Ended => input.touch_end = Some(pos),
                        TouchPhase::Moved | TouchPhase::Cancelled => {}
                    }
                }
                _ => {}
            },
            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = now.saturating_duration_since(last_frame);
                last_frame = now;

                let view_for_input = game.build_view(&state, &ctx);
                view_for_input.sync_ui_tree(&mut ui_tree);
                let events = ui_tree.process_input(input.ui_input());
                let triggered = triggered_actions(&view_for_input, &events, input.mouse_pos);
                game.update_state(&mut state, input, dt, &triggered, &mut ctx);

                let view_for_render = game.build_view(&state, &ctx);
                ctx.renderer.draw_frame(|gfx| game.render(&view_for_render, gfx));
                if let Err(err) = ctx.renderer.present() {
                    tracing::error!("present failed: {err}");
                }

                input.clear_edges();
            }
            Event::MainEventsCleared => {
                ctx.window.request_redraw();
            }
            _ => {}
        }
    });
}
