//! Pointer routing over the interactive nodes of a frame.
//!
//! The tree is rebuilt every frame from the current view (buttons move while they animate) but
//! hover and press state persist across frames, so enter/leave edges are reported once.

use std::collections::HashMap;

use crate::ui::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UiId(pub u32);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiState {
    pub hovered: Option<UiId>,
    pub pressed: Option<UiId>,
    /// Button under the finger that is currently down, if any.
    pub touched: Option<UiId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiInput {
    pub mouse_pos: Option<(u32, u32)>,
    pub mouse_down: bool,
    pub mouse_up: bool,
    pub touch_start: Option<(u32, u32)>,
    pub touch_end: Option<(u32, u32)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    Click { id: UiId, pos: (u32, u32) },
    Hover { id: UiId, entered: bool },
    TouchStart { id: UiId, pos: (u32, u32) },
}

#[derive(Debug, Clone)]
struct UiNode {
    rect: Rect,
    enabled: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UiTree {
    nodes: HashMap<UiId, UiNode>,
    // Paint order; later entries are on top.
    order: Vec<UiId>,
    state: UiState,
}

impl UiTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_frame(&mut self) {
        self.nodes.clear();
        self.order.clear();
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    pub fn ensure_button(&mut self, id: UiId, rect: Rect, enabled: bool) {
        if self.nodes.insert(id, UiNode { rect, enabled }).is_none() {
            self.order.push(id);
        }
    }

    pub fn process_input(&mut self, input: UiInput) -> Vec<UiEvent> {
        let mut events = Vec::new();

        // Buttons that vanished (screen swap) cannot stay hovered or pressed.
        if let Some(id) = self.state.hovered {
            if !self.nodes.contains_key(&id) {
                self.state.hovered = None;
            }
        }
        if let Some(id) = self.state.pressed {
            if !self.nodes.contains_key(&id) {
                self.state.pressed = None;
            }
        }
        if let Some(id) = self.state.touched {
            if !self.nodes.contains_key(&id) {
                self.state.touched = None;
            }
        }

        let hovered = input.mouse_pos.and_then(|pos| self.hit_test(pos));
        if hovered != self.state.hovered {
            if let Some(prev) = self.state.hovered {
                events.push(UiEvent::Hover {
                    id: prev,
                    entered: false,
                });
            }
            if let Some(next) = hovered {
                events.push(UiEvent::Hover {
                    id: next,
                    entered: true,
                });
            }
            self.state.hovered = hovered;
        }

        if let Some(pos) = input.touch_start {
            let hit = self.hit_test(pos);
            if let Some(id) = hit {
                events.push(UiEvent::TouchStart { id, pos });
            }
            self.state.touched = hit;
        }

        // A tap is a click: the finger lifts over the button it went down on.
        if let Some(pos) = input.touch_end {
            if let Some(touched) = self.state.touched.take() {
                if self.hit_test(pos) == Some(touched) {
                    events.push(UiEvent::Click { id: touched, pos });
                }
            }
        }

        if input.mouse_down {
            self.state.pressed = self.state.hovered;
        }

        if input.mouse_up {
            if let (Some(pressed), Some(hovered), Some(pos)) =
                (self.state.pressed, self.state.hovered, input.mouse_pos)
            {
                if pressed == hovered {
                    events.push(UiEvent::Click { id: pressed, pos });
                }
            }
            self.state.pressed = None;
        }

        events
    }

    fn hit_test(&self, pos: (u32, u32)) -> Option<UiId> {
        self.order.iter().rev().copied().find(|id| {
            self.nodes
                .get(id)
                .is_some_and(|node| node.enabled && node.rect.contains(pos.0, pos.1))
        })
    }
}
