use serde::{Deserialize, Serialize};

use crate::graphics::Color;
use crate::ui::Rect;
use crate::ui_tree::{UiEvent, UiId, UiTree};

/// Declarative description of one frame, in paint order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewTree<A> {
    pub nodes: Vec<ViewNode<A>>,
}

impl<A> Default for ViewTree<A> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<A> ViewTree<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: ViewNode<A>) {
        self.nodes.push(node);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn buttons(&self) -> impl Iterator<Item = &ButtonNode<A>> {
        self.nodes.iter().filter_map(|node| match node {
            ViewNode::Button(button) => Some(button),
            _ => None,
        })
    }

    pub fn button(&self, id: u32) -> Option<&ButtonNode<A>> {
        self.buttons().find(|b| b.id == id)
    }

    pub fn hearts(&self) -> impl Iterator<Item = &HeartNode> {
        self.nodes.iter().filter_map(|node| match node {
            ViewNode::Heart(heart) => Some(heart),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextNode> {
        self.nodes.iter().filter_map(|node| match node {
            ViewNode::Text(text) => Some(text),
            _ => None,
        })
    }

    /// Registers this frame's buttons with the pointer router.
    pub fn sync_ui_tree(&self, ui_tree: &mut UiTree) {
        ui_tree.begin_frame();
        for button in self.buttons() {
            ui_tree.ensure_button(UiId(button.id), button.rect, button.enabled);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ViewNode<A> {
    Panel(PanelNode),
    Text(TextNode),
    Heart(HeartNode),
    Button(ButtonNode<A>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelNode {
    pub rect: Rect,
    pub color: Color,
    pub alpha: u8,
    pub outline: Option<Color>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextNode {
    pub pos: (u32, u32),
    pub text: String,
    pub color: Color,
    pub scale: u32,
    pub alpha: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeartNode {
    pub center: (f32, f32),
    pub size: f32,
    pub rotation_deg: f32,
    pub color: Color,
    pub alpha: u8,
}

/// Interactive node. `on_click` fires on press+release; `on_enter` fires on pointer-enter and
/// on touch-start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ButtonNode<A> {
    pub id: u32,
    pub rect: Rect,
    pub label: String,
    pub color: Color,
    pub label_color: Color,
    pub on_click: Option<A>,
    pub on_enter: Option<A>,
    pub enabled: bool,
}

/// An action fired by pointer input, with the pointer position that fired it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triggered<A> {
    pub action: A,
    pub pos: (u32, u32),
}

#[derive(Clone, Copy)]
enum ButtonSlot {
    Enter,
    Click,
}

/// Maps routed pointer events onto the actions declared by this frame's buttons.
pub fn triggered_actions<A: Clone>(
    view: &ViewTree<A>,
    events: &[UiEvent],
    pointer: Option<(u32, u32)>,
) -> Vec<Triggered<A>> {
    let mut out = Vec::new();
    for event in events {
        let (button, action, pos) = match *event {
            UiEvent::Hover { id, entered: true } => {
                let Some(pos) = pointer else { continue };
                (view.button(id.0), ButtonSlot::Enter, pos)
            }
            UiEvent::TouchStart { id, pos } => (view.button(id.0), ButtonSlot::Enter, pos),
            UiEvent::Click { id, pos } => (view.button(id.0), ButtonSlot::Click, pos),
            UiEvent::Hover { entered: false, .. } => continue,
        };
        let action = button.and_then(|b| match action {
            ButtonSlot::Enter => b.on_enter.clone(),
            ButtonSlot::Click => b.on_click.clone(),
        });
        if let Some(action) = action {
            out.push(Triggered { action, pos });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui_tree::UiInput;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    enum Act {
        Run,
        Press,
    }

    fn view() -> ViewTree<Act> {
        let mut view = ViewTree::new();
        view.push(ViewNode::Panel(PanelNode {
            rect: Rect::from_size(100, 100),
            color: [0, 0, 0, 255],
            alpha: 255,
            outline: None,
        }));
        view.push(ViewNode::Button(ButtonNode {
            id: 7,
            rect: Rect::new(10, 10, 20, 20),
            label: "NO".to_string(),
            color: [200, 200, 200, 255],
            label_color: [0, 0, 0, 255],
            on_click: Some(Act::Press),
            on_enter: Some(Act::Run),
            enabled: true,
        }));
        view
    }

    #[test]
    fn hover_and_touch_map_to_enter_action_click_to_click_action() {
        let view = view();
        let mut tree = UiTree::new();
        view.sync_ui_tree(&mut tree);

        let events = tree.process_input(UiInput {
            mouse_pos: Some((15, 15)),
            ..UiInput::default()
        });
        assert_eq!(
            triggered_actions(&view, &events, Some((15, 15))),
            vec![Triggered { action: Act::Run, pos: (15, 15) }]
        );

        let events = [
            UiEvent::TouchStart { id: UiId(7), pos: (11, 12) },
            UiEvent::Click { id: UiId(7), pos: (12, 12) },
            UiEvent::Hover { id: UiId(7), entered: false },
        ];
        assert_eq!(
            triggered_actions(&view, &events, None),
            vec![
                Triggered { action: Act::Run, pos: (11, 12) },
                Triggered { action: Act::Press, pos: (12, 12) },
            ]
        );
    }

    #[test]
    fn view_tree_serializes_to_json() {
        let json = serde_json::to_string(&view()).expect("serialize view tree");
        let back: ViewTree<Act> = serde_json::from_str(&json).expect("deserialize view tree");
        assert_eq!(back.buttons().count(), 1);
        assert_eq!(back.button(7).map(|b| b.label.as_str()), Some("NO"));
    }
}
