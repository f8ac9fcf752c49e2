//! Draws card scenes through the engine's `Renderer2d`.

use engine::graphics::{CpuRenderer, HeartShape, Renderer2d, fill_heart, text_height, text_width};
use engine::surface::{RgbaBufferSurface, Surface, SurfaceSize};
use engine::view_tree::{ButtonNode, ViewNode, ViewTree};

use crate::scene::{BACKGROUND, build_scene};
use crate::state::CardState;

const BUTTON_LABEL_SCALE: u32 = 3;

pub fn draw_scene<A>(view: &ViewTree<A>, gfx: &mut dyn Renderer2d) {
    gfx.clear(BACKGROUND);
    for node in &view.nodes {
        match node {
            ViewNode::Panel(panel) => {
                gfx.blend_rect(panel.rect, panel.color, panel.alpha);
                if let Some(outline) = panel.outline {
                    if panel.alpha > 0 {
                        gfx.rect_outline(panel.rect, outline);
                    }
                }
            }
            ViewNode::Text(text) => {
                gfx.draw_text_blended(
                    text.pos.0,
                    text.pos.1,
                    &text.text,
                    text.color,
                    text.scale,
                    text.alpha,
                );
            }
            ViewNode::Heart(heart) => {
                fill_heart(
                    gfx,
                    HeartShape {
                        cx: heart.center.0,
                        cy: heart.center.1,
                        size: heart.size,
                        rotation_deg: heart.rotation_deg,
                    },
                    heart.color,
                    heart.alpha,
                );
            }
            ViewNode::Button(button) => draw_button(gfx, button),
        }
    }
}

fn draw_button<A>(gfx: &mut dyn Renderer2d, button: &ButtonNode<A>) {
    gfx.fill_rect(button.rect, button.color);
    let scale = if text_width(&button.label, BUTTON_LABEL_SCALE) + 8 <= button.rect.w {
        BUTTON_LABEL_SCALE
    } else {
        1
    };
    let w = text_width(&button.label, scale);
    let h = text_height(&button.label, scale);
    gfx.draw_text_scaled(
        button.rect.x + button.rect.w.saturating_sub(w) / 2,
        button.rect.y + button.rect.h.saturating_sub(h) / 2,
        &button.label,
        button.label_color,
        scale,
    );
}

/// Renders `state`'s current frame into a fresh in-memory surface.
pub fn render_state(state: &CardState) -> RgbaBufferSurface {
    let (width, height) = state.viewport();
    let size = SurfaceSize::new(width, height);
    let mut surface = RgbaBufferSurface::new(size);
    let view = build_scene(state);
    let mut gfx = CpuRenderer::new(surface.frame_mut(), size);
    gfx.begin_frame(size);
    draw_scene(&view, &mut gfx);
    surface
}
