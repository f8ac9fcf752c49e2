use std::time::Duration;

use engine::graphics::{Color, text_height, text_width};
use engine::ui::{Anchor, Rect, Size};
use engine::view_tree::{ButtonNode, HeartNode, PanelNode, TextNode, ViewNode, ViewTree};
use serde::{Deserialize, Serialize};

use crate::dodge::DodgePhase;
use crate::motion::{Loop, ease_in_out, ease_out, keyframes, lerp, linear, progress, spring_response};
use crate::particles::ParticleFrame;
use crate::state::{CardState, MountedScreen, PromptScreen, SuccessScreen};
use crate::ui_ids::{UI_NO, UI_YES};

pub const PROMPT_TITLE: &str = "WILL YOU BE MY VALENTINE?";
pub const YES_LABEL: &str = "YES";
pub const NO_LABEL: &str = "NO";
pub const TOOLTIP_TEXT: &str = "NICE TRY";
pub const SUCCESS_HEADLINE: &str = "YOU JUST MADE MY HEART THE HAPPIEST";
pub const SUCCESS_MESSAGE: &str = "OUR DATE IS OFFICIALLY CONFIRMED - I CAN'T WAIT TO SEE YOU.";

pub const BACKGROUND: Color = [255, 228, 236, 255];
pub const CARD_FILL: Color = [255, 255, 255, 255];
pub const CARD_OUTLINE: Color = [251, 182, 206, 255];
pub const HEART_RED: Color = [225, 29, 72, 255];
pub const HEART_PINK: Color = [244, 114, 182, 255];
pub const TEXT_DARK: Color = [136, 19, 55, 255];
pub const TEXT_LIGHT: Color = [255, 255, 255, 255];
pub const NO_FILL: Color = [229, 231, 235, 255];
pub const NO_TEXT: Color = [75, 85, 99, 255];
pub const TOOLTIP_FILL: Color = [31, 41, 55, 255];

const CARD_MAX: Size = Size { w: 520, h: 380 };
const SUCCESS_CARD_MAX: Size = Size { w: 560, h: 360 };
const CARD_MARGIN: u32 = 16;
const CARD_PADDING: u32 = 16;
const BUTTON_SIZE: Size = Size { w: 120, h: 48 };
const BUTTON_GAP: u32 = 32;
const CHARACTER_SIZE: f32 = 64.0;
const LOVE_PARTICLES: usize = 8;

const ENTRANCE: Duration = Duration::from_millis(600);
const SUCCESS_FADE: Duration = Duration::from_secs(1);
const BOB: Loop = Loop::new(Duration::from_secs(2));
const PULSE: Loop = Loop::new(Duration::from_millis(1500));
const WIGGLE: Loop = Loop::new(Duration::from_millis(500)).with_repeat_delay(Duration::from_secs(2));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardAction {
    /// Pointer entered, or a touch started on, the evasive button.
    Dodge,
    Confirm,
}

/// Resting geometry of the prompt screen for one viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptLayout {
    pub card: Rect,
    pub character_center: (u32, u32),
    pub title_y: u32,
    pub yes: Rect,
    pub no: Rect,
}

pub fn prompt_layout(width: u32, height: u32) -> Option<PromptLayout> {
    let viewport = Rect::from_size(width, height);
    let avail = Size::new(
        width.saturating_sub(CARD_MARGIN * 2),
        height.saturating_sub(CARD_MARGIN * 2),
    );
    let card = viewport.place(CARD_MAX.clamp_max(avail), Anchor::Center);
    let row_w = BUTTON_SIZE.w * 2 + BUTTON_GAP;
    if card.w < row_w || card.h < BUTTON_SIZE.h * 3 {
        return None;
    }

    let (top, rest) = card.take_top(card.h / 2);
    let (title_band, buttons_band) = rest.take_top(rest.h / 3);
    let character_center = (top.x + top.w / 2, top.y + top.h / 2);
    let row = buttons_band.place(Size::new(row_w, BUTTON_SIZE.h), Anchor::Center);
    let yes = row.place(BUTTON_SIZE, Anchor::CenterLeft);
    let no = row.place(BUTTON_SIZE, Anchor::CenterRight);

    Some(PromptLayout {
        card,
        character_center,
        title_y: title_band.y,
        yes,
        no,
    })
}

/// Largest block-font scale (up to 3) at which `text` fits in `max_width`.
pub fn fit_scale(text: &str, max_width: u32) -> u32 {
    (1..=3)
        .rev()
        .find(|scale| text_width(text, *scale) <= max_width)
        .unwrap_or(1)
}

/// Greedy word wrap for the block font.
pub fn wrap_text(text: &str, scale: u32, max_width: u32) -> String {
    let mut lines: Vec<String> = Vec::new();
    for word in text.split_whitespace() {
        match lines.last_mut() {
            Some(line) if text_width(&format!("{line} {word}"), scale) <= max_width => {
                line.push(' ');
                line.push_str(word);
            }
            _ => lines.push(word.to_string()),
        }
    }
    lines.join("\n")
}

fn alpha_u8(alpha: f32) -> u8 {
    (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Phase of a decorative loop; frozen at rest when motion is reduced.
fn decorative(state: &CardState, animation: Loop, elapsed: Duration) -> f32 {
    if state.reduce_motion() {
        0.0
    } else {
        animation.phase(elapsed)
    }
}

fn push_text_centered(tree: &mut ViewTree<CardAction>, center_x: u32, y: u32, text: &str, scale: u32, color: Color, alpha: u8) {
    let w = text.lines().map(|l| text_width(l, scale)).max().unwrap_or(0);
    tree.push(ViewNode::Text(TextNode {
        pos: (center_x.saturating_sub(w / 2), y),
        text: text.to_string(),
        color,
        scale,
        alpha,
    }));
}

fn push_heart(tree: &mut ViewTree<CardAction>, frame: ParticleFrame, color: Color) {
    tree.push(ViewNode::Heart(HeartNode {
        center: frame.center,
        size: frame.size,
        rotation_deg: frame.rotation_deg,
        color,
        alpha: alpha_u8(frame.alpha),
    }));
}

fn push_button(
    tree: &mut ViewTree<CardAction>,
    id: u32,
    rect: Rect,
    label: &str,
    colors: (Color, Color),
    on_click: Option<CardAction>,
    on_enter: Option<CardAction>,
) {
    tree.push(ViewNode::Button(ButtonNode {
        id,
        rect,
        label: label.to_string(),
        color: colors.0,
        label_color: colors.1,
        on_click,
        on_enter,
        enabled: true,
    }));
}

/// Builds the frame for the card's current screen, in paint order.
pub fn build_scene(state: &CardState) -> ViewTree<CardAction> {
    let mut tree = ViewTree::new();
    let (width, height) = state.viewport();
    tree.push(ViewNode::Panel(PanelNode {
        rect: Rect::from_size(width, height),
        color: BACKGROUND,
        alpha: 255,
        outline: None,
    }));
    match state.mounted() {
        MountedScreen::Prompt(prompt) => build_prompt(&mut tree, state, prompt),
        MountedScreen::Success(success) => build_success(&mut tree, state, success),
    }
    tree
}

fn build_prompt(tree: &mut ViewTree<CardAction>, state: &CardState, prompt: &PromptScreen) {
    let (width, height) = state.viewport();
    let elapsed = state.screen_elapsed();
    let Some(layout) = prompt_layout(width, height) else {
        // Too small for the card; the burst still shows where it was clicked.
        for frame in prompt.burst.frames_at(state.clock()) {
            push_heart(tree, frame, HEART_RED);
        }
        return;
    };

    let entrance = ease_out(progress(elapsed, ENTRANCE));
    let rise = lerp(20.0, 0.0, entrance).round() as i32;
    let card_alpha = alpha_u8(entrance);
    tree.push(ViewNode::Panel(PanelNode {
        rect: layout.card.translated(0, rise),
        color: CARD_FILL,
        alpha: card_alpha,
        outline: Some(CARD_OUTLINE),
    }));

    let bob = keyframes(decorative(state, BOB, elapsed), &[0.0, -10.0, 0.0], ease_in_out);
    tree.push(ViewNode::Heart(HeartNode {
        center: (
            layout.character_center.0 as f32,
            layout.character_center.1 as f32 + bob + rise as f32,
        ),
        size: CHARACTER_SIZE,
        rotation_deg: 0.0,
        color: HEART_RED,
        alpha: card_alpha,
    }));

    let title_scale = fit_scale(PROMPT_TITLE, layout.card.shrunk(CARD_PADDING).w);
    let pulse = keyframes(decorative(state, PULSE, elapsed), &[1.0, 0.75, 1.0], ease_in_out);
    push_text_centered(
        tree,
        layout.card.x + layout.card.w / 2,
        layout.title_y.saturating_add_signed(rise),
        PROMPT_TITLE,
        title_scale,
        TEXT_DARK,
        alpha_u8(entrance * pulse),
    );

    push_button(
        tree,
        UI_YES,
        layout.yes.translated(0, rise),
        YES_LABEL,
        (HEART_RED, TEXT_LIGHT),
        Some(CardAction::Confirm),
        None,
    );

    let (dx, dy) = prompt.dodge.visual_offset();
    // The wiggle only plays while the button is at rest.
    let wiggle = match prompt.dodge.phase() {
        DodgePhase::Idle => keyframes(
            decorative(state, WIGGLE, elapsed),
            &[0.0, -5.0, 5.0, -5.0, 0.0],
            linear,
        ),
        DodgePhase::Dodging => 0.0,
    };
    let no = layout
        .no
        .translated((dx + wiggle).round() as i32, dy.round() as i32 + rise);
    push_button(
        tree,
        UI_NO,
        no,
        NO_LABEL,
        (NO_FILL, NO_TEXT),
        None,
        Some(CardAction::Dodge),
    );

    if prompt.dodge.tooltip_visible() {
        let scale = 2;
        let tip_w = text_width(TOOLTIP_TEXT, scale) + 16;
        let tip_h = text_height(TOOLTIP_TEXT, scale) + 12;
        let tip = Rect::new(
            (no.x + no.w / 2).saturating_sub(tip_w / 2),
            no.y.saturating_sub(tip_h + 8),
            tip_w,
            tip_h,
        );
        tree.push(ViewNode::Panel(PanelNode {
            rect: tip,
            color: TOOLTIP_FILL,
            alpha: 230,
            outline: None,
        }));
        push_text_centered(tree, tip.x + tip.w / 2, tip.y + 6, TOOLTIP_TEXT, scale, TEXT_LIGHT, 255);
    }

    for frame in prompt.burst.frames_at(state.clock()) {
        push_heart(tree, frame, HEART_RED);
    }
}

fn build_success(tree: &mut ViewTree<CardAction>, state: &CardState, success: &SuccessScreen) {
    let (width, height) = state.viewport();
    let elapsed = state.screen_elapsed();
    let fade = linear(progress(elapsed, SUCCESS_FADE));

    for mut frame in success.rain.frames_at(elapsed, state.viewport()) {
        frame.alpha = 0.7 * fade;
        push_heart(tree, frame, HEART_PINK);
    }

    let viewport = Rect::from_size(width, height);
    let avail = Size::new(
        width.saturating_sub(CARD_MARGIN * 2),
        height.saturating_sub(CARD_MARGIN * 2),
    );
    let full = viewport.place(SUCCESS_CARD_MAX.clamp_max(avail), Anchor::Center);
    let pop = lerp(0.6, 1.0, spring_response(elapsed, 200.0, 20.0)).max(0.0);
    let card = viewport.place(
        Size::new(
            (full.w as f32 * pop).round() as u32,
            (full.h as f32 * pop).round() as u32,
        ),
        Anchor::Center,
    );
    if card.is_empty() {
        return;
    }
    let card_alpha = alpha_u8(fade);
    tree.push(ViewNode::Panel(PanelNode {
        rect: card,
        color: CARD_FILL,
        alpha: card_alpha,
        outline: Some(CARD_OUTLINE),
    }));

    let (top, rest) = card.take_top(card.h * 2 / 5);
    let center_x = card.x + card.w / 2;
    let bob = keyframes(decorative(state, BOB, elapsed), &[0.0, -10.0, 0.0], ease_in_out);
    let (cx, cy) = top.center();
    tree.push(ViewNode::Heart(HeartNode {
        center: (cx, cy + bob),
        size: CHARACTER_SIZE * pop,
        rotation_deg: 0.0,
        color: HEART_RED,
        alpha: card_alpha,
    }));
    for (i, side) in [-1.0f32, 1.0].into_iter().enumerate() {
        let phase = decorative(state, BOB.with_delay(Duration::from_millis(500 * i as u64 + 250)), elapsed);
        let side_bob = keyframes(phase, &[0.0, -10.0, 0.0], ease_in_out);
        tree.push(ViewNode::Heart(HeartNode {
            center: (cx + side * CHARACTER_SIZE * 1.25, cy + 8.0 + side_bob),
            size: CHARACTER_SIZE * 0.45,
            rotation_deg: side * 15.0,
            color: HEART_PINK,
            alpha: card_alpha,
        }));
    }

    let text_w = rest.shrunk(CARD_PADDING).w;
    let headline_scale = fit_scale(SUCCESS_HEADLINE, text_w).min(2);
    let headline = wrap_text(SUCCESS_HEADLINE, headline_scale, text_w);
    push_text_centered(tree, center_x, rest.y + 8, &headline, headline_scale, TEXT_DARK, card_alpha);

    let message_scale = fit_scale(SUCCESS_MESSAGE, text_w).min(2);
    let message = wrap_text(SUCCESS_MESSAGE, message_scale, text_w);
    let message_y = rest.y + 8 + text_height(&headline, headline_scale) + 16;
    push_text_centered(tree, center_x, message_y, &message, message_scale, TEXT_DARK, card_alpha);

    let base_y = (card.y + card.h) as f32 - 20.0;
    for i in 0..LOVE_PARTICLES {
        let animation = Loop::new(Duration::from_secs(3)).with_delay(Duration::from_millis(300 * i as u64));
        let phase = decorative(state, animation, elapsed);
        let rise = keyframes(phase, &[0.0, -100.0, -200.0], linear);
        let alpha = keyframes(phase, &[0.0, 1.0, 0.0], linear);
        let x = card.x as f32 + card.w as f32 * (i as f32 + 1.0) / (LOVE_PARTICLES as f32 + 1.0);
        push_heart(
            tree,
            ParticleFrame {
                id: i as u64,
                center: (x, base_y + rise),
                size: 14.0,
                rotation_deg: 0.0,
                alpha: alpha * fade,
            },
            HEART_RED,
        );
    }
}

/// Where the confirm button sits in `state`'s current frame, if it is on screen.
pub fn yes_button_center(state: &CardState) -> Option<(f32, f32)> {
    build_scene(state).button(UI_YES).map(|b| b.rect.center())
}

pub fn no_button_rect(state: &CardState) -> Option<Rect> {
    build_scene(state).button(UI_NO).map(|b| b.rect)
}
