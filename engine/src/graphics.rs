use crate::{surface::SurfaceSize, ui::Rect};

pub type Color = [u8; 4];

// A tiny 3x5 block font, scaled by whole pixels.
const GLYPH_W: u32 = 3;
const GLYPH_H: u32 = 5;

pub fn glyph_advance_x(scale: u32) -> u32 {
    (GLYPH_W + 1) * scale.max(1)
}

pub fn line_advance_y(scale: u32) -> u32 {
    (GLYPH_H + 1) * scale.max(1)
}

/// Pixel width of the widest line of `text` at `scale`, without the trailing gap.
pub fn text_width(text: &str, scale: u32) -> u32 {
    text.lines()
        .map(|line| {
            let n = line.chars().count() as u32;
            (n * glyph_advance_x(scale)).saturating_sub(scale.max(1))
        })
        .max()
        .unwrap_or(0)
}

pub fn text_height(text: &str, scale: u32) -> u32 {
    let lines = text.lines().count().max(1) as u32;
    (lines * line_advance_y(scale)).saturating_sub(scale.max(1))
}

/// Unified 2D rendering interface.
///
/// Card code only talks to this trait. Backends implement the two rect primitives; text and
/// outlines are built on top of them.
pub trait Renderer2d {
    fn begin_frame(&mut self, size: SurfaceSize);
    fn size(&self) -> SurfaceSize;

    /// Opaque fill.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Alpha-blended rect over existing content (alpha is applied to `color`'s RGB).
    fn blend_rect(&mut self, rect: Rect, color: Color, alpha: u8);

    fn rect_outline(&mut self, rect: Rect, color: Color) {
        if rect.is_empty() {
            return;
        }
        self.fill_rect(Rect::new(rect.x, rect.y, rect.w, 1), color);
        if rect.h > 1 {
            self.fill_rect(
                Rect::new(rect.x, rect.y.saturating_add(rect.h - 1), rect.w, 1),
                color,
            );
        }
        self.fill_rect(Rect::new(rect.x, rect.y, 1, rect.h), color);
        if rect.w > 1 {
            self.fill_rect(
                Rect::new(rect.x.saturating_add(rect.w - 1), rect.y, 1, rect.h),
                color,
            );
        }
    }

    fn draw_text_blended(&mut self, x: u32, y: u32, text: &str, color: Color, scale: u32, alpha: u8) {
        if alpha == 0 {
            return;
        }
        let scale = scale.max(1);
        let adv_x = glyph_advance_x(scale);
        let adv_y = line_advance_y(scale);

        let mut cursor_x = x;
        let mut cursor_y = y;
        for ch in text.chars() {
            match ch {
                '\n' => {
                    cursor_x = x;
                    cursor_y = cursor_y.saturating_add(adv_y);
                    continue;
                }
                ' ' => {
                    cursor_x = cursor_x.saturating_add(adv_x);
                    continue;
                }
                _ => {}
            }

            for (row, bits) in glyph_rows(ch).into_iter().enumerate() {
                let py = cursor_y.saturating_add(row as u32 * scale);
                for col in 0..GLYPH_W {
                    if bits & (1u8 << (GLYPH_W - 1 - col)) == 0 {
                        continue;
                    }
                    let px = cursor_x.saturating_add(col * scale);
                    self.blend_rect(Rect::new(px, py, scale, scale), color, alpha);
                }
            }
            cursor_x = cursor_x.saturating_add(adv_x);
        }
    }

    fn draw_text_scaled(&mut self, x: u32, y: u32, text: &str, color: Color, scale: u32) {
        self.draw_text_blended(x, y, text, color, scale, 255);
    }

    fn clear(&mut self, color: Color) {
        let s = self.size();
        self.fill_rect(Rect::from_size(s.width, s.height), color);
    }
}

/// A heart centred on `(cx, cy)`, `size` pixels across, rotated clockwise by `rotation_deg`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartShape {
    pub cx: f32,
    pub cy: f32,
    pub size: f32,
    pub rotation_deg: f32,
}

// The implicit curve (x^2 + y^2 - 1)^3 - x^2 y^3 = 0 spans x in [-1.14, 1.14] and
// y in [-1.0, 1.24]; these recentre and scale it to `size`.
const HEART_EXTENT: f32 = 2.3;
const HEART_Y_SHIFT: f32 = 0.118;
const HEART_RADIUS: f32 = 1.6;

fn heart_contains(x: f32, y: f32) -> bool {
    let a = x * x + y * y - 1.0;
    a * a * a - x * x * y * y * y <= 0.0
}

/// Rasterizes a heart as horizontal runs of `blend_rect`, clipped to the surface.
pub fn fill_heart(r: &mut dyn Renderer2d, heart: HeartShape, color: Color, alpha: u8) {
    if alpha == 0 || !(heart.size > 0.0) {
        return;
    }
    let size = r.size();
    let s = heart.size / HEART_EXTENT;
    let radius = HEART_RADIUS * s;
    let (sin, cos) = heart.rotation_deg.to_radians().sin_cos();

    let y0 = (heart.cy - radius).floor().max(0.0) as u32;
    let y1 = ((heart.cy + radius).ceil().max(0.0) as u32).min(size.height);
    let x0 = (heart.cx - radius).floor().max(0.0) as u32;
    let x1 = ((heart.cx + radius).ceil().max(0.0) as u32).min(size.width);

    for py in y0..y1 {
        let dy = (py as f32 + 0.5 - heart.cy) / s;
        let mut run_start: Option<u32> = None;
        for px in x0..=x1 {
            let inside = px < x1 && {
                let dx = (px as f32 + 0.5 - heart.cx) / s;
                // Undo the clockwise screen rotation, then flip y so the lobes sit on top.
                let u = dx * cos + dy * sin;
                let w = -dx * sin + dy * cos;
                heart_contains(u, -w + HEART_Y_SHIFT)
            };
            match (inside, run_start) {
                (true, None) => run_start = Some(px),
                (false, Some(start)) => {
                    r.blend_rect(Rect::new(start, py, px - start, 1), color, alpha);
                    run_start = None;
                }
                _ => {}
            }
        }
    }
}

/// CPU renderer that draws into an RGBA frame buffer.
pub struct CpuRenderer<'a> {
    frame: &'a mut [u8],
    size: SurfaceSize,
}

impl<'a> CpuRenderer<'a> {
    pub fn new(frame: &'a mut [u8], size: SurfaceSize) -> Self {
        Self { frame, size }
    }

    fn for_each_pixel(&mut self, rect: Rect, mut f: impl FnMut(&mut [u8])) {
        if self.frame.len() < self.size.rgba_len() || self.size.is_empty() {
            return;
        }
        let x1 = rect.x.saturating_add(rect.w).min(self.size.width) as usize;
        let y1 = rect.y.saturating_add(rect.h).min(self.size.height) as usize;
        let x0 = rect.x as usize;
        let y0 = rect.y as usize;
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let stride = self.size.width as usize * 4;
        for y in y0..y1 {
            let row = &mut self.frame[y * stride + x0 * 4..y * stride + x1 * 4];
            for px in row.chunks_exact_mut(4) {
                f(px);
            }
        }
    }
}

impl Renderer2d for CpuRenderer<'_> {
    fn begin_frame(&mut self, size: SurfaceSize) {
        self.size = size;
    }

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.for_each_pixel(rect, |px| px.copy_from_slice(&color));
    }

    fn blend_rect(&mut self, rect: Rect, color: Color, alpha: u8) {
        match alpha {
            0 => {}
            255 => self.fill_rect(rect, color),
            _ => {
                let a = alpha as u32;
                let inv = 255 - a;
                self.for_each_pixel(rect, |px| {
                    for c in 0..3 {
                        px[c] = ((px[c] as u32 * inv + color[c] as u32 * a + 127) / 255) as u8;
                    }
                    px[3] = 255;
                });
            }
        }
    }
}

fn glyph_rows(ch: char) -> [u8; GLYPH_H as usize] {
    match ch.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],

        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b111, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b110, 0b100, 0b110, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b101, 0b111, 0b111, 0b111, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'R' => [0b111, 0b101, 0b111, 0b110, 0b101],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],

        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '?' => [0b111, 0b001, 0b010, 0b000, 0b010],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        _ => [0b111, 0b001, 0b010, 0b000, 0b010], // '?'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * width + x) * 4) as usize;
        [frame[i], frame[i + 1], frame[i + 2], frame[i + 3]]
    }

    #[test]
    fn fill_rect_clips_to_surface() {
        let size = SurfaceSize::new(4, 4);
        let mut frame = vec![0u8; size.rgba_len()];
        let mut gfx = CpuRenderer::new(&mut frame, size);
        gfx.fill_rect(Rect::new(2, 2, 10, 10), [9, 8, 7, 255]);

        assert_eq!(px(&frame, 4, 3, 3), [9, 8, 7, 255]);
        assert_eq!(px(&frame, 4, 1, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn blend_rect_mixes_half_alpha() {
        let size = SurfaceSize::new(1, 1);
        let mut frame = vec![0, 0, 0, 255];
        let mut gfx = CpuRenderer::new(&mut frame, size);
        gfx.blend_rect(Rect::from_size(1, 1), [200, 100, 0, 255], 128);
        assert_eq!(px(&frame, 1, 0, 0), [100, 50, 0, 255]);
    }

    #[test]
    fn text_width_matches_glyph_advance() {
        assert_eq!(text_width("AB", 2), 2 * glyph_advance_x(2) - 2);
        assert_eq!(text_width("", 2), 0);
        assert_eq!(text_width("A\nABC", 1), 3 * glyph_advance_x(1) - 1);
    }

    #[test]
    fn heart_fills_its_centre_and_leaves_the_notch_open() {
        let size = SurfaceSize::new(100, 100);
        let mut frame = vec![0u8; size.rgba_len()];
        let mut gfx = CpuRenderer::new(&mut frame, size);
        let color = [255, 0, 128, 255];
        fill_heart(
            &mut gfx,
            HeartShape {
                cx: 50.0,
                cy: 50.0,
                size: 80.0,
                rotation_deg: 0.0,
            },
            color,
            255,
        );

        assert_eq!(px(&frame, 100, 50, 50), color);
        // Top-centre notch between the two lobes.
        assert_eq!(px(&frame, 100, 50, 15), [0, 0, 0, 0]);
        // Corners stay empty.
        assert_eq!(px(&frame, 100, 12, 88), [0, 0, 0, 0]);
    }

    #[test]
    fn upside_down_heart_moves_the_notch_to_the_bottom() {
        let size = SurfaceSize::new(100, 100);
        let mut frame = vec![0u8; size.rgba_len()];
        let mut gfx = CpuRenderer::new(&mut frame, size);
        let color = [255, 0, 128, 255];
        fill_heart(
            &mut gfx,
            HeartShape {
                cx: 50.0,
                cy: 50.0,
                size: 80.0,
                rotation_deg: 180.0,
            },
            color,
            255,
        );

        assert_eq!(px(&frame, 100, 50, 85), [0, 0, 0, 0]);
        assert_eq!(px(&frame, 100, 50, 50), color);
    }

    #[test]
    fn heart_partially_off_screen_does_not_panic() {
        let size = SurfaceSize::new(20, 20);
        let mut frame = vec![0u8; size.rgba_len()];
        let mut gfx = CpuRenderer::new(&mut frame, size);
        fill_heart(
            &mut gfx,
            HeartShape {
                cx: -5.0,
                cy: 25.0,
                size: 30.0,
                rotation_deg: 45.0,
            },
            [255, 255, 255, 255],
            200,
        );
    }
}
