//! Screen-space layout: an unsigned `Rect` that can be shrunk, split and used to place children.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_size(w: u32, h: u32) -> Self {
        Self { x: 0, y: 0, w, h }
    }

    pub fn size(&self) -> Size {
        Size {
            w: self.w,
            h: self.h,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x
            && px < self.x.saturating_add(self.w)
            && py >= self.y
            && py < self.y.saturating_add(self.h)
    }

    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.w as f32 / 2.0,
            self.y as f32 + self.h as f32 / 2.0,
        )
    }

    /// Moves the rect by a signed offset. The origin saturates at 0 on the top/left edges.
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add_signed(dx),
            y: self.y.saturating_add_signed(dy),
            w: self.w,
            h: self.h,
        }
    }

    /// Pulls every edge in by `pad`; a rect thinner than `2 * pad` collapses to zero size.
    pub fn shrunk(&self, pad: u32) -> Self {
        Self {
            x: self.x.saturating_add(pad),
            y: self.y.saturating_add(pad),
            w: self.w.saturating_sub(pad.saturating_mul(2)),
            h: self.h.saturating_sub(pad.saturating_mul(2)),
        }
    }

    /// Places a child of `size` inside this rect, vertically centred and
    /// aligned horizontally per `anchor`. The child never exceeds the parent.
    pub fn place(&self, size: Size, anchor: Anchor) -> Self {
        let w = size.w.min(self.w);
        let h = size.h.min(self.h);
        let slack = self.w - w;
        let x = self.x
            + match anchor {
                Anchor::CenterLeft => 0,
                Anchor::Center => slack / 2,
                Anchor::CenterRight => slack,
            };
        let y = self.y + (self.h - h) / 2;
        Self { x, y, w, h }
    }

    /// Splits off a band of height `h` from the top, returning `(band, rest)`.
    pub fn take_top(&self, h: u32) -> (Self, Self) {
        let h = h.min(self.h);
        let band = Self::new(self.x, self.y, self.w, h);
        let rest = Self::new(self.x, self.y.saturating_add(h), self.w, self.h - h);
        (band, rest)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    pub fn clamp_max(self, max: Size) -> Self {
        Self {
            w: self.w.min(max.w),
            h: self.h.min(max.h),
        }
    }
}

/// Horizontal alignment for [`Rect::place`]; placement is always vertically centred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    CenterLeft,
    Center,
    CenterRight,
}
