//! The evasive "No" button.

use std::time::Duration;

use fastrand::Rng;
use serde::{Deserialize, Serialize};

use crate::motion::Spring;

pub const DODGE_DISTANCE: i32 = 150;

/// The only offsets the button ever takes after a trigger.
pub const DODGE_DIRECTIONS: [DodgeOffset; 6] = [
    DodgeOffset::new(DODGE_DISTANCE, 0),
    DodgeOffset::new(-DODGE_DISTANCE, 0),
    DodgeOffset::new(0, DODGE_DISTANCE),
    DodgeOffset::new(0, -DODGE_DISTANCE),
    DodgeOffset::new(DODGE_DISTANCE, DODGE_DISTANCE),
    DodgeOffset::new(-DODGE_DISTANCE, -DODGE_DISTANCE),
];

pub const TOOLTIP_DURATION: Duration = Duration::from_millis(1500);

const DODGE_STIFFNESS: f32 = 300.0;
const DODGE_DAMPING: f32 = 20.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DodgeOffset {
    pub x: i32,
    pub y: i32,
}

impl DodgeOffset {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DodgePhase {
    Idle,
    Dodging,
}

#[derive(Debug, Clone)]
pub struct EvasiveButton {
    offset: DodgeOffset,
    tooltip_visible: bool,
    triggers: u64,
    spring_x: Spring,
    spring_y: Spring,
}

impl Default for EvasiveButton {
    fn default() -> Self {
        Self {
            offset: DodgeOffset::default(),
            tooltip_visible: false,
            triggers: 0,
            spring_x: Spring::new(DODGE_STIFFNESS, DODGE_DAMPING),
            spring_y: Spring::new(DODGE_STIFFNESS, DODGE_DAMPING),
        }
    }
}

impl EvasiveButton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last chosen offset. It stays in place until the next trigger.
    pub fn offset(&self) -> DodgeOffset {
        self.offset
    }

    pub fn tooltip_visible(&self) -> bool {
        self.tooltip_visible
    }

    pub fn triggers(&self) -> u64 {
        self.triggers
    }

    /// `Dodging` while the button is still travelling to its last offset.
    pub fn phase(&self) -> DodgePhase {
        if self.spring_x.is_settled() && self.spring_y.is_settled() {
            DodgePhase::Idle
        } else {
            DodgePhase::Dodging
        }
    }

    /// Handles pointer-enter / touch-start: jumps to a uniformly chosen direction and shows the
    /// tooltip. The caller schedules the matching `hide_tooltip` after `TOOLTIP_DURATION`.
    pub fn trigger(&mut self, rng: &mut Rng) -> DodgeOffset {
        let direction = DODGE_DIRECTIONS[rng.usize(0..DODGE_DIRECTIONS.len())];
        self.offset = direction;
        self.tooltip_visible = true;
        self.triggers += 1;
        self.spring_x.set_target(direction.x as f32);
        self.spring_y.set_target(direction.y as f32);
        direction
    }

    pub fn hide_tooltip(&mut self) {
        self.tooltip_visible = false;
    }

    pub fn step_motion(&mut self, dt: Duration) {
        self.spring_x.step(dt);
        self.spring_y.step(dt);
    }

    /// Where the button is drawn right now, relative to its rest position.
    pub fn visual_offset(&self) -> (f32, f32) {
        (self.spring_x.value, self.spring_y.value)
    }
}
