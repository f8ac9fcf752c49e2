//! Interpolation helpers: easing curves, looping keyframes and springs.
//!
//! Everything except `Spring` is a pure function of elapsed time, so decorative motion needs no
//! state of its own.

use std::time::Duration;

// Integration step cap; keeps stiff springs stable on long frames.
const MAX_SPRING_STEP: f32 = 1.0 / 240.0;
const SPRING_REST_EPSILON: f32 = 0.01;

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Fraction of `duration` covered by `elapsed`, clamped to `[0, 1]`.
pub fn progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
}

/// An infinitely repeating animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Loop {
    pub duration: Duration,
    pub delay: Duration,
    pub repeat_delay: Duration,
}

impl Loop {
    pub const fn new(duration: Duration) -> Self {
        Self {
            duration,
            delay: Duration::ZERO,
            repeat_delay: Duration::ZERO,
        }
    }

    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub const fn with_repeat_delay(mut self, repeat_delay: Duration) -> Self {
        self.repeat_delay = repeat_delay;
        self
    }

    /// Phase in `[0, 1)` at `elapsed`. Before the delay, and during a repeat delay, the
    /// animation rests on its first keyframe (phase 0).
    pub fn phase(&self, elapsed: Duration) -> f32 {
        if elapsed < self.delay || self.duration.is_zero() {
            return 0.0;
        }
        let cycle = (self.duration + self.repeat_delay).as_secs_f64();
        let local = (elapsed - self.delay).as_secs_f64() % cycle;
        let duration = self.duration.as_secs_f64();
        if local >= duration {
            return 0.0;
        }
        (local / duration) as f32
    }
}

/// Evaluates evenly spaced keyframes at `phase`, easing each segment with `ease`.
pub fn keyframes(phase: f32, frames: &[f32], ease: fn(f32) -> f32) -> f32 {
    match frames {
        [] => 0.0,
        [only] => *only,
        _ => {
            let segments = (frames.len() - 1) as f32;
            let scaled = phase.clamp(0.0, 1.0) * segments;
            let i = (scaled.floor() as usize).min(frames.len() - 2);
            let t = ease(scaled - i as f32);
            lerp(frames[i], frames[i + 1], t)
        }
    }
}

/// Step response of a damped spring released from 0 towards 1 (mass 1), in closed form.
pub fn spring_response(elapsed: Duration, stiffness: f32, damping: f32) -> f32 {
    let t = elapsed.as_secs_f32();
    let omega = stiffness.max(f32::EPSILON).sqrt();
    let zeta = damping / (2.0 * omega);
    if zeta < 1.0 {
        let omega_d = omega * (1.0 - zeta * zeta).sqrt();
        let decay = (-zeta * omega * t).exp();
        1.0 - decay * ((omega_d * t).cos() + (zeta * omega / omega_d) * (omega_d * t).sin())
    } else {
        1.0 - (-omega * t).exp() * (1.0 + omega * t)
    }
}

/// A stateful spring chasing a moving target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
    pub value: f32,
    pub velocity: f32,
    pub target: f32,
}

impl Spring {
    pub const fn new(stiffness: f32, damping: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass: 1.0,
            value: 0.0,
            velocity: 0.0,
            target: 0.0,
        }
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < SPRING_REST_EPSILON
            && self.velocity.abs() < SPRING_REST_EPSILON
    }

    pub fn step(&mut self, dt: Duration) {
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            return;
        }
        let mut remaining = dt.as_secs_f32();
        while remaining > 0.0 {
            let h = remaining.min(MAX_SPRING_STEP);
            let force = -self.stiffness * (self.value - self.target) - self.damping * self.velocity;
            self.velocity += force / self.mass * h;
            self.value += self.velocity * h;
            remaining -= h;
        }
    }
}
