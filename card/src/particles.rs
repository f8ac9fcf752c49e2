//! Transient heart particles: the radial burst fired by the confirm click and the rain that
//! loops over the success screen.

use std::collections::BTreeMap;
use std::f32::consts::TAU;
use std::time::Duration;

use fastrand::Rng;
use serde::{Deserialize, Serialize};

use crate::motion::{Loop, ease_out, lerp, progress};

pub const BURST_COUNT: usize = 12;
pub const BURST_DISTANCE: f32 = 150.0;
pub const BURST_DURATION: Duration = Duration::from_secs(1);
pub const BURST_HEART_SIZE: f32 = 36.0;
const BURST_MAX_SCALE: f32 = 1.5;

pub const RAIN_COUNT: usize = 25;
const RAIN_SWAY: f32 = 30.0;
const RAIN_START_Y: f32 = -50.0;
const RAIN_OVERSHOOT: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurstItem {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub index: usize,
    pub count: usize,
    pub started_at: Duration,
}

impl BurstItem {
    /// Unit vector this item flies along.
    pub fn direction(&self) -> (f32, f32) {
        let angle = TAU * self.index as f32 / self.count as f32;
        (angle.cos(), angle.sin())
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        now.saturating_sub(self.started_at) >= BURST_DURATION
    }
}

/// Interpolated look of a particle at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleFrame {
    pub id: u64,
    pub center: (f32, f32),
    pub size: f32,
    pub rotation_deg: f32,
    pub alpha: f32,
}

/// The click burst. Items live in a map keyed by id so they can retire in any order.
#[derive(Debug, Clone, Default)]
pub struct BurstEmitter {
    items: BTreeMap<u64, BurstItem>,
    next_id: u64,
}

impl BurstEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = &BurstItem> {
        self.items.values()
    }

    /// Replaces the active set with `BURST_COUNT` fresh items at `origin`. Returns their ids.
    pub fn emit(&mut self, origin: (f32, f32), now: Duration) -> Vec<u64> {
        self.items.clear();
        (0..BURST_COUNT)
            .map(|index| {
                let id = self.next_id;
                self.next_id += 1;
                self.items.insert(
                    id,
                    BurstItem {
                        id,
                        x: origin.0,
                        y: origin.1,
                        index,
                        count: BURST_COUNT,
                        started_at: now,
                    },
                );
                id
            })
            .collect()
    }

    /// Ids whose animation has run its course by `now` but that are still in the set.
    pub fn finished(&self, now: Duration) -> Vec<u64> {
        self.items
            .values()
            .filter(|item| item.is_finished(now))
            .map(|item| item.id)
            .collect()
    }

    /// Completion notification for one item. Unknown ids (already removed, or from a replaced
    /// batch) are ignored; returns whether anything was removed.
    pub fn on_animation_complete(&mut self, id: u64) -> bool {
        self.items.remove(&id).is_some()
    }

    pub fn frames_at(&self, now: Duration) -> Vec<ParticleFrame> {
        self.items
            .values()
            .map(|item| {
                let t = ease_out(progress(now.saturating_sub(item.started_at), BURST_DURATION));
                let (dx, dy) = item.direction();
                ParticleFrame {
                    id: item.id,
                    center: (
                        item.x + dx * BURST_DISTANCE * t,
                        item.y + dy * BURST_DISTANCE * t,
                    ),
                    size: BURST_HEART_SIZE * lerp(0.0, BURST_MAX_SCALE, t),
                    rotation_deg: 0.0,
                    alpha: 1.0 - t,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RainItem {
    pub id: u64,
    /// Horizontal position as a percentage of the viewport width.
    pub left: f32,
    /// Seconds before the first fall.
    pub delay: f32,
    /// Seconds per fall.
    pub duration: f32,
    pub size: f32,
    pub rotation: f32,
}

impl RainItem {
    fn animation(&self) -> Loop {
        Loop::new(Duration::from_secs_f32(self.duration))
            .with_delay(Duration::from_secs_f32(self.delay))
    }

    pub fn frame_at(&self, elapsed: Duration, viewport: (u32, u32)) -> ParticleFrame {
        let phase = self.animation().phase(elapsed);
        let (width, height) = (viewport.0 as f32, viewport.1 as f32);
        let sway = (self.id as f32).sin() * RAIN_SWAY;
        ParticleFrame {
            id: self.id,
            center: (
                width * self.left / 100.0 + sway * phase,
                RAIN_START_Y + (height + RAIN_OVERSHOOT) * phase,
            ),
            size: self.size,
            rotation_deg: self.rotation + 360.0 * phase,
            alpha: 1.0,
        }
    }
}

/// Draws from `[lo, hi)`; redraws the rare sample that rounds up onto `hi`.
fn uniform(rng: &mut Rng, lo: f32, hi: f32) -> f32 {
    loop {
        let v = lo + (hi - lo) * rng.f32();
        if v < hi {
            return v;
        }
    }
}

/// The success-screen rain. The set is fixed at mount.
#[derive(Debug, Clone, Default)]
pub struct RainEmitter {
    items: Vec<RainItem>,
}

impl RainEmitter {
    pub fn mount(rng: &mut Rng) -> Self {
        let items = (0..RAIN_COUNT as u64)
            .map(|id| RainItem {
                id,
                left: uniform(rng, 0.0, 100.0),
                delay: uniform(rng, 0.0, 3.0),
                duration: uniform(rng, 3.0, 5.0),
                size: uniform(rng, 20.0, 45.0),
                rotation: uniform(rng, 0.0, 360.0),
            })
            .collect();
        tracing::debug!(count = RAIN_COUNT, "rain mounted");
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[RainItem] {
        &self.items
    }

    pub fn frames_at(&self, elapsed: Duration, viewport: (u32, u32)) -> Vec<ParticleFrame> {
        self.items
            .iter()
            .map(|item| item.frame_at(elapsed, viewport))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn burst_creates_twelve_items_at_the_origin() {
        let mut burst = BurstEmitter::new();
        let ids = burst.emit((100.0, 200.0), ms(0));
        assert_eq!(ids.len(), BURST_COUNT);
        assert!(burst.items().all(|i| i.x == 100.0 && i.y == 200.0));

        let frames = burst.frames_at(ms(0));
        assert!(frames.iter().all(|f| f.center == (100.0, 200.0) && f.size == 0.0));
        assert!(frames.iter().all(|f| f.alpha == 1.0));
    }

    #[test]
    fn burst_items_end_on_the_ring() {
        let mut burst = BurstEmitter::new();
        burst.emit((0.0, 0.0), ms(0));
        for frame in burst.frames_at(BURST_DURATION) {
            let (x, y) = frame.center;
            assert!(((x * x + y * y).sqrt() - BURST_DISTANCE).abs() < 1e-3);
            assert!(frame.alpha.abs() < 1e-6);
            assert!((frame.size - BURST_HEART_SIZE * 1.5).abs() < 1e-3);
        }
        let first = burst.items().next().map(|i| i.direction());
        assert_eq!(first, Some((1.0, 0.0)));
    }

    #[test]
    fn burst_drains_by_id_in_any_order() {
        let mut burst = BurstEmitter::new();
        let mut ids = burst.emit((100.0, 200.0), ms(0));
        ids.reverse();
        ids.swap(2, 9);
        for (n, id) in ids.iter().enumerate() {
            assert!(burst.on_animation_complete(*id));
            assert!(!burst.on_animation_complete(*id));
            assert_eq!(burst.len(), BURST_COUNT - n - 1);
        }
        assert!(burst.is_empty());
    }

    #[test]
    fn second_emit_replaces_the_batch_with_fresh_ids() {
        let mut burst = BurstEmitter::new();
        let first = burst.emit((0.0, 0.0), ms(0));
        let second = burst.emit((10.0, 10.0), ms(300));
        assert_eq!(burst.len(), BURST_COUNT);
        assert!(first.iter().all(|id| !second.contains(id)));
        assert!(!burst.on_animation_complete(first[0]));
    }

    #[test]
    fn finished_lists_items_past_their_duration() {
        let mut burst = BurstEmitter::new();
        burst.emit((0.0, 0.0), ms(0));
        assert!(burst.finished(ms(999)).is_empty());
        assert_eq!(burst.finished(ms(1000)).len(), BURST_COUNT);
    }

    #[test]
    fn rain_parameters_stay_in_range() {
        for seed in 0..50 {
            let mut rng = Rng::with_seed(seed);
            let rain = RainEmitter::mount(&mut rng);
            assert_eq!(rain.len(), RAIN_COUNT);
            for item in rain.items() {
                assert!((0.0..100.0).contains(&item.left));
                assert!((0.0..3.0).contains(&item.delay));
                assert!((3.0..5.0).contains(&item.duration));
                assert!((20.0..45.0).contains(&item.size));
                assert!((0.0..360.0).contains(&item.rotation));
            }
        }
    }

    #[test]
    fn rain_rests_before_its_delay_then_falls() {
        let item = RainItem {
            id: 0,
            left: 50.0,
            delay: 1.0,
            duration: 4.0,
            size: 30.0,
            rotation: 10.0,
        };
        let rest = item.frame_at(ms(500), (800, 600));
        assert_eq!(rest.center, (400.0, RAIN_START_Y));
        assert_eq!(rest.rotation_deg, 10.0);

        let mid = item.frame_at(ms(3000), (800, 600));
        assert!((mid.center.1 - (RAIN_START_Y + 350.0)).abs() < 1e-3);
        assert!((mid.rotation_deg - 190.0).abs() < 1e-3);

        // Loops back to the top.
        let again = item.frame_at(ms(5000), (800, 600));
        assert!((again.center.1 - RAIN_START_Y).abs() < 1e-3);
    }
}
