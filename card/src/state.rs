use std::time::Duration;

use fastrand::Rng;

use crate::dodge::{DodgeOffset, EvasiveButton, TOOLTIP_DURATION};
use crate::particles::{BurstEmitter, RainEmitter};
use crate::scheduler::{ScopeId, Scheduler};
use crate::screen::{Screen, ScreenController};

/// Delay between the confirm click and the screen swap.
pub const ACCEPT_DELAY: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardTask {
    HideTooltip,
    Accept,
}

#[derive(Debug, Clone)]
pub struct PromptScreen {
    pub scope: ScopeId,
    pub mounted_at: Duration,
    pub dodge: EvasiveButton,
    pub burst: BurstEmitter,
}

#[derive(Debug, Clone)]
pub struct SuccessScreen {
    pub scope: ScopeId,
    pub mounted_at: Duration,
    pub rain: RainEmitter,
}

/// Whichever screen is currently mounted, with the state it owns.
#[derive(Debug, Clone)]
pub enum MountedScreen {
    Prompt(PromptScreen),
    Success(SuccessScreen),
}

impl MountedScreen {
    pub fn scope(&self) -> ScopeId {
        match self {
            MountedScreen::Prompt(prompt) => prompt.scope,
            MountedScreen::Success(success) => success.scope,
        }
    }

    pub fn mounted_at(&self) -> Duration {
        match self {
            MountedScreen::Prompt(prompt) => prompt.mounted_at,
            MountedScreen::Success(success) => success.mounted_at,
        }
    }
}

/// Everything the card knows, owned in one place and advanced by the card clock.
#[derive(Debug, Clone)]
pub struct CardState {
    clock: Duration,
    screen: ScreenController,
    mounted: MountedScreen,
    scheduler: Scheduler<CardTask>,
    rng: Rng,
    next_scope: u64,
    viewport: (u32, u32),
    reduce_motion: bool,
}

impl CardState {
    pub fn new(seed: u64, viewport: (u32, u32), reduce_motion: bool) -> Self {
        Self {
            clock: Duration::ZERO,
            screen: ScreenController::new(),
            mounted: MountedScreen::Prompt(PromptScreen {
                scope: ScopeId(0),
                mounted_at: Duration::ZERO,
                dodge: EvasiveButton::new(),
                burst: BurstEmitter::new(),
            }),
            scheduler: Scheduler::new(),
            rng: Rng::with_seed(seed),
            next_scope: 1,
            viewport,
            reduce_motion,
        }
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn screen(&self) -> Screen {
        self.screen.screen()
    }

    pub fn accepted(&self) -> bool {
        self.screen.accepted()
    }

    pub fn mounted(&self) -> &MountedScreen {
        &self.mounted
    }

    pub fn prompt(&self) -> Option<&PromptScreen> {
        match &self.mounted {
            MountedScreen::Prompt(prompt) => Some(prompt),
            MountedScreen::Success(_) => None,
        }
    }

    pub fn success(&self) -> Option<&SuccessScreen> {
        match &self.mounted {
            MountedScreen::Success(success) => Some(success),
            MountedScreen::Prompt(_) => None,
        }
    }

    /// Time since the current screen mounted.
    pub fn screen_elapsed(&self) -> Duration {
        self.clock.saturating_sub(self.mounted.mounted_at())
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn reduce_motion(&self) -> bool {
        self.reduce_motion
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width.max(1), height.max(1));
    }

    /// Pointer-enter or touch-start on the evasive button. Ignored once the prompt is gone.
    pub fn trigger_dodge(&mut self) -> Option<DodgeOffset> {
        let MountedScreen::Prompt(prompt) = &mut self.mounted else {
            return None;
        };
        let offset = prompt.dodge.trigger(&mut self.rng);
        self.scheduler
            .schedule(self.clock, TOOLTIP_DURATION, prompt.scope, CardTask::HideTooltip);
        tracing::debug!(x = offset.x, y = offset.y, "no button dodged");
        Some(offset)
    }

    /// Confirm click at screen point `(x, y)`: bursts hearts there and schedules the swap.
    pub fn confirm_click(&mut self, x: f32, y: f32) -> bool {
        let MountedScreen::Prompt(prompt) = &mut self.mounted else {
            return false;
        };
        prompt.burst.emit((x, y), self.clock);
        self.scheduler
            .schedule(self.clock, ACCEPT_DELAY, prompt.scope, CardTask::Accept);
        tracing::info!(x, y, "confirm clicked");
        true
    }

    /// Moves the card clock forward by `dt`, settling animations and firing due timers.
    pub fn advance(&mut self, dt: Duration) {
        self.clock = self.clock.saturating_add(dt);

        if let MountedScreen::Prompt(prompt) = &mut self.mounted {
            prompt.dodge.step_motion(dt);
            // A confirm unmounts the prompt at ACCEPT_DELAY, before its burst runs out, so this
            // only drains bursts on a prompt that outlives them.
            for id in prompt.burst.finished(self.clock) {
                prompt.burst.on_animation_complete(id);
            }
        }

        let live = self.mounted.scope();
        for task in self.scheduler.advance(self.clock, |scope| scope == live) {
            self.run_task(task);
        }
    }

    fn run_task(&mut self, task: CardTask) {
        match task {
            CardTask::HideTooltip => {
                if let MountedScreen::Prompt(prompt) = &mut self.mounted {
                    prompt.dodge.hide_tooltip();
                }
            }
            CardTask::Accept => {
                if self.screen.accept() {
                    self.mount_success();
                }
            }
        }
    }

    fn mount_success(&mut self) {
        let scope = ScopeId(self.next_scope);
        self.next_scope += 1;
        let rain = RainEmitter::mount(&mut self.rng);
        self.mounted = MountedScreen::Success(SuccessScreen {
            scope,
            mounted_at: self.clock,
            rain,
        });
        tracing::info!(scope = scope.0, "success screen mounted");
    }
}
