//! Route list auto-scroll.
//!
//! The upcoming-stops list is usually taller than its viewport. On a fixed
//! cadence (first pass after 10 s, then every 45 s) the list creeps down to
//! the bottom and then eases back to the top:
//!
//! ```text
//!  Idle --trigger--> Descending --reached max--> Returning --800ms--> Idle
//! ```
//!
//! A trigger that arrives while a pass is still running is dropped, so at
//! most one pass is ever active. A list that fits its viewport never scrolls.

use serde::{Deserialize, Serialize};

use super::easing::EaseOutCubic;
use crate::config::AnimationConfig;
use crate::traits::{Animator, CallbackHandle, Fired, FrameScheduler};

/// Auto-scroll timing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AutoScrollConfig {
    /// Delay from mount to the first pass.
    pub initial_delay_ms: u64,
    /// Period between later passes.
    pub cycle_ms: u64,
    /// Downward movement per frame while descending, in pixels.
    pub speed_px_per_frame: f32,
    /// Duration of the eased return to the top.
    pub return_duration_ms: u64,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 10_000,
            cycle_ms: 45_000,
            speed_px_per_frame: 0.3,
            return_duration_ms: 800,
        }
    }
}

impl AutoScrollConfig {
    /// Take the scroll settings from the animation config.
    pub fn from_config(config: &AnimationConfig) -> Self {
        Self {
            initial_delay_ms: config.scroll_initial_delay_ms,
            cycle_ms: config.scroll_cycle_ms,
            speed_px_per_frame: config.scroll_speed_px,
            return_duration_ms: config.scroll_return_ms,
        }
    }
}

/// Where the scroller is within a pass.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum ScrollPhase {
    /// No pass in progress.
    #[default]
    Idle,
    /// Creeping towards the bottom.
    Descending,
    /// Easing back to the top.
    Returning {
        /// Frame time at which the return started.
        started_ms: u64,
        /// Position the return started from.
        from: f32,
    },
}

/// Outcome of a pass trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassTrigger {
    /// A new pass started.
    Started,
    /// A pass was already running; the trigger was dropped.
    Busy,
    /// The content fits the viewport; nothing to scroll.
    NothingToScroll,
}

/// Vertical auto-scroll state machine.
#[derive(Debug)]
pub struct AutoScrollAnimator {
    config: AutoScrollConfig,
    easing: EaseOutCubic,
    content_height: f32,
    viewport_height: f32,
    position: f32,
    phase: ScrollPhase,
    initial_timer: Option<CallbackHandle>,
    cycle_timer: Option<CallbackHandle>,
    frame: Option<CallbackHandle>,
    passes_completed: u32,
}

impl AutoScrollAnimator {
    /// New idle scroller.
    pub fn new(config: AutoScrollConfig, content_height: f32, viewport_height: f32) -> Self {
        Self {
            config,
            easing: EaseOutCubic::new(config.return_duration_ms),
            content_height,
            viewport_height,
            position: 0.0,
            phase: ScrollPhase::Idle,
            initial_timer: None,
            cycle_timer: None,
            frame: None,
            passes_completed: 0,
        }
    }

    /// Change the measured sizes. Takes effect on the next pass.
    pub fn set_metrics(&mut self, content_height: f32, viewport_height: f32) {
        self.content_height = content_height;
        self.viewport_height = viewport_height;
    }

    /// Largest scroll offset; zero or less means the content fits.
    #[inline]
    pub fn max_offset(&self) -> f32 {
        self.content_height - self.viewport_height
    }

    /// Current scroll offset from the top, in pixels.
    #[inline]
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> ScrollPhase {
        self.phase
    }

    /// Is a pass in progress?
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.phase != ScrollPhase::Idle
    }

    /// Passes that ran all the way back to the top.
    #[inline]
    pub fn passes_completed(&self) -> u32 {
        self.passes_completed
    }

    /// Start a pass unless one is already running.
    pub fn trigger(&mut self, scheduler: &mut dyn FrameScheduler) -> PassTrigger {
        if self.is_busy() {
            return PassTrigger::Busy;
        }
        if self.max_offset() <= 0.0 {
            return PassTrigger::NothingToScroll;
        }
        self.position = 0.0;
        self.phase = ScrollPhase::Descending;
        self.frame = Some(scheduler.request_frame());
        PassTrigger::Started
    }

    fn on_frame(&mut self, now_ms: u64, scheduler: &mut dyn FrameScheduler) {
        let max = self.max_offset();
        match self.phase {
            ScrollPhase::Idle => {
                self.frame = None;
            }
            ScrollPhase::Descending => {
                self.position += self.config.speed_px_per_frame;
                if self.position >= max {
                    self.position = max;
                    self.phase = ScrollPhase::Returning {
                        started_ms: now_ms,
                        from: max,
                    };
                }
                self.frame = Some(scheduler.request_frame());
            }
            ScrollPhase::Returning { started_ms, from } => {
                let elapsed = now_ms.saturating_sub(started_ms);
                let (position, complete) = self.easing.interpolate(from, 0.0, elapsed);
                self.position = position;
                if complete {
                    self.position = 0.0;
                    self.phase = ScrollPhase::Idle;
                    self.frame = None;
                    self.passes_completed += 1;
                } else {
                    self.frame = Some(scheduler.request_frame());
                }
            }
        }
    }
}

impl Animator for AutoScrollAnimator {
    fn mount(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.unmount(scheduler);
        self.position = 0.0;
        self.initial_timer = Some(scheduler.set_timeout(self.config.initial_delay_ms));
    }

    fn on_fired(&mut self, fired: Fired, scheduler: &mut dyn FrameScheduler) -> bool {
        if self.initial_timer == Some(fired.handle) {
            self.initial_timer = None;
            self.trigger(scheduler);
            self.cycle_timer = Some(scheduler.set_interval(self.config.cycle_ms));
            true
        } else if self.cycle_timer == Some(fired.handle) {
            self.trigger(scheduler);
            true
        } else if self.frame == Some(fired.handle) {
            self.on_frame(fired.now_ms, scheduler);
            true
        } else {
            false
        }
    }

    fn unmount(&mut self, scheduler: &mut dyn FrameScheduler) {
        for handle in [
            self.initial_timer.take(),
            self.cycle_timer.take(),
            self.frame.take(),
        ]
        .into_iter()
        .flatten()
        {
            scheduler.cancel(handle);
        }
        self.phase = ScrollPhase::Idle;
    }

    fn is_armed(&self) -> bool {
        self.initial_timer.is_some() || self.cycle_timer.is_some() || self.frame.is_some()
    }
}
