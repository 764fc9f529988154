//! Footer ticker (horizontal marquee).
//!
//! ```text
//!  Idle --mount--> WaitingToStart --start delay--> Running --frame--> Running ...
//!   ^                                                  |
//!   +------------------------ unmount -----------------+
//! ```
//!
//! The text starts centred in the container and, once running, moves left
//! by a fixed step every frame. As soon as it has fully left the container
//! on the left it jumps to the right edge, so the loop never ends on its own.

use serde::{Deserialize, Serialize};

use crate::config::AnimationConfig;
use crate::traits::{Animator, CallbackHandle, Fired, FrameScheduler};

/// Ticker timing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickerConfig {
    /// Delay between mount and the first frame, letting layout settle.
    pub start_delay_ms: u64,
    /// Leftward movement per frame, in pixels.
    pub speed_px_per_frame: f32,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: 1000,
            speed_px_per_frame: 1.5,
        }
    }
}

impl TickerConfig {
    /// Take the ticker settings from the animation config.
    pub fn from_config(config: &AnimationConfig) -> Self {
        Self {
            start_delay_ms: config.ticker_start_delay_ms,
            speed_px_per_frame: config.ticker_speed_px,
        }
    }
}

/// Where the ticker is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickerPhase {
    /// Not mounted.
    #[default]
    Idle,
    /// Mounted, start delay pending.
    WaitingToStart,
    /// Scrolling every frame.
    Running,
}

/// Horizontal marquee state machine.
#[derive(Debug)]
pub struct TickerAnimator {
    config: TickerConfig,
    content_width: f32,
    container_width: f32,
    offset: f32,
    phase: TickerPhase,
    start_timer: Option<CallbackHandle>,
    frame: Option<CallbackHandle>,
    frames: u64,
}

impl TickerAnimator {
    /// New idle ticker for content of `content_width` inside `container_width`.
    pub fn new(config: TickerConfig, content_width: f32, container_width: f32) -> Self {
        Self {
            config,
            content_width,
            container_width,
            offset: 0.0,
            phase: TickerPhase::Idle,
            start_timer: None,
            frame: None,
            frames: 0,
        }
    }

    /// Change the measured sizes. Takes effect on the next mount.
    pub fn set_metrics(&mut self, content_width: f32, container_width: f32) {
        self.content_width = content_width;
        self.container_width = container_width;
    }

    /// Horizontal offset of the content's left edge, in pixels.
    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> TickerPhase {
        self.phase
    }

    /// Frames rendered since the last mount.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Offset that centres the content in the container.
    pub fn centred_offset(&self) -> f32 {
        (self.container_width - self.content_width) / 2.0
    }

    /// Move one frame's worth, wrapping to the right edge once the content
    /// has fully left on the left.
    fn advance(&mut self) {
        self.offset -= self.config.speed_px_per_frame;
        if self.offset <= -self.content_width {
            self.offset = self.container_width;
        }
        self.frames += 1;
    }

    fn cancel_pending(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Some(handle) = self.start_timer.take() {
            scheduler.cancel(handle);
        }
        if let Some(handle) = self.frame.take() {
            scheduler.cancel(handle);
        }
    }
}

impl Animator for TickerAnimator {
    fn mount(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.cancel_pending(scheduler);
        self.offset = self.centred_offset();
        self.frames = 0;
        self.phase = TickerPhase::WaitingToStart;
        self.start_timer = Some(scheduler.set_timeout(self.config.start_delay_ms));
    }

    fn on_fired(&mut self, fired: Fired, scheduler: &mut dyn FrameScheduler) -> bool {
        if self.start_timer == Some(fired.handle) {
            self.start_timer = None;
            self.phase = TickerPhase::Running;
            self.frame = Some(scheduler.request_frame());
            true
        } else if self.frame == Some(fired.handle) {
            self.advance();
            self.frame = Some(scheduler.request_frame());
            true
        } else {
            false
        }
    }

    fn unmount(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.cancel_pending(scheduler);
        self.phase = TickerPhase::Idle;
    }

    fn is_armed(&self) -> bool {
        self.start_timer.is_some() || self.frame.is_some()
    }
}
