//! Deterministic frame loop.
//!
//! [`ManualScheduler`] implements [`FrameScheduler`] on a virtual timeline
//! that only moves when [`step`](ManualScheduler::step) is called. Each step
//! is one display frame: time advances by the frame interval, due timers fire
//! first, then every frame callback requested before the step. Callbacks
//! requested while handling a step wait for the next one, which is how a
//! browser's animation-frame queue behaves.
//!
//! # Example
//!
//! ```rust
//! use pis_board::hal::ManualScheduler;
//! use pis_board::traits::FrameScheduler;
//!
//! let mut scheduler = ManualScheduler::new(16);
//! let timer = scheduler.set_timeout(20);
//!
//! assert!(scheduler.step().is_empty()); // t = 16
//! let fired = scheduler.step(); // t = 32
//! assert_eq!(fired[0].handle, timer);
//! assert_eq!(scheduler.pending(), 0);
//! ```

use crate::traits::{CallbackHandle, CallbackKind, Fired, FrameScheduler};

/// Default frame interval, roughly 60 frames per second.
pub const DEFAULT_FRAME_MS: u64 = 16;

#[derive(Clone, Copy, Debug)]
enum Pending {
    Frame,
    Timeout { due_ms: u64 },
    Interval { due_ms: u64, period_ms: u64 },
}

/// Frame/timer scheduler driven by explicit steps.
#[derive(Debug)]
pub struct ManualScheduler {
    now_ms: u64,
    frame_ms: u64,
    next_id: u64,
    // insertion order is firing order among callbacks due in the same step
    pending: Vec<(CallbackHandle, Pending)>,
}

impl ManualScheduler {
    /// New scheduler at t = 0 with the given frame interval.
    pub fn new(frame_ms: u64) -> Self {
        Self {
            now_ms: 0,
            frame_ms: frame_ms.max(1),
            next_id: 1,
            pending: Vec::new(),
        }
    }

    /// Frame interval in milliseconds.
    #[inline]
    pub fn frame_ms(&self) -> u64 {
        self.frame_ms
    }

    /// Number of callbacks still pending.
    #[inline]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Is `handle` still pending?
    pub fn is_pending(&self, handle: CallbackHandle) -> bool {
        self.pending.iter().any(|(h, _)| *h == handle)
    }

    /// Advance one frame and return the callbacks that fired.
    pub fn step(&mut self) -> Vec<Fired> {
        self.now_ms += self.frame_ms;
        let now_ms = self.now_ms;

        let mut timers = Vec::new();
        let mut frames = Vec::new();
        let mut kept = Vec::with_capacity(self.pending.len());

        for (handle, entry) in self.pending.drain(..) {
            match entry {
                Pending::Frame => frames.push(Fired {
                    handle,
                    kind: CallbackKind::Frame,
                    now_ms,
                }),
                Pending::Timeout { due_ms } if due_ms <= now_ms => timers.push(Fired {
                    handle,
                    kind: CallbackKind::Timeout,
                    now_ms,
                }),
                Pending::Interval { due_ms, period_ms } if due_ms <= now_ms => {
                    timers.push(Fired {
                        handle,
                        kind: CallbackKind::Interval,
                        now_ms,
                    });
                    let mut next_due = due_ms;
                    while next_due <= now_ms {
                        next_due += period_ms;
                    }
                    kept.push((
                        handle,
                        Pending::Interval {
                            due_ms: next_due,
                            period_ms,
                        },
                    ));
                }
                other => kept.push((handle, other)),
            }
        }
        self.pending = kept;

        timers.extend(frames);
        timers
    }

    fn allocate(&mut self, entry: Pending) -> CallbackHandle {
        let handle = CallbackHandle(self.next_id);
        self.next_id += 1;
        self.pending.push((handle, entry));
        handle
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_MS)
    }
}

impl FrameScheduler for ManualScheduler {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn request_frame(&mut self) -> CallbackHandle {
        self.allocate(Pending::Frame)
    }

    fn set_timeout(&mut self, delay_ms: u64) -> CallbackHandle {
        let due_ms = self.now_ms + delay_ms;
        self.allocate(Pending::Timeout { due_ms })
    }

    fn set_interval(&mut self, period_ms: u64) -> CallbackHandle {
        let period_ms = period_ms.max(1);
        let due_ms = self.now_ms + period_ms;
        self.allocate(Pending::Interval { due_ms, period_ms })
    }

    fn cancel(&mut self, handle: CallbackHandle) {
        self.pending.retain(|(h, _)| *h != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_fire_once_on_next_step() {
        let mut s = ManualScheduler::new(10);
        let h = s.request_frame();
        let fired = s.step();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].handle, h);
        assert_eq!(fired[0].kind, CallbackKind::Frame);
        assert_eq!(fired[0].now_ms, 10);
        assert!(s.step().is_empty());
    }

    #[test]
    fn interval_repeats_until_cancelled() {
        let mut s = ManualScheduler::new(10);
        let h = s.set_interval(30);
        let mut count = 0;
        for _ in 0..10 {
            count += s.step().iter().filter(|f| f.handle == h).count();
        }
        assert_eq!(count, 3);
        s.cancel(h);
        assert_eq!(s.pending(), 0);
        for _ in 0..10 {
            assert!(s.step().is_empty());
        }
    }

    #[test]
    fn timers_fire_before_frames() {
        let mut s = ManualScheduler::new(10);
        let frame = s.request_frame();
        let timer = s.set_timeout(5);
        let fired = s.step();
        assert_eq!(fired.iter().map(|f| f.handle).collect::<Vec<_>>(), vec![timer, frame]);
    }

    #[test]
    fn cancel_unknown_handle_is_noop() {
        let mut s = ManualScheduler::default();
        s.request_frame();
        s.cancel(CallbackHandle(999));
        assert_eq!(s.pending(), 1);
    }
}
