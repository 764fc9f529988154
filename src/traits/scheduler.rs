//! Frame and timer scheduling for animators.
//!
//! Animators never call themselves recursively. Each time they want to run
//! again they ask a [`FrameScheduler`] for a callback and keep the returned
//! [`CallbackHandle`]; the driver hands fired handles back to the animator.
//! Tearing an animator down means cancelling every handle it still holds.

use serde::{Deserialize, Serialize};

/// Identifies one pending frame or timer callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CallbackHandle(pub u64);

/// What kind of callback a handle refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackKind {
    /// Runs once on the next display frame.
    Frame,
    /// Runs once after a delay.
    Timeout,
    /// Runs repeatedly with a fixed period until cancelled.
    Interval,
}

/// A callback that came due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fired {
    /// Handle returned when the callback was scheduled.
    pub handle: CallbackHandle,
    /// Kind of callback.
    pub kind: CallbackKind,
    /// Scheduler time at which it fired.
    pub now_ms: u64,
}

/// Capability to schedule frame and timer callbacks.
pub trait FrameScheduler {
    /// Current scheduler time in milliseconds.
    fn now_ms(&self) -> u64;

    /// Run once on the next frame.
    fn request_frame(&mut self) -> CallbackHandle;

    /// Run once after `delay_ms`.
    fn set_timeout(&mut self, delay_ms: u64) -> CallbackHandle;

    /// Run every `period_ms` until cancelled.
    fn set_interval(&mut self, period_ms: u64) -> CallbackHandle;

    /// Drop a pending callback. Unknown or already-fired handles are ignored.
    fn cancel(&mut self, handle: CallbackHandle);
}

/// A state machine driven by scheduled callbacks.
pub trait Animator {
    /// Start the animator, scheduling its first callbacks.
    ///
    /// Mounting an already mounted animator restarts it.
    fn mount(&mut self, scheduler: &mut dyn FrameScheduler);

    /// Handle a fired callback. Returns `false` if the handle is not ours.
    fn on_fired(&mut self, fired: Fired, scheduler: &mut dyn FrameScheduler) -> bool;

    /// Stop the animator and cancel every callback it still holds.
    fn unmount(&mut self, scheduler: &mut dyn FrameScheduler);

    /// Is any callback of this animator still pending?
    fn is_armed(&self) -> bool;
}
