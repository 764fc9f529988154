//! Looping animations on the board.
//!
//! Two independent state machines, both driven through
//! [`FrameScheduler`](crate::traits::FrameScheduler) handles:
//!
//! - [`TickerAnimator`]: the footer marquee, scrolling left forever
//! - [`AutoScrollAnimator`]: the route list, periodically scrolling down and
//!   easing back to the top
//!
//! Neither shares state with the other. Both cancel every pending callback
//! on [`Animator::unmount`](crate::traits::Animator::unmount).

pub mod auto_scroll;
pub mod easing;
pub mod ticker;

pub use auto_scroll::*;
pub use easing::*;
pub use ticker::*;
