//! Trait definitions for the board's runtime seams.
//!
//! These are the abstractions that let the same board logic run under the
//! HTTP server, in tests with deterministic time, or against another data
//! feed:
//!
//! - `clock`: wall-clock time source sampled once per tick
//! - `scheduler`: "run on the next frame" and timer capability for animators
//! - `source`: where the journey record is loaded from
//!
//! Concrete implementations live in [`crate::hal`] and [`crate::source`].

pub mod clock;
pub mod scheduler;
pub mod source;

pub use clock::*;
pub use scheduler::*;
pub use source::*;
