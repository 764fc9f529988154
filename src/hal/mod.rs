//! Concrete implementations of the traits in [`crate::traits`].
//!
//! # Available Implementations
//!
//! - `system`: real wall clock
//! - `frame_loop`: deterministic frame/timer scheduler used by the display session
//! - `mock`: test doubles (settable clock, failing source)

pub mod frame_loop;
pub mod mock;
pub mod system;

pub use frame_loop::*;
pub use mock::*;
pub use system::*;
