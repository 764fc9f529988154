//! # pis-board
//!
//! An in-train passenger information display: the board shown above the
//! doors with the next stop, delay, connections, route list and a scrolling
//! footer ticker, plus a developer surface for editing the journey record.
//!
//! ## Features
//!
//! - **Delay-adjusted times**: scheduled `HH:MM` values shifted by the
//!   current delay, wrapping past midnight
//! - **Connections countdown**: the connections panel appears only in the
//!   last two minutes before the (delayed) arrival
//! - **Animators**: footer ticker and route list auto-scroll as explicit
//!   state machines driven by a frame scheduler, with leak-free unmount
//! - **Developer controls**: whole-record replacement and JSON commands
//! - **HTTP API** (`web` feature): axum server with the board page
//!
//! ## Architecture
//!
//! - `time` / `timing` - Time-of-day values and the timing calculations
//! - `journey` - The journey record and its invariants
//! - `controls` - Developer commands producing replacement records
//! - `display` - The per-tick derived view
//! - `animation` - Ticker and auto-scroll animators
//! - `session` - One board's animators and frame loop
//! - `traits` - Clock, scheduler and source abstractions
//! - `hal` - Concrete implementations (system clock, manual frame loop, mocks)
//! - `services` - Shared state and the HTTP API
//!
//! ## Example
//!
//! ```rust
//! use pis_board::{fixture_journey, DevCommand, DisplayView, VisibilityOptions};
//! use pis_board::hal::MockClock;
//!
//! let journey = DevCommand::NextStop.apply(&fixture_journey()).unwrap();
//! let view = DisplayView::derive(&journey, MockClock::date_at(17, 30, 0), &VisibilityOptions::countdown());
//!
//! assert_eq!(view.next_stop.unwrap().name, "Wetzlar");
//! assert!(!view.connections.visible);
//! ```

#![warn(missing_docs)]

/// Ticker and auto-scroll animators.
pub mod animation;
/// Layered configuration (defaults, file, environment).
pub mod config;
/// Developer commands that produce replacement journey records.
pub mod controls;
/// Derived per-tick view of the board.
pub mod display;
/// Hardware abstraction layer: system clock, frame loop and mocks.
pub mod hal;
/// The journey record.
pub mod journey;
/// Logger setup.
pub mod logging;
/// Headless display session.
pub mod session;
/// Journey sources: built-in fixture and JSON files.
pub mod source;
/// Time-of-day values.
pub mod time;
/// Delay, countdown and visibility calculations.
pub mod timing;
/// Core traits for the clock, frame scheduling and journey sources.
pub mod traits;

/// Shared state and HTTP API.
pub mod services;

// Re-exports for convenience
pub use animation::{
    AutoScrollAnimator, AutoScrollConfig, EaseOutCubic, PassTrigger, ScrollPhase, TickerAnimator,
    TickerConfig, TickerPhase,
};
pub use config::Config;
pub use controls::{ControlError, DevCommand};
pub use display::{DelaySeverity, DisplayView};
pub use journey::{Connection, ExitSide, JourneyError, JourneyState, LineKind, Stop};
pub use session::{AnimationFrame, DisplaySession};
pub use source::{fixture_journey, FileSource, FixtureSource};
pub use time::{ParseTimeError, TimeOfDay};
pub use timing::{connections_visible, delay_adjust, minutes_until, VisibilityOptions};
pub use traits::{
    Animator, CallbackHandle, Clock, FrameScheduler, JourneySource, SourceError,
};
