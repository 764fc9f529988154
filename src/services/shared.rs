//! Shared state for the board server.
//!
//! `SharedDisplayState` owns the single journey record together with the
//! derived view and the animated display session. HTTP handlers and the
//! background clock/animation tasks all go through it.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use pis_board::config::Config;
//! use pis_board::hal::MockClock;
//! use pis_board::services::SharedDisplayState;
//! use pis_board::{DevCommand, FixtureSource};
//!
//! let state = Arc::new(
//!     SharedDisplayState::new(FixtureSource, MockClock::at_hm(17, 0), &Config::default()).unwrap(),
//! );
//!
//! state.apply_command(&DevCommand::NextStop).unwrap();
//! assert_eq!(state.journey().unwrap().current_index, 1);
//!
//! let view = state.tick().unwrap();
//! assert_eq!(view.clock, "17:00");
//! ```

use core::fmt;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use log::{debug, error, info, warn};

use crate::config::Config;
use crate::controls::{ControlError, DevCommand};
use crate::display::DisplayView;
use crate::journey::{JourneyError, JourneyState};
use crate::session::{AnimationFrame, DisplaySession};
use crate::timing::VisibilityOptions;
use crate::traits::{Clock, JourneySource, SourceError};

// ============================================================================
// Errors
// ============================================================================

/// Failure to read or update the shared state.
#[derive(Debug)]
pub enum StateError {
    /// A lock was poisoned by a panicking holder.
    Poisoned,
    /// A replacement record broke a journey invariant.
    Invalid(JourneyError),
    /// A developer command could not be applied.
    Control(ControlError),
    /// Reloading from the source failed.
    Source(SourceError),
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::Poisoned => write!(f, "display state lock poisoned"),
            StateError::Invalid(e) => write!(f, "rejected journey record: {}", e),
            StateError::Control(e) => write!(f, "rejected command: {}", e),
            StateError::Source(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for StateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StateError::Poisoned => None,
            StateError::Invalid(e) => Some(e),
            StateError::Control(e) => Some(e),
            StateError::Source(e) => Some(e),
        }
    }
}

impl From<JourneyError> for StateError {
    fn from(e: JourneyError) -> Self {
        StateError::Invalid(e)
    }
}

impl From<ControlError> for StateError {
    fn from(e: ControlError) -> Self {
        StateError::Control(e)
    }
}

impl From<SourceError> for StateError {
    fn from(e: SourceError) -> Self {
        StateError::Source(e)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StateError> {
    mutex.lock().map_err(|_| StateError::Poisoned)
}

// ============================================================================
// Shared Display State
// ============================================================================

/// The journey record plus everything derived from it.
///
/// Lock order is journey, then session, then view. Every replacement is a
/// single assignment under the journey lock, so readers never observe a
/// partially updated record.
pub struct SharedDisplayState {
    journey: Mutex<JourneyState>,
    session: Mutex<DisplaySession>,
    view: Mutex<Option<DisplayView>>,
    clock: Box<dyn Clock>,
    source: Box<dyn JourneySource>,
    visibility: VisibilityOptions,
    start_time: Instant,
}

impl fmt::Debug for SharedDisplayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedDisplayState")
            .field("source", &self.source.describe())
            .field("visibility", &self.visibility)
            .finish_non_exhaustive()
    }
}

impl SharedDisplayState {
    /// Seed the record from `source` and mount the display session.
    pub fn new(
        source: impl JourneySource + 'static,
        clock: impl Clock + 'static,
        config: &Config,
    ) -> Result<Self, SourceError> {
        let journey = source.load()?;
        info!(
            "loaded journey {} ({} stops) from {}",
            journey.train_number,
            journey.stops.len(),
            source.describe()
        );

        let mut session = DisplaySession::new(&config.animation, config.layout.clone());
        session.sync(&journey);

        let visibility = config.display.visibility();
        let view = DisplayView::derive(&journey, clock.now(), &visibility);

        Ok(Self {
            journey: Mutex::new(journey),
            session: Mutex::new(session),
            view: Mutex::new(Some(view)),
            clock: Box::new(clock),
            source: Box::new(source),
            visibility,
            start_time: Instant::now(),
        })
    }

    /// Milliseconds since the state was created.
    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    /// Visibility options used when deriving the view.
    pub fn visibility(&self) -> VisibilityOptions {
        self.visibility
    }

    /// Snapshot of the current record.
    pub fn journey(&self) -> Result<JourneyState, StateError> {
        Ok(lock(&self.journey)?.clone())
    }

    /// Swap in a whole new record after validating it.
    pub fn replace_state(&self, new: JourneyState) -> Result<(), StateError> {
        if let Err(e) = new.validate() {
            warn!("rejected journey replacement: {}", e);
            return Err(e.into());
        }
        let mut journey = lock(&self.journey)?;
        *journey = new;
        info!(
            "journey replaced: {} at stop {} of {}",
            journey.train_number,
            journey.current_index,
            journey.stops.len()
        );
        self.refresh(&journey)
    }

    /// Apply a developer command and return the resulting record.
    pub fn apply_command(&self, command: &DevCommand) -> Result<JourneyState, StateError> {
        let mut journey = lock(&self.journey)?;
        let next = match command.apply(&journey) {
            Ok(next) => next,
            Err(e) => {
                warn!("rejected {} command: {}", command.name(), e);
                return Err(e.into());
            }
        };
        next.validate()?;
        *journey = next;
        debug!("applied {} command", command.name());
        self.refresh(&journey)?;
        Ok(journey.clone())
    }

    /// Reseed the record from the source.
    pub fn reload(&self) -> Result<JourneyState, StateError> {
        let fresh = match self.source.load() {
            Ok(fresh) => fresh,
            Err(e) => {
                error!("reload from {} failed: {}", self.source.describe(), e);
                return Err(e.into());
            }
        };
        let mut journey = lock(&self.journey)?;
        *journey = fresh;
        info!("journey reloaded from {}", self.source.describe());
        self.refresh(&journey)?;
        Ok(journey.clone())
    }

    /// Sample the clock and re-derive the view.
    pub fn tick(&self) -> Result<DisplayView, StateError> {
        let journey = lock(&self.journey)?;
        let view = DisplayView::derive(&journey, self.clock.now(), &self.visibility);
        drop(journey);
        self.store_view(view.clone())?;
        Ok(view)
    }

    /// View from the most recent tick or update.
    pub fn view(&self) -> Result<DisplayView, StateError> {
        if let Some(view) = lock(&self.view)?.clone() {
            return Ok(view);
        }
        self.tick()
    }

    /// Step the display session forward by `elapsed_ms`.
    pub fn advance_animation(&self, elapsed_ms: u64) -> Result<u64, StateError> {
        Ok(lock(&self.session)?.advance(elapsed_ms))
    }

    /// Current animation frame.
    pub fn frame(&self) -> Result<AnimationFrame, StateError> {
        Ok(lock(&self.session)?.frame())
    }

    /// Unmount the animators.
    pub fn shutdown(&self) -> Result<(), StateError> {
        lock(&self.session)?.shutdown();
        Ok(())
    }

    /// Resync the session and view after the record changed. Called with the
    /// journey lock held.
    fn refresh(&self, journey: &JourneyState) -> Result<(), StateError> {
        lock(&self.session)?.sync(journey);
        let view = DisplayView::derive(journey, self.clock.now(), &self.visibility);
        self.store_view(view)
    }

    fn store_view(&self, view: DisplayView) -> Result<(), StateError> {
        let mut current = lock(&self.view)?;
        let was_visible = current.as_ref().map(|v| v.connections.visible);
        if was_visible.is_some_and(|was| was != view.connections.visible) {
            debug!(
                "connections panel {}",
                if view.connections.visible { "shown" } else { "hidden" }
            );
        }
        *current = Some(view);
        Ok(())
    }
}
