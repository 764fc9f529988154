//! Test doubles for the board's runtime seams.
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockClock`] | [`Clock`] | Settable, shareable wall clock |
//! | [`MockSource`] | [`JourneySource`] | Returns a fixed record or fails on demand |
//!
//! [`Clock`]: crate::traits::Clock
//! [`JourneySource`]: crate::traits::JourneySource

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::journey::JourneyState;
use crate::traits::{Clock, JourneySource, SourceError};

/// Settable clock for tests.
///
/// Clones share the same time, so a test can keep one handle while the
/// board owns another.
#[derive(Clone, Debug)]
pub struct MockClock {
    now: Arc<Mutex<NaiveDateTime>>,
}

impl MockClock {
    /// Clock fixed at `now`.
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Clock at `hour:minute:00` on a fixed date.
    pub fn at_hm(hour: u32, minute: u32) -> Self {
        Self::new(Self::date_at(hour, minute, 0))
    }

    /// The fixed date used by [`at_hm`](Self::at_hm), at the given time.
    pub fn date_at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|d| d.and_hms_opt(hour, minute, second))
            .unwrap_or_default()
    }

    /// Set the current time.
    pub fn set(&self, now: NaiveDateTime) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }

    /// Move the clock forward.
    pub fn advance_secs(&self, secs: i64) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += Duration::seconds(secs);
        }
    }
}

impl Clock for MockClock {
    fn now(&self) -> NaiveDateTime {
        self.now.lock().map(|g| *g).unwrap_or_default()
    }
}

/// Journey source returning a fixed record, with a switch to make it fail.
#[derive(Debug)]
pub struct MockSource {
    journey: JourneyState,
    failing: AtomicBool,
    loads: AtomicUsize,
}

impl MockSource {
    /// Source that returns `journey`.
    pub fn new(journey: JourneyState) -> Self {
        Self {
            journey,
            failing: AtomicBool::new(false),
            loads: AtomicUsize::new(0),
        }
    }

    /// Make subsequent loads fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of load attempts so far.
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl JourneySource for MockSource {
    fn load(&self) -> Result<JourneyState, SourceError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(SourceError::Unavailable("mock source set to fail".into()));
        }
        self.journey.validate()?;
        Ok(self.journey.clone())
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}

impl JourneySource for Arc<MockSource> {
    fn load(&self) -> Result<JourneyState, SourceError> {
        self.as_ref().load()
    }

    fn describe(&self) -> String {
        self.as_ref().describe()
    }
}
