//! Wall-clock time source.

use chrono::NaiveDateTime;

/// Time source sampled by the board.
///
/// Returns local wall-clock time without a zone, since scheduled times on the
/// board are plain local times of day.
///
/// # Example
///
/// ```rust
/// use chrono::Timelike;
/// use pis_board::traits::Clock;
/// use pis_board::hal::MockClock;
///
/// let clock = MockClock::at_hm(20, 13);
/// assert_eq!(clock.now().hour(), 20);
///
/// clock.advance_secs(120);
/// assert_eq!(clock.now().minute(), 15);
/// ```
pub trait Clock: Send + Sync {
    /// Current local date and time.
    fn now(&self) -> NaiveDateTime;
}
