//! Clock-driven derivations shown on the board.
//!
//! Every function here is pure: it takes the current clock sample and the
//! relevant slice of the journey and recomputes from scratch. The board calls
//! them once per clock tick, so nothing is cached between ticks.
//!
//! # Rolling over midnight
//!
//! A scheduled time is a time of day without a date. When the time has
//! already passed today it is read as the same time tomorrow, so a board
//! running past midnight still counts down to an early-morning arrival.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use pis_board::timing::minutes_until;
//! use pis_board::TimeOfDay;
//!
//! let now = NaiveDate::from_ymd_opt(2024, 5, 1)
//!     .unwrap()
//!     .and_hms_opt(23, 58, 0)
//!     .unwrap();
//! let scheduled = TimeOfDay::new(0, 5);
//! assert_eq!(minutes_until(now, scheduled), Some(7));
//! ```

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::time::{ParseTimeError, TimeOfDay};

/// Width of the window before arrival during which connections are shown.
pub const CONNECTIONS_WINDOW_MINUTES: i64 = 2;

/// Options injected into [`connections_visible`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityOptions {
    /// Show the connections panel regardless of the countdown (local development).
    pub always_show_connections: bool,
}

impl VisibilityOptions {
    /// Options with the countdown window in force.
    pub const fn countdown() -> Self {
        Self {
            always_show_connections: false,
        }
    }

    /// Options that always show connections.
    pub const fn always_show() -> Self {
        Self {
            always_show_connections: true,
        }
    }
}

/// Add a delay to a scheduled `HH:MM` string.
///
/// A zero delay returns the input untouched. Otherwise the result wraps
/// past midnight and is formatted zero-padded.
///
/// ```rust
/// use pis_board::timing::delay_adjust;
///
/// assert_eq!(delay_adjust("23:55", 10).unwrap(), "00:05");
/// assert_eq!(delay_adjust("7:05", 0).unwrap(), "7:05");
/// ```
pub fn delay_adjust(scheduled: &str, delay_minutes: u32) -> Result<String, ParseTimeError> {
    if delay_minutes == 0 {
        return Ok(scheduled.to_string());
    }
    let time: TimeOfDay = scheduled.parse()?;
    Ok(time.plus_minutes(delay_minutes).to_string())
}

/// Next instant at which `scheduled + delay_minutes` occurs, relative to `now`.
///
/// The delay is added to today's scheduled time first; if that instant is
/// already behind `now` it moves one day forward.
pub fn next_occurrence(now: NaiveDateTime, scheduled: TimeOfDay, delay_minutes: u32) -> NaiveDateTime {
    let today = now.date().and_time(scheduled.to_naive_time());
    let adjusted = today + Duration::minutes(delay_minutes as i64);
    if adjusted < now {
        adjusted + Duration::days(1)
    } else {
        adjusted
    }
}

/// Whole minutes from `now` until `at`, rounded down.
fn whole_minutes_between(now: NaiveDateTime, at: NaiveDateTime) -> i64 {
    (at - now).num_milliseconds().div_euclid(60_000)
}

/// Should the connections panel be visible right now?
///
/// - override set: always visible
/// - no scheduled arrival: hidden
/// - otherwise visible while the delay-adjusted arrival is 0 to 2 whole
///   minutes away
pub fn connections_visible(
    now: NaiveDateTime,
    scheduled_arrival: Option<TimeOfDay>,
    delay_minutes: u32,
    options: &VisibilityOptions,
) -> bool {
    if options.always_show_connections {
        return true;
    }
    let Some(scheduled) = scheduled_arrival else {
        return false;
    };

    let arrival = next_occurrence(now, scheduled, delay_minutes);
    let minutes = whole_minutes_between(now, arrival);
    (0..=CONNECTIONS_WINDOW_MINUTES).contains(&minutes)
}

/// Whole minutes until the next occurrence of `scheduled`.
///
/// Returns `None` when there is no schedule.
pub fn minutes_until(now: NaiveDateTime, scheduled: Option<TimeOfDay>) -> Option<i64> {
    let scheduled = scheduled?;
    let arrival = next_occurrence(now, scheduled, 0);
    Some(whole_minutes_between(now, arrival))
}
