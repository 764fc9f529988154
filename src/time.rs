//! Time-of-day values as they appear on the board.
//!
//! Schedules are stored as `HH:MM` strings in the journey document. This
//! module parses them into [`TimeOfDay`], which is what the timing
//! calculations work with, and formats them back zero-padded.
//!
//! # Example
//!
//! ```rust
//! use pis_board::TimeOfDay;
//!
//! let t: TimeOfDay = "23:55".parse().unwrap();
//! assert_eq!(t.plus_minutes(10).to_string(), "00:05");
//! ```

use core::fmt;
use core::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Minutes in one day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A wall-clock time of day with minute resolution.
///
/// Stored as minutes since midnight, so ordering follows the clock.
/// Serializes as the `HH:MM` string form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    /// Midnight, `00:00`.
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { minutes: 0 };

    /// Build from hour and minute. Returns `None` outside `00:00..=23:59`.
    pub const fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self {
                minutes: hour as u16 * 60 + minute as u16,
            })
        } else {
            None
        }
    }

    /// Hour component (0-23).
    #[inline]
    pub const fn hour(&self) -> u8 {
        (self.minutes / 60) as u8
    }

    /// Minute component (0-59).
    #[inline]
    pub const fn minute(&self) -> u8 {
        (self.minutes % 60) as u8
    }

    /// Minutes since midnight.
    #[inline]
    pub const fn minutes_since_midnight(&self) -> u32 {
        self.minutes as u32
    }

    /// Add a delay, wrapping past midnight.
    ///
    /// Only the time of day is kept; how many days were crossed is dropped.
    ///
    /// ```rust
    /// use pis_board::TimeOfDay;
    ///
    /// let t = TimeOfDay::new(16, 55).unwrap();
    /// assert_eq!(t.plus_minutes(10), TimeOfDay::new(17, 5).unwrap());
    /// assert_eq!(t.plus_minutes(0), t);
    /// ```
    pub fn plus_minutes(self, delay_minutes: u32) -> Self {
        let total = (self.minutes as u32 + delay_minutes % MINUTES_PER_DAY) % MINUTES_PER_DAY;
        Self {
            minutes: total as u16,
        }
    }

    /// Convert to a chrono time at second zero.
    pub fn to_naive_time(self) -> NaiveTime {
        // hour/minute are range-checked on construction
        NaiveTime::from_hms_opt(self.hour() as u32, self.minute() as u32, 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Why a time string was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseTimeError {
    input: String,
}

impl ParseTimeError {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }

    /// The rejected input.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ParseTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid time of day {:?}, expected HH:MM", self.input)
    }
}

impl std::error::Error for ParseTimeError {}

impl FromStr for TimeOfDay {
    type Err = ParseTimeError;

    /// Accepts `H:MM` or `HH:MM`, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (h, m) = trimmed.split_once(':').ok_or_else(|| ParseTimeError::new(s))?;

        let digits = |part: &str, max_len: usize| {
            !part.is_empty() && part.len() <= max_len && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !digits(h, 2) || m.len() != 2 || !digits(m, 2) {
            return Err(ParseTimeError::new(s));
        }

        let hour: u8 = h.parse().map_err(|_| ParseTimeError::new(s))?;
        let minute: u8 = m.parse().map_err(|_| ParseTimeError::new(s))?;
        TimeOfDay::new(hour, minute).ok_or_else(|| ParseTimeError::new(s))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
