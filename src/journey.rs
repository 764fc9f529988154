//! The journey record behind the board.
//!
//! A [`JourneyState`] holds everything the board displays for one train run:
//! the route, where the train is on it, the current delay and the free-text
//! messages. There is exactly one live record; it is only ever replaced as a
//! whole (see [`SharedDisplayState::replace_state`]).
//!
//! [`SharedDisplayState::replace_state`]: crate::services::SharedDisplayState::replace_state

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::time::TimeOfDay;

/// Footer text used when the record carries none.
pub const DEFAULT_FOOTER_MESSAGE: &str =
    "++ Bitte beachten Sie die geltenden Beförderungsbedingungen und halten Sie Ihre Fahrkarte bereit ++";

/// Delay reason filled in when a delay is set without one.
pub const DEFAULT_DELAY_REASON: &str = "Verspätung: Weichenstörung";

/// Welcome text used by the welcome toggle.
pub const DEFAULT_WELCOME_MESSAGE: &str =
    "Willkommen an Bord. Die Deutsche Bahn wünscht Ihnen eine angenehme Reise.";

/// One stop on the route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    /// Station name.
    pub name: String,
    /// Scheduled arrival.
    pub arrival: TimeOfDay,
    /// Scheduled departure.
    pub departure: TimeOfDay,
    /// Platform number as used in timetables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Platform label as shown on the board, e.g. `"Gl 3"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_display: Option<String>,
}

impl Stop {
    /// Build a stop without platform information.
    pub fn new(name: impl Into<String>, arrival: TimeOfDay, departure: TimeOfDay) -> Self {
        Self {
            name: name.into(),
            arrival,
            departure,
            platform: None,
            platform_display: None,
        }
    }

    /// Set both platform fields; the display label is `"Gl <platform>"`.
    pub fn with_platform(mut self, platform: &str) -> Self {
        self.platform = Some(platform.to_string());
        self.platform_display = Some(format!("Gl {}", platform));
        self
    }

    /// Label to show for this stop's platform, preferring the display form.
    pub fn platform_label(&self) -> Option<&str> {
        self.platform_display
            .as_deref()
            .or(self.platform.as_deref())
    }
}

/// A connecting service at the next stop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// Line identifier, e.g. `"ICE 698"` or `"S2"`.
    pub line: String,
    /// Final destination of the connecting service.
    pub destination: String,
    /// Departure platform.
    pub platform: String,
    /// Scheduled departure.
    pub departure: TimeOfDay,
}

impl Connection {
    /// Product family, derived from the line prefix.
    pub fn kind(&self) -> LineKind {
        LineKind::from_line(&self.line)
    }
}

/// Product family of a connecting line, used to pick its badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// ICE / IC / EC.
    LongDistance,
    /// S-Bahn.
    Suburban,
    /// U-Bahn.
    Metro,
    /// Anything else.
    Other,
}

impl LineKind {
    /// Classify a line identifier by its prefix.
    pub fn from_line(line: &str) -> Self {
        let upper = line.trim().to_ascii_uppercase();
        if upper.starts_with("ICE") || upper.starts_with("IC") || upper.starts_with("EC") {
            LineKind::LongDistance
        } else if upper.starts_with('S') {
            LineKind::Suburban
        } else if upper.starts_with('U') {
            LineKind::Metro
        } else {
            LineKind::Other
        }
    }
}

/// Side of the train on which the doors open at the next stop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitSide {
    /// Exit on the left.
    #[serde(alias = "links")]
    Left,
    /// Exit on the right.
    #[serde(alias = "rechts")]
    Right,
}

impl ExitSide {
    /// Board label.
    pub const fn label(&self) -> &'static str {
        match self {
            ExitSide::Left => "Links",
            ExitSide::Right => "Rechts",
        }
    }

    /// Parse free text, accepting English and German names.
    ///
    /// ```
    /// use pis_board::ExitSide;
    ///
    /// assert_eq!(ExitSide::from_text("Rechts"), Some(ExitSide::Right));
    /// assert_eq!(ExitSide::from_text(" left "), Some(ExitSide::Left));
    /// assert_eq!(ExitSide::from_text("up"), None);
    /// ```
    pub fn from_text(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "links" | "l" => Some(ExitSide::Left),
            "right" | "rechts" | "r" => Some(ExitSide::Right),
            _ => None,
        }
    }
}

/// The full display record for one train run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyState {
    /// Train number, e.g. `"ICE 621"`.
    pub train_number: String,
    /// First station of the run.
    pub origin: String,
    /// Last station of the run.
    pub destination: String,
    /// Stops in route order.
    pub stops: Vec<Stop>,
    /// Stop the train is at or has just left.
    pub current_index: usize,
    /// Stop the train is heading to. Equals `current_index` at the end of the route.
    pub next_index: usize,
    /// Delay applied to all remaining scheduled times when displayed.
    #[serde(default)]
    pub delay_minutes: u32,
    /// Reason shown in the delay banner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_reason: Option<String>,
    /// Scrolling footer text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_message: Option<String>,
    /// Welcome banner text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub welcome_message: Option<String>,
    /// Door side at the next stop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_side: Option<ExitSide>,
    /// Connections at the next stop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<Vec<Connection>>,
    /// Current speed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_kmh: Option<u32>,
    /// Remaining travel time, free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_travel_time: Option<String>,
    /// Whether on-board wifi is available.
    #[serde(default)]
    pub wifi_available: bool,
    /// Coach range, e.g. `"1-8"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_sequence: Option<String>,
    /// Extra notices for the status bar.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub special_messages: Vec<String>,
}

/// Ways a journey record can break its invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JourneyError {
    /// The route has no stops.
    EmptyRoute,
    /// An index does not point into the route.
    IndexOutOfRange {
        /// Which field.
        field: &'static str,
        /// Offending value.
        index: usize,
        /// Number of stops.
        len: usize,
    },
    /// `next_index` lies behind `current_index`.
    NextBeforeCurrent {
        /// Current stop index.
        current: usize,
        /// Next stop index.
        next: usize,
    },
    /// Scheduled times go backwards at the given stop.
    NonMonotonicSchedule {
        /// Stop index where times go backwards.
        index: usize,
        /// Name of that stop.
        stop: String,
    },
}

impl fmt::Display for JourneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JourneyError::EmptyRoute => write!(f, "route has no stops"),
            JourneyError::IndexOutOfRange { field, index, len } => {
                write!(f, "{} {} out of range for {} stops", field, index, len)
            }
            JourneyError::NextBeforeCurrent { current, next } => {
                write!(f, "next stop {} lies before current stop {}", next, current)
            }
            JourneyError::NonMonotonicSchedule { index, stop } => {
                write!(f, "schedule goes backwards at stop {} ({})", index, stop)
            }
        }
    }
}

impl std::error::Error for JourneyError {}

impl JourneyState {
    /// Check the route and index invariants.
    pub fn validate(&self) -> Result<(), JourneyError> {
        let len = self.stops.len();
        if len == 0 {
            return Err(JourneyError::EmptyRoute);
        }
        for (field, index) in [("currentIndex", self.current_index), ("nextIndex", self.next_index)] {
            if index >= len {
                return Err(JourneyError::IndexOutOfRange { field, index, len });
            }
        }
        if self.next_index < self.current_index {
            return Err(JourneyError::NextBeforeCurrent {
                current: self.current_index,
                next: self.next_index,
            });
        }

        let mut previous = TimeOfDay::MIDNIGHT;
        for (index, stop) in self.stops.iter().enumerate() {
            if stop.arrival < previous || stop.departure < stop.arrival {
                return Err(JourneyError::NonMonotonicSchedule {
                    index,
                    stop: stop.name.clone(),
                });
            }
            previous = stop.departure;
        }
        Ok(())
    }

    /// Index of the final stop.
    #[inline]
    pub fn last_index(&self) -> usize {
        self.stops.len().saturating_sub(1)
    }

    /// Has the train reached the final stop?
    #[inline]
    pub fn is_end_of_route(&self) -> bool {
        self.current_index >= self.last_index()
    }

    /// Stop at `current_index`.
    pub fn current_stop(&self) -> Option<&Stop> {
        self.stops.get(self.current_index)
    }

    /// Stop at `next_index`.
    pub fn next_stop(&self) -> Option<&Stop> {
        self.stops.get(self.next_index)
    }

    /// Scheduled arrival at the next stop.
    pub fn next_planned_arrival(&self) -> Option<TimeOfDay> {
        self.next_stop().map(|s| s.arrival)
    }

    /// Stops after the current one.
    pub fn upcoming_stops(&self) -> &[Stop] {
        let start = (self.current_index + 1).min(self.stops.len());
        &self.stops[start..]
    }

    /// Footer text, falling back to the stock message.
    pub fn footer_text(&self) -> &str {
        self.footer_message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_FOOTER_MESSAGE)
    }

    /// Connections, empty when absent.
    pub fn connection_list(&self) -> &[Connection] {
        self.connections.as_deref().unwrap_or(&[])
    }

    /// Place the train at `index` and point `next_index` at the stop after
    /// it, or at `index` itself when it is the last stop.
    pub(crate) fn position_at(&mut self, index: usize) {
        self.current_index = index;
        self.next_index = if index < self.last_index() { index + 1 } else { index };
    }
}
