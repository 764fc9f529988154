//! What the board shows at one clock tick.
//!
//! [`DisplayView::derive`] projects the journey record and a clock sample
//! into the content of every panel. It is recomputed from scratch on every
//! tick and after every state replacement; panels never read the journey
//! record directly.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::journey::{Connection, ExitSide, JourneyState, LineKind};
use crate::time::TimeOfDay;
use crate::timing::{connections_visible, minutes_until, VisibilityOptions};

/// Delays above this many minutes are shown as severe.
pub const SEVERE_DELAY_MINUTES: u32 = 5;

/// How prominent the delay indicator is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelaySeverity {
    /// On time.
    None,
    /// Up to five minutes late.
    Minor,
    /// More than five minutes late; the indicator blinks.
    Severe,
}

impl DelaySeverity {
    /// Classify a delay.
    pub fn from_minutes(minutes: u32) -> Self {
        match minutes {
            0 => DelaySeverity::None,
            m if m > SEVERE_DELAY_MINUTES => DelaySeverity::Severe,
            _ => DelaySeverity::Minor,
        }
    }
}

/// Next-stop panel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextStopView {
    /// Station name.
    pub name: String,
    /// Scheduled arrival.
    pub planned_arrival: TimeOfDay,
    /// Arrival with the delay applied.
    pub expected_arrival: TimeOfDay,
    /// Whether the planned time is struck through.
    pub delayed: bool,
    /// Platform label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

/// One row of the route list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingStopView {
    /// Index into the route.
    pub index: usize,
    /// Station name.
    pub name: String,
    /// Scheduled arrival.
    pub arrival: TimeOfDay,
    /// Scheduled departure.
    pub departure: TimeOfDay,
    /// Arrival with the delay applied.
    pub expected_arrival: TimeOfDay,
    /// Platform label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Marked as the next stop.
    pub is_next: bool,
}

/// One row of the connections panel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionView {
    /// The connection itself.
    #[serde(flatten)]
    pub connection: Connection,
    /// Badge family.
    pub kind: LineKind,
}

/// Connections panel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionsView {
    /// Whether the panel is shown at this tick.
    pub visible: bool,
    /// Rows, in record order.
    pub entries: Vec<ConnectionView>,
}

/// Telemetry panel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoView {
    /// Speed, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_kmh: Option<u32>,
    /// Wifi indicator.
    pub wifi_available: bool,
    /// Remaining travel time text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_travel_time: Option<String>,
    /// Coach range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_sequence: Option<String>,
}

/// Everything the board shows at one tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayView {
    /// Clock text, `HH:MM`.
    pub clock: String,
    /// Train number.
    pub train_number: String,
    /// First station.
    pub origin: String,
    /// Last station.
    pub destination: String,
    /// The train has reached the final stop.
    pub end_of_route: bool,
    /// Final station name, shown in the end-of-journey message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_station: Option<String>,
    /// Next-stop panel; absent at the end of the route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_stop: Option<NextStopView>,
    /// Delay in minutes.
    pub delay_minutes: u32,
    /// Delay indicator prominence.
    pub delay_severity: DelaySeverity,
    /// Delay banner text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_banner: Option<String>,
    /// Connections panel.
    pub connections: ConnectionsView,
    /// Route list rows after the current stop.
    pub upcoming: Vec<UpcomingStopView>,
    /// Minutes until the scheduled arrival at the next stop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes_until_next: Option<i64>,
    /// Telemetry panel.
    pub info: InfoView,
    /// Welcome banner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub welcome_message: Option<String>,
    /// Footer ticker text.
    pub footer_message: String,
    /// Door side label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_side: Option<ExitSide>,
    /// Status bar notices.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub special_messages: Vec<String>,
}

impl DisplayView {
    /// Derive the view for `journey` at `now`.
    pub fn derive(journey: &JourneyState, now: NaiveDateTime, options: &VisibilityOptions) -> Self {
        let end_of_route = journey.is_end_of_route();
        let delay = journey.delay_minutes;

        let next_stop = if end_of_route {
            None
        } else {
            journey.next_stop().map(|stop| NextStopView {
                name: stop.name.clone(),
                planned_arrival: stop.arrival,
                expected_arrival: stop.arrival.plus_minutes(delay),
                delayed: delay > 0,
                platform: stop.platform_label().map(str::to_string),
            })
        };

        let delay_banner = if !end_of_route && delay > 0 {
            journey.delay_reason.clone().filter(|r| !r.is_empty())
        } else {
            None
        };

        let entries: Vec<ConnectionView> = journey
            .connection_list()
            .iter()
            .map(|c| ConnectionView {
                connection: c.clone(),
                kind: c.kind(),
            })
            .collect();
        let visible = !end_of_route
            && !entries.is_empty()
            && connections_visible(now, journey.next_planned_arrival(), delay, options);

        let first_upcoming = journey.current_index + 1;
        let upcoming = journey
            .upcoming_stops()
            .iter()
            .enumerate()
            .map(|(offset, stop)| {
                let index = first_upcoming + offset;
                UpcomingStopView {
                    index,
                    name: stop.name.clone(),
                    arrival: stop.arrival,
                    departure: stop.departure,
                    expected_arrival: stop.arrival.plus_minutes(delay),
                    platform: stop.platform_label().map(str::to_string),
                    is_next: index == journey.next_index,
                }
            })
            .collect();

        let minutes_until_next = if end_of_route {
            None
        } else {
            minutes_until(now, journey.next_planned_arrival())
        };

        Self {
            clock: now.format("%H:%M").to_string(),
            train_number: journey.train_number.clone(),
            origin: journey.origin.clone(),
            destination: journey.destination.clone(),
            end_of_route,
            end_station: end_of_route
                .then(|| journey.stops.last().map(|s| s.name.clone()))
                .flatten(),
            next_stop,
            delay_minutes: delay,
            delay_severity: DelaySeverity::from_minutes(delay),
            delay_banner,
            connections: ConnectionsView { visible, entries },
            upcoming,
            minutes_until_next,
            info: InfoView {
                speed_kmh: journey.speed_kmh,
                wifi_available: journey.wifi_available,
                remaining_travel_time: journey.remaining_travel_time.clone(),
                car_sequence: journey.car_sequence.clone(),
            },
            welcome_message: journey.welcome_message.clone(),
            footer_message: journey.footer_text().to_string(),
            exit_side: journey.exit_side,
            special_messages: journey.special_messages.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::DevCommand;
    use crate::hal::MockClock;
    use crate::source::fixture_journey;

    #[test]
    fn start_of_route() {
        let journey = fixture_journey();
        let view = DisplayView::derive(&journey, MockClock::date_at(17, 0, 0), &VisibilityOptions::countdown());

        assert_eq!(view.clock, "17:00");
        assert!(!view.end_of_route);
        let next = view.next_stop.unwrap();
        assert_eq!(next.name, "Langgöns");
        assert_eq!(next.planned_arrival.to_string(), "17:18");
        assert_eq!(next.expected_arrival.to_string(), "17:28");
        assert!(next.delayed);
        assert_eq!(next.platform.as_deref(), Some("Gl 8"));
        assert_eq!(view.delay_severity, DelaySeverity::Severe);
        assert_eq!(view.delay_banner.as_deref(), Some("Verspätung: Weichenstörung"));
        assert_eq!(view.upcoming.len(), 16);
        assert!(view.upcoming[0].is_next);
        assert!(!view.upcoming[1].is_next);
        assert_eq!(view.minutes_until_next, Some(18));
    }

    #[test]
    fn connections_follow_countdown_window() {
        let journey = fixture_journey(); // next arrival 17:18 + 10 min delay
        let opts = VisibilityOptions::countdown();
        assert!(!DisplayView::derive(&journey, MockClock::date_at(17, 20, 0), &opts).connections.visible);
        assert!(DisplayView::derive(&journey, MockClock::date_at(17, 26, 0), &opts).connections.visible);
        assert!(DisplayView::derive(&journey, MockClock::date_at(17, 28, 0), &opts).connections.visible);
    }

    #[test]
    fn no_connections_means_hidden_even_with_override() {
        let journey = DevCommand::ToggleConnections.apply(&fixture_journey()).unwrap();
        let view = DisplayView::derive(&journey, MockClock::date_at(17, 26, 0), &VisibilityOptions::always_show());
        assert!(!view.connections.visible);
        assert!(view.connections.entries.is_empty());
    }

    #[test]
    fn end_of_route_switches_to_terminal_display() {
        let journey = DevCommand::JumpToEnd.apply(&fixture_journey()).unwrap();
        let view = DisplayView::derive(&journey, MockClock::date_at(23, 50, 0), &VisibilityOptions::always_show());
        assert!(view.end_of_route);
        assert_eq!(view.end_station.as_deref(), Some("München Hbf"));
        assert!(view.next_stop.is_none());
        assert!(view.delay_banner.is_none());
        assert!(!view.connections.visible);
        assert!(view.upcoming.is_empty());
        assert_eq!(view.minutes_until_next, None);
    }

    #[test]
    fn on_time_has_no_banner() {
        let journey = DevCommand::QuickDelay { minutes: 0 }.apply(&fixture_journey()).unwrap();
        let view = DisplayView::derive(&journey, MockClock::date_at(17, 0, 0), &VisibilityOptions::countdown());
        assert_eq!(view.delay_severity, DelaySeverity::None);
        assert!(view.delay_banner.is_none());
        let next = view.next_stop.unwrap();
        assert!(!next.delayed);
        assert_eq!(next.expected_arrival, next.planned_arrival);
    }

    #[test]
    fn severity_thresholds() {
        assert_eq!(DelaySeverity::from_minutes(0), DelaySeverity::None);
        assert_eq!(DelaySeverity::from_minutes(5), DelaySeverity::Minor);
        assert_eq!(DelaySeverity::from_minutes(6), DelaySeverity::Severe);
    }
}
