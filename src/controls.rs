//! Developer control commands.
//!
//! The developer panel never patches the live record. Each [`DevCommand`]
//! takes the current [`JourneyState`] and returns a complete replacement,
//! which the caller then hands to
//! [`SharedDisplayState::replace_state`](crate::services::SharedDisplayState::replace_state)
//! (or uses directly in tests).
//!
//! # Navigation
//!
//! - [`DevCommand::NextStop`] advances one stop; at the final stop it is a
//!   no-op and `next_index` stays clamped to `current_index`
//! - [`DevCommand::PreviousStop`] steps back one stop
//! - [`DevCommand::JumpToStop`] places the train at any stop
//! - [`DevCommand::JumpToEnd`] places the train at the final stop
//!
//! # Example
//!
//! ```rust
//! use pis_board::{fixture_journey, DevCommand};
//!
//! let journey = fixture_journey();
//! let at_end = DevCommand::JumpToEnd.apply(&journey).unwrap();
//! assert!(at_end.is_end_of_route());
//! assert_eq!(at_end.next_index, at_end.current_index);
//!
//! // commands arrive as JSON from the developer panel
//! let cmd: DevCommand = serde_json::from_str(r#"{"action": "quick_delay", "minutes": 15}"#).unwrap();
//! assert_eq!(cmd.apply(&journey).unwrap().delay_minutes, 15);
//! ```

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::journey::{
    ExitSide, JourneyState, DEFAULT_DELAY_REASON, DEFAULT_FOOTER_MESSAGE, DEFAULT_WELCOME_MESSAGE,
};
use crate::source::{default_connections, FIXTURE_REMAINING_TRAVEL_TIME, FIXTURE_SPEED_KMH};

/// Delay presets offered by the developer panel, in minutes.
pub const QUICK_DELAY_PRESETS: [u32; 5] = [0, 5, 10, 15, 30];

/// Footer templates offered by the developer panel.
pub const FOOTER_TEMPLATES: [&str; 3] = [
    DEFAULT_FOOTER_MESSAGE,
    "++ Bitte beachten Sie die Maskenpflicht in allen Zügen ++",
    "++ Nächster Halt: Bitte rechtzeitig zum Ausgang begeben ++",
];

/// A change requested from the developer panel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DevCommand {
    /// Advance to the next stop.
    NextStop,
    /// Go back one stop.
    PreviousStop,
    /// Place the train at the given stop.
    JumpToStop {
        /// Target stop index.
        index: usize,
    },
    /// Place the train at the final stop.
    JumpToEnd,
    /// Set the delay, with an optional reason.
    ///
    /// With minutes > 0 and no reason the stock reason is used; at zero the
    /// reason is cleared.
    SetDelay {
        /// Delay in minutes.
        minutes: u32,
        /// Reason to show in the banner.
        #[serde(default)]
        reason: Option<String>,
    },
    /// Apply a delay preset with the stock reason.
    QuickDelay {
        /// Delay in minutes.
        minutes: u32,
    },
    /// Replace the delay reason. Empty or missing clears it.
    SetDelayReason {
        /// New reason.
        #[serde(default)]
        reason: Option<String>,
    },
    /// Change the train number.
    SetTrainNumber {
        /// New train number.
        number: String,
    },
    /// Replace the welcome message. Empty or missing clears it.
    SetWelcomeMessage {
        /// New message.
        #[serde(default)]
        message: Option<String>,
    },
    /// Show the stock welcome message, or hide the current one.
    ToggleWelcomeMessage,
    /// Change the platform label of the next stop.
    SetNextPlatform {
        /// New label, e.g. `"Gl 4"`. Empty clears it.
        label: String,
    },
    /// Replace the footer ticker text.
    SetFooterMessage {
        /// New text.
        message: String,
    },
    /// Set the displayed speed.
    SetSpeed {
        /// Speed in km/h.
        kmh: u32,
    },
    /// Set the remaining travel time text.
    SetRemainingTravelTime {
        /// Free text, e.g. `"2 Std. 10 Min."`. Empty clears it.
        text: String,
    },
    /// Set the door side.
    SetExitSide {
        /// New side.
        side: ExitSide,
    },
    /// Flip the wifi indicator.
    ToggleWifi,
    /// Remove all connections, or restore the stock ones when there are none.
    ToggleConnections,
    /// Return to the start of the route with stock telemetry and messages.
    Reset,
}

/// Why a command could not produce a replacement record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlError {
    /// The route has no stops to navigate.
    EmptyRoute,
    /// A jump target outside the route.
    StopOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of stops.
        len: usize,
    },
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlError::EmptyRoute => write!(f, "route has no stops"),
            ControlError::StopOutOfRange { index, len } => {
                write!(f, "stop {} out of range for {} stops", index, len)
            }
        }
    }
}

impl std::error::Error for ControlError {}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

impl DevCommand {
    /// Short name for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            DevCommand::NextStop => "next_stop",
            DevCommand::PreviousStop => "previous_stop",
            DevCommand::JumpToStop { .. } => "jump_to_stop",
            DevCommand::JumpToEnd => "jump_to_end",
            DevCommand::SetDelay { .. } => "set_delay",
            DevCommand::QuickDelay { .. } => "quick_delay",
            DevCommand::SetDelayReason { .. } => "set_delay_reason",
            DevCommand::SetTrainNumber { .. } => "set_train_number",
            DevCommand::SetWelcomeMessage { .. } => "set_welcome_message",
            DevCommand::ToggleWelcomeMessage => "toggle_welcome_message",
            DevCommand::SetNextPlatform { .. } => "set_next_platform",
            DevCommand::SetFooterMessage { .. } => "set_footer_message",
            DevCommand::SetSpeed { .. } => "set_speed",
            DevCommand::SetRemainingTravelTime { .. } => "set_remaining_travel_time",
            DevCommand::SetExitSide { .. } => "set_exit_side",
            DevCommand::ToggleWifi => "toggle_wifi",
            DevCommand::ToggleConnections => "toggle_connections",
            DevCommand::Reset => "reset",
        }
    }

    /// Does this command move the train along the route?
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            DevCommand::NextStop
                | DevCommand::PreviousStop
                | DevCommand::JumpToStop { .. }
                | DevCommand::JumpToEnd
                | DevCommand::Reset
        )
    }

    /// Compute the replacement record for `current`.
    ///
    /// `current` is left untouched; the returned record is complete.
    pub fn apply(&self, current: &JourneyState) -> Result<JourneyState, ControlError> {
        let mut next = current.clone();
        if self.is_navigation() && next.stops.is_empty() {
            return Err(ControlError::EmptyRoute);
        }

        match self {
            DevCommand::NextStop => {
                if next.current_index < next.last_index() {
                    next.position_at(next.current_index + 1);
                }
            }
            DevCommand::PreviousStop => {
                if next.current_index > 0 {
                    next.position_at(next.current_index - 1);
                }
            }
            DevCommand::JumpToStop { index } => {
                if *index >= next.stops.len() {
                    return Err(ControlError::StopOutOfRange {
                        index: *index,
                        len: next.stops.len(),
                    });
                }
                next.position_at(*index);
            }
            DevCommand::JumpToEnd => {
                let last = next.last_index();
                next.current_index = last;
                next.next_index = last;
            }
            DevCommand::SetDelay { minutes, reason } => {
                next.delay_minutes = *minutes;
                next.delay_reason = if *minutes > 0 {
                    non_empty(reason.clone()).or_else(|| Some(DEFAULT_DELAY_REASON.to_string()))
                } else {
                    None
                };
            }
            DevCommand::QuickDelay { minutes } => {
                next.delay_minutes = *minutes;
                next.delay_reason = (*minutes > 0).then(|| DEFAULT_DELAY_REASON.to_string());
            }
            DevCommand::SetDelayReason { reason } => {
                next.delay_reason = non_empty(reason.clone());
            }
            DevCommand::SetTrainNumber { number } => {
                next.train_number = number.trim().to_string();
            }
            DevCommand::SetWelcomeMessage { message } => {
                next.welcome_message = non_empty(message.clone());
            }
            DevCommand::ToggleWelcomeMessage => {
                next.welcome_message = match next.welcome_message {
                    Some(_) => None,
                    None => Some(DEFAULT_WELCOME_MESSAGE.to_string()),
                };
            }
            DevCommand::SetNextPlatform { label } => {
                let index = next.next_index;
                if let Some(stop) = next.stops.get_mut(index) {
                    stop.platform_display = non_empty(Some(label.clone()));
                }
            }
            DevCommand::SetFooterMessage { message } => {
                next.footer_message = Some(message.clone());
            }
            DevCommand::SetSpeed { kmh } => {
                next.speed_kmh = Some(*kmh);
            }
            DevCommand::SetRemainingTravelTime { text } => {
                next.remaining_travel_time = non_empty(Some(text.clone()));
            }
            DevCommand::SetExitSide { side } => {
                next.exit_side = Some(*side);
            }
            DevCommand::ToggleWifi => {
                next.wifi_available = !next.wifi_available;
            }
            DevCommand::ToggleConnections => {
                next.connections = if next.connection_list().is_empty() {
                    Some(default_connections())
                } else {
                    None
                };
            }
            DevCommand::Reset => {
                next.position_at(0);
                next.delay_minutes = 0;
                next.delay_reason = None;
                next.speed_kmh = Some(FIXTURE_SPEED_KMH);
                next.wifi_available = true;
                next.remaining_travel_time = Some(FIXTURE_REMAINING_TRAVEL_TIME.to_string());
                next.exit_side = Some(ExitSide::Right);
                next.footer_message = Some(DEFAULT_FOOTER_MESSAGE.to_string());
                next.welcome_message = None;
                next.connections = None;
            }
        }

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::fixture_journey;

    #[test]
    fn next_stop_advances_both_indices() {
        let journey = fixture_journey();
        let moved = DevCommand::NextStop.apply(&journey).unwrap();
        assert_eq!((moved.current_index, moved.next_index), (1, 2));
        // input untouched
        assert_eq!((journey.current_index, journey.next_index), (0, 1));
    }

    #[test]
    fn next_stop_onto_last_clamps_next_index() {
        let mut journey = fixture_journey();
        let last = journey.last_index();
        journey.position_at(last - 1);
        let moved = DevCommand::NextStop.apply(&journey).unwrap();
        assert_eq!((moved.current_index, moved.next_index), (last, last));
        assert!(moved.is_end_of_route());

        let again = DevCommand::NextStop.apply(&moved).unwrap();
        assert_eq!(again, moved);
    }

    #[test]
    fn previous_stop_at_start_is_noop() {
        let journey = fixture_journey();
        assert_eq!(DevCommand::PreviousStop.apply(&journey).unwrap(), journey);
    }

    #[test]
    fn previous_stop_from_end_reopens_next() {
        let journey = DevCommand::JumpToEnd.apply(&fixture_journey()).unwrap();
        let back = DevCommand::PreviousStop.apply(&journey).unwrap();
        assert_eq!(back.next_index, back.current_index + 1);
        assert!(!back.is_end_of_route());
    }

    #[test]
    fn jump_out_of_range_is_rejected() {
        let journey = fixture_journey();
        assert_eq!(
            DevCommand::JumpToStop { index: 17 }.apply(&journey),
            Err(ControlError::StopOutOfRange { index: 17, len: 17 })
        );
    }

    #[test]
    fn delay_reason_defaults_and_clears() {
        let journey = fixture_journey();
        let delayed = DevCommand::SetDelay { minutes: 7, reason: None }.apply(&journey).unwrap();
        assert_eq!(delayed.delay_reason.as_deref(), Some(DEFAULT_DELAY_REASON));

        let custom = DevCommand::SetDelay {
            minutes: 7,
            reason: Some("Polizeieinsatz".into()),
        }
        .apply(&journey)
        .unwrap();
        assert_eq!(custom.delay_reason.as_deref(), Some("Polizeieinsatz"));

        let cleared = DevCommand::QuickDelay { minutes: 0 }.apply(&custom).unwrap();
        assert_eq!(cleared.delay_minutes, 0);
        assert_eq!(cleared.delay_reason, None);
    }

    #[test]
    fn toggles_flip() {
        let journey = fixture_journey();
        let off = DevCommand::ToggleWifi.apply(&journey).unwrap();
        assert!(!off.wifi_available);
        assert!(DevCommand::ToggleWifi.apply(&off).unwrap().wifi_available);

        let hidden = DevCommand::ToggleConnections.apply(&journey).unwrap();
        assert!(hidden.connection_list().is_empty());
        let restored = DevCommand::ToggleConnections.apply(&hidden).unwrap();
        assert_eq!(restored.connection_list(), default_connections().as_slice());

        let welcome = DevCommand::ToggleWelcomeMessage.apply(&journey).unwrap();
        assert_eq!(welcome.welcome_message.as_deref(), Some(DEFAULT_WELCOME_MESSAGE));
        assert_eq!(DevCommand::ToggleWelcomeMessage.apply(&welcome).unwrap().welcome_message, None);
    }

    #[test]
    fn set_next_platform_edits_only_next_stop() {
        let journey = fixture_journey();
        let edited = DevCommand::SetNextPlatform { label: "Gl 4a".into() }
            .apply(&journey)
            .unwrap();
        assert_eq!(edited.stops[1].platform_display.as_deref(), Some("Gl 4a"));
        assert_eq!(edited.stops[0], journey.stops[0]);
        assert_eq!(edited.stops[2], journey.stops[2]);
    }

    #[test]
    fn reset_restores_start_of_route() {
        let mut journey = DevCommand::JumpToEnd.apply(&fixture_journey()).unwrap();
        journey.speed_kmh = Some(0);
        journey.wifi_available = false;
        let reset = DevCommand::Reset.apply(&journey).unwrap();
        assert_eq!((reset.current_index, reset.next_index), (0, 1));
        assert_eq!(reset.delay_minutes, 0);
        assert_eq!(reset.speed_kmh, Some(FIXTURE_SPEED_KMH));
        assert!(reset.wifi_available);
        assert_eq!(reset.connections, None);
        assert_eq!(reset.validate(), Ok(()));
    }

    #[test]
    fn json_tags() {
        let cmd: DevCommand =
            serde_json::from_str(r#"{"action": "set_exit_side", "side": "links"}"#).unwrap();
        assert_eq!(cmd, DevCommand::SetExitSide { side: ExitSide::Left });
        let cmd: DevCommand = serde_json::from_str(r#"{"action": "jump_to_stop", "index": 3}"#).unwrap();
        assert_eq!(cmd.name(), "jump_to_stop");
        assert!(serde_json::from_str::<DevCommand>(r#"{"action": "fly"}"#).is_err());
    }

    #[test]
    fn navigation_on_empty_route_is_an_error() {
        let mut journey = fixture_journey();
        journey.stops.clear();
        assert_eq!(DevCommand::NextStop.apply(&journey), Err(ControlError::EmptyRoute));
        assert!(DevCommand::ToggleWifi.apply(&journey).is_ok());
    }
}
