//! Integration tests for developer controls and journey replacement

use std::sync::Arc;

use pis_board::config::Config;
use pis_board::controls::{FOOTER_TEMPLATES, QUICK_DELAY_PRESETS};
use pis_board::hal::{MockClock, MockSource};
use pis_board::services::{SharedDisplayState, StateError};
use pis_board::{
    fixture_journey, ControlError, DevCommand, DisplayView, ExitSide, JourneyError, JourneyState,
    VisibilityOptions,
};

fn shared() -> SharedDisplayState {
    SharedDisplayState::new(
        MockSource::new(fixture_journey()),
        MockClock::at_hm(17, 0),
        &Config::default(),
    )
    .unwrap()
}

#[test]
fn advancing_past_last_stop_reaches_terminal_state() {
    let mut journey = fixture_journey();
    let last = journey.last_index();
    for _ in 0..40 {
        journey = DevCommand::NextStop.apply(&journey).unwrap();
        assert!(journey.validate().is_ok());
    }
    assert_eq!(journey.current_index, last);
    assert_eq!(journey.next_index, last);

    let view = DisplayView::derive(&journey, MockClock::date_at(23, 0, 0), &VisibilityOptions::always_show());
    assert!(view.end_of_route);
    assert!(view.next_stop.is_none());
    assert!(!view.connections.visible);
}

#[test]
fn previous_stop_leaves_terminal_state() {
    let end = DevCommand::JumpToEnd.apply(&fixture_journey()).unwrap();
    let back = DevCommand::PreviousStop.apply(&end).unwrap();
    assert_eq!((back.current_index, back.next_index), (15, 16));
    assert!(!back.is_end_of_route());

    let start = DevCommand::PreviousStop.apply(&fixture_journey()).unwrap();
    assert_eq!((start.current_index, start.next_index), (0, 1));
}

#[test]
fn commands_parse_from_json() {
    let cases = [
        (r#"{"action":"next_stop"}"#, DevCommand::NextStop),
        (r#"{"action":"jump_to_stop","index":4}"#, DevCommand::JumpToStop { index: 4 }),
        (
            r#"{"action":"set_delay","minutes":5}"#,
            DevCommand::SetDelay {
                minutes: 5,
                reason: None,
            },
        ),
        (r#"{"action":"quick_delay","minutes":15}"#, DevCommand::QuickDelay { minutes: 15 }),
        (
            r#"{"action":"set_exit_side","side":"links"}"#,
            DevCommand::SetExitSide { side: ExitSide::Left },
        ),
        (r#"{"action":"reset"}"#, DevCommand::Reset),
    ];
    for (json, expected) in cases {
        let parsed: DevCommand = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, expected, "{json}");
    }
    assert!(serde_json::from_str::<DevCommand>(r#"{"action":"jump_to_stop"}"#).is_err());
}

#[test]
fn quick_delay_presets_set_banner() {
    let journey = fixture_journey();
    for minutes in QUICK_DELAY_PRESETS {
        let delayed = DevCommand::QuickDelay { minutes }.apply(&journey).unwrap();
        let view = DisplayView::derive(&delayed, MockClock::date_at(17, 0, 0), &VisibilityOptions::countdown());
        assert_eq!(view.delay_minutes, minutes);
        assert_eq!(view.delay_banner.is_some(), minutes > 0);
    }
}

#[test]
fn footer_templates_flow_to_view() {
    let journey = fixture_journey();
    for template in FOOTER_TEMPLATES {
        let next = DevCommand::SetFooterMessage {
            message: template.to_string(),
        }
        .apply(&journey)
        .unwrap();
        let view = DisplayView::derive(&next, MockClock::date_at(17, 0, 0), &VisibilityOptions::countdown());
        assert_eq!(view.footer_message, template);
    }
}

#[test]
fn set_next_platform_updates_only_next_stop() {
    let journey = fixture_journey();
    let next = DevCommand::SetNextPlatform {
        label: "Gl 4".into(),
    }
    .apply(&journey)
    .unwrap();
    assert_eq!(next.stops[1].platform_display.as_deref(), Some("Gl 4"));
    assert_eq!(next.stops[2], journey.stops[2]);
}

#[test]
fn shared_state_jump_out_of_range_is_rejected() {
    let state = shared();
    let err = state.apply_command(&DevCommand::JumpToStop { index: 17 }).unwrap_err();
    assert!(matches!(
        err,
        StateError::Control(ControlError::StopOutOfRange { index: 17, len: 17 })
    ));
}

#[test]
fn replace_rejects_each_broken_invariant() {
    let state = shared();

    let mut empty = fixture_journey();
    empty.stops.clear();
    empty.current_index = 0;
    empty.next_index = 0;
    assert!(matches!(
        state.replace_state(empty),
        Err(StateError::Invalid(JourneyError::EmptyRoute))
    ));

    let mut backwards = fixture_journey();
    backwards.current_index = 5;
    backwards.next_index = 3;
    assert!(matches!(
        state.replace_state(backwards),
        Err(StateError::Invalid(JourneyError::NextBeforeCurrent { .. }))
    ));

    let mut out_of_range = fixture_journey();
    out_of_range.next_index = 17;
    assert!(matches!(
        state.replace_state(out_of_range),
        Err(StateError::Invalid(JourneyError::IndexOutOfRange { .. }))
    ));

    assert_eq!(state.journey().unwrap(), fixture_journey());
}

#[test]
fn replace_is_atomic_for_concurrent_readers() {
    use std::thread;

    let state = Arc::new(shared());
    let mut alternate = fixture_journey();
    alternate.train_number = "RE 7".into();
    alternate.current_index = 8;
    alternate.next_index = 9;
    alternate.delay_minutes = 0;
    alternate.delay_reason = None;

    let writer = {
        let state = Arc::clone(&state);
        let alternate = alternate.clone();
        thread::spawn(move || {
            for i in 0..50 {
                let next: JourneyState = if i % 2 == 0 { alternate.clone() } else { fixture_journey() };
                state.replace_state(next).unwrap();
            }
        })
    };

    for _ in 0..50 {
        let seen = state.journey().unwrap();
        assert!(seen == fixture_journey() || seen == alternate, "torn record: {seen:?}");
    }
    writer.join().unwrap();
}
