//! Integration tests for the timing calculations

use pis_board::hal::MockClock;
use pis_board::timing::{next_occurrence, CONNECTIONS_WINDOW_MINUTES};
use pis_board::{connections_visible, delay_adjust, minutes_until, TimeOfDay, VisibilityOptions};

fn tod(s: &str) -> TimeOfDay {
    s.parse().unwrap()
}

#[test]
fn delay_adjust_wraps_hours_and_days() {
    assert_eq!(delay_adjust("23:55", 10).unwrap(), "00:05");
    assert_eq!(delay_adjust("16:55", 10).unwrap(), "17:05");
    assert_eq!(delay_adjust("08:30", 90).unwrap(), "10:00");
    assert_eq!(delay_adjust("22:00", 180).unwrap(), "01:00");
}

#[test]
fn delay_adjust_zero_is_identity() {
    for hour in 0..24u8 {
        for minute in [0u8, 1, 29, 59] {
            let t = TimeOfDay::new(hour, minute).unwrap().to_string();
            assert_eq!(delay_adjust(&t, 0).unwrap(), t);
        }
    }
}

#[test]
fn delay_adjust_stays_in_range_for_any_delay() {
    for delay in [1u32, 59, 60, 1439, 1440, 1441, 10_000, u32::MAX] {
        let out = delay_adjust("12:34", delay).unwrap();
        let t: TimeOfDay = out.parse().unwrap();
        assert!(t.hour() < 24 && t.minute() < 60, "{delay} -> {out}");
    }
}

#[test]
fn delay_adjust_rejects_malformed_input() {
    assert!(delay_adjust("25:00", 5).is_err());
    assert!(delay_adjust("noon", 5).is_err());
}

#[test]
fn countdown_window_visible_one_minute_out() {
    let now = MockClock::date_at(20, 13, 0);
    assert!(connections_visible(now, Some(tod("20:15")), 0, &VisibilityOptions::countdown()));

    let now = MockClock::date_at(20, 13, 30);
    assert!(connections_visible(now, Some(tod("20:15")), 0, &VisibilityOptions::countdown()));
}

#[test]
fn countdown_window_hidden_five_minutes_out() {
    let now = MockClock::date_at(20, 10, 0);
    assert!(!connections_visible(now, Some(tod("20:15")), 0, &VisibilityOptions::countdown()));
}

#[test]
fn countdown_window_edges() {
    let opts = VisibilityOptions::countdown();
    let arrival = Some(tod("20:15"));

    // exactly at arrival
    assert!(connections_visible(MockClock::date_at(20, 15, 0), arrival, 0, &opts));
    // window edge
    let edge = 15 - CONNECTIONS_WINDOW_MINUTES as u32;
    assert!(connections_visible(MockClock::date_at(20, edge, 0), arrival, 0, &opts));
    // just outside: 2 minutes 1 second away floors to 2, 3 minutes away does not
    assert!(connections_visible(MockClock::date_at(20, 12, 59), arrival, 0, &opts));
    assert!(!connections_visible(MockClock::date_at(20, 12, 0), arrival, 0, &opts));
}

#[test]
fn countdown_uses_delayed_arrival() {
    let opts = VisibilityOptions::countdown();
    // 20:15 + 10 = 20:25
    assert!(!connections_visible(MockClock::date_at(20, 14, 0), Some(tod("20:15")), 10, &opts));
    assert!(connections_visible(MockClock::date_at(20, 24, 0), Some(tod("20:15")), 10, &opts));
}

#[test]
fn countdown_across_midnight() {
    let opts = VisibilityOptions::countdown();
    assert!(connections_visible(MockClock::date_at(23, 59, 0), Some(tod("00:01")), 0, &opts));
    // 23:55 + 5 lands at 00:00 the next day
    assert!(connections_visible(MockClock::date_at(23, 58, 0), Some(tod("23:55")), 5, &opts));
    assert!(!connections_visible(MockClock::date_at(23, 56, 0), Some(tod("23:55")), 10, &opts));
}

#[test]
fn override_shows_without_schedule() {
    let opts = VisibilityOptions::always_show();
    for hour in [0, 6, 12, 23] {
        assert!(connections_visible(MockClock::date_at(hour, 0, 0), None, 0, &opts));
    }
    assert!(!connections_visible(
        MockClock::date_at(12, 0, 0),
        None,
        0,
        &VisibilityOptions::countdown()
    ));
}

#[test]
fn minutes_until_rolls_to_next_day() {
    assert_eq!(minutes_until(MockClock::date_at(23, 58, 0), Some(tod("00:05"))), Some(7));
    assert_eq!(minutes_until(MockClock::date_at(17, 0, 0), Some(tod("17:18"))), Some(18));
    assert_eq!(minutes_until(MockClock::date_at(17, 18, 0), Some(tod("17:18"))), Some(0));
    assert_eq!(minutes_until(MockClock::date_at(17, 0, 0), None), None);
}

#[test]
fn minutes_until_never_negative() {
    for hour in 0..24 {
        let now = MockClock::date_at(hour, 30, 15);
        let minutes = minutes_until(now, Some(tod("12:00"))).unwrap();
        assert!((0..24 * 60).contains(&minutes), "{hour}:30 -> {minutes}");
    }
}

#[test]
fn next_occurrence_handles_multi_day_delay() {
    let now = MockClock::date_at(10, 0, 0);
    let arrival = next_occurrence(now, tod("09:00"), 3 * 24 * 60);
    assert_eq!((arrival - now).num_hours(), 71);
}
