//! Journey sources: the built-in fixture and JSON files.
//!
//! The board is seeded once from a [`JourneySource`]. [`FixtureSource`]
//! returns the demo run below; [`FileSource`] reads the same document shape
//! from disk so another run can be shown without recompiling.

use std::path::{Path, PathBuf};

use log::debug;

use crate::journey::{Connection, ExitSide, JourneyState, Stop, DEFAULT_FOOTER_MESSAGE};
use crate::time::TimeOfDay;
use crate::traits::{JourneySource, SourceError};

/// Build a time of day from constants known to be in range.
const fn hm(hour: u8, minute: u8) -> TimeOfDay {
    match TimeOfDay::new(hour, minute) {
        Some(t) => t,
        None => TimeOfDay::MIDNIGHT,
    }
}

fn stop(name: &str, arrival: TimeOfDay, departure: TimeOfDay, platform: &str) -> Stop {
    Stop::new(name, arrival, departure).with_platform(platform)
}

/// Speed shown by the demo run and restored by a reset.
pub const FIXTURE_SPEED_KMH: u32 = 187;

/// Remaining travel time shown by the demo run and restored by a reset.
pub const FIXTURE_REMAINING_TRAVEL_TIME: &str = "6 Std. 45 Min.";

/// Connections restored by the connections toggle.
pub fn default_connections() -> Vec<Connection> {
    vec![
        Connection {
            line: "ICE 698".into(),
            destination: "Berlin-Gesundbrunnen".into(),
            platform: "11".into(),
            departure: hm(20, 15),
        },
        Connection {
            line: "U5".into(),
            destination: "Preungesheim, Frankfurt a.".into(),
            platform: "A".into(),
            departure: hm(20, 18),
        },
    ]
}

/// The demo run: ICE 621 from Köln Messe/Deutz to München Hbf.
pub fn fixture_journey() -> JourneyState {
    let mut connections = default_connections();
    connections.push(Connection {
        line: "S2".into(),
        destination: "Niederhausen (Taunus)".into(),
        platform: "103".into(),
        departure: hm(20, 22),
    });

    JourneyState {
        train_number: "ICE 621".into(),
        origin: "Köln Messe/Deutz".into(),
        destination: "München Hbf".into(),
        stops: vec![
            stop("Butzbach Bahnhof", hm(16, 55), hm(16, 57), "1"),
            stop("Langgöns", hm(17, 18), hm(17, 19), "8"),
            stop("Wetzlar", hm(17, 28), hm(17, 30), "2"),
            stop("Gießen Bahnhof", hm(17, 42), hm(17, 44), "5"),
            stop("Marburg (Lahn)", hm(17, 58), hm(18, 0), "3"),
            stop("Kassel-Wilhelmshöhe", hm(18, 25), hm(18, 28), "7"),
            stop("Fulda", hm(18, 55), hm(18, 57), "4"),
            stop("Aschaffenburg Hbf", hm(19, 35), hm(19, 37), "3"),
            stop("Hanau Hbf", hm(19, 52), hm(19, 54), "6"),
            stop("Frankfurt Hbf", hm(20, 5), hm(20, 10), "9"),
            stop("Frankfurt(M)Flughafen", hm(20, 25), hm(20, 27), "4"),
            stop("Mannheim Hbf", hm(21, 5), hm(21, 8), "12"),
            stop("Heidelberg Hbf", hm(21, 22), hm(21, 24), "2"),
            stop("Stuttgart Hbf", hm(22, 5), hm(22, 10), "15"),
            stop("Ulm Hbf", hm(22, 48), hm(22, 50), "8"),
            stop("Augsburg Hbf", hm(23, 18), hm(23, 20), "5"),
            stop("München Hbf", hm(23, 55), hm(23, 55), "18"),
        ],
        current_index: 0,
        next_index: 1,
        delay_minutes: 10,
        delay_reason: Some("Verspätung: Weichenstörung".into()),
        footer_message: Some(DEFAULT_FOOTER_MESSAGE.into()),
        welcome_message: None,
        exit_side: Some(ExitSide::Right),
        connections: Some(connections),
        speed_kmh: Some(FIXTURE_SPEED_KMH),
        remaining_travel_time: Some(FIXTURE_REMAINING_TRAVEL_TIME.into()),
        wifi_available: true,
        car_sequence: None,
        special_messages: Vec::new(),
    }
}

/// Source returning [`fixture_journey`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FixtureSource;

impl JourneySource for FixtureSource {
    fn load(&self) -> Result<JourneyState, SourceError> {
        Ok(fixture_journey())
    }

    fn describe(&self) -> String {
        "built-in fixture".to_string()
    }
}

/// Source reading a journey JSON document from disk on every load.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Read from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl JourneySource for FileSource {
    fn load(&self) -> Result<JourneyState, SourceError> {
        debug!("reading journey from {}", self.path.display());
        let bytes = std::fs::read(&self.path)?;
        let journey: JourneyState = serde_json::from_slice(&bytes)?;
        journey.validate()?;
        Ok(journey)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_has_expected_shape() {
        let journey = fixture_journey();
        assert_eq!(journey.stops.len(), 17);
        assert_eq!(journey.stops[16].name, "München Hbf");
        assert_eq!(journey.stops[1].platform_display.as_deref(), Some("Gl 8"));
        assert_eq!(journey.connection_list().len(), 3);
    }

    #[test]
    fn file_source_round_trips_fixture() {
        let path = std::env::temp_dir().join(format!("pis-board-{}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_vec(&fixture_journey()).unwrap()).unwrap();

        let loaded = FileSource::new(&path).load().unwrap();
        assert_eq!(loaded, fixture_journey());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn file_source_reports_missing_file() {
        let source = FileSource::new("/nonexistent/pis-board/journey.json");
        assert!(matches!(source.load(), Err(SourceError::Io(_))));
    }

    #[test]
    fn file_source_rejects_invalid_record() {
        let mut journey = fixture_journey();
        journey.next_index = 99;
        let path = std::env::temp_dir().join(format!("pis-board-invalid-{}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_vec(&journey).unwrap()).unwrap();

        assert!(matches!(FileSource::new(&path).load(), Err(SourceError::Invalid(_))));
        let _ = std::fs::remove_file(&path);
    }
}
