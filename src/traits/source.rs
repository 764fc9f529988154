//! Where the journey record comes from.

use core::fmt;

use crate::journey::{JourneyError, JourneyState};

/// Failure to load a journey record.
#[derive(Debug)]
pub enum SourceError {
    /// Reading the backing data failed.
    Io(std::io::Error),
    /// The data was not a valid journey document.
    Parse(serde_json::Error),
    /// The document parsed but broke a journey invariant.
    Invalid(JourneyError),
    /// The source could not produce data for another reason.
    Unavailable(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Io(e) => write!(f, "failed to read journey data: {}", e),
            SourceError::Parse(e) => write!(f, "failed to parse journey data: {}", e),
            SourceError::Invalid(e) => write!(f, "invalid journey data: {}", e),
            SourceError::Unavailable(reason) => write!(f, "journey data unavailable: {}", reason),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::Io(e) => Some(e),
            SourceError::Parse(e) => Some(e),
            SourceError::Invalid(e) => Some(e),
            SourceError::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for SourceError {
    fn from(e: std::io::Error) -> Self {
        SourceError::Io(e)
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(e: serde_json::Error) -> Self {
        SourceError::Parse(e)
    }
}

impl From<JourneyError> for SourceError {
    fn from(e: JourneyError) -> Self {
        SourceError::Invalid(e)
    }
}

/// Provider of the initial journey record.
///
/// The board calls [`load`](Self::load) once at startup and again on an
/// explicit reload. Implementations return validated records.
pub trait JourneySource: Send + Sync {
    /// Load a fresh journey record.
    fn load(&self) -> Result<JourneyState, SourceError>;

    /// Short description for log lines.
    fn describe(&self) -> String;
}
