//! Error types
//!
//! Losing a life or the match is a game outcome and never shows up here.
//! These cover the two ways things can genuinely go wrong: the tracker never
//! gives us a usable field, or the settings file is bad.

use crate::marker::MarkerId;

/// Unrecoverable tracking failures. Carried by the `Error` game state.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackingError {
    /// The four walls never formed a valid field within the search timeout.
    WallSearchTimedOut { waited_secs: f32 },

    /// A marker handle no longer resolves in the registry.
    MissingMarker(MarkerId),
}

impl std::fmt::Display for TrackingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WallSearchTimedOut { waited_secs } => {
                write!(f, "walls not found after {:.1}s", waited_secs)
            }
            Self::MissingMarker(id) => write!(f, "marker {} is not registered", id),
        }
    }
}

impl std::error::Error for TrackingError {}

/// Settings loading and validation errors.
#[derive(Debug)]
pub enum SettingsError {
    /// Reading or writing the settings file failed.
    Io(std::io::Error),

    /// The settings file is not valid JSON for `GameSettings`.
    Parse(serde_json::Error),

    /// A value is out of range.
    Invalid(&'static str),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "settings I/O failed: {}", e),
            Self::Parse(e) => write!(f, "settings parse failed: {}", e),
            Self::Invalid(reason) => write!(f, "invalid settings: {}", reason),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}
