//! Timetable fetch errors.

use std::path::PathBuf;

use crate::domain::StopId;

/// Errors from fetching a stop's timetable document.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Server answered with something other than JSON
    #[error("expected JSON, got content type {content_type:?}")]
    NotJson { content_type: String },

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json { message: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No timetable is published for the stop
    #[error("no timetable for stop {0}")]
    NotFound(StopId),

    #[error("timed out fetching timetable for stop {0}")]
    Timeout(StopId),
}
