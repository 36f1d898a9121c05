//! Storage error carrying the source location that raised it.

use derive_more::{Display, Error};
use tracing::instrument;

/// Database failure with the file and line where it was raised.
#[derive(Debug, Clone, Display, Error)]
#[display("Database error: {} at {}:{}", message, file, line)]
pub struct DbError {
    /// What went wrong.
    pub message: String,
    /// Line that raised the error.
    pub line: u32,
    /// File that raised the error.
    pub file: &'static str,
}

impl DbError {
    /// Records the caller's location alongside the message.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(format!("Query failed: {}", err))
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("Connection failed: {}", err))
    }
}
