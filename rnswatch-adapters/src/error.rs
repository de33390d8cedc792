//! Error types for stats sources.

use thiserror::Error;

/// Errors that can occur when fetching interface statistics.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Reading the stats document or spawning the stats command failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stats command ran but reported failure.
    #[error("Command failed ({status}): {stderr}")]
    Command { status: String, stderr: String },

    /// The stats document could not be parsed.
    #[error("Failed to parse stats: {0}")]
    Parse(String),

    /// The stack returned no statistics at all.
    #[error("No interface statistics available")]
    Empty,
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        AdapterError::Parse(err.to_string())
    }
}
