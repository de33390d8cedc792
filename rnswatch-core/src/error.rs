//! Error type for a failed polling cycle.

use std::time::Duration;

use rnswatch_adapters::AdapterError;
use thiserror::Error;

/// Why a polling cycle produced no snapshot.
///
/// Any of these leaves the history untouched. Callers treat every variant
/// the same way (the status is unavailable); the variants exist for logs.
#[derive(Debug, Error)]
pub enum PollError {
    /// The stats source failed or had nothing to report.
    #[error("stats source unavailable: {0}")]
    Source(#[from] AdapterError),

    /// The stats source did not answer in time.
    #[error("stats source timed out after {0:?}")]
    Timeout(Duration),

    /// A record could not be converted. `name` is the redacted identifier.
    #[error("malformed record for interface {name:?}: {reason}")]
    MalformedRecord { name: String, reason: String },
}
