//! History entries.

use chrono::{DateTime, Utc};

use crate::LinkState;

/// One observation of an interface's up/down state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoryRecord {
    pub timestamp: DateTime<Utc>,
    pub status: LinkState,
}

impl HistoryRecord {
    pub fn new(timestamp: DateTime<Utc>, status: LinkState) -> Self {
        Self { timestamp, status }
    }
}
