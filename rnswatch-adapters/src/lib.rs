//! # rnswatch-adapters
//!
//! Stats sources for collecting per-interface statistics from a running
//! Reticulum stack.
//!
//! ## Supported Sources
//!
//! - **rnstatus** (`rnstatus` feature) - Runs the `rnstatus` utility in JSON
//!   mode against the shared Reticulum instance
//! - **file** (`file` feature) - Reads a stats document from disk, for
//!   setups where another process dumps `rnstatus -j` output periodically
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rnswatch_adapters::{RnstatusSource, StatsSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = RnstatusSource::builder()
//!         .config_dir("/etc/reticulum")
//!         .build();
//!
//!     let stats = source.fetch().await?;
//!     println!("Collected {} interfaces", stats.len());
//!     Ok(())
//! }
//! ```

use std::fmt::Debug;

use async_trait::async_trait;

pub mod error;

#[cfg(feature = "file")]
pub mod file;

#[cfg(feature = "rnstatus")]
pub mod rnstatus;

pub use error::AdapterError;

#[cfg(feature = "file")]
pub use file::FileSource;

#[cfg(feature = "rnstatus")]
pub use rnstatus::{RnstatusSource, RnstatusSourceBuilder};

// Re-export types for convenience
pub use rnswatch_types::{InterfaceStats, RawInterfaceRecord};

/// A collaborator that reports raw interface statistics.
///
/// Each call returns the complete statistics for every interface, or an
/// error if the stack could not be queried. Implementations should not
/// cache; every fetch reflects the stack at that moment.
#[async_trait]
pub trait StatsSource: Send + Sync + Debug {
    /// Query the stack for the current interface statistics.
    async fn fetch(&self) -> Result<InterfaceStats, AdapterError>;

    /// Human-readable description of the source, used in logs.
    fn description(&self) -> &str;
}

/// Parse a stats document.
///
/// Blank input and a JSON `null` document both mean the stack had nothing
/// to report and yield [`AdapterError::Empty`].
pub fn parse_stats(bytes: &[u8]) -> Result<InterfaceStats, AdapterError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(AdapterError::Empty);
    }

    let stats: Option<InterfaceStats> = serde_json::from_slice(bytes)?;
    stats.ok_or(AdapterError::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_stats_reads_interfaces() {
        let doc = br#"{"interfaces": [{"name": "Local", "status": true, "mode": 1, "rxb": 1, "txb": 2}]}"#;
        let stats = parse_stats(doc).unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats.interfaces[0].name, "Local");
    }

    #[test]
    fn null_and_blank_documents_are_empty() {
        assert!(matches!(parse_stats(b"null"), Err(AdapterError::Empty)));
        assert!(matches!(parse_stats(b"  \n"), Err(AdapterError::Empty)));
        assert!(matches!(parse_stats(b""), Err(AdapterError::Empty)));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let err = parse_stats(b"Could not get RNS status").unwrap_err();
        assert!(matches!(err, AdapterError::Parse(_)));
        assert!(err.to_string().starts_with("Failed to parse stats"));
    }

    #[test]
    fn empty_interface_list_is_not_an_error() {
        let stats = parse_stats(br#"{"interfaces": []}"#).unwrap();
        assert!(stats.is_empty());
    }
}
