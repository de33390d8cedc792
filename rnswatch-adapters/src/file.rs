//! File-backed stats source.
//!
//! Reads a stats document (the JSON `rnstatus -j` prints) from disk on
//! every fetch. Useful when the monitor cannot reach the shared instance
//! directly and another process dumps the statistics periodically.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rnswatch_types::InterfaceStats;

use crate::{parse_stats, AdapterError, StatsSource};

/// A stats source that reads interface statistics from a JSON file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    description: String,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StatsSource for FileSource {
    async fn fetch(&self) -> Result<InterfaceStats, AdapterError> {
        let content = tokio::fs::read(&self.path).await?;
        parse_stats(&content)
    }

    fn description(&self) -> &str {
        &self.description
    }
}
