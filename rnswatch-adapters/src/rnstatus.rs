//! Stats source backed by the `rnstatus` utility.
//!
//! `rnstatus -j` connects to the shared Reticulum instance and prints the
//! interface statistics as a single JSON document. This source runs it once
//! per fetch and parses stdout.
//!
//! ## Example
//!
//! ```rust,no_run
//! use rnswatch_adapters::{RnstatusSource, StatsSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = RnstatusSource::builder()
//!         .program("/usr/local/bin/rnstatus")
//!         .build();
//!
//!     for interface in source.fetch().await?.interfaces {
//!         println!("{}: {}", interface.name, interface.status);
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use rnswatch_types::InterfaceStats;
use tokio::process::Command;
use tracing::debug;

use crate::{parse_stats, AdapterError, StatsSource};

const DEFAULT_PROGRAM: &str = "rnstatus";

/// Runs `rnstatus -j` to collect interface statistics.
#[derive(Debug, Clone)]
pub struct RnstatusSource {
    program: PathBuf,
    config_dir: Option<PathBuf>,
    description: String,
}

impl RnstatusSource {
    /// Create a new builder for configuring the source.
    pub fn builder() -> RnstatusSourceBuilder {
        RnstatusSourceBuilder::default()
    }

    /// Arguments passed to the program on every fetch.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["-j".to_string()];
        if let Some(dir) = &self.config_dir {
            args.push("--config".to_string());
            args.push(dir.display().to_string());
        }
        args
    }
}

impl Default for RnstatusSource {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[async_trait]
impl StatsSource for RnstatusSource {
    async fn fetch(&self) -> Result<InterfaceStats, AdapterError> {
        let output = Command::new(&self.program)
            .args(self.args())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            // rnstatus reports a missing shared instance on stdout
            let stderr = if stderr.is_empty() {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            } else {
                stderr
            };
            return Err(AdapterError::Command {
                status: output.status.to_string(),
                stderr,
            });
        }

        debug!(bytes = output.stdout.len(), "rnstatus returned");
        parse_stats(&output.stdout)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for RnstatusSource.
#[derive(Debug, Default)]
pub struct RnstatusSourceBuilder {
    program: Option<PathBuf>,
    config_dir: Option<PathBuf>,
}

impl RnstatusSourceBuilder {
    /// Path to the `rnstatus` executable (default: `rnstatus` on `PATH`).
    pub fn program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = Some(program.into());
        self
    }

    /// Reticulum config directory of the instance to query.
    pub fn config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(dir.into());
        self
    }

    /// Build the source.
    pub fn build(self) -> RnstatusSource {
        let program = self
            .program
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROGRAM));
        let description = format!("rnstatus: {}", program.display());

        RnstatusSource {
            program,
            config_dir: self.config_dir,
            description,
        }
    }
}
