//! Service settings.
//!
//! Resolved once at startup from, in increasing precedence: built-in
//! defaults, an optional TOML file, `RNSWATCH_*` environment variables and
//! command-line flags.
//!
//! ```toml
//! listen = "0.0.0.0:8080"
//! static_dir = "/usr/share/rnswatch/static"
//! hide_addresses = true
//! hide_client_interfaces = true
//! poll_interval_secs = 60
//!
//! [source]
//! kind = "rnstatus"
//! config_dir = "/etc/reticulum"
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use rnswatch_adapters::{FileSource, RnstatusSource, StatsSource};
use rnswatch_core::PrivacyFilter;
use serde::Deserialize;

use crate::Args;

/// Settings file read when `--config` is not given. It may be absent.
pub const DEFAULT_SETTINGS_FILE: &str = "rnswatch.toml";

/// Where interface statistics come from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceSettings {
    /// Run `rnstatus -j` against the local Reticulum instance.
    Rnstatus {
        #[serde(default = "default_rnstatus_program")]
        program: PathBuf,
        #[serde(default)]
        config_dir: Option<PathBuf>,
    },
    /// Read a stats document from disk.
    File { path: PathBuf },
}

impl Default for SourceSettings {
    fn default() -> Self {
        SourceSettings::Rnstatus {
            program: default_rnstatus_program(),
            config_dir: None,
        }
    }
}

impl SourceSettings {
    pub fn build(&self) -> Arc<dyn StatsSource> {
        match self {
            SourceSettings::Rnstatus {
                program,
                config_dir,
            } => {
                let mut builder = RnstatusSource::builder().program(program);
                if let Some(dir) = config_dir {
                    builder = builder.config_dir(dir);
                }
                Arc::new(builder.build())
            }
            SourceSettings::File { path } => Arc::new(FileSource::new(path)),
        }
    }
}

fn default_rnstatus_program() -> PathBuf {
    PathBuf::from("rnstatus")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub listen: String,
    pub static_dir: PathBuf,
    pub hide_addresses: bool,
    pub hide_client_interfaces: bool,
    pub poll_interval_secs: u64,
    pub source_timeout_secs: u64,
    #[serde(default)]
    pub source: SourceSettings,
}

impl Settings {
    /// Load settings for the given command line.
    ///
    /// A settings file named with `--config` must exist.
    pub fn load(args: &Args) -> Result<Self> {
        let (path, required) = match &args.config {
            Some(path) => (path.as_path(), true),
            None => (Path::new(DEFAULT_SETTINGS_FILE), false),
        };
        let env = Environment::with_prefix("RNSWATCH");

        let mut settings = Self::from_sources(path, required, env)?;
        settings.apply_args(args);
        settings.validate()?;
        Ok(settings)
    }

    fn from_sources(path: &Path, required: bool, env: Environment) -> Result<Self> {
        let config = Config::builder()
            .set_default("listen", "127.0.0.1:8080")?
            .set_default("static_dir", "static")?
            .set_default("hide_addresses", false)?
            .set_default("hide_client_interfaces", false)?
            .set_default("poll_interval_secs", 60)?
            .set_default("source_timeout_secs", 10)?
            .add_source(File::from(path).format(FileFormat::Toml).required(required))
            .add_source(env.prefix_separator("_").separator("__").try_parsing(true))
            .build()
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        config.try_deserialize().context("Invalid settings")
    }

    fn apply_args(&mut self, args: &Args) {
        if let Some(listen) = &args.listen {
            self.listen = listen.clone();
        }
        if let Some(dir) = &args.static_dir {
            self.static_dir = dir.clone();
        }
        if args.hide_addresses {
            self.hide_addresses = true;
        }
        if args.hide_client_interfaces {
            self.hide_client_interfaces = true;
        }
        if let Some(secs) = args.interval {
            self.poll_interval_secs = secs;
        }

        if let Some(path) = &args.stats_file {
            self.source = SourceSettings::File { path: path.clone() };
        } else if args.rnstatus.is_some() || args.rnsconfig.is_some() {
            let (mut program, mut config_dir) = match &self.source {
                SourceSettings::Rnstatus {
                    program,
                    config_dir,
                } => (program.clone(), config_dir.clone()),
                SourceSettings::File { .. } => (default_rnstatus_program(), None),
            };
            if let Some(path) = &args.rnstatus {
                program = path.clone();
            }
            if let Some(dir) = &args.rnsconfig {
                config_dir = Some(dir.clone());
            }
            self.source = SourceSettings::Rnstatus {
                program,
                config_dir,
            };
        }
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.poll_interval_secs > 0,
            "poll_interval_secs must be at least 1"
        );
        anyhow::ensure!(
            self.source_timeout_secs > 0,
            "source_timeout_secs must be at least 1"
        );
        Ok(())
    }

    pub fn privacy(&self) -> PrivacyFilter {
        PrivacyFilter::new(self.hide_addresses, self.hide_client_interfaces)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout_secs)
    }
}
