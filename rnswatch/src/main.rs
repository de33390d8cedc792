use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rnswatch_core::{Scheduler, ServerConfig, StatusAggregator, StatusServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod settings;

use settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "rnswatch")]
#[command(about = "Web status monitor for the interfaces of a Reticulum node")]
#[command(version)]
pub struct Args {
    /// Path to the settings file [default: rnswatch.toml, if present]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to serve the dashboard on (host:port)
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Directory holding the dashboard files
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// Read interface stats from this JSON file instead of running rnstatus
    #[arg(long, conflicts_with_all = ["rnstatus", "rnsconfig"])]
    pub stats_file: Option<PathBuf>,

    /// Reticulum config directory passed to rnstatus
    #[arg(long)]
    pub rnsconfig: Option<PathBuf>,

    /// Path to the rnstatus executable
    #[arg(long)]
    pub rnstatus: Option<PathBuf>,

    /// Replace IPv4 addresses in interface names with [hidden]
    #[arg(long)]
    pub hide_addresses: bool,

    /// Leave per-client TCP interfaces out of the status
    #[arg(long)]
    pub hide_client_interfaces: bool,

    /// Background poll interval in seconds
    #[arg(short, long)]
    pub interval: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let settings = Settings::load(&args)?;

    let source = settings.source.build();
    info!(
        source = source.description(),
        listen = %settings.listen,
        interval_secs = settings.poll_interval_secs,
        hide_addresses = settings.hide_addresses,
        hide_client_interfaces = settings.hide_client_interfaces,
        "Starting rnswatch"
    );

    let aggregator = Arc::new(
        StatusAggregator::builder(source)
            .privacy(settings.privacy())
            .timeout(settings.source_timeout())
            .build(),
    );

    let scheduler = Scheduler::new(aggregator.clone())
        .interval(settings.poll_interval())
        .start();

    let server = StatusServer::new(
        ServerConfig::builder()
            .listen_addr(settings.listen.clone())
            .static_dir(settings.static_dir.clone())
            .build(),
        aggregator,
    );
    let listener = server
        .bind()
        .await
        .with_context(|| format!("Failed to listen on {}", settings.listen))?;
    let server_task = tokio::spawn(server.serve(listener));

    tokio::signal::ctrl_c()
        .await
        .context("Failed to wait for Ctrl-C")?;

    info!("Shutting down");
    scheduler.stop().await;
    server_task.abort();
    Ok(())
}
