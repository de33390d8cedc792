//! # rnswatch-core
//!
//! Status aggregation for Reticulum network interfaces.
//!
//! This crate turns the raw interface statistics reported by a
//! [`StatsSource`](rnswatch_adapters::StatsSource) into status snapshots,
//! keeps a rolling 24 hour up/down history per interface, and serves both
//! over a small HTTP API.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use rnswatch_adapters::RnstatusSource;
//! use rnswatch_core::{PrivacyFilter, Scheduler, ServerConfig, StatusAggregator, StatusServer};
//!
//! #[tokio::main]
//! async fn main() {
//!     // One aggregator shared by the scheduler and the HTTP server
//!     let aggregator = Arc::new(
//!         StatusAggregator::builder(Arc::new(RnstatusSource::default()))
//!             .privacy(PrivacyFilter::new(true, true))
//!             .build(),
//!     );
//!
//!     // Keep history current even when nobody is looking
//!     let scheduler = Scheduler::new(aggregator.clone())
//!         .interval(Duration::from_secs(60))
//!         .start();
//!
//!     StatusServer::new(ServerConfig::default(), aggregator).start();
//!
//!     tokio::signal::ctrl_c().await.ok();
//!     scheduler.stop().await;
//! }
//! ```
//!
//! ## Features
//!
//! - **Privacy filtering**: hide IPv4 addresses and client interfaces
//! - **Bounded history**: per-interface, 24 hour window, always ordered
//! - **All-or-nothing cycles**: a failed poll never touches history
//! - **HTTP API** (`server` feature): `/api/status` plus static dashboard files

mod aggregator;
mod error;
mod history;
mod privacy;
mod scheduler;

#[cfg(feature = "server")]
pub mod server;

pub use aggregator::{StatusAggregator, StatusAggregatorBuilder, DEFAULT_SOURCE_TIMEOUT};
pub use error::PollError;
pub use history::{HistoryGuard, HistoryStore, RETENTION_HOURS};
pub use privacy::{PrivacyFilter, CLIENT_INTERFACE_PREFIX, REDACTION_TOKEN};
pub use scheduler::{Scheduler, SchedulerHandle, DEFAULT_POLL_INTERVAL};

#[cfg(feature = "server")]
pub use server::{ServerConfig, ServerConfigBuilder, StatusServer};

// Re-export types for convenience
pub use rnswatch_types::{
    Announces, HistoryRecord, InterfaceMode, InterfaceStatus, LinkState, StatusSnapshot, Traffic,
};
