//! One polling cycle: fetch, filter, classify, snapshot, record history.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rnswatch_adapters::StatsSource;
use rnswatch_types::{
    InterfaceMode, InterfaceStatus, LinkState, RawInterfaceRecord, StatusSnapshot, Traffic,
};
use tracing::{debug, warn};

use crate::error::PollError;
use crate::history::HistoryStore;
use crate::privacy::PrivacyFilter;

/// Default upper bound on a single stats query.
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(10);

/// Turns raw interface statistics into status snapshots.
///
/// The aggregator is shared (behind an `Arc`) between the periodic
/// scheduler and the HTTP handler; both call [`poll`](Self::poll) and both
/// feed the same [`HistoryStore`].
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use rnswatch_adapters::RnstatusSource;
/// use rnswatch_core::{PrivacyFilter, StatusAggregator};
///
/// # tokio_test::block_on(async {
/// let aggregator = StatusAggregator::builder(Arc::new(RnstatusSource::default()))
///     .privacy(PrivacyFilter::new(true, true))
///     .build();
///
/// match aggregator.poll().await {
///     Ok(snapshot) => println!("{} interfaces up", snapshot.up_count()),
///     Err(e) => eprintln!("status unavailable: {e}"),
/// }
/// # });
/// ```
#[derive(Debug)]
pub struct StatusAggregator {
    source: Arc<dyn StatsSource>,
    privacy: PrivacyFilter,
    history: Arc<HistoryStore>,
    timeout: Duration,
}

impl StatusAggregator {
    /// Create a builder around the given stats source.
    pub fn builder(source: Arc<dyn StatsSource>) -> StatusAggregatorBuilder {
        StatusAggregatorBuilder::new(source)
    }

    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    pub fn privacy(&self) -> PrivacyFilter {
        self.privacy
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run one polling cycle.
    ///
    /// Either the whole cycle succeeds (snapshot returned, history updated
    /// for every visible interface) or nothing changes and the failure is
    /// logged and returned.
    pub async fn poll(&self) -> Result<StatusSnapshot, PollError> {
        match self.try_poll().await {
            Ok(snapshot) => {
                debug!(
                    interfaces = snapshot.len(),
                    up = snapshot.up_count(),
                    "Interface status collected"
                );
                Ok(snapshot)
            }
            Err(e) => {
                warn!(
                    source = self.source.description(),
                    error = %e,
                    "Error getting interface status"
                );
                Err(e)
            }
        }
    }

    async fn try_poll(&self) -> Result<StatusSnapshot, PollError> {
        let stats = tokio::time::timeout(self.timeout, self.source.fetch())
            .await
            .map_err(|_| PollError::Timeout(self.timeout))??;

        // Convert everything before touching history so a bad record
        // cannot leave a half-applied cycle behind
        let interfaces = stats
            .interfaces
            .iter()
            .filter(|record| !self.privacy.should_drop(&record.name))
            .map(|record| self.interface_status(record))
            .collect::<Result<Vec<_>, _>>()?;

        let timestamp = {
            let mut history = self.history.lock();
            let timestamp = Utc::now();
            for interface in &interfaces {
                history.record(&interface.name, timestamp, interface.status);
            }
            history.mark_checked(timestamp);
            timestamp
        };

        Ok(StatusSnapshot::new(timestamp, interfaces))
    }

    fn interface_status(&self, record: &RawInterfaceRecord) -> Result<InterfaceStatus, PollError> {
        let name = self.privacy.redact(&record.name).into_owned();
        let announces = record
            .announces()
            .map_err(|e| PollError::MalformedRecord {
                name: name.clone(),
                reason: e.to_string(),
            })?;

        Ok(InterfaceStatus {
            name,
            status: LinkState::from(record.status),
            mode: InterfaceMode::from_code(record.mode).label().to_string(),
            bitrate: record.bitrate,
            traffic: Traffic {
                rx: record.rxb,
                tx: record.txb,
            },
            peers: record.peers,
            clients: record.clients,
            announces,
        })
    }
}

/// Builder for configuring a StatusAggregator.
#[derive(Debug)]
pub struct StatusAggregatorBuilder {
    source: Arc<dyn StatsSource>,
    privacy: PrivacyFilter,
    history: Option<Arc<HistoryStore>>,
    timeout: Option<Duration>,
}

impl StatusAggregatorBuilder {
    /// Create a new builder.
    pub fn new(source: Arc<dyn StatsSource>) -> Self {
        Self {
            source,
            privacy: PrivacyFilter::disabled(),
            history: None,
            timeout: None,
        }
    }

    /// Set the privacy filter (default: nothing hidden).
    pub fn privacy(mut self, privacy: PrivacyFilter) -> Self {
        self.privacy = privacy;
        self
    }

    /// Share an existing history store (default: a fresh 24h store).
    pub fn history(mut self, history: Arc<HistoryStore>) -> Self {
        self.history = Some(history);
        self
    }

    /// Set the stats source timeout.
    ///
    /// Defaults to 10 seconds if not specified.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the aggregator.
    pub fn build(self) -> StatusAggregator {
        StatusAggregator {
            source: self.source,
            privacy: self.privacy,
            history: self.history.unwrap_or_default(),
            timeout: self.timeout.unwrap_or(DEFAULT_SOURCE_TIMEOUT),
        }
    }
}
