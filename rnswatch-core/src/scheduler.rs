//! Periodic background polling.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::aggregator::StatusAggregator;

/// Default time between two polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Polls the aggregator on a fixed interval, forever.
///
/// The only purpose of these polls is to keep the history current, so their
/// snapshots are discarded. A failed poll is already logged by the
/// aggregator and the next one simply runs on schedule.
#[derive(Debug)]
pub struct Scheduler {
    aggregator: Arc<StatusAggregator>,
    interval: Duration,
}

impl Scheduler {
    /// Create a scheduler with the default 60 second interval.
    pub fn new(aggregator: Arc<StatusAggregator>) -> Self {
        Self {
            aggregator,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Set the time to wait after each poll.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Start polling in a background task.
    ///
    /// The first poll runs immediately. Returns a handle that stops the
    /// loop; dropping the handle stops it too.
    pub fn start(self) -> SchedulerHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let Scheduler {
            aggregator,
            interval,
        } = self;

        let task = tokio::spawn(async move {
            loop {
                let _ = aggregator.poll().await;

                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            debug!("Status scheduler stopped");
        });

        SchedulerHandle { stop_tx, task }
    }
}

/// Handle for controlling the background polling loop.
#[derive(Debug)]
pub struct SchedulerHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stop polling and wait for the loop to exit.
    ///
    /// A poll that is already running is allowed to finish.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.task.await;
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use rnswatch_adapters::{AdapterError, StatsSource};
    use rnswatch_types::{InterfaceStats, RawInterfaceRecord};

    #[derive(Debug, Default)]
    struct CountingSource {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl StatsSource for CountingSource {
        async fn fetch(&self) -> Result<InterfaceStats, AdapterError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AdapterError::Empty);
            }
            Ok(InterfaceStats::new(vec![RawInterfaceRecord::builder(
                "AutoInterface[Local]",
            )
            .up()
            .build()]))
        }

        fn description(&self) -> &str {
            "counting"
        }
    }

    fn start(source: Arc<CountingSource>) -> (Arc<StatusAggregator>, SchedulerHandle) {
        let aggregator = Arc::new(StatusAggregator::builder(source).build());
        let handle = Scheduler::new(aggregator.clone()).start();
        (aggregator, handle)
    }

    #[tokio::test(start_paused = true)]
    async fn polls_immediately_then_every_interval() {
        let source = Arc::new(CountingSource::default());
        let (aggregator, handle) = start(source.clone());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);

        assert_eq!(aggregator.history().series("AutoInterface[Local]").len(), 4);
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failures_do_not_stop_the_loop() {
        let source = Arc::new(CountingSource {
            fail: true,
            ..Default::default()
        });
        let (aggregator, handle) = start(source.clone());

        tokio::time::sleep(Duration::from_secs(181)).await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 4);
        assert!(!handle.is_finished());
        assert!(aggregator.history().is_empty());
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_ends_the_loop() {
        let source = Arc::new(CountingSource::default());
        let (_aggregator, handle) = start(source.clone());

        tokio::time::sleep(Duration::from_secs(1)).await;
        handle.stop().await;

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_interval() {
        let source = Arc::new(CountingSource::default());
        let aggregator = Arc::new(StatusAggregator::builder(source.clone()).build());
        let handle = Scheduler::new(aggregator)
            .interval(Duration::from_secs(5))
            .start();

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
        handle.stop().await;
    }
}
