//! Bounded per-interface history of up/down observations.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::{Mutex, MutexGuard};
use rnswatch_types::{HistoryRecord, LinkState};

/// How long history records are kept, in hours.
pub const RETENTION_HOURS: i64 = 24;

#[derive(Debug, Default)]
struct HistoryState {
    series: HashMap<String, VecDeque<HistoryRecord>>,
    last_check: Option<DateTime<Utc>>,
}

impl HistoryState {
    fn record(
        &mut self,
        key: &str,
        timestamp: DateTime<Utc>,
        status: LinkState,
        retention: TimeDelta,
    ) {
        let series = self.series.entry(key.to_string()).or_default();

        // Keep the series sorted even if a caller hands us an older timestamp
        let at = series.partition_point(|r| r.timestamp <= timestamp);
        series.insert(at, HistoryRecord::new(timestamp, status));

        let newest = series.back().map_or(timestamp, |r| r.timestamp);
        // A window reaching past the representable range keeps everything
        let Some(cutoff) = newest.checked_sub_signed(retention) else {
            return;
        };
        while series.front().is_some_and(|r| r.timestamp <= cutoff) {
            series.pop_front();
        }
    }
}

/// Time-windowed history of interface states, keyed by display identifier.
///
/// All access goes through one mutex. Pruning is key-local: recording an
/// entry for one interface only trims that interface's series.
///
/// # Example
///
/// ```rust
/// use chrono::{TimeDelta, Utc};
/// use rnswatch_core::HistoryStore;
/// use rnswatch_types::LinkState;
///
/// let history = HistoryStore::new();
/// let start = Utc::now();
///
/// history.record("AutoInterface[Local]", start, LinkState::Up);
/// history.record("AutoInterface[Local]", start + TimeDelta::hours(25), LinkState::Down);
///
/// // The first entry fell out of the 24h window
/// assert_eq!(history.series("AutoInterface[Local]").len(), 1);
/// ```
#[derive(Debug)]
pub struct HistoryStore {
    state: Mutex<HistoryState>,
    retention: TimeDelta,
}

impl HistoryStore {
    /// Create an empty store with the standard 24 hour retention window.
    pub fn new() -> Self {
        Self::with_retention(TimeDelta::hours(RETENTION_HOURS))
    }

    /// Create an empty store with a custom retention window.
    pub fn with_retention(retention: TimeDelta) -> Self {
        Self {
            state: Mutex::new(HistoryState::default()),
            retention,
        }
    }

    pub fn retention(&self) -> TimeDelta {
        self.retention
    }

    /// Append an observation for `key` and prune that key's expired entries.
    pub fn record(&self, key: &str, timestamp: DateTime<Utc>, status: LinkState) {
        self.lock().record(key, timestamp, status);
    }

    /// Take the store lock for a batch of writes.
    ///
    /// A polling cycle holds this guard while it takes its timestamp and
    /// records all of its interfaces, so concurrent cycles cannot interleave.
    pub fn lock(&self) -> HistoryGuard<'_> {
        HistoryGuard {
            state: self.state.lock(),
            retention: self.retention,
        }
    }

    /// Copy of the series for `key`, oldest first. Empty if never seen.
    pub fn series(&self, key: &str) -> Vec<HistoryRecord> {
        self.state
            .lock()
            .series
            .get(key)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    /// All tracked keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.state.lock().series.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.state.lock().series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().series.is_empty()
    }

    /// Timestamp of the last successful polling cycle.
    pub fn last_check(&self) -> Option<DateTime<Utc>> {
        self.state.lock().last_check
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive access to a [`HistoryStore`] for the duration of one cycle.
pub struct HistoryGuard<'a> {
    state: MutexGuard<'a, HistoryState>,
    retention: TimeDelta,
}

impl HistoryGuard<'_> {
    /// Append an observation for `key` and prune that key's expired entries.
    pub fn record(&mut self, key: &str, timestamp: DateTime<Utc>, status: LinkState) {
        self.state.record(key, timestamp, status, self.retention);
    }

    /// Record a successful check. `last_check` only moves forward.
    pub fn mark_checked(&mut self, timestamp: DateTime<Utc>) {
        if self.state.last_check.map_or(true, |last| timestamp > last) {
            self.state.last_check = Some(timestamp);
        }
    }

    pub fn last_check(&self) -> Option<DateTime<Utc>> {
        self.state.last_check
    }
}

impl std::fmt::Debug for HistoryGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryGuard")
            .field("keys", &self.state.series.len())
            .field("last_check", &self.state.last_check)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn new_store_is_empty() {
        let history = HistoryStore::new();
        assert!(history.is_empty());
        assert_eq!(history.len(), 0);
        assert!(history.series("anything").is_empty());
        assert_eq!(history.last_check(), None);
        assert_eq!(history.retention(), TimeDelta::hours(24));
    }

    #[test]
    fn record_creates_series_on_first_use() {
        let history = HistoryStore::new();
        history.record("RNode", t0(), LinkState::Up);

        assert_eq!(history.keys(), vec!["RNode".to_string()]);
        assert_eq!(
            history.series("RNode"),
            vec![HistoryRecord::new(t0(), LinkState::Up)]
        );
    }

    #[test]
    fn record_accumulates_within_window() {
        let history = HistoryStore::new();
        for minute in 0..5 {
            history.record("RNode", t0() + TimeDelta::minutes(minute), LinkState::Up);
        }
        assert_eq!(history.series("RNode").len(), 5);
    }

    #[test]
    fn entries_older_than_window_are_pruned() {
        let history = HistoryStore::new();
        history.record("RNode", t0(), LinkState::Up);
        history.record("RNode", t0() + TimeDelta::hours(12), LinkState::Down);
        history.record("RNode", t0() + TimeDelta::hours(25), LinkState::Up);

        let series = history.series("RNode");
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].timestamp, t0() + TimeDelta::hours(12));
        assert_eq!(series[0].status, LinkState::Down);
    }

    #[test]
    fn entry_exactly_at_cutoff_is_pruned() {
        let history = HistoryStore::new();
        history.record("RNode", t0(), LinkState::Up);
        history.record("RNode", t0() + TimeDelta::hours(24), LinkState::Up);

        assert_eq!(history.series("RNode").len(), 1);
    }

    #[test]
    fn pruning_is_key_local() {
        let history = HistoryStore::new();
        history.record("a", t0(), LinkState::Up);
        history.record("b", t0(), LinkState::Up);
        history.record("a", t0() + TimeDelta::hours(30), LinkState::Up);

        assert_eq!(history.series("a").len(), 1);
        // "b" was not touched this time, so its stale entry survives
        assert_eq!(history.series("b").len(), 1);
    }

    #[test]
    fn retained_entries_stay_inside_window() {
        let history = HistoryStore::new();
        let mut latest = t0();
        for step in 0..200 {
            latest = t0() + TimeDelta::minutes(step * 17);
            history.record("RNode", latest, LinkState::from(step % 3 != 0));
        }

        let series = history.series("RNode");
        assert!(series
            .iter()
            .all(|r| r.timestamp >= latest - TimeDelta::hours(RETENTION_HOURS)));
        assert!(series.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn out_of_order_record_is_kept_sorted() {
        let history = HistoryStore::new();
        history.record("RNode", t0() + TimeDelta::minutes(2), LinkState::Up);
        history.record("RNode", t0(), LinkState::Down);
        history.record("RNode", t0() + TimeDelta::minutes(1), LinkState::Up);

        let stamps: Vec<_> = history.series("RNode").iter().map(|r| r.timestamp).collect();
        assert_eq!(
            stamps,
            vec![t0(), t0() + TimeDelta::minutes(1), t0() + TimeDelta::minutes(2)]
        );
    }

    #[test]
    fn custom_retention() {
        let history = HistoryStore::with_retention(TimeDelta::minutes(10));
        history.record("RNode", t0(), LinkState::Up);
        history.record("RNode", t0() + TimeDelta::minutes(11), LinkState::Up);
        assert_eq!(history.series("RNode").len(), 1);
    }

    #[test]
    fn unbounded_retention_keeps_everything() {
        let history = HistoryStore::with_retention(TimeDelta::MAX);
        history.record("RNode", t0(), LinkState::Up);
        history.record("RNode", t0() + TimeDelta::days(3650), LinkState::Down);

        assert_eq!(history.series("RNode").len(), 2);
    }

    #[test]
    fn clock_step_back_keeps_series_sorted() {
        let history = HistoryStore::new();
        {
            let mut guard = history.lock();
            guard.record("RNode", t0() + TimeDelta::minutes(5), LinkState::Up);
            guard.mark_checked(t0() + TimeDelta::minutes(5));
        }
        {
            let mut guard = history.lock();
            guard.record("RNode", t0(), LinkState::Down);
            guard.mark_checked(t0());
        }

        let series = history.series("RNode");
        assert_eq!(series[0], HistoryRecord::new(t0(), LinkState::Down));
        assert_eq!(series[1].timestamp, t0() + TimeDelta::minutes(5));
        assert_eq!(history.last_check(), Some(t0() + TimeDelta::minutes(5)));
    }

    #[test]
    fn last_check_only_advances() {
        let history = HistoryStore::new();
        {
            let mut guard = history.lock();
            guard.mark_checked(t0() + TimeDelta::minutes(5));
            guard.mark_checked(t0());
            assert_eq!(guard.last_check(), Some(t0() + TimeDelta::minutes(5)));
        }
        assert_eq!(history.last_check(), Some(t0() + TimeDelta::minutes(5)));
    }

    #[test]
    fn concurrent_writers_keep_series_ordered() {
        use std::thread;

        let history = Arc::new(HistoryStore::new());
        let mut handles = vec![];
        for _ in 0..8 {
            let history = history.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    let mut guard = history.lock();
                    let ts = Utc::now();
                    guard.record("shared", ts, LinkState::Up);
                    guard.mark_checked(ts);
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        let series = history.series("shared");
        assert_eq!(series.len(), 800);
        assert!(series.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }
}
