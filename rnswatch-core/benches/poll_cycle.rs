use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rnswatch_adapters::{AdapterError, StatsSource};
use rnswatch_core::{HistoryStore, LinkState, PrivacyFilter, StatusAggregator};
use rnswatch_types::{InterfaceMode, InterfaceStats, RawInterfaceRecord};

#[derive(Debug)]
struct FixedSource(InterfaceStats);

#[async_trait]
impl StatsSource for FixedSource {
    async fn fetch(&self) -> Result<InterfaceStats, AdapterError> {
        Ok(self.0.clone())
    }

    fn description(&self) -> &str {
        "bench"
    }
}

fn stats(count: usize) -> InterfaceStats {
    InterfaceStats::new(
        (0..count)
            .map(|i| {
                let name = format!("TCPInterface[Peer/10.0.{}.{}:4965]", i / 256, i % 256);
                RawInterfaceRecord::builder(name)
                    .status(i % 4 != 0)
                    .mode(InterfaceMode::FULL)
                    .traffic(i as u64 * 1_000, i as u64 * 500)
                    .build()
            })
            .collect(),
    )
}

/// Benchmark identifier redaction
fn bench_redact(c: &mut Criterion) {
    let mut group = c.benchmark_group("redact");
    let filter = PrivacyFilter::new(true, true);

    for name in [
        "AutoInterface[Local]",
        "TCPInterface[Peer/10.0.0.1:4965]",
        "UDPInterface[192.168.1.10:4242 -> 192.168.1.255:4242]",
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), name, |b, name| {
            b.iter(|| filter.redact(black_box(name)));
        });
    }
    group.finish();
}

/// Benchmark history appends once the window is full
fn bench_history_record(c: &mut Criterion) {
    let history = HistoryStore::new();
    let start = Utc::now();
    // One day of minutely checks
    for minute in 0..1_440 {
        history.record("RNode", start + TimeDelta::minutes(minute), LinkState::Up);
    }

    let mut minute = 1_440;
    c.bench_function("history_record_full_window", |b| {
        b.iter(|| {
            minute += 1;
            history.record(
                black_box("RNode"),
                start + TimeDelta::minutes(minute),
                LinkState::Up,
            );
        });
    });
}

/// Benchmark a full polling cycle with varying interface counts
fn bench_poll(c: &mut Criterion) {
    let mut group = c.benchmark_group("poll");
    let runtime = tokio::runtime::Runtime::new().unwrap();

    for count in [1usize, 10, 100].iter() {
        let aggregator = StatusAggregator::builder(Arc::new(FixedSource(stats(*count))))
            .privacy(PrivacyFilter::new(true, false))
            .build();

        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
            b.iter(|| runtime.block_on(aggregator.poll()).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_redact, bench_history_record, bench_poll);
criterion_main!(benches);
