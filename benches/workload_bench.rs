//! Criterion harness: per-workload latency on small in-memory stores, for
//! tracking regressions in the timed loops themselves.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use sqlite_throughput::config::BenchConfig;
use sqlite_throughput::keygen::KeyGenerator;
use sqlite_throughput::store::Store;
use sqlite_throughput::workload::{self, Workload};
use std::time::Duration;

/// Entry counts to benchmark.
fn entry_counts() -> Vec<usize> {
    vec![1_000, 10_000]
}

fn bench_workloads(c: &mut Criterion) {
    let mut group = c.benchmark_group("workload");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);

    for w in Workload::ALL {
        for num in entry_counts() {
            let cfg = BenchConfig::in_memory(num, 100);
            let mut keys = KeyGenerator::seeded(0xBEEF);

            group.bench_with_input(BenchmarkId::new(w.name(), num), &cfg, |b, cfg| {
                b.iter(|| {
                    let store = Store::open(&cfg.location, &cfg.pragmas).expect("open store");
                    let conn = store.connection().expect("connection");
                    workload::run(w, conn, cfg, &mut keys).expect("workload failed")
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_workloads);
criterion_main!(benches);
