//! SQLite Throughput Benchmark
//!
//! Measures operations-per-second of five access patterns against a single
//! SQLite table (`test (key INTEGER PRIMARY KEY, value BLOB)`):
//!
//! - `fillseq`    — sequential inserts of keys `0..N`
//! - `fillrandom` — inserts of random keys drawn from `[0, 10N)`
//! - `readrandom` — point lookups after a silent random fill
//! - `readseq`    — one ordered full scan after a silent random fill
//! - `readwrite`  — 50/50 point reads and upserts after a silent random fill
//!
//! The store is recreated for every workload, and any list of PRAGMA
//! directives is applied verbatim right after opening it.
//!
//! Run the CLI: `cargo run --release -- --benchmarks fillseq,readseq`
//! Run benchmarks: `cargo bench`
//! Run tests: `cargo test`

pub mod config;
pub mod harness;
pub mod keygen;
pub mod logging;
pub mod report;
pub mod store;
pub mod workload;
