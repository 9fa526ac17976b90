//! Report module: configuration banner, per-workload throughput lines and a
//! closing summary.

use crate::config::BenchConfig;
use crate::workload::Workload;
use std::fmt;
use std::time::Duration;

/// Column width the workload name is padded to.
const NAME_WIDTH: usize = 20;

/// Result of one terminal workload (never the silent pre-fill).
#[derive(Debug, Clone)]
pub struct WorkloadReport {
    pub workload: Workload,
    /// Operations the throughput is computed against.
    pub ops: u64,
    pub elapsed: Duration,
    /// Lookups that found a row, for read workloads.
    pub hits: Option<u64>,
    /// Inserts rejected by the primary key, for random fills.
    pub conflicts: Option<u64>,
}

impl WorkloadReport {
    pub fn new(workload: Workload, ops: u64, elapsed: Duration) -> Self {
        Self {
            workload,
            ops,
            elapsed,
            hits: None,
            conflicts: None,
        }
    }

    pub fn with_hits(mut self, hits: u64) -> Self {
        self.hits = Some(hits);
        self
    }

    pub fn with_conflicts(mut self, conflicts: u64) -> Self {
        self.conflicts = Some(conflicts);
        self
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Operations per second; 0 when nothing measurable elapsed.
    pub fn ops_per_sec(&self) -> f64 {
        let secs = self.elapsed_secs();
        if secs <= 0.0 {
            return 0.0;
        }
        self.ops as f64 / secs
    }
}

impl fmt::Display for WorkloadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<width$}: {:.2} ops/sec ({} ops in {:.2}s)",
            self.workload.name(),
            self.ops_per_sec(),
            self.ops,
            self.elapsed_secs(),
            width = NAME_WIDTH
        )
    }
}

/// Banner text printed before any workload runs.
pub fn banner(cfg: &BenchConfig) -> String {
    let pragmas = if cfg.pragmas.is_empty() {
        "[defaults]".to_string()
    } else {
        cfg.pragmas.join(", ")
    };
    format!(
        "--- Benchmark Configuration ---\n\
         Database path: {}\n\
         Entries:       {}\n\
         Value Size:    {} bytes\n\
         PRAGMAs:       {}\n\
         -----------------------------",
        cfg.location, cfg.num, cfg.value_size, pragmas
    )
}

pub fn print_banner(cfg: &BenchConfig) {
    println!("{}", banner(cfg));
}

pub fn print_report(report: &WorkloadReport) {
    println!("{report}");
}

/// Print a comparison table once two or more workloads have run.
pub fn print_summary(reports: &[WorkloadReport]) {
    if reports.len() < 2 {
        return;
    }

    println!("\n  Summary:");
    println!(
        "  {:<12} {:>12} {:>10} {:>14} {:>8}",
        "Workload", "Ops", "Secs", "Ops/sec", "Hits"
    );
    println!("  {}", "-".repeat(60));
    for r in reports {
        let hits = r
            .hits
            .map(|h| h.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<12} {:>12} {:>10.3} {:>14.2} {:>8}",
            r.workload.name(),
            r.ops,
            r.elapsed_secs(),
            r.ops_per_sec(),
            hits
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DbLocation;

    #[test]
    fn line_is_left_justified_with_two_decimals() {
        let report = WorkloadReport::new(Workload::FillSeq, 1000, Duration::from_millis(250));
        assert_eq!(
            report.to_string(),
            "fillseq             : 4000.00 ops/sec (1000 ops in 0.25s)"
        );
    }

    #[test]
    fn zero_elapsed_is_zero_throughput() {
        let report = WorkloadReport::new(Workload::ReadSeq, 0, Duration::ZERO);
        assert_eq!(report.ops_per_sec(), 0.0);
        assert!(report.to_string().starts_with("readseq             : 0.00 ops/sec"));
    }

    #[test]
    fn banner_lists_pragmas_or_defaults() {
        let mut cfg = BenchConfig::in_memory(10, 16);
        let text = banner(&cfg);
        assert!(text.contains("Database path: :memory:"));
        assert!(text.contains("Entries:       10"));
        assert!(text.contains("Value Size:    16 bytes"));
        assert!(text.contains("PRAGMAs:       [defaults]"));

        cfg.location = DbLocation::parse("/tmp/t.db");
        cfg.pragmas = vec!["journal_mode=WAL".into(), "synchronous=NORMAL".into()];
        let text = banner(&cfg);
        assert!(text.contains("Database path: /tmp/t.db"));
        assert!(text.contains("PRAGMAs:       journal_mode=WAL, synchronous=NORMAL"));
    }
}
