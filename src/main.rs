//! Command-line runner.
//!
//! Usage:
//!   sqlite-throughput                                   # fillrandom,readrandom, 100K entries
//!   sqlite-throughput -b fillseq,readseq -n 1000000 -v 256
//!   sqlite-throughput -d :memory: -p journal_mode=WAL,synchronous=NORMAL
//!   sqlite-throughput --seed 42 --on_step_error ignore

use clap::Parser;
use log::LevelFilter;
use sqlite_throughput::config::{self, BenchConfig, DbLocation};
use sqlite_throughput::harness::Harness;
use sqlite_throughput::logging::initialize_logger;
use sqlite_throughput::workload::StepPolicy;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "sqlite-throughput",
    about = "Throughput benchmark for SQLite insert and lookup workloads"
)]
struct Cli {
    /// Comma-separated list of benchmarks to run (fillseq, fillrandom,
    /// readrandom, readseq, readwrite).
    #[arg(short = 'b', long = "benchmarks", default_value = config::DEFAULT_BENCHMARKS)]
    benchmarks: String,

    /// Path to the database file, or :memory:. Defaults to test.db in the
    /// system temp directory.
    #[arg(short = 'd', long = "db_path")]
    db_path: Option<String>,

    /// Number of entries for the benchmark.
    #[arg(short = 'n', long = "num", default_value_t = config::DEFAULT_NUM)]
    num: usize,

    /// Size of each value in bytes.
    #[arg(short = 'v', long = "value_size", default_value_t = config::DEFAULT_VALUE_SIZE)]
    value_size: usize,

    /// Comma-separated list of PRAGMA directives
    /// (e.g. 'journal_mode=WAL,synchronous=NORMAL').
    #[arg(short = 'p', long = "pragmas", default_value = "")]
    pragmas: String,

    /// Seed for the key generator. Without it every run draws a new seed.
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// What a failed insert/lookup step does: 'fatal' or 'ignore'
    /// (only fillseq aborts).
    #[arg(long = "on_step_error", default_value_t = StepPolicy::Fatal)]
    on_step_error: StepPolicy,

    /// Print a summary table after the report lines.
    #[arg(long = "summary")]
    summary: bool,

    /// Log level for stderr output.
    #[arg(long = "log_level", default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,

    /// Also append log output to this file.
    #[arg(long = "log_file")]
    log_file: Option<String>,
}

impl Cli {
    fn bench_config(&self) -> BenchConfig {
        BenchConfig {
            location: self
                .db_path
                .as_deref()
                .map(DbLocation::parse)
                .unwrap_or_default(),
            num: self.num,
            value_size: self.value_size,
            pragmas: config::split_list(&self.pragmas),
            seed: self.seed,
            step_policy: self.on_step_error,
            summary: self.summary,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = initialize_logger(cli.log_level, cli.log_file.as_deref()) {
        eprintln!("Failed to initialize logger: {e:#}");
        return ExitCode::FAILURE;
    }

    let benchmarks = config::split_list(&cli.benchmarks);
    let mut harness = Harness::new(cli.bench_config());

    match harness.run(benchmarks.as_slice()) {
        Ok(reports) => {
            log::info!("completed {} workload(s)", reports.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::debug!("benchmark aborted: {e:?}");
            eprintln!("SQLite Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
