//! Run configuration: one immutable value handed to the harness.

use crate::workload::StepPolicy;
use anyhow::{bail, Result};
use std::fmt;
use std::path::PathBuf;

/// Path string that selects a transient in-memory store.
pub const MEMORY_SENTINEL: &str = ":memory:";

pub const DEFAULT_BENCHMARKS: &str = "fillrandom,readrandom";
pub const DEFAULT_NUM: usize = 100_000;
pub const DEFAULT_VALUE_SIZE: usize = 100;

/// Largest entry count whose random-fill key range `[0, 10N)` fits in an
/// SQLite integer key.
pub const MAX_NUM: u64 = i64::MAX as u64 / 10;

/// File name used under the system temp directory when no path is given.
const DEFAULT_DB_FILE: &str = "test.db";

/// Where the store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    Memory,
    File(PathBuf),
}

impl DbLocation {
    /// Interpret a user-supplied path, honouring the `:memory:` sentinel.
    pub fn parse(path: &str) -> Self {
        if path == MEMORY_SENTINEL {
            DbLocation::Memory
        } else {
            DbLocation::File(PathBuf::from(path))
        }
    }

    pub fn is_memory(&self) -> bool {
        matches!(self, DbLocation::Memory)
    }
}

impl Default for DbLocation {
    fn default() -> Self {
        DbLocation::File(default_db_path())
    }
}

impl fmt::Display for DbLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbLocation::Memory => f.write_str(MEMORY_SENTINEL),
            DbLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// `<system temp dir>/test.db`
pub fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DB_FILE)
}

/// Everything a run needs, fixed before the first workload starts.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub location: DbLocation,
    /// Entry count N: rows inserted and operations issued per workload.
    pub num: usize,
    /// Bytes per stored value.
    pub value_size: usize,
    /// PRAGMA directives, applied in order and uninterpreted.
    pub pragmas: Vec<String>,
    /// Explicit generator seed; `None` draws one from OS entropy.
    pub seed: Option<u64>,
    pub step_policy: StepPolicy,
    /// Print the comparison table after the report lines.
    pub summary: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            location: DbLocation::default(),
            num: DEFAULT_NUM,
            value_size: DEFAULT_VALUE_SIZE,
            pragmas: Vec::new(),
            seed: None,
            step_policy: StepPolicy::default(),
            summary: false,
        }
    }
}

impl BenchConfig {
    /// Small in-memory configuration, handy for tests and micro benches.
    pub fn in_memory(num: usize, value_size: usize) -> Self {
        Self {
            location: DbLocation::Memory,
            num,
            value_size,
            ..Self::default()
        }
    }

    /// Reject entry counts whose key ranges would overflow `i64`.
    pub fn validate(&self) -> Result<()> {
        if self.num as u64 > MAX_NUM {
            bail!("--num {} is too large (maximum {MAX_NUM})", self.num);
        }
        Ok(())
    }
}

/// Split a comma-separated flag value. Items are trimmed and empty items
/// dropped, so `""` yields an empty list.
pub fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
