//! Workload definitions: the five named access patterns and how each is timed.
//!
//! | Workload     | Pre-fill     | Timed region                                  |
//! |--------------|--------------|-----------------------------------------------|
//! | `fillseq`    | —            | 1 txn, N inserts of keys `0..N`               |
//! | `fillrandom` | —            | 1 txn, N inserts of keys in `[0, 10N)`        |
//! | `readrandom` | `fillrandom` | N point lookups of keys in `[0, N)`           |
//! | `readseq`    | `fillrandom` | 1 ordered scan, ops = rows visited            |
//! | `readwrite`  | `fillrandom` | 1 txn, N coin flips: lookup or upsert         |
//!
//! Statements are prepared before the clock starts. BEGIN and COMMIT are
//! inside the timed region.

use crate::config::BenchConfig;
use crate::keygen::{KeyGenerator, MixedOp};
use crate::report::WorkloadReport;
use anyhow::{bail, Context, Result};
use rusqlite::{ffi, params, Connection, ErrorCode, Statement};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

const INSERT_SQL: &str = "INSERT INTO test (key, value) VALUES (?1, ?2)";
const UPSERT_SQL: &str = "INSERT OR REPLACE INTO test (key, value) VALUES (?1, ?2)";
const LOOKUP_SQL: &str = "SELECT value FROM test WHERE key = ?1";
const SCAN_SQL: &str = "SELECT key, value FROM test ORDER BY key";

/// Value byte for fills.
pub const FILL_BYTE: u8 = b'x';
/// Value byte for the mixed workload's writes, so overwritten rows are visible.
pub const OVERWRITE_BYTE: u8 = b'y';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Workload {
    FillSeq,
    FillRandom,
    ReadRandom,
    ReadSeq,
    ReadWrite,
}

impl Workload {
    pub const ALL: [Workload; 5] = [
        Workload::FillSeq,
        Workload::FillRandom,
        Workload::ReadRandom,
        Workload::ReadSeq,
        Workload::ReadWrite,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Workload::FillSeq => "fillseq",
            Workload::FillRandom => "fillrandom",
            Workload::ReadRandom => "readrandom",
            Workload::ReadSeq => "readseq",
            Workload::ReadWrite => "readwrite",
        }
    }

    /// Whether a silent `fillrandom` populates the store first.
    pub fn prefill(self) -> bool {
        matches!(
            self,
            Workload::ReadRandom | Workload::ReadSeq | Workload::ReadWrite
        )
    }
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Workload {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match Workload::ALL.iter().find(|w| w.name() == s) {
            Some(w) => Ok(*w),
            None => bail!("Unknown benchmark: {s}"),
        }
    }
}

/// What to do when a single insert/lookup step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepPolicy {
    /// Every failed step aborts the run. Primary-key conflicts during a
    /// random fill are expected and only counted.
    #[default]
    Fatal,
    /// Only `fillseq` aborts on a failed step; other workloads carry on.
    Ignore,
}

impl StepPolicy {
    /// Pass a step result through the policy. `Ok(None)` means the failure
    /// was ignored.
    fn check<T>(self, step: rusqlite::Result<T>, what: &str) -> Result<Option<T>> {
        match (step, self) {
            (Ok(v), _) => Ok(Some(v)),
            (Err(e), StepPolicy::Fatal) => Err(e).with_context(|| format!("step {what}")),
            (Err(e), StepPolicy::Ignore) => {
                log::trace!("ignored failed step {what}: {e}");
                Ok(None)
            }
        }
    }
}

impl fmt::Display for StepPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepPolicy::Fatal => f.write_str("fatal"),
            StepPolicy::Ignore => f.write_str("ignore"),
        }
    }
}

impl FromStr for StepPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fatal" => Ok(StepPolicy::Fatal),
            "ignore" => Ok(StepPolicy::Ignore),
            other => bail!("invalid step policy '{other}' (expected 'fatal' or 'ignore')"),
        }
    }
}

/// Run `workload` against an open, empty store, including its silent
/// pre-fill. Only the terminal workload's report is returned.
pub fn run(
    workload: Workload,
    conn: &Connection,
    cfg: &BenchConfig,
    keys: &mut KeyGenerator,
) -> Result<WorkloadReport> {
    cfg.validate()?;
    if workload.prefill() {
        let fill = fill_random(conn, cfg, keys)?;
        log::debug!(
            "{workload}: pre-filled {} rows in {:.3}s ({} conflicts)",
            fill.ops,
            fill.elapsed.as_secs_f64(),
            fill.conflicts.unwrap_or(0)
        );
    }

    match workload {
        Workload::FillSeq => fill_seq(conn, cfg),
        Workload::FillRandom => fill_random(conn, cfg, keys),
        Workload::ReadRandom => read_random(conn, cfg, keys),
        Workload::ReadSeq => read_seq(conn, cfg),
        Workload::ReadWrite => read_write(conn, cfg, keys),
    }
}

/// Insert keys `0..N` in one transaction. A failed insert is always fatal.
pub fn fill_seq(conn: &Connection, cfg: &BenchConfig) -> Result<WorkloadReport> {
    let mut stmt = conn.prepare(INSERT_SQL).context("prepare insert")?;
    let value = vec![FILL_BYTE; cfg.value_size];

    let start = Instant::now();
    let tx = conn.unchecked_transaction().context("begin transaction")?;
    for key in 0..cfg.num as i64 {
        stmt.execute(params![key, &value[..]])
            .with_context(|| format!("step insert (key {key})"))?;
    }
    tx.commit().context("commit transaction")?;
    let elapsed = start.elapsed();

    Ok(WorkloadReport::new(Workload::FillSeq, cfg.num as u64, elapsed))
}

/// Insert N rows with keys drawn from `[0, 10N)` in one transaction.
pub fn fill_random(
    conn: &Connection,
    cfg: &BenchConfig,
    keys: &mut KeyGenerator,
) -> Result<WorkloadReport> {
    let mut stmt = conn.prepare(INSERT_SQL).context("prepare insert")?;
    let value = vec![FILL_BYTE; cfg.value_size];
    let mut conflicts = 0u64;

    let start = Instant::now();
    let tx = conn.unchecked_transaction().context("begin transaction")?;
    for _ in 0..cfg.num {
        let key = keys.fill_key(cfg.num);
        match stmt.execute(params![key, &value[..]]) {
            Err(e) if is_key_conflict(&e) => conflicts += 1,
            step => {
                cfg.step_policy.check(step, "insert")?;
            }
        }
    }
    tx.commit().context("commit transaction")?;
    let elapsed = start.elapsed();

    Ok(WorkloadReport::new(Workload::FillRandom, cfg.num as u64, elapsed).with_conflicts(conflicts))
}

/// N point lookups of keys in `[0, N)`. Misses still count as operations.
pub fn read_random(
    conn: &Connection,
    cfg: &BenchConfig,
    keys: &mut KeyGenerator,
) -> Result<WorkloadReport> {
    let mut stmt = conn.prepare(LOOKUP_SQL).context("prepare select")?;
    let mut hits = 0u64;

    let start = Instant::now();
    for _ in 0..cfg.num {
        let key = keys.lookup_key(cfg.num);
        if let Some(true) = cfg.step_policy.check(lookup(&mut stmt, key), "select")? {
            hits += 1;
        }
    }
    let elapsed = start.elapsed();

    log::debug!("readrandom: {hits}/{} hits", cfg.num);
    Ok(WorkloadReport::new(Workload::ReadRandom, cfg.num as u64, elapsed).with_hits(hits))
}

/// One full scan ordered by key. Throughput is against rows visited, not N.
pub fn read_seq(conn: &Connection, cfg: &BenchConfig) -> Result<WorkloadReport> {
    let mut stmt = conn.prepare(SCAN_SQL).context("prepare select")?;
    let mut visited = 0u64;

    let start = Instant::now();
    let mut rows = stmt.query([]).context("start scan")?;
    loop {
        match cfg.step_policy.check(rows.next().map(|r| r.is_some()), "scan")? {
            Some(true) => visited += 1,
            Some(false) | None => break,
        }
    }
    let elapsed = start.elapsed();

    Ok(WorkloadReport::new(Workload::ReadSeq, visited, elapsed))
}

/// N coin flips inside one transaction: a lookup or an upsert of a key in
/// `[0, N)`. Upserts write `OVERWRITE_BYTE` values.
pub fn read_write(
    conn: &Connection,
    cfg: &BenchConfig,
    keys: &mut KeyGenerator,
) -> Result<WorkloadReport> {
    let mut read_stmt = conn.prepare(LOOKUP_SQL).context("prepare read")?;
    let mut write_stmt = conn.prepare(UPSERT_SQL).context("prepare write")?;
    let value = vec![OVERWRITE_BYTE; cfg.value_size];
    let mut hits = 0u64;

    let start = Instant::now();
    let tx = conn.unchecked_transaction().context("begin transaction")?;
    for _ in 0..cfg.num {
        let key = keys.lookup_key(cfg.num);
        match keys.mixed_op() {
            MixedOp::Read => {
                if let Some(true) = cfg.step_policy.check(lookup(&mut read_stmt, key), "read")? {
                    hits += 1;
                }
            }
            MixedOp::Write => {
                cfg.step_policy
                    .check(write_stmt.execute(params![key, &value[..]]), "write")?;
            }
        }
    }
    tx.commit().context("commit transaction")?;
    let elapsed = start.elapsed();

    Ok(WorkloadReport::new(Workload::ReadWrite, cfg.num as u64, elapsed).with_hits(hits))
}

fn lookup(stmt: &mut Statement<'_>, key: i64) -> rusqlite::Result<bool> {
    let mut rows = stmt.query([key])?;
    Ok(rows.next()?.is_some())
}

/// Primary-key conflict only; other constraint failures go through the
/// step policy.
fn is_key_conflict(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(f, _)
            if f.code == ErrorCode::ConstraintViolation
                && f.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}
