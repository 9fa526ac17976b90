//! Store lifecycle: recreate the database, apply PRAGMAs, ensure the table.

use crate::config::DbLocation;
use anyhow::{anyhow, Context, Result};
use rusqlite::Connection;
use std::path::Path;

pub const CREATE_TABLE_SQL: &str =
    "CREATE TABLE IF NOT EXISTS test (key INTEGER PRIMARY KEY, value BLOB);";

/// Files SQLite may leave next to the main database file.
const SIDECAR_SUFFIXES: [&str; 3] = ["-wal", "-shm", "-journal"];

/// An open benchmark store. Closing is explicit but also happens on drop.
pub struct Store {
    conn: Option<Connection>,
    location: DbLocation,
}

impl Store {
    /// Open a fresh store at `location`.
    ///
    /// A file-backed store is deleted first (sidecars included), so nothing
    /// survives from a previous workload or process. Each directive runs as
    /// `PRAGMA <directive>;` in order, before the table is created.
    pub fn open(location: &DbLocation, directives: &[String]) -> Result<Self> {
        let conn = match location {
            DbLocation::Memory => {
                Connection::open_in_memory().context("cannot open in-memory database")?
            }
            DbLocation::File(path) => {
                remove_existing(path)?;
                Connection::open(path)
                    .with_context(|| format!("cannot open database: {}", path.display()))?
            }
        };
        log::debug!("opened store at {location}");

        for directive in directives {
            let pragma = format!("PRAGMA {directive};");
            conn.execute_batch(&pragma)
                .with_context(|| format!("failed to execute PRAGMA: {pragma}"))?;
            log::debug!("applied {pragma}");
        }

        conn.execute_batch(CREATE_TABLE_SQL)
            .context("failed to create table")?;

        Ok(Self {
            conn: Some(conn),
            location: location.clone(),
        })
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    pub fn connection(&self) -> Result<&Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| anyhow!("store at {} is closed", self.location))
    }

    /// Number of rows currently in the test table.
    pub fn row_count(&self) -> Result<u64> {
        let count: i64 = self
            .connection()?
            .query_row("SELECT COUNT(*) FROM test", [], |r| r.get(0))
            .context("count rows")?;
        Ok(count as u64)
    }

    /// Release the handle. Calling this on a closed store does nothing.
    pub fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close()
                .map_err(|(_, e)| e)
                .with_context(|| format!("failed to close database: {}", self.location))?;
            log::debug!("closed store at {}", self.location);
        }
        Ok(())
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("{e:#}");
        }
    }
}

fn remove_existing(path: &Path) -> Result<()> {
    remove_if_present(path)?;
    for suffix in SIDECAR_SUFFIXES {
        let mut sidecar = path.as_os_str().to_owned();
        sidecar.push(suffix);
        remove_if_present(Path::new(&sidecar))?;
    }
    Ok(())
}

fn remove_if_present(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            log::debug!("removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("cannot remove {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_empty_table() {
        let store = Store::open(&DbLocation::Memory, &[]).unwrap();
        assert!(store.is_open());
        assert_eq!(store.row_count().unwrap(), 0);
    }

    #[test]
    fn close_is_idempotent() {
        let mut store = Store::open(&DbLocation::Memory, &[]).unwrap();
        store.close().unwrap();
        store.close().unwrap();
        assert!(!store.is_open());
        assert!(store.connection().is_err());
    }

    #[test]
    fn directives_are_applied_in_order() {
        let directives = vec!["cache_size=-2000".to_string(), "cache_size=-4000".to_string()];
        let store = Store::open(&DbLocation::Memory, &directives).unwrap();
        let size: i64 = store
            .connection()
            .unwrap()
            .query_row("PRAGMA cache_size", [], |r| r.get(0))
            .unwrap();
        assert_eq!(size, -4000);
    }

    #[test]
    fn malformed_directive_is_an_error() {
        let directives = vec!["this is not valid".to_string()];
        let err = Store::open(&DbLocation::Memory, &directives)
            .err()
            .expect("expected PRAGMA failure");
        assert!(format!("{err:#}").contains("failed to execute PRAGMA"));
    }
}
