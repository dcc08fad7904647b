//! Cashback storage
//!
//! Provides persistence for (bank, category, percentage) records.

mod schema;

pub use schema::*;

use crate::menu::Bank;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Database connection is closed")]
    Closed,
    #[error("Database lock poisoned")]
    LockPoisoned,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DbResult<T> = Result<T, StorageError>;

const ENTRY_COLUMNS: &str = "id, bank, category, percentage";

/// Thread-safe database handle
///
/// Clones share one connection. After [`Database::close`] every operation
/// fails with [`StorageError::Closed`].
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Option<Connection>>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        Self::init(Connection::open(path)?)
    }

    /// Open an in-memory database (for testing)
    #[allow(dead_code)] // Used in tests
    pub fn open_in_memory() -> DbResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> DbResult<Self> {
        conn.execute_batch(schema::SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(Some(conn))),
        })
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Option<Connection>>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> DbResult<T> {
        let guard = self.lock()?;
        let conn = guard.as_ref().ok_or(StorageError::Closed)?;
        Ok(f(conn)?)
    }

    /// Close the underlying connection. Idempotent.
    pub fn close(&self) -> DbResult<()> {
        let taken = self.lock()?.take();
        match taken {
            Some(conn) => conn.close().map_err(|(_, e)| StorageError::Sqlite(e)),
            None => Ok(()),
        }
    }

    // ==================== Writes ====================

    /// Insert an entry, replacing the percentage if the pair already exists
    pub fn upsert(&self, bank: Bank, category: &str, percentage: f64) -> DbResult<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO cashback (bank, category, percentage) VALUES (?1, ?2, ?3)
                 ON CONFLICT(bank, category) DO UPDATE SET percentage = excluded.percentage",
                params![bank, category, percentage],
            )
        })?;
        Ok(())
    }

    /// Change the percentage of an existing pair; returns rows affected.
    pub fn update_percentage(&self, bank: Bank, category: &str, percentage: f64) -> DbResult<usize> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE cashback SET percentage = ?1 WHERE bank = ?2 AND category = ?3",
                params![percentage, bank, category],
            )
        })
    }

    /// Remove a pair if present; returns rows affected.
    pub fn delete(&self, bank: Bank, category: &str) -> DbResult<usize> {
        self.with_conn(|conn| {
            conn.execute(
                "DELETE FROM cashback WHERE bank = ?1 AND category = ?2",
                params![bank, category],
            )
        })
    }

    // ==================== Queries ====================

    /// All entries of one bank ordered by category
    pub fn list_by_bank(&self, bank: Bank) -> DbResult<Vec<CashbackEntry>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM cashback WHERE bank = ?1 ORDER BY category"
            ))?;
            let rows = stmt.query_map(params![bank], entry_from_row)?;
            rows.collect()
        })
    }

    /// Category names across all banks, de-duplicated and sorted
    pub fn list_distinct_categories(&self) -> DbResult<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT DISTINCT category FROM cashback ORDER BY category")?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            rows.collect()
        })
    }

    pub fn find_one(&self, bank: Bank, category: &str) -> DbResult<Option<CashbackEntry>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {ENTRY_COLUMNS} FROM cashback WHERE bank = ?1 AND category = ?2"),
                params![bank, category],
                entry_from_row,
            )
            .optional()
        })
    }

    /// Entries for a category across banks, best rate first.
    ///
    /// Equal rates are ordered by bank name.
    pub fn list_by_category_ranked(&self, category: &str) -> DbResult<Vec<CashbackEntry>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM cashback WHERE category = ?1
                 ORDER BY percentage DESC, bank ASC"
            ))?;
            let rows = stmt.query_map(params![category], entry_from_row)?;
            rows.collect()
        })
    }
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<CashbackEntry> {
    Ok(CashbackEntry {
        id: row.get(0)?,
        bank: row.get(1)?,
        category: row.get(2)?,
        percentage: row.get(3)?,
    })
}
