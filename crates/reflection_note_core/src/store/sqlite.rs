//! SQLite-backed record store.
//!
//! # Responsibility
//! - Persist collection snapshots in the `records` table.
//! - Apply multi-key writes and removals in one SQLite transaction.
//!
//! # Invariants
//! - One row per `StorageKey`; `set` replaces the row.

use super::{RecordStore, StorageKey, StoreResult};
use crate::db::{open_db, open_db_in_memory};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

const UPSERT_RECORD_SQL: &str = "INSERT INTO records (key, value, updated_at)
     VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
     ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at;";

/// `RecordStore` persisted through a migrated SQLite connection.
pub struct SqliteRecordStore {
    conn: Connection,
}

impl SqliteRecordStore {
    /// Opens (or creates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Borrows the underlying connection for diagnostics.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl RecordStore for SqliteRecordStore {
    fn get(&self, key: StorageKey) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM records WHERE key = ?1;",
                [key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: StorageKey, value: &str) -> StoreResult<()> {
        self.conn
            .execute(UPSERT_RECORD_SQL, params![key.as_str(), value])?;
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM records WHERE key = ?1;", [key.as_str()])?;
        Ok(())
    }

    fn set_many(&self, entries: &[(StorageKey, String)]) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for (key, value) in entries {
            tx.execute(UPSERT_RECORD_SQL, params![key.as_str(), value])?;
        }
        tx.commit()?;
        Ok(())
    }

    fn remove_many(&self, keys: &[StorageKey]) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for key in keys {
            tx.execute("DELETE FROM records WHERE key = ?1;", [key.as_str()])?;
        }
        tx.commit()?;
        Ok(())
    }
}
