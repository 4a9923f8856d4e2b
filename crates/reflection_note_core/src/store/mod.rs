//! Key-value record storage boundary.
//!
//! # Responsibility
//! - Define the `RecordStore` contract repositories persist through.
//! - Name the fixed, versioned keys each collection snapshot lives under.
//! - Encode/decode whole collections as JSON text blobs.
//!
//! # Invariants
//! - Every collection is stored as one complete snapshot under one key.
//! - Missing keys decode to the collection's empty default.
//! - Callers are single-writer: a repository operation reads a snapshot,
//!   computes a new one and writes it back with no isolation in between.
//!   Two writers interleaving that sequence lose an update. Neither backend
//!   here is `Sync`, so sharing one store across threads does not compile.

use crate::db::DbError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryRecordStore;
pub use sqlite::SqliteRecordStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Fixed storage keys, one per persisted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StorageKey {
    Users,
    Reflections,
    Classes,
    Analyses,
    CurrentUser,
    LastActivity,
}

impl StorageKey {
    pub const ALL: [StorageKey; 6] = [
        StorageKey::Users,
        StorageKey::Reflections,
        StorageKey::Classes,
        StorageKey::Analyses,
        StorageKey::CurrentUser,
        StorageKey::LastActivity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Users => "reflection_note_users_v2",
            Self::Reflections => "reflection_note_reflections_v2",
            Self::Classes => "reflection_note_classes_v2",
            Self::Analyses => "reflection_note_analyses_v2",
            Self::CurrentUser => "reflection_note_session_v2",
            Self::LastActivity => "reflection_note_last_activity",
        }
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage-layer error for backend access and snapshot decoding.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Codec {
        key: StorageKey,
        source: serde_json::Error,
    },
    InvalidData {
        key: StorageKey,
        message: String,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Codec { key, source } => write!(f, "invalid snapshot under `{key}`: {source}"),
            Self::InvalidData { key, message } => {
                write!(f, "invalid value under `{key}`: {message}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Codec { source, .. } => Some(source),
            Self::InvalidData { .. } => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Synchronous get/set/remove of whole text blobs by fixed key.
pub trait RecordStore {
    fn get(&self, key: StorageKey) -> StoreResult<Option<String>>;
    fn set(&self, key: StorageKey, value: &str) -> StoreResult<()>;
    fn remove(&self, key: StorageKey) -> StoreResult<()>;

    /// Writes several snapshots as one unit.
    ///
    /// The default applies them in order; backends with transactions
    /// override it so either all or none of the writes land.
    fn set_many(&self, entries: &[(StorageKey, String)]) -> StoreResult<()> {
        for (key, value) in entries {
            self.set(*key, value)?;
        }
        Ok(())
    }

    /// Removes several keys as one unit, with the same guarantee as `set_many`.
    fn remove_many(&self, keys: &[StorageKey]) -> StoreResult<()> {
        for key in keys {
            self.remove(*key)?;
        }
        Ok(())
    }
}

/// Reads and decodes the snapshot under `key`, or `T::default()` when absent.
pub fn read_json<T>(store: &dyn RecordStore, key: StorageKey) -> StoreResult<T>
where
    T: DeserializeOwned + Default,
{
    match store.get(key)? {
        Some(text) => decode(key, &text),
        None => Ok(T::default()),
    }
}

/// Encodes `value` and writes it under `key`.
pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn RecordStore,
    key: StorageKey,
    value: &T,
) -> StoreResult<()> {
    store.set(key, &encode(key, value)?)
}

pub(crate) fn encode<T: Serialize + ?Sized>(key: StorageKey, value: &T) -> StoreResult<String> {
    serde_json::to_string(value).map_err(|source| StoreError::Codec { key, source })
}

pub(crate) fn decode<T: DeserializeOwned>(key: StorageKey, text: &str) -> StoreResult<T> {
    serde_json::from_str(text).map_err(|source| StoreError::Codec { key, source })
}
