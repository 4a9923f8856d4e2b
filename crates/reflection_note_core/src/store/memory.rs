//! In-process record store used by tests and ephemeral sessions.

use super::{RecordStore, StorageKey, StoreResult};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// `RecordStore` backed by a map in memory.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RefCell<BTreeMap<StorageKey, String>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many keys currently hold a value.
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl RecordStore for MemoryRecordStore {
    fn get(&self, key: StorageKey) -> StoreResult<Option<String>> {
        Ok(self.records.borrow().get(&key).cloned())
    }

    fn set(&self, key: StorageKey, value: &str) -> StoreResult<()> {
        self.records.borrow_mut().insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> StoreResult<()> {
        self.records.borrow_mut().remove(&key);
        Ok(())
    }
}
