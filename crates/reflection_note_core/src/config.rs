//! Core runtime configuration.
//!
//! # Responsibility
//! - Collect storage and logging settings supplied by the host process.
//! - Open the configured record store.
//!
//! # Invariants
//! - A validated config has a supported log level and, when file logging
//!   is enabled, an absolute log directory.

use crate::logging::{default_log_level, init_logging, normalize_level};
use crate::store::{MemoryRecordStore, RecordStore, SqliteRecordStore, StoreResult};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file for snapshots; `None` keeps everything in memory.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// Directory for rolling log files; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Normalizes the log level and checks the log directory.
    pub fn validate(mut self) -> Result<Self, String> {
        self.log_level = normalize_level(&self.log_level)?.to_string();
        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(format!(
                    "log_dir must be an absolute path, got `{}`",
                    dir.display()
                ));
            }
        }
        Ok(self)
    }

    /// Starts file logging when a log directory is configured.
    pub fn init_logging(&self) -> Result<(), String> {
        let Some(dir) = &self.log_dir else {
            return Ok(());
        };
        let dir = dir
            .to_str()
            .ok_or_else(|| format!("log_dir is not valid UTF-8: {}", dir.display()))?;
        init_logging(&self.log_level, dir)
    }

    pub fn open_store(&self) -> StoreResult<Box<dyn RecordStore>> {
        Ok(match &self.db_path {
            Some(path) => Box::new(SqliteRecordStore::open(path)?),
            None => Box::new(MemoryRecordStore::new()),
        })
    }
}
