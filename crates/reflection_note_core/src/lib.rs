//! Persistence and account invariants for the classroom reflection journal.
//! Every roster rule lives here; hosts only call repositories.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod runtime;
pub mod service;
pub mod store;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::analysis::{AnalysisEntry, AnalysisResult};
pub use model::class::ClassInfo;
pub use model::reflection::{Reflection, ReflectionDraft, ReflectionId};
pub use model::user::{AccountStatus, ClassId, User, UserId, UserRole, DEFAULT_PASSWORD_HASH};
pub use repo::analysis_cache::{AnalysisCache, AnalysisMap};
pub use repo::class_repo::ClassRepository;
pub use repo::reflection_repo::ReflectionRepository;
pub use repo::session_tracker::SessionTracker;
pub use repo::user_repo::{BulkUpsertReport, StudentDraft, StudentImport, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use runtime::{
    Clock, FixedClock, IdGenerator, SequenceIdGenerator, SystemClock, UuidIdGenerator,
};
pub use service::bootstrap_service::BootstrapSeeder;
pub use store::{
    MemoryRecordStore, RecordStore, SqliteRecordStore, StorageKey, StoreError, StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
