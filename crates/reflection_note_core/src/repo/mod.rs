//! Repository layer over the record store.
//!
//! # Responsibility
//! - Own one persisted collection per repository.
//! - Enforce account and roster invariants before snapshots are written.
//!
//! # Invariants
//! - Every write is read-snapshot, compute, write-snapshot.
//! - Unknown ids passed to update/delete operations are silent no-ops.
//! - `DuplicateStudentId` is the only domain error; everything else is
//!   storage transport.

use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod analysis_cache;
pub mod class_repo;
pub mod reflection_repo;
pub mod session_tracker;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    /// An active student already holds this school number in the class.
    DuplicateStudentId(String),
    Store(StoreError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateStudentId(student_id) => {
                write!(f, "student id {student_id} already exists in this class")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DuplicateStudentId(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
