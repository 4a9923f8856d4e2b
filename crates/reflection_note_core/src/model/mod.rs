//! Domain records for the reflection journal.
//!
//! # Responsibility
//! - Define accounts, classes, reflections and cached analyses.
//! - Keep the serialized snapshot shape stable across releases.
//!
//! # Invariants
//! - Every record is identified by a stable string id.
//! - Accounts are soft-deleted (deactivated), never purged.

pub mod analysis;
pub mod class;
pub mod reflection;
pub mod user;
