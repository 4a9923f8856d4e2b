//! Submitted reflection model.
//!
//! # Invariants
//! - Only `teacher_feedback` changes after creation.

use crate::model::user::{ClassId, UserId};
use serde::{Deserialize, Serialize};

pub type ReflectionId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reflection {
    pub id: ReflectionId,
    /// Account that wrote the reflection.
    pub author_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<ClassId>,
    /// Journal day the reflection covers, `YYYY-MM-DD`.
    pub date: String,
    pub content: String,
    /// RFC 3339 submission time.
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_feedback: Option<String>,
}

/// Caller-supplied fields for a new reflection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectionDraft {
    pub author_id: UserId,
    pub class_id: Option<ClassId>,
    pub date: String,
    pub content: String,
}
