//! Cached analysis result model.
//!
//! # Responsibility
//! - Type the payloads memoized by `AnalysisCache`.
//!
//! # Invariants
//! - Known kinds are typed variants; anything else travels as a versioned
//!   `External` document whose schema is owned by its producer.
//! - An entry is the result's fields plus a `timestamp` set at write time.

use crate::model::user::{ClassId, UserId};
use serde::{Deserialize, Serialize};

/// Result payload for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "kind",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum AnalysisResult {
    ClassSummary {
        class_id: ClassId,
        summary: String,
        keywords: Vec<String>,
    },
    StudentGrowth {
        user_id: UserId,
        summary: String,
        strengths: Vec<String>,
        suggestions: Vec<String>,
    },
    External {
        /// Producer-owned schema name.
        schema: String,
        version: u32,
        /// Serialized document, opaque to this crate.
        document: String,
    },
}

/// Cached result stamped with its write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisEntry {
    #[serde(flatten)]
    pub result: AnalysisResult,
    /// RFC 3339 UTC, millisecond precision.
    pub timestamp: String,
}
