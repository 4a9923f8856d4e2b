//! Class definition model.

use crate::model::user::{ClassId, UserId};
use serde::{Deserialize, Serialize};

/// One class (homeroom) and its reflection target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInfo {
    pub id: ClassId,
    pub name: String,
    /// School year label, e.g. `2026`.
    pub year: String,
    /// Owning account; expected to have `UserRole::Teacher`.
    pub teacher_id: UserId,
    /// Number of days students are expected to submit a reflection.
    pub target_days: u32,
}
