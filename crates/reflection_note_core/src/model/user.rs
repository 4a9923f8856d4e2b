//! Account domain model.
//!
//! # Responsibility
//! - Define administrator, teacher and student accounts.
//! - Own the account lifecycle transition table.
//!
//! # Invariants
//! - Lifecycle is one `AccountStatus`; the legacy `isActive` /
//!   `isFirstLogin` flags exist only in the serialized form.
//! - Deactivation remembers a pending first login so reactivation
//!   restores it exactly.

use serde::{Deserialize, Serialize};

pub type UserId = String;
pub type ClassId = String;

/// Password hash assigned on creation and on every reset.
pub const DEFAULT_PASSWORD_HASH: &str = "0000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Teacher,
    Student,
}

/// Account lifecycle state.
///
/// | from \ op          | deactivate          | reactivate        | reset password      | first-login change |
/// |--------------------|---------------------|-------------------|---------------------|--------------------|
/// | `PendingFirstLogin`| `Inactive{true}`    | unchanged         | unchanged           | `Active`           |
/// | `Active`           | `Inactive{false}`   | unchanged         | `PendingFirstLogin` | unchanged          |
/// | `Inactive{p}`      | unchanged           | `Pending` if p, else `Active` | `Inactive{true}` | `Inactive{false}` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountStatus {
    /// Usable, but the holder must set a new password first.
    PendingFirstLogin,
    Active,
    /// Soft-deleted.
    Inactive { first_login_pending: bool },
}

impl AccountStatus {
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Inactive { .. })
    }

    pub fn is_first_login(self) -> bool {
        match self {
            Self::PendingFirstLogin => true,
            Self::Active => false,
            Self::Inactive {
                first_login_pending,
            } => first_login_pending,
        }
    }

    pub fn deactivated(self) -> Self {
        Self::Inactive {
            first_login_pending: self.is_first_login(),
        }
    }

    pub fn reactivated(self) -> Self {
        Self::from_flags(true, self.is_first_login())
    }

    /// State after an administrator password reset.
    pub fn password_reset(self) -> Self {
        Self::from_flags(self.is_active(), true)
    }

    /// State after the holder sets their own password.
    pub fn first_login_completed(self) -> Self {
        Self::from_flags(self.is_active(), false)
    }

    fn from_flags(is_active: bool, is_first_login: bool) -> Self {
        match (is_active, is_first_login) {
            (true, true) => Self::PendingFirstLogin,
            (true, false) => Self::Active,
            (false, first_login_pending) => Self::Inactive {
                first_login_pending,
            },
        }
    }
}

/// One account in the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "UserRecord", into = "UserRecord")]
pub struct User {
    pub id: UserId,
    pub role: UserRole,
    pub name: String,
    /// Sign-in name for admins and teachers; empty for students.
    pub login_id: String,
    /// School number for students; unique per class among active students.
    pub student_id: Option<String>,
    pub password_hash: String,
    pub status: AccountStatus,
    /// Students only.
    pub class_id: Option<ClassId>,
}

impl User {
    pub fn teacher(
        id: impl Into<UserId>,
        name: impl Into<String>,
        login_id: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            role: UserRole::Teacher,
            name: name.into(),
            login_id: login_id.into(),
            student_id: None,
            password_hash: password_hash.into(),
            status: AccountStatus::PendingFirstLogin,
            class_id: None,
        }
    }

    pub fn admin(id: impl Into<UserId>, name: impl Into<String>, login_id: impl Into<String>) -> Self {
        Self {
            role: UserRole::Admin,
            ..Self::teacher(id, name, login_id, DEFAULT_PASSWORD_HASH)
        }
    }

    /// New student with the default password and a pending first login.
    pub fn student(
        id: impl Into<UserId>,
        name: impl Into<String>,
        student_id: impl Into<String>,
        class_id: Option<ClassId>,
    ) -> Self {
        Self {
            id: id.into(),
            role: UserRole::Student,
            name: name.into(),
            login_id: String::new(),
            student_id: Some(student_id.into()),
            password_hash: DEFAULT_PASSWORD_HASH.to_string(),
            status: AccountStatus::PendingFirstLogin,
            class_id,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn is_first_login(&self) -> bool {
        self.status.is_first_login()
    }

    /// Whether this account occupies the `(class_id, student_id)` slot.
    ///
    /// Only active students count; a missing class matches a missing class.
    pub fn holds_student_slot(&self, class_id: Option<&str>, student_id: &str) -> bool {
        self.role == UserRole::Student
            && self.is_active()
            && self.class_id.as_deref() == class_id
            && self.student_id.as_deref() == Some(student_id)
    }
}

/// Serialized account shape with the legacy boolean flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    id: UserId,
    role: UserRole,
    name: String,
    #[serde(default)]
    login_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    student_id: Option<String>,
    password_hash: String,
    is_first_login: bool,
    is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    class_id: Option<ClassId>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            role: record.role,
            name: record.name,
            login_id: record.login_id,
            student_id: record.student_id,
            password_hash: record.password_hash,
            status: AccountStatus::from_flags(record.is_active, record.is_first_login),
            class_id: record.class_id,
        }
    }
}

impl From<User> for UserRecord {
    fn from(user: User) -> Self {
        Self {
            is_first_login: user.is_first_login(),
            is_active: user.is_active(),
            id: user.id,
            role: user.role,
            name: user.name,
            login_id: user.login_id,
            student_id: user.student_id,
            password_hash: user.password_hash,
            class_id: user.class_id,
        }
    }
}
