//! Account roster repository.
//!
//! # Responsibility
//! - Create teachers and students, and drive account lifecycle transitions.
//! - Guard the active-student `(class_id, student_id)` uniqueness rule.
//!
//! # Invariants
//! - No two active students share a `(class_id, student_id)` pair after an
//!   insert through `upsert_student` or `bulk_upsert_students`.
//! - Accounts are never removed from the roster.
//!
//! # Known gap
//! The update path of `upsert_student` merges fields without re-checking
//! uniqueness, so moving a student into a class where their number is taken
//! is accepted as-is.

use crate::model::user::{ClassId, User, UserId, UserRole, DEFAULT_PASSWORD_HASH};
use crate::repo::{RepoError, RepoResult};
use crate::runtime::{IdGenerator, UuidIdGenerator};
use crate::store::{read_json, write_json, RecordStore, StorageKey};
use log::{debug, info, warn};

/// Partial student record for `upsert_student`.
///
/// `id: None` inserts a new student; `id: Some` merges every `Some` field
/// into the existing record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentDraft {
    pub id: Option<UserId>,
    pub name: Option<String>,
    pub student_id: Option<String>,
    /// `None` leaves the class alone; `Some(None)` unassigns it.
    pub class_id: Option<Option<ClassId>>,
    pub login_id: Option<String>,
}

/// One row of a bulk student import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentImport {
    pub name: String,
    pub student_id: String,
    pub class_id: ClassId,
}

/// Outcome of `bulk_upsert_students`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkUpsertReport {
    /// Students admitted.
    pub count: usize,
    /// Skipped school numbers, in input order.
    pub duplicates: Vec<String>,
}

pub struct UserRepository<'a> {
    store: &'a dyn RecordStore,
    ids: &'a dyn IdGenerator,
}

impl<'a> UserRepository<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self::with_id_generator(store, &UuidIdGenerator)
    }

    pub fn with_id_generator(store: &'a dyn RecordStore, ids: &'a dyn IdGenerator) -> Self {
        Self { store, ids }
    }

    pub fn list_users(&self) -> RepoResult<Vec<User>> {
        Ok(read_json(self.store, StorageKey::Users)?)
    }

    /// Replaces the whole roster snapshot.
    pub fn save_users(&self, users: &[User]) -> RepoResult<()> {
        Ok(write_json(self.store, StorageKey::Users, users)?)
    }

    pub fn find_user(&self, user_id: &str) -> RepoResult<Option<User>> {
        Ok(self.list_users()?.into_iter().find(|u| u.id == user_id))
    }

    /// Finds an admin or teacher by sign-in name, regardless of status.
    pub fn find_by_login_id(&self, login_id: &str) -> RepoResult<Option<User>> {
        Ok(self
            .list_users()?
            .into_iter()
            .find(|u| u.role != UserRole::Student && u.login_id == login_id))
    }

    /// Appends a teacher with a pending first login.
    ///
    /// `login_id` uniqueness is the caller's responsibility.
    pub fn add_teacher(
        &self,
        name: impl Into<String>,
        login_id: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> RepoResult<User> {
        let mut users = self.list_users()?;
        let teacher = User::teacher(self.ids.next_id(), name, login_id, password_hash);
        users.push(teacher.clone());
        self.save_users(&users)?;

        info!(
            "event=teacher_add module=repo status=ok user_id={}",
            teacher.id
        );
        Ok(teacher)
    }

    pub fn deactivate_user(&self, user_id: &str) -> RepoResult<()> {
        self.update_user("user_deactivate", user_id, |user| {
            user.status = user.status.deactivated();
        })
    }

    pub fn reactivate_user(&self, user_id: &str) -> RepoResult<()> {
        self.update_user("user_reactivate", user_id, |user| {
            user.status = user.status.reactivated();
        })
    }

    /// Restores the default password and forces a first-login change.
    pub fn reset_user_password(&self, user_id: &str) -> RepoResult<()> {
        self.update_user("password_reset", user_id, |user| {
            user.password_hash = DEFAULT_PASSWORD_HASH.to_string();
            user.status = user.status.password_reset();
        })
    }

    pub fn reset_student_password(&self, user_id: &str) -> RepoResult<()> {
        self.reset_user_password(user_id)
    }

    /// Records the holder's own new password and clears the first-login flag.
    pub fn complete_first_login(
        &self,
        user_id: &str,
        password_hash: impl Into<String>,
    ) -> RepoResult<()> {
        let password_hash = password_hash.into();
        self.update_user("first_login_complete", user_id, move |user| {
            user.password_hash = password_hash;
            user.status = user.status.first_login_completed();
        })
    }

    /// Inserts (no id) or merges (id given) one student.
    ///
    /// Returns the id of the inserted or targeted record.
    ///
    /// # Errors
    /// - `RepoError::DuplicateStudentId` when inserting into a slot an active
    ///   student already holds; the roster is left unchanged.
    pub fn upsert_student(&self, draft: StudentDraft) -> RepoResult<UserId> {
        let mut users = self.list_users()?;

        let Some(id) = draft.id else {
            let student_id = draft.student_id.unwrap_or_default();
            let class_id = draft.class_id.flatten();
            if users
                .iter()
                .any(|u| u.holds_student_slot(class_id.as_deref(), &student_id))
            {
                warn!(
                    "event=student_upsert module=repo status=error error_code=duplicate_student_id class_id={}",
                    class_id.as_deref().unwrap_or("-")
                );
                return Err(RepoError::DuplicateStudentId(student_id));
            }

            let student = User::student(
                self.ids.next_id(),
                draft.name.unwrap_or_default(),
                student_id,
                class_id,
            );
            let new_id = student.id.clone();
            users.push(student);
            self.save_users(&users)?;
            info!("event=student_upsert module=repo status=ok mode=insert user_id={new_id}");
            return Ok(new_id);
        };

        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                if let Some(name) = draft.name {
                    user.name = name;
                }
                if let Some(student_id) = draft.student_id {
                    user.student_id = Some(student_id);
                }
                if let Some(class_id) = draft.class_id {
                    user.class_id = class_id;
                }
                if let Some(login_id) = draft.login_id {
                    user.login_id = login_id;
                }
                self.save_users(&users)?;
                info!("event=student_upsert module=repo status=ok mode=update user_id={id}");
            }
            None => {
                debug!("event=student_upsert module=repo status=skipped reason=not_found user_id={id}");
            }
        }
        Ok(id)
    }

    /// Admits every row whose slot is free in the existing roster.
    ///
    /// Rows are checked against the roster as it was before the call, not
    /// against each other. Duplicates are reported, never raised.
    pub fn bulk_upsert_students(&self, students: &[StudentImport]) -> RepoResult<BulkUpsertReport> {
        let mut users = self.list_users()?;
        let existing = users.len();
        let mut report = BulkUpsertReport::default();

        for row in students {
            let taken = users[..existing]
                .iter()
                .any(|u| u.holds_student_slot(Some(row.class_id.as_str()), &row.student_id));
            if taken {
                report.duplicates.push(row.student_id.clone());
                continue;
            }
            users.push(User::student(
                self.ids.next_id(),
                row.name.clone(),
                row.student_id.clone(),
                Some(row.class_id.clone()),
            ));
            report.count += 1;
        }

        self.save_users(&users)?;
        info!(
            "event=student_bulk_upsert module=repo status=ok admitted={} duplicates={}",
            report.count,
            report.duplicates.len()
        );
        Ok(report)
    }

    /// Clears `class_id` on every account referencing `class_id`.
    ///
    /// Returns the number of accounts touched.
    pub fn clear_class_reference(&self, class_id: &str) -> RepoResult<usize> {
        let (users, cleared) = self.roster_without_class(class_id)?;
        self.save_users(&users)?;
        Ok(cleared)
    }

    /// Computes the roster with `class_id` references cleared, without writing it.
    pub(crate) fn roster_without_class(&self, class_id: &str) -> RepoResult<(Vec<User>, usize)> {
        let mut users = self.list_users()?;
        let mut cleared = 0;
        for user in users
            .iter_mut()
            .filter(|u| u.class_id.as_deref() == Some(class_id))
        {
            user.class_id = None;
            cleared += 1;
        }
        Ok((users, cleared))
    }

    fn update_user(
        &self,
        event: &str,
        user_id: &str,
        apply: impl FnOnce(&mut User),
    ) -> RepoResult<()> {
        let mut users = self.list_users()?;
        let Some(user) = users.iter_mut().find(|u| u.id == user_id) else {
            debug!("event={event} module=repo status=skipped reason=not_found user_id={user_id}");
            return Ok(());
        };

        apply(user);
        self.save_users(&users)?;
        info!("event={event} module=repo status=ok user_id={user_id}");
        Ok(())
    }
}
