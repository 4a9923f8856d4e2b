//! Startup seeding.
//!
//! # Responsibility
//! - Guarantee the roster holds an administrator.
//! - Provide a sample teacher, class and student on first run.
//!
//! # Invariants
//! - `init()` is idempotent: once any admin exists the store is untouched.
//! - Seed records are appended. The admin is always added; the sample
//!   teacher, class and student are skipped when their id already exists.
//! - The sample student is also skipped when an active student already
//!   holds its `(class_id, student_id)` slot.
//! - Roster and class snapshots are written as one `set_many` unit.

use crate::model::class::ClassInfo;
use crate::model::user::{AccountStatus, User, UserRole, DEFAULT_PASSWORD_HASH};
use crate::repo::class_repo::ClassRepository;
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoResult;
use crate::runtime::{Clock, SystemClock};
use crate::store::{encode, RecordStore, StorageKey};
use chrono::Datelike;
use log::info;

pub const SEED_ADMIN_ID: &str = "super-admin-1";
pub const SEED_ADMIN_LOGIN_ID: &str = "admin";
pub const SEED_TEACHER_ID: &str = "teacher-sample-1";
pub const SEED_TEACHER_LOGIN_ID: &str = "teacher1";
pub const SEED_CLASS_ID: &str = "class-1";
pub const SEED_CLASS_TARGET_DAYS: u32 = 190;
pub const SEED_STUDENT_ID: &str = "student-sample-1";
pub const SEED_STUDENT_NUMBER: &str = "10301";

pub struct BootstrapSeeder<'a> {
    store: &'a dyn RecordStore,
    clock: &'a dyn Clock,
}

impl<'a> BootstrapSeeder<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self::with_clock(store, &SystemClock)
    }

    pub fn with_clock(store: &'a dyn RecordStore, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    /// Seeds default data when the roster has no admin.
    ///
    /// Returns `true` when seed data was written.
    pub fn init(&self) -> RepoResult<bool> {
        let mut users = UserRepository::new(self.store).list_users()?;
        if users.iter().any(|u| u.role == UserRole::Admin) {
            info!("event=bootstrap_seed module=service status=skipped reason=admin_present");
            return Ok(false);
        }

        let admin = User::admin(SEED_ADMIN_ID, "System Administrator", SEED_ADMIN_LOGIN_ID);
        let teacher = User {
            status: AccountStatus::Active,
            ..User::teacher(
                SEED_TEACHER_ID,
                "Sample Teacher",
                SEED_TEACHER_LOGIN_ID,
                DEFAULT_PASSWORD_HASH,
            )
        };
        let class = ClassInfo {
            id: SEED_CLASS_ID.to_string(),
            name: "Grade 1 Class 3".to_string(),
            year: self.clock.now().year().to_string(),
            teacher_id: teacher.id.clone(),
            target_days: SEED_CLASS_TARGET_DAYS,
        };
        let student = User::student(
            SEED_STUDENT_ID,
            "Sample Student",
            SEED_STUDENT_NUMBER,
            Some(class.id.clone()),
        );

        users.push(admin);
        let mut seeded_users = 1;
        if users.iter().all(|u| u.id != teacher.id) {
            users.push(teacher);
            seeded_users += 1;
        }
        let slot_taken = users
            .iter()
            .any(|u| u.holds_student_slot(Some(SEED_CLASS_ID), SEED_STUDENT_NUMBER));
        if !slot_taken && users.iter().all(|u| u.id != student.id) {
            users.push(student);
            seeded_users += 1;
        }

        let mut classes = ClassRepository::new(self.store).list_classes()?;
        if classes.iter().all(|c| c.id != class.id) {
            classes.push(class);
        }

        self.store.set_many(&[
            (StorageKey::Users, encode(StorageKey::Users, &users)?),
            (StorageKey::Classes, encode(StorageKey::Classes, &classes)?),
        ])?;

        info!("event=bootstrap_seed module=service status=ok seeded_users={seeded_users}");
        Ok(true)
    }
}
