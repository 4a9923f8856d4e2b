//! Class repository.
//!
//! # Invariants
//! - Deleting a class never deletes its students; their `class_id` is
//!   cleared and the class snapshot and roster snapshot are written as one
//!   `set_many` unit.

use crate::model::class::ClassInfo;
use crate::model::user::UserId;
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoResult;
use crate::runtime::{IdGenerator, UuidIdGenerator};
use crate::store::{encode, read_json, write_json, RecordStore, StorageKey};
use log::info;

pub struct ClassRepository<'a> {
    store: &'a dyn RecordStore,
    ids: &'a dyn IdGenerator,
}

impl<'a> ClassRepository<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self::with_id_generator(store, &UuidIdGenerator)
    }

    pub fn with_id_generator(store: &'a dyn RecordStore, ids: &'a dyn IdGenerator) -> Self {
        Self { store, ids }
    }

    pub fn list_classes(&self) -> RepoResult<Vec<ClassInfo>> {
        Ok(read_json(self.store, StorageKey::Classes)?)
    }

    pub fn save_classes(&self, classes: &[ClassInfo]) -> RepoResult<()> {
        Ok(write_json(self.store, StorageKey::Classes, classes)?)
    }

    pub fn find_class(&self, class_id: &str) -> RepoResult<Option<ClassInfo>> {
        Ok(self.list_classes()?.into_iter().find(|c| c.id == class_id))
    }

    pub fn add_class(
        &self,
        name: impl Into<String>,
        year: impl Into<String>,
        teacher_id: impl Into<UserId>,
        target_days: u32,
    ) -> RepoResult<ClassInfo> {
        let mut classes = self.list_classes()?;
        let class = ClassInfo {
            id: self.ids.next_id(),
            name: name.into(),
            year: year.into(),
            teacher_id: teacher_id.into(),
            target_days,
        };
        classes.push(class.clone());
        self.save_classes(&classes)?;

        info!("event=class_add module=repo status=ok class_id={}", class.id);
        Ok(class)
    }

    /// Removes the class and orphans its members.
    ///
    /// Missing classes are a no-op for the class snapshot; member references
    /// are cleared either way.
    pub fn delete_class(&self, class_id: &str) -> RepoResult<()> {
        let mut classes = self.list_classes()?;
        let before = classes.len();
        classes.retain(|c| c.id != class_id);
        let removed = before - classes.len();

        let (users, orphaned) =
            UserRepository::new(self.store).roster_without_class(class_id)?;

        self.store.set_many(&[
            (StorageKey::Classes, encode(StorageKey::Classes, &classes)?),
            (StorageKey::Users, encode(StorageKey::Users, &users)?),
        ])?;

        info!(
            "event=class_delete module=repo status=ok class_id={class_id} removed={removed} orphaned={orphaned}"
        );
        Ok(())
    }
}
