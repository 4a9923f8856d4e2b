//! Reflection repository.

use crate::model::reflection::{Reflection, ReflectionDraft};
use crate::repo::RepoResult;
use crate::runtime::{Clock, IdGenerator, SystemClock, UuidIdGenerator};
use crate::store::{read_json, write_json, RecordStore, StorageKey};
use chrono::SecondsFormat;
use log::{debug, info};

pub struct ReflectionRepository<'a> {
    store: &'a dyn RecordStore,
    ids: &'a dyn IdGenerator,
    clock: &'a dyn Clock,
}

impl<'a> ReflectionRepository<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self::with_runtime(store, &UuidIdGenerator, &SystemClock)
    }

    pub fn with_runtime(
        store: &'a dyn RecordStore,
        ids: &'a dyn IdGenerator,
        clock: &'a dyn Clock,
    ) -> Self {
        Self { store, ids, clock }
    }

    pub fn list_reflections(&self) -> RepoResult<Vec<Reflection>> {
        Ok(read_json(self.store, StorageKey::Reflections)?)
    }

    pub fn save_reflections(&self, reflections: &[Reflection]) -> RepoResult<()> {
        Ok(write_json(self.store, StorageKey::Reflections, reflections)?)
    }

    /// Reflections written by one account, in submission order.
    pub fn reflections_for_student(&self, author_id: &str) -> RepoResult<Vec<Reflection>> {
        let mut reflections = self.list_reflections()?;
        reflections.retain(|r| r.author_id == author_id);
        Ok(reflections)
    }

    pub fn add_reflection(&self, draft: ReflectionDraft) -> RepoResult<Reflection> {
        let mut reflections = self.list_reflections()?;
        let reflection = Reflection {
            id: self.ids.next_id(),
            author_id: draft.author_id,
            class_id: draft.class_id,
            date: draft.date,
            content: draft.content,
            created_at: self
                .clock
                .now()
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            teacher_feedback: None,
        };
        reflections.push(reflection.clone());
        self.save_reflections(&reflections)?;

        info!(
            "event=reflection_add module=repo status=ok reflection_id={} author_id={}",
            reflection.id, reflection.author_id
        );
        Ok(reflection)
    }

    /// Replaces the teacher feedback on one reflection; unknown ids are ignored.
    pub fn update_reflection_feedback(
        &self,
        reflection_id: &str,
        feedback: impl Into<String>,
    ) -> RepoResult<()> {
        let mut reflections = self.list_reflections()?;
        let Some(reflection) = reflections.iter_mut().find(|r| r.id == reflection_id) else {
            debug!(
                "event=reflection_feedback module=repo status=skipped reason=not_found reflection_id={reflection_id}"
            );
            return Ok(());
        };

        reflection.teacher_feedback = Some(feedback.into());
        self.save_reflections(&reflections)?;
        info!("event=reflection_feedback module=repo status=ok reflection_id={reflection_id}");
        Ok(())
    }
}
