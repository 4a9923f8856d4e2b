//! Current-session bookkeeping.
//!
//! # Invariants
//! - The current user and the last-activity stamp are set and cleared
//!   together; a stamp never exists without a user.

use crate::model::user::User;
use crate::repo::RepoResult;
use crate::runtime::{Clock, SystemClock};
use crate::store::{encode, read_json, RecordStore, StorageKey, StoreError};
use log::info;

pub struct SessionTracker<'a> {
    store: &'a dyn RecordStore,
    clock: &'a dyn Clock,
}

impl<'a> SessionTracker<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self::with_clock(store, &SystemClock)
    }

    pub fn with_clock(store: &'a dyn RecordStore, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    /// Signs `user` in (stamping activity) or, with `None`, clears the session.
    pub fn set_current_user(&self, user: Option<&User>) -> RepoResult<()> {
        match user {
            Some(user) => {
                self.store.set_many(&[
                    (
                        StorageKey::CurrentUser,
                        encode(StorageKey::CurrentUser, user)?,
                    ),
                    (StorageKey::LastActivity, self.now_ms()),
                ])?;
                info!("event=session_set module=session status=ok user_id={}", user.id);
            }
            None => {
                self.store
                    .remove_many(&[StorageKey::CurrentUser, StorageKey::LastActivity])?;
                info!("event=session_clear module=session status=ok");
            }
        }
        Ok(())
    }

    pub fn get_current_user(&self) -> RepoResult<Option<User>> {
        Ok(read_json(self.store, StorageKey::CurrentUser)?)
    }

    /// Epoch milliseconds of the last recorded activity.
    pub fn last_activity(&self) -> RepoResult<Option<i64>> {
        let Some(text) = self.store.get(StorageKey::LastActivity)? else {
            return Ok(None);
        };
        let stamp = text.trim().parse::<i64>().map_err(|err| StoreError::InvalidData {
            key: StorageKey::LastActivity,
            message: format!("`{text}` is not epoch milliseconds: {err}"),
        })?;
        Ok(Some(stamp))
    }

    /// Refreshes the activity stamp while someone is signed in.
    pub fn touch(&self) -> RepoResult<()> {
        if self.get_current_user()?.is_some() {
            self.store.set(StorageKey::LastActivity, &self.now_ms())?;
        }
        Ok(())
    }

    fn now_ms(&self) -> String {
        self.clock.now().timestamp_millis().to_string()
    }
}
