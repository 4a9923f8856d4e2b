//! Memoized analysis results keyed by caller-chosen strings.

use crate::model::analysis::{AnalysisEntry, AnalysisResult};
use crate::repo::RepoResult;
use crate::runtime::{Clock, SystemClock};
use crate::store::{read_json, write_json, RecordStore, StorageKey};
use chrono::SecondsFormat;
use log::info;
use std::collections::BTreeMap;

pub type AnalysisMap = BTreeMap<String, AnalysisEntry>;

pub struct AnalysisCache<'a> {
    store: &'a dyn RecordStore,
    clock: &'a dyn Clock,
}

impl<'a> AnalysisCache<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self::with_clock(store, &SystemClock)
    }

    pub fn with_clock(store: &'a dyn RecordStore, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    /// All cached entries; empty when nothing was stored.
    pub fn get_analyses(&self) -> RepoResult<AnalysisMap> {
        Ok(read_json(self.store, StorageKey::Analyses)?)
    }

    pub fn get_analysis(&self, key: &str) -> RepoResult<Option<AnalysisEntry>> {
        Ok(self.get_analyses()?.remove(key))
    }

    /// Stores `result` under `key` with a fresh timestamp, replacing any prior entry.
    pub fn set_analysis(
        &self,
        key: impl Into<String>,
        result: AnalysisResult,
    ) -> RepoResult<AnalysisEntry> {
        let key = key.into();
        let mut analyses = self.get_analyses()?;
        let entry = AnalysisEntry {
            result,
            timestamp: self
                .clock
                .now()
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        analyses.insert(key.clone(), entry.clone());
        write_json(self.store, StorageKey::Analyses, &analyses)?;

        info!("event=analysis_set module=repo status=ok key={key}");
        Ok(entry)
    }
}
