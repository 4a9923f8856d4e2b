//! Identity and wall-clock primitives injected into repositories.
//!
//! # Responsibility
//! - Generate globally-unique record identifiers.
//! - Supply the current instant for timestamps.
//!
//! Production code uses `UuidIdGenerator` and `SystemClock`; tests swap in
//! `SequenceIdGenerator` and `FixedClock` for deterministic output.

use chrono::{DateTime, Utc};
use std::cell::Cell;
use uuid::Uuid;

/// Source of fresh record identifiers.
pub trait IdGenerator {
    fn next_id(&self) -> String;
}

/// Random v4 UUID identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `<prefix>-<n>` identifiers, starting at 1.
#[derive(Debug)]
pub struct SequenceIdGenerator {
    prefix: String,
    next: Cell<u64>,
}

impl SequenceIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: Cell::new(1),
        }
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn next_id(&self) -> String {
        let n = self.next.get();
        self.next.set(n + 1);
        format!("{}-{n}", self.prefix)
    }
}

/// Source of the current wall-clock instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Builds a clock from epoch milliseconds; out-of-range values fall back to the epoch.
    pub fn from_epoch_ms(epoch_ms: i64) -> Self {
        Self(DateTime::from_timestamp_millis(epoch_ms).unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
