//! Identity generation and time bucketing.
//!
//! # Responsibility
//! - Produce stable GUIDs for newly created entities.
//! - Name the day/hour buckets used by the archive and the journal.
//! - Provide the clock seam used for `updatedOn` stamps.
//!
//! # Invariants
//! - Generated ids are version-4 UUID strings and are never reused.
//! - Day buckets look like `Mon-Oct-19-2026`; hour buckets are `0`..=`23`.

use chrono::{DateTime, Local, TimeZone, Timelike, Utc};
use std::fmt::Display;
use uuid::Uuid;

/// Source of fresh entity ids.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random version-4 UUID generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        new_guid()
    }
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Returns a new lowercase hyphenated v4 GUID.
pub fn new_guid() -> String {
    Uuid::new_v4().to_string()
}

/// Day bucket name for `at`, e.g. `Mon-Oct-19-2026`.
pub fn day_bucket<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format("%a-%b-%d-%Y").to_string()
}

/// Hour bucket name for `at`, `0` through `23` without padding.
pub fn hour_bucket<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    at.hour().to_string()
}

/// Current local time, the reference for all bucket names.
pub fn local_now() -> DateTime<Local> {
    Local::now()
}
