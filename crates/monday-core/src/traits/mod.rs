//! Collaborator capability traits.
//!
//! Each external SaaS backend is consumed through a narrow async interface.
//! Wire formats, auth, and retry/backoff are the implementations' concern;
//! the router only sees these contracts and lets failures propagate.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::MondayResult;
use crate::types::{
    CalendarEvent, CreatedRecord, HealthRecord, MemoryPayload, MemoryRecord, Task, WorkRecord,
};

/// Health log provider (daily condition records).
#[async_trait]
pub trait HealthProvider: Send + Sync {
    /// Most recent health record.
    async fn latest(&self) -> MondayResult<HealthRecord>;

    /// Records whose date falls within `start..=end`.
    async fn period(&self, start: NaiveDate, end: NaiveDate) -> MondayResult<Vec<HealthRecord>>;
}

/// Work log provider (daily work records).
#[async_trait]
pub trait WorkProvider: Send + Sync {
    /// Most recent work record.
    async fn latest(&self) -> MondayResult<WorkRecord>;

    /// Today's record, if one was written.
    async fn today(&self) -> MondayResult<Option<WorkRecord>>;

    /// Records whose date falls within `start..=end`.
    async fn period(&self, start: NaiveDate, end: NaiveDate) -> MondayResult<Vec<WorkRecord>>;
}

/// Calendar provider.
///
/// Insert/update/delete exist on the real backend but the router core
/// only reads events.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Events overlapping `start..end`, interpreted in `timezone`.
    async fn get_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        timezone: &str,
    ) -> MondayResult<Vec<CalendarEvent>>;
}

/// Task list provider.
#[async_trait]
pub trait TasksProvider: Send + Sync {
    /// All open tasks.
    async fn list_tasks(&self) -> MondayResult<Vec<Task>>;
}

/// Long-term memory provider.
#[async_trait]
pub trait MemoryProvider: Send + Sync {
    /// Full-text search; an empty query returns the newest records,
    /// bounded by the provider's default page size.
    async fn search(&self, query: &str) -> MondayResult<Vec<MemoryRecord>>;

    /// Persist a new record and return its identifier.
    async fn create_record(&self, payload: &MemoryPayload) -> MondayResult<CreatedRecord>;
}
