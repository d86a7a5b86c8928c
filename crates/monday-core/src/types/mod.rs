//! Core data types shared across the router and scorers.

mod event;
mod memory;
mod record;
mod task;

pub use event::{CalendarEvent, EventTime};
pub use memory::{
    CreatedRecord, MemoryPayload, MemoryRecord, DEFAULT_MEMORY_CATEGORY, DEFAULT_MEMORY_EMOTION,
    DEFAULT_MEMORY_REASON,
};
pub use record::{parse_sheet_date, FieldMap, FieldValue, HealthRecord, WorkRecord};
pub use task::{Task, TaskStatus};
