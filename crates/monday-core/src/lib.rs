//! monday-core - Trigger-routing core for the Monday secretary assistant.
//!
//! This crate inspects a free-text user message, selects one trigger
//! branch (morning/evening/weekend summaries, memory recall and capture),
//! gathers data from external providers concurrently, and produces a
//! single text reply. External SaaS backends sit behind the traits in
//! [`traits`]; the hosting transport maps requests onto
//! [`MessageRouter::handle_message`].
//!
//! # Example
//!
//! ```ignore
//! use monday_core::{MessageRouter, MondayConfig, SessionState};
//! use std::sync::Arc;
//!
//! let config = MondayConfig::from_file("monday.yml")?;
//! let sessions = Arc::new(SessionState::from_config(&config));
//! let router = MessageRouter::new(config, health, work, calendar, tasks, memory, sessions)?;
//!
//! let reply = router.handle_message("おはよう！", "session-1").await?;
//! ```

pub mod brake;
pub mod config;
pub mod error;
pub mod router;
pub mod session;
pub mod suggest;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use brake::{level_label, BrakeChecker, BrakeResult};
pub use config::{BrakeConfig, CmpOp, LevelRule, MondayConfig, TopicKeywords, TriggerConfig};
pub use error::{MondayError, MondayResult};
pub use router::MessageRouter;
pub use session::{MorningGate, MorningGuard, MorningRun, PendingMemoryStore, SessionState};
pub use suggest::{needs_memory, Suggestion};
pub use traits::{
    CalendarProvider, HealthProvider, MemoryProvider, TasksProvider, WorkProvider,
};
pub use types::{
    CalendarEvent, CreatedRecord, EventTime, FieldMap, FieldValue, HealthRecord, MemoryPayload,
    MemoryRecord, Task, TaskStatus, WorkRecord,
};
