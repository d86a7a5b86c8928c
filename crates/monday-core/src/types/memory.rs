//! Long-term memory record views and write payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category used when the router persists an auto-captured memory.
pub const DEFAULT_MEMORY_CATEGORY: &str = "思い出";
/// Emotion used when the router persists an auto-captured memory.
pub const DEFAULT_MEMORY_EMOTION: &str = "楽しい";
/// Reason used when the router persists an auto-captured memory.
pub const DEFAULT_MEMORY_REASON: &str = "自動メモ";

/// A stored long-term memory as returned by the memory provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Provider-assigned identifier.
    pub id: String,
    /// Memory title.
    pub title: String,
    /// Category label.
    pub category: String,
    /// Link to the full record.
    pub url: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a new memory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryPayload {
    /// Record title.
    pub title: String,
    /// Full summary text.
    pub summary: String,
    /// Category label.
    pub category: String,
    /// Emotion label.
    pub emotion: String,
    /// Why the record was captured.
    pub reason: String,
    /// Creation timestamp.
    pub timestamp: DateTime<Utc>,
}

impl MemoryPayload {
    /// Build an auto-capture payload with the fixed default labels.
    pub fn auto_capture(title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            category: DEFAULT_MEMORY_CATEGORY.to_string(),
            emotion: DEFAULT_MEMORY_EMOTION.to_string(),
            reason: DEFAULT_MEMORY_REASON.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Acknowledgment returned by the memory provider after a create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedRecord {
    /// Identifier of the new record.
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_capture_defaults() {
        let payload = MemoryPayload::auto_capture("散歩が楽しかった", "散歩が楽しかった日の記録");
        assert_eq!(payload.category, DEFAULT_MEMORY_CATEGORY);
        assert_eq!(payload.emotion, DEFAULT_MEMORY_EMOTION);
        assert_eq!(payload.reason, DEFAULT_MEMORY_REASON);
    }
}
