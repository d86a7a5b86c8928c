//! Task view with hashtag-derived tags.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Hashtag token inside a free-text notes field, e.g. `#優先度/高`.
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#([^\s#]+)").expect("valid tag regex"));

/// Completion state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not done yet.
    #[default]
    Pending,
    /// Completed.
    Done,
}

/// Read-only task view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Provider-assigned identifier.
    pub id: String,
    /// Task title.
    pub title: String,
    /// Free-text notes; tags are encoded here as `#token` hashtags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Due date, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<NaiveDate>,
    /// Completion state.
    #[serde(default)]
    pub status: TaskStatus,
}

impl Task {
    /// Create a pending task with no notes or due date.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            notes: None,
            due: None,
            status: TaskStatus::Pending,
        }
    }

    /// Builder method to set notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Builder method to set the due date.
    pub fn with_due(mut self, due: NaiveDate) -> Self {
        self.due = Some(due);
        self
    }

    /// Tags extracted from hashtag tokens in the notes field.
    pub fn tags(&self) -> Vec<String> {
        let Some(notes) = self.notes.as_deref() else {
            return Vec::new();
        };
        TAG_RE
            .captures_iter(notes)
            .map(|c| c[1].to_string())
            .collect()
    }
}
