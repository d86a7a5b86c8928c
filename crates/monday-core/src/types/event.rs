//! Calendar event view consumed by the router.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// Start or end of a calendar event.
///
/// Google-style calendars distinguish timed instants from all-day dates;
/// the router renders them differently (clock prefix vs. all-day marker).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventTime {
    /// A concrete instant, already in the calendar's timezone.
    Timed(DateTime<FixedOffset>),
    /// An all-day date with no time component.
    AllDay(NaiveDate),
}

impl EventTime {
    /// True for all-day boundaries.
    pub fn is_all_day(&self) -> bool {
        matches!(self, EventTime::AllDay(_))
    }
}

/// Read-only calendar event view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Event title.
    pub summary: String,
    /// Event start.
    pub start: EventTime,
    /// Event end (same shape as start).
    pub end: EventTime,
}

impl CalendarEvent {
    /// Create a timed event.
    pub fn timed(
        summary: impl Into<String>,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            summary: summary.into(),
            start: EventTime::Timed(start),
            end: EventTime::Timed(end),
        }
    }

    /// Create an all-day event.
    pub fn all_day(summary: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            summary: summary.into(),
            start: EventTime::AllDay(date),
            end: EventTime::AllDay(date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_time_untagged_roundtrip() {
        let timed: EventTime = serde_json::from_str(r#""2025-06-18T10:00:00+09:00""#).unwrap();
        assert!(!timed.is_all_day());

        let all_day: EventTime = serde_json::from_str(r#""2025-06-18""#).unwrap();
        assert!(all_day.is_all_day());
    }

    #[test]
    fn test_all_day_constructor() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 18).unwrap();
        let ev = CalendarEvent::all_day("休暇", date);
        assert!(ev.start.is_all_day());
        assert_eq!(ev.summary, "休暇");
    }
}
