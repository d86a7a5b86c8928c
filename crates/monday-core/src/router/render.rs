//! Reply rendering for the trigger branches.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::brake::{level_label, BrakeResult};
use crate::types::{CalendarEvent, EventTime, FieldMap, HealthRecord, MemoryRecord, Task, WorkRecord};

// Well-known sheet columns consumed by the formatters. The brake scorer
// stays field-name-free; the renderers are where the domain columns live.
pub(crate) const FIELD_SLEEP_HOURS: &str = "睡眠時間";
pub(crate) const FIELD_SLEEP_QUALITY: &str = "睡眠の質";
pub(crate) const FIELD_STOMACH: &str = "胃腸の調子";
pub(crate) const FIELD_MOOD: &str = "メンタル";
pub(crate) const FIELD_STATUS: &str = "状態";
pub(crate) const FIELD_TIMESTAMP: &str = "タイムスタンプ";
pub(crate) const FIELD_WORK_SUMMARY: &str = "今日のまとめ！";

/// Placeholder for absent values.
pub(crate) const PLACEHOLDER: &str = "—";
/// Shown when the day has no calendar events.
pub(crate) const MSG_FREE_TIME: &str = "予定なし（自由時間！）";
/// Shown for empty weekly-review sections.
pub(crate) const MSG_EMPTY_SECTION: &str = "（なし）";
/// Bucket for tasks without any hashtag.
const UNTAGGED_BUCKET: &str = "その他";

/// Static advice footer for the morning summary.
const MORNING_ADVICE: &str = "☕ 無理せず、休憩はこまめにね。";

/// One-line health summary.
///
/// With a sleep-hours column present the line is
/// `睡眠 {n}h（質） / 胃腸 {..} / メンタル {..}`; otherwise it falls back
/// to the raw status column or a placeholder dash.
pub(crate) fn health_line(health: &HealthRecord) -> String {
    if let Some(sleep) = health.get(FIELD_SLEEP_HOURS) {
        let quality = health
            .get_text(FIELD_SLEEP_QUALITY)
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        let stomach = health
            .get_text(FIELD_STOMACH)
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        let mood = health
            .get_text(FIELD_MOOD)
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        return format!(
            "😴 睡眠 {}h（{}） / 胃腸 {} / メンタル {}",
            sleep, quality, stomach, mood
        );
    }
    health
        .get_text(FIELD_STATUS)
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// One bullet per event; timed events get a clock prefix, all-day
/// events the all-day marker.
pub(crate) fn event_line(event: &CalendarEvent) -> String {
    match &event.start {
        EventTime::Timed(start) => format!("・{}〜 {}", start.format("%H:%M"), event.summary),
        EventTime::AllDay(_) => format!("・終日 {}", event.summary),
    }
}

fn events_section(events: &[CalendarEvent]) -> String {
    if events.is_empty() {
        return MSG_FREE_TIME.to_string();
    }
    events
        .iter()
        .map(event_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Assemble the fixed multi-section morning message.
pub(crate) fn morning_message(
    health: &HealthRecord,
    events: &[CalendarEvent],
    brake: &BrakeResult,
) -> String {
    format!(
        "**Monday** おはよう！\n\n\
         🩺 体調: {}\n\
         🧠 ブレーキ: Level {}（{}）\n\n\
         📅 今日の予定:\n{}\n\n\
         {}",
        health_line(health),
        brake.level,
        level_label(brake.level),
        events_section(events),
        MORNING_ADVICE,
    )
}

/// Render recalled memories as bulleted lines.
pub(crate) fn memory_bullets(records: &[MemoryRecord]) -> String {
    let lines: Vec<String> = records
        .iter()
        .map(|r| {
            format!(
                "・{}（{}） [{}] {}",
                r.title,
                r.created_at.format("%Y-%m-%d"),
                r.category,
                r.url
            )
        })
        .collect();
    format!("📚 最近の記憶:\n{}", lines.join("\n"))
}

/// Group tasks under every tag they carry; untagged tasks land in the
/// catch-all bucket. Grouping, not filtering: every task appears somewhere.
pub(crate) fn group_tasks(tasks: &[Task]) -> BTreeMap<String, Vec<&Task>> {
    let mut groups: BTreeMap<String, Vec<&Task>> = BTreeMap::new();
    for task in tasks {
        let tags = task.tags();
        if tags.is_empty() {
            groups.entry(UNTAGGED_BUCKET.to_string()).or_default().push(task);
        } else {
            for tag in tags {
                groups.entry(tag).or_default().push(task);
            }
        }
    }
    groups
}

fn task_line(task: &Task) -> String {
    let due = task
        .due
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    format!("・{}（期限: {}）", task.title, due)
}

fn tasks_section(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return MSG_EMPTY_SECTION.to_string();
    }
    let groups = group_tasks(tasks);
    let mut parts = Vec::new();
    // Keep the catch-all bucket last.
    for (tag, group) in groups.iter().filter(|(tag, _)| *tag != UNTAGGED_BUCKET) {
        parts.push(format!(
            "### {}\n{}",
            tag,
            group
                .iter()
                .copied()
                .map(task_line)
                .collect::<Vec<_>>()
                .join("\n")
        ));
    }
    if let Some(rest) = groups.get(UNTAGGED_BUCKET) {
        parts.push(format!(
            "### {}\n{}",
            UNTAGGED_BUCKET,
            rest.iter()
                .copied()
                .map(task_line)
                .collect::<Vec<_>>()
                .join("\n")
        ));
    }
    parts.join("\n\n")
}

fn log_section<F>(records: &[FieldMap], line: F) -> String
where
    F: Fn(&FieldMap) -> String,
{
    if records.is_empty() {
        return MSG_EMPTY_SECTION.to_string();
    }
    records.iter().map(line).collect::<Vec<_>>().join("\n")
}

fn dated_line(record: &FieldMap, value_field: &str) -> String {
    let date = record
        .date(FIELD_TIMESTAMP)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    let value = record
        .get_text(value_field)
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    format!("・{} {}", date, value)
}

/// Assemble the weekly review reply.
pub(crate) fn weekly_review(
    monday: NaiveDate,
    today: NaiveDate,
    tasks: &[Task],
    events: &[CalendarEvent],
    health_logs: &[HealthRecord],
    work_logs: &[WorkRecord],
) -> String {
    let event_lines = if events.is_empty() {
        MSG_EMPTY_SECTION.to_string()
    } else {
        events.iter().map(event_line).collect::<Vec<_>>().join("\n")
    };

    format!(
        "📒 週次レビュー（{} 〜 {}）\n\n\
         ## タスク\n{}\n\n\
         ## 予定\n{}\n\n\
         ## 体調ログ\n{}\n\n\
         ## 業務ログ\n{}",
        monday.format("%Y-%m-%d"),
        today.format("%Y-%m-%d"),
        tasks_section(tasks),
        event_lines,
        log_section(health_logs, |r| dated_line(r, FIELD_STATUS)),
        log_section(work_logs, |r| dated_line(r, FIELD_WORK_SUMMARY)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldValue;
    use chrono::{FixedOffset, TimeZone};

    #[test]
    fn test_health_line_with_sleep_hours() {
        let mut health = HealthRecord::new();
        health.insert(FIELD_SLEEP_HOURS, 7);
        health.insert(FIELD_SLEEP_QUALITY, "良い");
        health.insert(FIELD_STOMACH, "ふつう");
        health.insert(FIELD_MOOD, "安定");
        let line = health_line(&health);
        assert!(line.contains("7h"));
        assert!(line.contains("良い"));
        assert!(line.contains("ふつう"));
        assert!(line.contains("安定"));
    }

    #[test]
    fn test_health_line_missing_subfields_use_placeholder() {
        let mut health = HealthRecord::new();
        health.insert(FIELD_SLEEP_HOURS, FieldValue::Float(6.5));
        let line = health_line(&health);
        assert!(line.contains("6.5h"));
        assert!(line.contains(PLACEHOLDER));
    }

    #[test]
    fn test_health_line_falls_back_to_status() {
        let mut health = HealthRecord::new();
        health.insert(FIELD_STATUS, "良好");
        assert_eq!(health_line(&health), "良好");
        assert_eq!(health_line(&HealthRecord::new()), PLACEHOLDER);
    }

    #[test]
    fn test_event_lines() {
        let offset = FixedOffset::east_opt(9 * 3600).unwrap();
        let start = offset.with_ymd_and_hms(2025, 6, 18, 10, 0, 0).unwrap();
        let timed = CalendarEvent::timed("会議", start, start);
        assert_eq!(event_line(&timed), "・10:00〜 会議");

        let all_day =
            CalendarEvent::all_day("休暇", NaiveDate::from_ymd_opt(2025, 6, 18).unwrap());
        let line = event_line(&all_day);
        assert!(line.contains("終日"));
        assert!(!line.contains(':'));
    }

    #[test]
    fn test_group_tasks_by_tag() {
        let tasks = vec![
            Task::new("1", "レポート").with_notes("#優先度/高"),
            Task::new("2", "掃除").with_notes("#優先度/低"),
            Task::new("3", "電話").with_notes("#緊急度/高"),
            Task::new("4", "散歩"),
        ];
        let groups = group_tasks(&tasks);
        assert_eq!(groups["優先度/高"][0].title, "レポート");
        assert_eq!(groups["優先度/低"][0].title, "掃除");
        assert_eq!(groups["緊急度/高"][0].title, "電話");
        assert_eq!(groups["その他"][0].title, "散歩");
    }

    #[test]
    fn test_weekly_review_empty_sections() {
        let monday = NaiveDate::from_ymd_opt(2025, 6, 16).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 6, 18).unwrap();
        let review = weekly_review(monday, today, &[], &[], &[], &[]);
        assert!(review.contains("週次レビュー"));
        assert_eq!(review.matches(MSG_EMPTY_SECTION).count(), 4);
    }
}
