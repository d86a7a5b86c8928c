//! Message router / trigger dispatcher.
//!
//! Examines an incoming message, selects exactly one trigger branch in
//! fixed priority order (remember, morning, evening, weekend, memory
//! capture), and falls back to generic keyword-context assembly when
//! nothing fires. Collaborator failures propagate untouched; lock
//! contention and cooldown are normal control-flow outcomes with
//! dedicated replies, never errors.

mod prompt;
mod render;

use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::brake::BrakeChecker;
use crate::config::{MondayConfig, TriggerConfig};
use crate::error::{MondayError, MondayResult};
use crate::session::{MorningGate, SessionState};
use crate::suggest::{needs_memory, truncate_chars};
use crate::traits::{
    CalendarProvider, HealthProvider, MemoryProvider, TasksProvider, WorkProvider,
};
use crate::types::{FieldMap, MemoryPayload};

/// Normalized tokens accepted as a yes to a pending memory.
const AFFIRMATIVE: &[&str] = &["はい", "ok", "うん", "yes"];
/// Normalized tokens accepted as a no to a pending memory.
const NEGATIVE: &[&str] = &["いいえ", "no", "やめて"];

/// Title length (in characters) for auto-captured memories.
const MEMORY_TITLE_CHARS: usize = 30;
/// Identifier length shown in the persist acknowledgment.
const MEMORY_ID_CHARS: usize = 8;

const MSG_NO_MEMORIES: &str = "📚 まだ記憶はないよ。";
const MSG_MORNING_BUSY: &str = "🌀 いま朝のまとめを作っているよ。少しだけ待ってね。";
const MSG_MORNING_COOLDOWN: &str = "☕ さっき答えたばかりだよ。少し時間をおいてまた聞いてね。";
const MSG_DECLINED: &str = "🗑️ わかった、保存しないね。";
const MSG_NO_WORK_RECORD: &str = "記録なし";

/// The trigger dispatcher.
///
/// One instance serves all sessions; per-session routing state lives in
/// the injected [`SessionState`].
pub struct MessageRouter {
    health: Arc<dyn HealthProvider>,
    work: Arc<dyn WorkProvider>,
    calendar: Arc<dyn CalendarProvider>,
    tasks: Arc<dyn TasksProvider>,
    memory: Arc<dyn MemoryProvider>,
    brake: BrakeChecker,
    triggers: TriggerConfig,
    persona: String,
    timezone_name: String,
    tz: Tz,
    sessions: Arc<SessionState>,
}

impl MessageRouter {
    /// Create a router over the given collaborators and session state.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: MondayConfig,
        health: Arc<dyn HealthProvider>,
        work: Arc<dyn WorkProvider>,
        calendar: Arc<dyn CalendarProvider>,
        tasks: Arc<dyn TasksProvider>,
        memory: Arc<dyn MemoryProvider>,
        sessions: Arc<SessionState>,
    ) -> MondayResult<Self> {
        config.validate()?;
        let tz: Tz = config
            .timezone
            .parse()
            .map_err(|_| MondayError::configuration(format!("unknown timezone '{}'", config.timezone)))?;

        Ok(Self {
            health,
            work,
            calendar,
            tasks,
            memory,
            brake: BrakeChecker::new(config.brake),
            triggers: config.triggers,
            persona: config.persona,
            timezone_name: config.timezone,
            tz,
            sessions,
        })
    }

    /// Produce a single text reply for a user message.
    pub async fn handle_message(&self, user_msg: &str, session_id: &str) -> MondayResult<String> {
        if contains_any(user_msg, &self.triggers.remember) {
            debug!(session_id, trigger = "remember", "trigger fired");
            return self.recall_memories().await;
        }

        if contains_any(user_msg, &self.triggers.morning) {
            debug!(session_id, trigger = "morning", "trigger fired");
            return self.morning_summary(session_id).await;
        }

        if contains_any(user_msg, &self.triggers.evening) {
            debug!(session_id, trigger = "evening", "trigger fired");
            return self.evening_summary().await;
        }

        if contains_any(user_msg, &self.triggers.weekend) {
            debug!(session_id, trigger = "weekend", "trigger fired");
            return self.weekly_review().await;
        }

        if let Some(suggestion) = needs_memory(user_msg, "") {
            debug!(session_id, digest = %suggestion.digest, "memory capture proposed");
            self.sessions.pending.store(session_id, &suggestion.summary);
            return Ok(format!(
                "✍️ この内容を記憶してもいい？\n\n『{}』",
                suggestion.summary
            ));
        }

        if let Some(reply) = self.resolve_pending(user_msg, session_id).await? {
            return Ok(reply);
        }

        self.assemble_context(user_msg, session_id).await
    }

    /// Remember trigger: newest memories as bullets.
    async fn recall_memories(&self) -> MondayResult<String> {
        let records = self.memory.search("").await?;
        if records.is_empty() {
            return Ok(MSG_NO_MEMORIES.to_string());
        }
        Ok(render::memory_bullets(&records))
    }

    /// Morning trigger: guarded, cooled-down daily summary.
    async fn morning_summary(&self, session_id: &str) -> MondayResult<String> {
        let run = match self.sessions.morning.begin(session_id) {
            MorningGate::Cooldown => return Ok(MSG_MORNING_COOLDOWN.to_string()),
            MorningGate::Busy => return Ok(MSG_MORNING_BUSY.to_string()),
            MorningGate::Acquired(run) => run,
        };

        let today = self.today();
        let (start, end) = self.day_bounds(today)?;

        // Atomic gather: either both fetches land or the trigger fails.
        // An error drops `run`, releasing the gate without arming the
        // cooldown.
        let (health, events) = tokio::try_join!(
            self.health.latest(),
            self.calendar.get_events(start, end, &self.timezone_name),
        )?;

        let brake = self.brake.check(&health, &FieldMap::new());
        let reply = render::morning_message(&health, &events, &brake);

        run.complete();
        Ok(reply)
    }

    /// Evening trigger: one-line summary of today's work record.
    async fn evening_summary(&self) -> MondayResult<String> {
        let work = self.work.today().await?;
        let summary = work
            .as_ref()
            .and_then(|r| r.get_text(render::FIELD_WORK_SUMMARY))
            .unwrap_or_else(|| MSG_NO_WORK_RECORD.to_string());
        Ok(format!(
            "**Monday**: 今日もお疲れさま！\n🗒 今日のまとめ: {}",
            summary
        ))
    }

    /// Weekend trigger: Monday-through-today review over four sources.
    async fn weekly_review(&self) -> MondayResult<String> {
        let today = self.today();
        let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
        let (start, _) = self.day_bounds(monday)?;
        let (_, end) = self.day_bounds(today)?;

        let (tasks, events, health_logs, work_logs) = tokio::try_join!(
            self.tasks.list_tasks(),
            self.calendar.get_events(start, end, &self.timezone_name),
            self.health.period(monday, today),
            self.work.period(monday, today),
        )?;

        Ok(render::weekly_review(
            monday,
            today,
            &tasks,
            &events,
            &health_logs,
            &work_logs,
        ))
    }

    /// Resolve a yes/no answer to a pending memory, if one applies.
    ///
    /// Messages that are neither yes nor no leave the entry alone; it
    /// simply expires if never answered.
    async fn resolve_pending(
        &self,
        user_msg: &str,
        session_id: &str,
    ) -> MondayResult<Option<String>> {
        let normalized = user_msg.trim().to_lowercase();

        if AFFIRMATIVE.contains(&normalized.as_str()) {
            if let Some(summary) = self.sessions.pending.pop(session_id) {
                let payload = MemoryPayload::auto_capture(
                    truncate_chars(&summary, MEMORY_TITLE_CHARS),
                    summary.as_str(),
                );
                let created = self.memory.create_record(&payload).await?;
                debug!(session_id, id = %created.id, "pending memory persisted");
                return Ok(Some(format!(
                    "✅ 記憶したよ。（id: {}…）",
                    truncate_chars(&created.id, MEMORY_ID_CHARS)
                )));
            }
        } else if NEGATIVE.contains(&normalized.as_str())
            && self.sessions.pending.pop(session_id).is_some()
        {
            debug!(session_id, "pending memory declined");
            return Ok(Some(MSG_DECLINED.to_string()));
        }

        Ok(None)
    }

    /// Generic fallback: accumulate topic data and wrap it into a prompt.
    async fn assemble_context(&self, user_msg: &str, session_id: &str) -> MondayResult<String> {
        let topics = &self.triggers.topics;
        let mut context = serde_json::Map::new();

        if contains_any(user_msg, &topics.health) {
            let health = self.health.latest().await?;
            let brake = self.brake.check(&health, &FieldMap::new());
            context.insert("health".to_string(), serde_json::to_value(&health)?);
            context.insert("brake".to_string(), serde_json::to_value(&brake)?);
        }

        if contains_any(user_msg, &topics.work) {
            let work = self.work.latest().await?;
            context.insert("work".to_string(), serde_json::to_value(&work)?);
        }

        if contains_any(user_msg, &topics.calendar) {
            let now = Utc::now();
            let events = self.calendar.get_events(now, now, &self.timezone_name).await?;
            context.insert("events".to_string(), serde_json::to_value(&events)?);
        }

        if contains_any(user_msg, &topics.memory) {
            let memories = self.memory.search(user_msg).await?;
            context.insert("memories".to_string(), serde_json::to_value(&memories)?);
        }

        debug!(session_id, keys = context.len(), "fallback context assembled");
        prompt::build_prompt(&self.persona, &context, user_msg)
    }

    /// Today's date in the configured timezone.
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }

    /// UTC bounds of a local calendar day: midnight through 23:59:59.
    fn day_bounds(&self, date: NaiveDate) -> MondayResult<(DateTime<Utc>, DateTime<Utc>)> {
        let midnight = self
            .tz
            .from_local_datetime(&date.and_time(NaiveTime::MIN))
            .earliest()
            .ok_or_else(|| {
                MondayError::internal(format!("no midnight for {} in {}", date, self.timezone_name))
            })?;
        let start = midnight.with_timezone(&Utc);
        let end = start + Duration::days(1) - Duration::seconds(1);
        Ok((start, end))
    }
}

/// True when the message contains any of the keywords as a substring.
fn contains_any(message: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|kw| !kw.is_empty() && message.contains(kw.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_any() {
        let keywords = vec!["おはよう".to_string(), "morning".to_string()];
        assert!(contains_any("おはよう！今日も頑張る", &keywords));
        assert!(contains_any("good morning", &keywords));
        assert!(!contains_any("こんばんは", &keywords));
    }

    #[test]
    fn test_empty_keyword_never_matches() {
        let keywords = vec![String::new()];
        assert!(!contains_any("anything", &keywords));
    }
}
