//! Configuration system for monday-core.
//!
//! Loaded once at process start and immutable afterwards. Missing or
//! invalid configuration is a fatal startup condition.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{MondayError, MondayResult};

/// Keyword lists that select a trigger branch. Matched as substrings
/// of the raw user message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    /// Morning summary keywords.
    pub morning: Vec<String>,
    /// Evening summary keywords.
    pub evening: Vec<String>,
    /// Weekly review keywords.
    pub weekend: Vec<String>,
    /// Memory recall keywords.
    pub remember: Vec<String>,
    /// Topic keywords for the generic fallback path.
    pub topics: TopicKeywords,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            morning: str_vec(&["おはよう", "morning", "起きた"]),
            evening: str_vec(&["疲れた", "おやすみ", "今日はここまで"]),
            weekend: str_vec(&["週次レビュー", "週末レビュー", "振り返り"]),
            remember: str_vec(&["思い出して", "記憶を見せて"]),
            topics: TopicKeywords::default(),
        }
    }
}

/// Topic keywords consumed by the generic context-assembly fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicKeywords {
    /// Attach the latest health record.
    pub health: Vec<String>,
    /// Attach the latest work record.
    pub work: Vec<String>,
    /// Attach current calendar events.
    pub calendar: Vec<String>,
    /// Attach a memory search over the message.
    pub memory: Vec<String>,
}

impl Default for TopicKeywords {
    fn default() -> Self {
        Self {
            health: str_vec(&["health", "体調"]),
            work: str_vec(&["work", "業務"]),
            calendar: str_vec(&["calendar", "予定"]),
            memory: str_vec(&["memory", "記憶検索"]),
        }
    }
}

/// Comparison operator for a brake level rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CmpOp {
    /// Greater than or equal.
    #[serde(rename = ">=")]
    Ge,
    /// Strictly greater than.
    #[serde(rename = ">")]
    Gt,
    /// Less than or equal.
    #[serde(rename = "<=")]
    Le,
    /// Strictly less than.
    #[serde(rename = "<")]
    Lt,
    /// Equal.
    #[serde(rename = "==")]
    Eq,
}

impl CmpOp {
    /// Evaluate `score <op> threshold`.
    pub fn eval(self, score: i64, threshold: i64) -> bool {
        match self {
            CmpOp::Ge => score >= threshold,
            CmpOp::Gt => score > threshold,
            CmpOp::Le => score <= threshold,
            CmpOp::Lt => score < threshold,
            CmpOp::Eq => score == threshold,
        }
    }
}

/// One structured threshold rule: the first rule in the list whose
/// comparison holds decides the brake level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRule {
    /// Level assigned when the rule matches (0-4).
    pub level: u8,
    /// Comparison operator.
    pub op: CmpOp,
    /// Score threshold.
    pub threshold: i64,
}

impl LevelRule {
    /// Create a rule.
    pub fn new(level: u8, op: CmpOp, threshold: i64) -> Self {
        Self {
            level,
            op,
            threshold,
        }
    }
}

/// Weight tables and threshold rules for the brake scorer.
///
/// The scorer treats these as opaque data: field names and value keys
/// live here, never in code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrakeConfig {
    /// Per-field weight tables: field name -> (value key -> weight).
    pub score_weights: std::collections::BTreeMap<String, std::collections::BTreeMap<String, i64>>,
    /// Reserved field excluded from scoring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonus_field: Option<String>,
    /// Ordered threshold rules, evaluated first match wins.
    pub levels: Vec<LevelRule>,
}

impl Default for BrakeConfig {
    fn default() -> Self {
        let mut score_weights = std::collections::BTreeMap::new();
        score_weights.insert(
            "睡眠時間".to_string(),
            weight_map(&[("3", 4), ("4", 3), ("5", 2), ("6", 1)]),
        );
        score_weights.insert(
            "胃腸の調子".to_string(),
            weight_map(&[("悪い", 2), ("やや悪い", 1)]),
        );
        score_weights.insert(
            "メンタル".to_string(),
            weight_map(&[("低調", 2), ("不安定", 1)]),
        );
        score_weights.insert(
            "状態".to_string(),
            weight_map(&[("絶不調", 3), ("不調", 2)]),
        );

        Self {
            score_weights,
            bonus_field: Some("頻度ボーナス".to_string()),
            levels: vec![
                LevelRule::new(4, CmpOp::Ge, 8),
                LevelRule::new(3, CmpOp::Ge, 5),
                LevelRule::new(2, CmpOp::Ge, 3),
                LevelRule::new(1, CmpOp::Ge, 1),
            ],
        }
    }
}

/// Static persona/rules text prepended to fallback prompts.
pub const DEFAULT_PERSONA: &str = "あなたは秘書の Monday。簡潔で、少し砕けた口調で、\
事実ベースで答えること。CONTEXT に含まれるデータだけを根拠に返答する。";

/// Main configuration for the router core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MondayConfig {
    /// Trigger keyword lists.
    pub triggers: TriggerConfig,
    /// Brake scorer weights and thresholds.
    pub brake: BrakeConfig,
    /// Persona text for the fallback prompt.
    pub persona: String,
    /// IANA timezone name for date windows and calendar queries.
    pub timezone: String,
    /// Pending-memory expiry in seconds.
    pub pending_ttl_secs: u64,
    /// Morning trigger cooldown in seconds.
    pub morning_cooldown_secs: u64,
}

impl Default for MondayConfig {
    fn default() -> Self {
        Self {
            triggers: TriggerConfig::default(),
            brake: BrakeConfig::default(),
            persona: DEFAULT_PERSONA.to_string(),
            timezone: "Asia/Tokyo".to_string(),
            pending_ttl_secs: 60,
            morning_cooldown_secs: 600,
        }
    }
}

impl MondayConfig {
    /// Load configuration from a file (YAML or JSON, by extension).
    pub fn from_file(path: impl AsRef<Path>) -> MondayResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let config: Self = match ext.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .map_err(|e| MondayError::configuration(format!("invalid YAML config: {}", e)))?,
            "json" => serde_json::from_str(&content)
                .map_err(|e| MondayError::configuration(format!("invalid JSON config: {}", e)))?,
            other => {
                return Err(MondayError::configuration(format!(
                    "unsupported config extension '{}'",
                    other
                )))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would disable the router at startup.
    pub fn validate(&self) -> MondayResult<()> {
        if self.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(MondayError::configuration(format!(
                "unknown timezone '{}'",
                self.timezone
            )));
        }
        for rule in &self.brake.levels {
            if rule.level > 4 {
                return Err(MondayError::configuration(format!(
                    "brake level {} out of range (0-4)",
                    rule.level
                )));
            }
        }
        Ok(())
    }
}

fn str_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn weight_map(entries: &[(&str, i64)]) -> std::collections::BTreeMap<String, i64> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = MondayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pending_ttl_secs, 60);
        assert_eq!(config.morning_cooldown_secs, 600);
    }

    #[test]
    fn test_cmp_op_eval() {
        assert!(CmpOp::Ge.eval(5, 5));
        assert!(!CmpOp::Gt.eval(5, 5));
        assert!(CmpOp::Le.eval(4, 5));
        assert!(CmpOp::Lt.eval(4, 5));
        assert!(CmpOp::Eq.eval(5, 5));
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".yml")
            .tempfile()
            .unwrap();
        write!(
            file,
            r#"
triggers:
  morning: ["おはよう"]
brake:
  levels:
    - {{level: 3, op: ">=", threshold: 5}}
timezone: "UTC"
"#
        )
        .unwrap();

        let config = MondayConfig::from_file(file.path()).unwrap();
        assert_eq!(config.triggers.morning, vec!["おはよう"]);
        assert_eq!(config.brake.levels.len(), 1);
        assert_eq!(config.brake.levels[0].op, CmpOp::Ge);
        assert_eq!(config.timezone, "UTC");
        // Unspecified sections keep their defaults.
        assert!(!config.triggers.evening.is_empty());
    }

    #[test]
    fn test_invalid_timezone_rejected() {
        let config = MondayConfig {
            timezone: "Mars/Olympus".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MondayError::Configuration(_))
        ));
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        assert!(MondayConfig::from_file(file.path()).is_err());
    }
}
