//! Well-being "brake" scoring.
//!
//! Pure, data-driven scoring of a daily health record: weighted lookups
//! over configured fields, then ordered threshold rules decide a level
//! from 0 (plenty of margin) to 4 (forced rest). Weights and rules are
//! configuration, not code; the scorer knows no field names.

use serde::{Deserialize, Serialize};

use crate::config::BrakeConfig;
use crate::types::{FieldMap, HealthRecord};

/// Fixed recommendation attached when braking is advised.
const BRAKE_SUGGESTION: &str = "休憩を取ってリラックスしよう";

/// Result of one brake evaluation. Computed fresh per request,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrakeResult {
    /// Weighted score over the health record.
    pub score: i64,
    /// Brake level, 0-4.
    pub level: u8,
    /// True when the level calls for rest (level >= 2).
    pub should_brake: bool,
    /// Diagnostic string embedding score and level.
    pub why: String,
    /// Recommendations; one fixed entry when braking.
    pub suggestions: Vec<String>,
}

/// Rule-driven brake scorer.
#[derive(Debug, Clone)]
pub struct BrakeChecker {
    config: BrakeConfig,
}

impl BrakeChecker {
    /// Create a checker over the given weight tables and rules.
    pub fn new(config: BrakeConfig) -> Self {
        Self { config }
    }

    /// Evaluate a health record.
    ///
    /// `activity` is a secondary input reserved for periodic activity
    /// data; the current rule set does not consume it.
    pub fn check(&self, health: &HealthRecord, _activity: &FieldMap) -> BrakeResult {
        let score = self.calc_score(health);
        let level = self.judge_level(score);
        let should_brake = level >= 2;

        let suggestions = if should_brake {
            vec![BRAKE_SUGGESTION.to_string()]
        } else {
            Vec::new()
        };

        BrakeResult {
            score,
            level,
            should_brake,
            why: format!("score={} level={}", score, level),
            suggestions,
        }
    }

    /// Sum configured weights for field values present in the record.
    fn calc_score(&self, health: &HealthRecord) -> i64 {
        let mut score = 0;
        for (field, weights) in &self.config.score_weights {
            if Some(field) == self.config.bonus_field.as_ref() {
                continue;
            }
            let Some(value) = health.get(field) else {
                continue;
            };
            if let Some(weight) = weights.get(&value.as_key()) {
                score += weight;
            }
        }
        score
    }

    /// First matching threshold rule wins; no match means level 0.
    fn judge_level(&self, score: i64) -> u8 {
        self.config
            .levels
            .iter()
            .find(|rule| rule.op.eval(score, rule.threshold))
            .map(|rule| rule.level)
            .unwrap_or(0)
    }
}

/// Fixed label for each brake level, used in the morning summary.
pub fn level_label(level: u8) -> &'static str {
    match level {
        0 => "余裕あり",
        1 => "通常",
        2 => "注意",
        3 => "休息優先",
        _ => "強制休息",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CmpOp, LevelRule};

    fn sample_record() -> HealthRecord {
        let mut record = HealthRecord::new();
        record.insert("睡眠時間", 4);
        record.insert("胃腸の調子", "やや悪い");
        record.insert("メンタル", "低調");
        record
    }

    #[test]
    fn test_score_sums_present_fields() {
        let checker = BrakeChecker::new(BrakeConfig::default());
        // 睡眠時間=4 -> 3, やや悪い -> 1, 低調 -> 2
        let result = checker.check(&sample_record(), &FieldMap::new());
        assert_eq!(result.score, 6);
        assert_eq!(result.level, 3);
        assert!(result.should_brake);
        assert_eq!(result.suggestions.len(), 1);
        assert_eq!(result.why, "score=6 level=3");
    }

    #[test]
    fn test_unknown_values_score_zero() {
        let checker = BrakeChecker::new(BrakeConfig::default());
        let mut record = HealthRecord::new();
        record.insert("睡眠時間", 8);
        record.insert("メンタル", "好調");
        let result = checker.check(&record, &FieldMap::new());
        assert_eq!(result.score, 0);
        assert_eq!(result.level, 0);
        assert!(!result.should_brake);
        assert!(result.suggestions.is_empty());
    }

    #[test]
    fn test_bonus_field_excluded() {
        let mut config = BrakeConfig::default();
        config
            .score_weights
            .insert("頻度ボーナス".to_string(), [("有".to_string(), 10)].into());
        let checker = BrakeChecker::new(config);

        let mut record = HealthRecord::new();
        record.insert("頻度ボーナス", "有");
        let result = checker.check(&record, &FieldMap::new());
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let config = BrakeConfig {
            levels: vec![
                LevelRule::new(4, CmpOp::Ge, 8),
                LevelRule::new(2, CmpOp::Ge, 3),
                LevelRule::new(3, CmpOp::Ge, 5),
            ],
            ..Default::default()
        };
        let checker = BrakeChecker::new(config);
        // Score 6 matches the level-2 rule before the level-3 rule.
        assert_eq!(checker.check(&sample_record(), &FieldMap::new()).level, 2);
    }

    #[test]
    fn test_check_is_idempotent() {
        let checker = BrakeChecker::new(BrakeConfig::default());
        let record = sample_record();
        let first = checker.check(&record, &FieldMap::new());
        let second = checker.check(&record, &FieldMap::new());
        assert_eq!(first, second);
    }

    #[test]
    fn test_level_labels() {
        assert_eq!(level_label(0), "余裕あり");
        assert_eq!(level_label(2), "注意");
        assert_eq!(level_label(4), "強制休息");
    }
}
