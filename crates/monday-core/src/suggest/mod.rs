//! "Should this turn be remembered?" heuristic.
//!
//! Weighted keyword counting over the conversational text. Cheap on
//! purpose: it runs on every message that reaches the capture branch.

use sha2::{Digest, Sha256};

/// Score at or above which a memory capture is proposed.
const THRESHOLD_SCORE: i64 = 3;

/// Max summary length in characters before truncation.
const SUMMARY_CHARS: usize = 40;

/// Hex characters kept from the content digest.
const DIGEST_CHARS: usize = 10;

/// Positive-emotion keywords and weights.
const POSITIVE: &[(&str, i64)] = &[
    ("うれしい", 2),
    ("嬉しい", 2),
    ("楽しい", 2),
    ("感謝", 2),
    ("よかった", 1),
];

/// Negative-emotion keywords and weights.
const NEGATIVE: &[(&str, i64)] = &[
    ("悲しい", 2),
    ("辛い", 2),
    ("怒り", 2),
    ("疲れた", 1),
];

/// Reflective-language keywords and weights.
const REFLECTIVE: &[(&str, i64)] = &[
    ("気づき", 2),
    ("学んだ", 2),
    ("発見", 2),
    ("思った", 1),
];

/// A proposed memory capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Short content hash of the turn, for future dedup use.
    pub digest: String,
    /// Proposed summary: the head of the user message.
    pub summary: String,
}

/// Decide whether a conversational turn is worth persisting.
///
/// Returns `Some` when the weighted keyword score over
/// `user_msg + prior_text` meets the threshold.
pub fn needs_memory(user_msg: &str, prior_text: &str) -> Option<Suggestion> {
    let text = format!("{}\n{}", user_msg, prior_text);
    let score = keyword_score(&text);

    if score < THRESHOLD_SCORE {
        return None;
    }

    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hex::encode(hasher.finalize())[..DIGEST_CHARS].to_string();

    let summary = if user_msg.chars().count() > SUMMARY_CHARS {
        format!("{}…", truncate_chars(user_msg, SUMMARY_CHARS))
    } else {
        user_msg.to_string()
    };

    Some(Suggestion { digest, summary })
}

/// Sum of `weight x occurrence count` over all keyword tables.
fn keyword_score(text: &str) -> i64 {
    [POSITIVE, NEGATIVE, REFLECTIVE]
        .iter()
        .flat_map(|table| table.iter())
        .map(|(keyword, weight)| weight * text.matches(keyword).count() as i64)
        .sum()
}

/// First `n` characters of `s`. Character-based, never byte slicing.
pub(crate) fn truncate_chars(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stacked_positive_keywords_capture() {
        // 嬉しい x2 = weight 4 >= threshold 3.
        let result = needs_memory("今日は嬉しい、本当に嬉しい一日だった", "");
        assert!(result.is_some());
    }

    #[test]
    fn test_below_threshold_no_capture() {
        // よかった = weight 1 only.
        assert!(needs_memory("まあよかったかな", "").is_none());
    }

    #[test]
    fn test_empty_message_never_captured() {
        assert!(needs_memory("", "").is_none());
    }

    #[test]
    fn test_prior_text_contributes_to_score() {
        let prior = "気づきがあった。気づきは大事。";
        let result = needs_memory("そうだね", prior);
        assert!(result.is_some());
        // Summary still comes from the user message alone.
        assert_eq!(result.unwrap().summary, "そうだね");
    }

    #[test]
    fn test_digest_is_ten_hex_chars() {
        let suggestion = needs_memory("嬉しい嬉しい", "").unwrap();
        assert_eq!(suggestion.digest.len(), 10);
        assert!(suggestion.digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_long_message_truncated_with_ellipsis() {
        let msg = format!("嬉しい嬉しい{}", "あ".repeat(50));
        let suggestion = needs_memory(&msg, "").unwrap();
        assert_eq!(suggestion.summary.chars().count(), SUMMARY_CHARS + 1);
        assert!(suggestion.summary.ends_with('…'));
    }

    #[test]
    fn test_short_message_not_truncated() {
        let suggestion = needs_memory("嬉しい嬉しい", "").unwrap();
        assert_eq!(suggestion.summary, "嬉しい嬉しい");
    }

    #[test]
    fn test_truncate_chars_multibyte_safe() {
        assert_eq!(truncate_chars("あいうえお", 3), "あいう");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
