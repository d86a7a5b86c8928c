//! Fallback prompt assembly.

use serde_json::{Map, Value};

use crate::error::MondayResult;

/// Merge the persona rules, the accumulated context, and the raw user
/// message into one prompt string for downstream LLM consumption.
pub(crate) fn build_prompt(
    persona: &str,
    context: &Map<String, Value>,
    user_msg: &str,
) -> MondayResult<String> {
    let context_text = serde_json::to_string_pretty(&Value::Object(context.clone()))?;
    let parts = [
        persona,
        "\n<CONTEXT>\n",
        &context_text,
        "\n</CONTEXT>\n",
        user_msg,
    ];
    Ok(parts.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_context_renders_empty_object() {
        let prompt = build_prompt("persona", &Map::new(), "こんにちは").unwrap();
        assert!(prompt.contains("<CONTEXT>"));
        assert!(prompt.contains("</CONTEXT>"));
        assert!(prompt.contains("{}"));
        assert!(prompt.starts_with("persona"));
        assert!(prompt.ends_with("こんにちは"));
    }

    #[test]
    fn test_context_is_pretty_json() {
        let mut context = Map::new();
        context.insert("health".to_string(), serde_json::json!({"状態": "良好"}));
        let prompt = build_prompt("p", &context, "m").unwrap();
        assert!(prompt.contains("\"health\""));
        assert!(prompt.contains("良好"));
    }
}
