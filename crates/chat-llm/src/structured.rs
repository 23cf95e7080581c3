//! Structured generation requests
//!
//! A request pairs a prompt with a JSON schema; providers return the parsed
//! JSON object. Content that is not a JSON object maps to [`LLMError::Schema`].

use serde_json::Value;

use crate::provider::{LLMError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRequest {
    /// Schema name sent to the provider (`json_schema.name`).
    pub schema_name: String,
    pub schema: Value,
    pub prompt: String,
}

impl ObjectRequest {
    pub fn new(schema_name: impl Into<String>, schema: Value, prompt: impl Into<String>) -> Self {
        Self {
            schema_name: schema_name.into(),
            schema,
            prompt: prompt.into(),
        }
    }
}

/// Parse the text of a structured completion into a JSON object.
///
/// Leading `<think>` blocks and Markdown code fences are tolerated.
pub fn parse_object_content(content: &str) -> Result<Value> {
    let body = strip_code_fence(strip_reasoning(content.trim()));

    let value: Value = serde_json::from_str(body)
        .map_err(|e| LLMError::Schema(format!("response is not valid JSON: {e}")))?;

    if !value.is_object() {
        return Err(LLMError::Schema(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }

    Ok(value)
}

fn strip_reasoning(content: &str) -> &str {
    match (content.starts_with("<think>"), content.find("</think>")) {
        (true, Some(end)) => content[end + "</think>".len()..].trim(),
        _ => content,
    }
}

fn strip_code_fence(content: &str) -> &str {
    let Some(rest) = content.strip_prefix("```") else {
        return content;
    };
    // Drop an optional language tag on the opening fence line.
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_plain_object() {
        let value = parse_object_content(r#"{"title": "Trip Planning"}"#).unwrap();
        assert_eq!(value, json!({"title": "Trip Planning"}));
    }

    #[test]
    fn tolerates_code_fence_and_reasoning() {
        let content = "<think>short</think>\n```json\n{\"title\": \"Fenced\"}\n```";
        let value = parse_object_content(content).unwrap();
        assert_eq!(value["title"], "Fenced");
    }

    #[test]
    fn rejects_non_json() {
        let err = parse_object_content("Trip Planning").unwrap_err();
        assert!(matches!(err, LLMError::Schema(_)));
    }

    #[test]
    fn rejects_non_object_json() {
        let err = parse_object_content(r#"["Trip"]"#).unwrap_err();
        match err {
            LLMError::Schema(msg) => assert!(msg.contains("array")),
            other => panic!("Expected Schema error, got {other:?}"),
        }
    }
}
