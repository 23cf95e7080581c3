//! Prompt building and response handling for title generation

use chat_core::{extract_text, ChatMessage, Role};
use chat_llm::ObjectRequest;
use serde_json::{json, Value};

use super::types::{TitleGenerationFailure, MAX_PROMPT_CHARS};

/// Text of the first user message, or `None` if there is none or it has no
/// visible text.
pub fn first_user_text(messages: &[ChatMessage]) -> Option<String> {
    let message = messages.iter().find(|m| m.role == Role::User)?;
    let text = extract_text(message);
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

pub fn build_title_prompt(text: &str) -> String {
    let excerpt: String = text.chars().take(MAX_PROMPT_CHARS).collect();
    format!(
        "Generate a concise title (max 6 words) for a conversation that starts with: \"{}\"",
        excerpt
    )
}

pub fn title_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": {
                "type": "string",
                "description": "A short, descriptive title for the conversation"
            }
        },
        "required": ["title"],
        "additionalProperties": false
    })
}

pub fn title_request(text: &str) -> ObjectRequest {
    ObjectRequest::new("conversation_title", title_schema(), build_title_prompt(text))
}

/// Pull `title` out of a structured response.
pub fn parse_title(value: &Value) -> Result<String, TitleGenerationFailure> {
    match value.get("title") {
        Some(Value::String(title)) => Ok(sanitize_title(title)),
        Some(other) => Err(TitleGenerationFailure::Schema(format!(
            "`title` is not a string: {}",
            other
        ))),
        None => Err(TitleGenerationFailure::Schema(
            "missing `title` field".to_string(),
        )),
    }
}

/// First line, without surrounding whitespace or quotes. May be empty.
pub fn sanitize_title(raw: &str) -> String {
    let first_line = raw.trim().lines().next().unwrap_or("");
    first_line
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '\u{201C}' | '\u{201D}'))
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::MessagePart;

    #[test]
    fn first_user_message_is_used() {
        let messages = vec![
            ChatMessage::system("You are helpful"),
            ChatMessage::assistant("Hi!"),
            ChatMessage::user("Plan a trip"),
            ChatMessage::user("to Lisbon"),
        ];
        assert_eq!(first_user_text(&messages).as_deref(), Some("Plan a trip"));
    }

    #[test]
    fn blank_first_user_message_gives_none() {
        let messages = vec![
            ChatMessage::with_parts(Role::User, vec![MessagePart::text("  ")]),
            ChatMessage::user("later text is not considered"),
        ];
        assert_eq!(first_user_text(&messages), None);
        assert_eq!(first_user_text(&[]), None);
    }

    #[test]
    fn prompt_truncates_to_200_chars() {
        let long = "é".repeat(250);
        let prompt = build_title_prompt(&long);
        assert!(prompt.contains(&"é".repeat(200)));
        assert!(!prompt.contains(&"é".repeat(201)));
        assert!(prompt.starts_with("Generate a concise title (max 6 words)"));
    }

    #[test]
    fn schema_requires_title() {
        let request = title_request("hello");
        assert_eq!(request.schema["required"], json!(["title"]));
        assert_eq!(request.schema["properties"]["title"]["type"], "string");
    }

    #[test]
    fn parse_title_variants() {
        assert_eq!(
            parse_title(&json!({"title": " \"Trip Planning\" "})).unwrap(),
            "Trip Planning"
        );
        assert_eq!(parse_title(&json!({"title": ""})).unwrap(), "");
        assert!(matches!(
            parse_title(&json!({"title": 3})),
            Err(TitleGenerationFailure::Schema(_))
        ));
        assert!(matches!(
            parse_title(&json!({"name": "x"})),
            Err(TitleGenerationFailure::Schema(_))
        ));
    }
}
