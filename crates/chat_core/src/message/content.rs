//! Message content fragments
//!
//! Parts and content items as they arrive from the front-end. Anything that
//! does not match a known fragment shape is kept as [`MessagePart::Other`] so
//! that a single foreign fragment never fails a whole message.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of the `parts` array.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MessagePart {
    /// Plain text.
    Text {
        #[serde(default)]
        text: String,
    },

    /// Model reasoning surfaced to the UI. Never used as message text.
    Reasoning {
        #[serde(default)]
        text: String,
    },

    /// Any part kind this service does not interpret (tool calls, files, ...).
    #[serde(other)]
    Other,
}

impl MessagePart {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Lenient conversion from raw JSON. Malformed parts become [`MessagePart::Other`].
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or(Self::Other)
    }

    /// Text of a `text` part, if non-empty.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}

/// One element of an array-valued `content` field: either a bare string or a
/// typed part object.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum ContentItem {
    Text(String),
    Part(MessagePart),
}

impl ContentItem {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text.clone()),
            other => Self::Part(MessagePart::from_value(other)),
        }
    }

    /// Text carried by this item, if non-empty.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) if !text.is_empty() => Some(text),
            Self::Text(_) => None,
            Self::Part(part) => part.as_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_part_parses() {
        let part = MessagePart::from_value(&json!({"type": "text", "text": "hi"}));
        assert_eq!(part, MessagePart::text("hi"));
        assert_eq!(part.as_text(), Some("hi"));
    }

    #[test]
    fn unknown_part_kind_is_other() {
        let part = MessagePart::from_value(&json!({"type": "tool-invocation", "toolCallId": "x"}));
        assert_eq!(part, MessagePart::Other);
    }

    #[test]
    fn malformed_part_is_other() {
        assert_eq!(MessagePart::from_value(&json!({"text": "no type"})), MessagePart::Other);
        assert_eq!(MessagePart::from_value(&json!(42)), MessagePart::Other);
        assert_eq!(
            MessagePart::from_value(&json!({"type": "text", "text": 7})),
            MessagePart::Other
        );
    }

    #[test]
    fn empty_and_reasoning_parts_carry_no_text() {
        assert_eq!(MessagePart::text("").as_text(), None);
        let reasoning = MessagePart::from_value(&json!({"type": "reasoning", "text": "hmm"}));
        assert_eq!(reasoning.as_text(), None);
    }

    #[test]
    fn content_items_accept_strings_and_parts() {
        assert_eq!(ContentItem::from_value(&json!("plain")).as_text(), Some("plain"));
        assert_eq!(
            ContentItem::from_value(&json!({"type": "text", "text": "typed"})).as_text(),
            Some("typed")
        );
        assert_eq!(ContentItem::from_value(&json!("")).as_text(), None);
        assert_eq!(ContentItem::from_value(&json!(null)).as_text(), None);
    }
}
