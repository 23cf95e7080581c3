//! ChatMessage - one conversation turn in any of the supported shapes
//!
//! Three shapes have been sent by front-end versions over time:
//!
//! - `{"role", "parts": [{"type": "text", "text"}, ...]}`
//! - `{"role", "content": "..."}`
//! - `{"role", "content": ["...", {"type": "text", "text"}, ...]}`
//!
//! Deserialization settles on exactly one [`MessageBody`] variant. When a
//! payload carries both `parts` and `content`, parts win only if they hold
//! text; otherwise the content shape is used.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::content::{ContentItem, MessagePart};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
    Tool,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
            Role::Tool => "tool",
        }
    }
}

/// The content of a message, in exactly one of its historical shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageBody {
    /// `parts` array.
    Parts(Vec<MessagePart>),
    /// String `content`.
    Text(String),
    /// Array `content`.
    Items(Vec<ContentItem>),
}

impl MessageBody {
    fn from_content(content: Value) -> Option<Self> {
        match content {
            Value::String(text) => Some(Self::Text(text)),
            Value::Array(items) => Some(Self::Items(
                items.iter().map(ContentItem::from_value).collect(),
            )),
            _ => None,
        }
    }

    fn select(parts: Option<Vec<MessagePart>>, content: Option<Self>) -> Self {
        match (parts, content) {
            (Some(parts), Some(content)) if !parts.iter().any(|p| p.as_text().is_some()) => {
                content
            }
            (Some(parts), _) => Self::Parts(parts),
            (None, Some(content)) => content,
            (None, None) => Self::Items(Vec::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMessage", into = "RawMessage")]
pub struct ChatMessage {
    pub id: Option<String>,
    pub role: Role,
    pub body: MessageBody,
}

impl ChatMessage {
    pub fn new(role: Role, body: MessageBody) -> Self {
        Self {
            id: None,
            role,
            body,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, MessageBody::Text(content.into()))
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, MessageBody::Text(content.into()))
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, MessageBody::Text(content.into()))
    }

    pub fn with_parts(role: Role, parts: Vec<MessagePart>) -> Self {
        Self::new(role, MessageBody::Parts(parts))
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Plain text of this message. See [`super::extract_text`].
    pub fn text(&self) -> String {
        super::extract_text(self)
    }
}

/// Wire form. Every shape field is optional and loosely typed so unknown
/// combinations still deserialize. `parts` only counts when it is an array.
#[derive(Serialize, Deserialize)]
struct RawMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parts: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<Value>,
}

impl From<RawMessage> for ChatMessage {
    fn from(raw: RawMessage) -> Self {
        let parts = match raw.parts {
            Some(Value::Array(values)) => {
                Some(values.iter().map(MessagePart::from_value).collect())
            }
            _ => None,
        };
        let content = raw.content.and_then(MessageBody::from_content);

        Self {
            id: raw.id,
            role: raw.role,
            body: MessageBody::select(parts, content),
        }
    }
}

impl From<ChatMessage> for RawMessage {
    fn from(message: ChatMessage) -> Self {
        let (parts, content) = match message.body {
            MessageBody::Parts(parts) => (
                Some(Value::Array(
                    parts
                        .iter()
                        .filter_map(|p| serde_json::to_value(p).ok())
                        .collect(),
                )),
                None,
            ),
            MessageBody::Text(text) => (None, Some(Value::String(text))),
            MessageBody::Items(items) => (
                None,
                serde_json::to_value(items).ok(),
            ),
        };

        Self {
            id: message.id,
            role: message.role,
            parts,
            content,
        }
    }
}
