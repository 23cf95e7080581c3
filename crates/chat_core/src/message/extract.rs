//! Plain-text extraction from chat messages

use super::chat::{ChatMessage, MessageBody};

const FRAGMENT_SEPARATOR: &str = "\n";

/// Extract the plain text of a message.
///
/// Qualifying fragments are `text` parts and non-empty strings; they are
/// joined with newlines in their original order. A message without any
/// qualifying fragment yields an empty string, which callers treat as
/// "no text available".
pub fn extract_text(message: &ChatMessage) -> String {
    match &message.body {
        MessageBody::Parts(parts) => join(parts.iter().filter_map(|p| p.as_text())),
        MessageBody::Text(text) => text.clone(),
        MessageBody::Items(items) => join(items.iter().filter_map(|i| i.as_text())),
    }
}

fn join<'a>(fragments: impl Iterator<Item = &'a str>) -> String {
    fragments.collect::<Vec<_>>().join(FRAGMENT_SEPARATOR)
}
