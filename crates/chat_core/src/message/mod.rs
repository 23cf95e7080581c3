//! Message module - chat message shapes and text extraction

mod chat;
mod content;
mod extract;

pub use chat::{ChatMessage, MessageBody, Role};
pub use content::{ContentItem, MessagePart};
pub use extract::extract_text;
