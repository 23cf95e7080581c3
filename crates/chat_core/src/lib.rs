//! chat_core - Core types for the chat service
//!
//! - `message` - chat message shapes and plain-text extraction
//! - `config` - runtime configuration
//! - `paths` - data directory layout and JSON file helpers

pub mod config;
pub mod message;
pub mod paths;

pub use config::Config;
pub use message::{extract_text, ChatMessage, ContentItem, MessageBody, MessagePart, Role};
