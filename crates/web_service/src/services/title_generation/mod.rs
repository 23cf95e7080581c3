//! Conversation title generation
//!
//! Asks the configured summarization model for a short title based on the
//! first user message, falling back to "New Chat".

pub mod generator;
pub mod helpers;
pub mod types;

pub use generator::TitleGenerator;
pub use types::*;
