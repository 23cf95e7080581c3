use std::time::Duration;

use chat_core::ChatMessage;
use chat_llm::{CatalogError, LLMError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Title shown when no better title can be produced.
pub const FALLBACK_TITLE: &str = "New Chat";

/// Characters of the first user message passed to the model.
pub const MAX_PROMPT_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTitleRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    /// The conversation's model. Validated against the catalog but not used
    /// for the title itself.
    #[serde(default)]
    pub selected_model: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateTitleResponse {
    pub title: String,
}

/// Why a title could not be generated. Never leaves the generator.
#[derive(Debug, Error)]
pub enum TitleGenerationFailure {
    #[error("title model unavailable: {0}")]
    Model(#[from] CatalogError),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("response did not match the title schema: {0}")]
    Schema(String),

    #[error("provider rejected credentials: {0}")]
    Auth(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("cancelled by caller")]
    Cancelled,
}

impl From<LLMError> for TitleGenerationFailure {
    fn from(err: LLMError) -> Self {
        match err {
            LLMError::Schema(msg) => Self::Schema(msg),
            LLMError::Json(e) => Self::Schema(e.to_string()),
            LLMError::Auth(msg) => Self::Auth(msg),
            other => Self::Transport(other.to_string()),
        }
    }
}
