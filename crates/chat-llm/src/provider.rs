use crate::structured::ObjectRequest;
use crate::types::LLMChunk;
use async_trait::async_trait;
use chat_core::ChatMessage;
use futures::Stream;
use serde_json::Value;
use std::pin::Pin;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("API error: {0}")]
    Api(String),

    /// Credentials missing or rejected by the provider.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Structured output did not match the requested contract.
    #[error("Schema error: {0}")]
    Schema(String),
}

pub type Result<T> = std::result::Result<T, LLMError>;

pub type LLMStream = Pin<Box<dyn Stream<Item = Result<LLMChunk>> + Send>>;

#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Stream chat completion
    ///
    /// # Arguments
    /// * `messages` - Conversation so far, in any supported message shape
    /// * `max_output_tokens` - Maximum output tokens
    /// * `model` - Optional model override. If None, uses the provider's bound model
    async fn chat_stream(
        &self,
        messages: &[ChatMessage],
        max_output_tokens: Option<u32>,
        model: Option<&str>,
    ) -> Result<LLMStream>;

    /// Generate a JSON object conforming to `request.schema`.
    async fn generate_object(&self, request: &ObjectRequest, model: Option<&str>)
        -> Result<Value>;
}
