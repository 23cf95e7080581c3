use async_trait::async_trait;
use chat_core::ChatMessage;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;

use crate::provider::{LLMError, LLMProvider, LLMStream, Result};
use crate::structured::{parse_object_content, ObjectRequest};

use super::common::openai_compat::{
    build_object_body, build_openai_compat_body, completion_content, parse_openai_compat_sse_data,
};
use super::common::sse::llm_stream_from_sse;

/// Provider for any host exposing `/chat/completions` in the OpenAI shape.
///
/// The key is optional: a provider without one is still constructible and
/// fails with [`LLMError::Auth`] when used.
pub struct OpenAIProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl OpenAIProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }

    /// Share a connection pool with other providers.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    fn api_key(&self) -> Result<&str> {
        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(LLMError::Auth(format!(
                "no API key configured for {}",
                self.base_url
            ))),
        }
    }

    async fn post(&self, body: &Value) -> Result<Response> {
        let api_key = self.api_key()?;

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", api_key))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(LLMError::Auth(format!("HTTP {}: {}", status, text)))
            }
            _ => Err(LLMError::Api(format!("HTTP {}: {}", status, text))),
        }
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn chat_stream(
        &self,
        messages: &[ChatMessage],
        max_output_tokens: Option<u32>,
        model: Option<&str>,
    ) -> Result<LLMStream> {
        let model_to_use = model.unwrap_or(&self.model);

        if model.is_some() {
            log::debug!(
                "OpenAI-compatible provider using override model '{}' (default: '{}')",
                model_to_use,
                self.model
            );
        }

        let body = build_openai_compat_body(model_to_use, messages, max_output_tokens);
        let response = self.post(&body).await?;

        Ok(llm_stream_from_sse(response, parse_openai_compat_sse_data))
    }

    async fn generate_object(&self, request: &ObjectRequest, model: Option<&str>) -> Result<Value> {
        let model_to_use = model.unwrap_or(&self.model);
        let body = build_object_body(model_to_use, request);

        let response = self.post(&body).await?;
        let bytes = response.bytes().await?;
        let content = completion_content(&bytes)?;

        log::debug!(
            "Structured completion from '{}' ({} chars)",
            model_to_use,
            content.len()
        );

        parse_object_content(&content)
    }
}
