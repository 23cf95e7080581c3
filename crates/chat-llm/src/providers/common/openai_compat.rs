//! OpenAI-compatible request serialization helpers.
//!
//! Groq, OpenRouter and xAI all accept the OpenAI chat completions shape. Message
//! bodies are flattened to plain text with [`chat_core::extract_text`] so every
//! historical message shape reaches the provider the same way.

use chat_core::{extract_text, ChatMessage};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::provider::{LLMError, Result};
use crate::structured::ObjectRequest;
use crate::types::LLMChunk;

/// Convert chat messages to an OpenAI-compatible JSON array.
pub fn messages_to_openai_compat_json(messages: &[ChatMessage]) -> Vec<Value> {
    messages
        .iter()
        .map(|m| {
            json!({
                "role": m.role.as_str(),
                "content": extract_text(m),
            })
        })
        .collect()
}

/// Build a streaming chat request body.
pub fn build_openai_compat_body(
    model: &str,
    messages: &[ChatMessage],
    max_output_tokens: Option<u32>,
) -> Value {
    let mut body = json!({
        "model": model,
        "messages": messages_to_openai_compat_json(messages),
        "stream": true,
    });

    if let Some(max_tokens) = max_output_tokens {
        body["max_tokens"] = json!(max_tokens);
    }

    body
}

/// Build a non-streaming request constrained by a JSON schema.
pub fn build_object_body(model: &str, request: &ObjectRequest) -> Value {
    json!({
        "model": model,
        "messages": [{"role": "user", "content": request.prompt}],
        "stream": false,
        "response_format": {
            "type": "json_schema",
            "json_schema": {
                "name": request.schema_name,
                "strict": true,
                "schema": request.schema,
            }
        }
    })
}

// --- Non-streaming completion parsing ---

#[derive(Debug, Deserialize)]
pub struct OpenAICompatCompletion {
    #[serde(default)]
    pub choices: Vec<OpenAICompatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAICompatChoice {
    pub message: OpenAICompatMessage,
}

#[derive(Debug, Deserialize)]
pub struct OpenAICompatMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Extract the first choice's text from a non-streaming completion body.
pub fn completion_content(body: &[u8]) -> Result<String> {
    let completion: OpenAICompatCompletion = serde_json::from_slice(body)
        .map_err(|e| LLMError::Schema(format!("malformed completion: {e}")))?;

    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| LLMError::Schema("completion contained no content".to_string()))
}

// --- Streaming chunk parsing ---

#[derive(Debug, Deserialize)]
pub struct OpenAICompatStreamChunk {
    #[serde(default)]
    pub choices: Vec<OpenAICompatStreamChoice>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAICompatStreamChoice {
    #[serde(default)]
    pub delta: OpenAICompatDelta,
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenAICompatDelta {
    #[serde(default)]
    pub content: Option<String>,
    /// Groq and OpenRouter send reasoning under `reasoning`, others under
    /// `reasoning_content`.
    #[serde(default, alias = "reasoning_content")]
    pub reasoning: Option<String>,
}

/// Parse one SSE `data:` payload.
///
/// Returns `Ok(None)` for keep-alive and empty deltas.
pub fn parse_openai_compat_sse_data(data: &str) -> Result<Option<LLMChunk>> {
    let data = data.trim();
    if data.is_empty() {
        return Ok(None);
    }
    if data == "[DONE]" {
        return Ok(Some(LLMChunk::Done));
    }

    let chunk: OpenAICompatStreamChunk = serde_json::from_str(data)?;
    let Some(choice) = chunk.choices.into_iter().next() else {
        return Ok(None);
    };

    if let Some(reasoning) = choice.delta.reasoning.filter(|r| !r.is_empty()) {
        return Ok(Some(LLMChunk::Reasoning(reasoning)));
    }

    Ok(choice
        .delta
        .content
        .filter(|c| !c.is_empty())
        .map(LLMChunk::Token))
}
