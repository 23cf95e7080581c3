use std::sync::Arc;

use chat_core::ChatMessage;
use serde_json::Value;

use super::ModelDescriptor;
use crate::provider::{LLMProvider, LLMStream, Result};
use crate::structured::ObjectRequest;

/// A catalog entry bound to its provider. Cheap to clone; clones share the
/// provider and its captured credentials.
#[derive(Clone)]
pub struct ModelHandle {
    descriptor: Arc<ModelDescriptor>,
    provider: Arc<dyn LLMProvider>,
}

impl ModelHandle {
    pub fn new(descriptor: ModelDescriptor, provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            descriptor: Arc::new(descriptor),
            provider,
        }
    }

    pub fn descriptor(&self) -> &ModelDescriptor {
        &self.descriptor
    }

    pub fn id(&self) -> &str {
        &self.descriptor.id
    }

    /// Stream a completion from the bound model.
    pub async fn chat_stream(
        &self,
        messages: &[ChatMessage],
        max_output_tokens: Option<u32>,
    ) -> Result<LLMStream> {
        self.provider
            .chat_stream(messages, max_output_tokens, None)
            .await
    }

    /// Structured generation against the bound model.
    pub async fn generate_object(&self, request: &ObjectRequest) -> Result<Value> {
        self.provider.generate_object(request, None).await
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("id", &self.descriptor.id)
            .field("api_version", &self.descriptor.api_version)
            .finish()
    }
}
