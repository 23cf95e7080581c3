//! Best-effort title generation
//!
//! `generate_title` always yields a title. Every failure is logged with its
//! kind and replaced by [`FALLBACK_TITLE`]. No retries.

use std::time::Duration;

use chat_core::{ChatMessage, Config};
use chat_llm::ModelCatalog;
use tokio_util::sync::CancellationToken;

use super::helpers;
use super::types::{TitleGenerationFailure, FALLBACK_TITLE};

#[derive(Debug, Clone)]
pub struct TitleGenerator {
    model_id: String,
    timeout: Duration,
}

impl TitleGenerator {
    pub fn new(model_id: impl Into<String>, timeout: Duration) -> Self {
        Self {
            model_id: model_id.into(),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.title_model.clone(),
            Duration::from_secs(config.title_timeout_secs),
        )
    }

    /// Catalog id of the summarization model.
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub async fn generate_title(
        &self,
        catalog: &ModelCatalog,
        messages: &[ChatMessage],
        cancel: &CancellationToken,
    ) -> String {
        let Some(text) = helpers::first_user_text(messages) else {
            tracing::debug!("No user text to title; using fallback");
            return FALLBACK_TITLE.to_string();
        };

        match self.request_title(catalog, &text, cancel).await {
            Ok(title) if !title.is_empty() => title,
            Ok(_) => {
                tracing::debug!(model = %self.model_id, "Model returned an empty title");
                FALLBACK_TITLE.to_string()
            }
            Err(failure) => {
                self.log_failure(&failure);
                FALLBACK_TITLE.to_string()
            }
        }
    }

    async fn request_title(
        &self,
        catalog: &ModelCatalog,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<String, TitleGenerationFailure> {
        let handle = catalog.resolve(&self.model_id)?;
        let request = helpers::title_request(text);

        let value = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TitleGenerationFailure::Cancelled),
            result = tokio::time::timeout(self.timeout, handle.generate_object(&request)) => {
                result.map_err(|_| TitleGenerationFailure::Timeout(self.timeout))??
            }
        };

        helpers::parse_title(&value)
    }

    fn log_failure(&self, failure: &TitleGenerationFailure) {
        let model = self.model_id.as_str();
        match failure {
            TitleGenerationFailure::Model(e) => {
                tracing::warn!(model, "Title model not in catalog: {}", e)
            }
            TitleGenerationFailure::Timeout(after) => {
                tracing::warn!(model, timeout_ms = after.as_millis() as u64, "Title generation timed out")
            }
            TitleGenerationFailure::Schema(msg) => {
                tracing::warn!(model, "Title response failed schema validation: {}", msg)
            }
            TitleGenerationFailure::Auth(msg) => {
                tracing::warn!(model, "Title generation not authorized: {}", msg)
            }
            TitleGenerationFailure::Transport(msg) => {
                tracing::warn!(model, "Title generation transport failure: {}", msg)
            }
            TitleGenerationFailure::Cancelled => {
                tracing::debug!(model, "Title generation cancelled")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chat_core::{MessagePart, Role};
    use chat_llm::{
        Capability, LLMError, LLMProvider, LLMStream, ModelDescriptor, ModelHandle, ObjectRequest,
    };
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    enum Reply {
        Object(Value),
        Fail(fn() -> LLMError),
        Hang,
    }

    struct ScriptedModel {
        reply: Reply,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl LLMProvider for ScriptedModel {
        async fn chat_stream(
            &self,
            _messages: &[ChatMessage],
            _max_output_tokens: Option<u32>,
            _model: Option<&str>,
        ) -> chat_llm::provider::Result<LLMStream> {
            Err(LLMError::Api("not scripted".to_string()))
        }

        async fn generate_object(
            &self,
            request: &ObjectRequest,
            _model: Option<&str>,
        ) -> chat_llm::provider::Result<Value> {
            self.prompts.lock().unwrap().push(request.prompt.clone());
            match &self.reply {
                Reply::Object(value) => Ok(value.clone()),
                Reply::Fail(make) => Err(make()),
                Reply::Hang => std::future::pending().await,
            }
        }
    }

    fn catalog_with(reply: Reply) -> (ModelCatalog, Arc<Mutex<Vec<String>>>) {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let descriptor = ModelDescriptor {
            id: "titler".to_string(),
            provider: "Test".to_string(),
            display_name: "Titler".to_string(),
            description: "Scripted".to_string(),
            api_version: "titler-1".to_string(),
            capabilities: vec![Capability::Efficient],
        };
        let provider = ScriptedModel {
            reply,
            prompts: prompts.clone(),
        };
        let catalog =
            ModelCatalog::from_handles(vec![ModelHandle::new(descriptor, Arc::new(provider))], "titler")
                .unwrap();
        (catalog, prompts)
    }

    fn generator() -> TitleGenerator {
        TitleGenerator::new("titler", Duration::from_millis(200))
    }

    #[tokio::test]
    async fn empty_conversation_gets_fallback() {
        let (catalog, prompts) = catalog_with(Reply::Object(json!({"title": "x"})));
        let title = generator()
            .generate_title(&catalog, &[], &CancellationToken::new())
            .await;
        assert_eq!(title, "New Chat");
        assert!(prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_user_text_gets_fallback() {
        let (catalog, prompts) = catalog_with(Reply::Object(json!({"title": "x"})));
        let messages = vec![ChatMessage::with_parts(Role::User, vec![MessagePart::text("")])];
        let title = generator()
            .generate_title(&catalog, &messages, &CancellationToken::new())
            .await;
        assert_eq!(title, "New Chat");
        assert!(prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn successful_generation_returns_title() {
        let (catalog, prompts) = catalog_with(Reply::Object(json!({"title": "Trip Planning"})));
        let messages = vec![ChatMessage::user("Help me plan a week in Portugal")];
        let title = generator()
            .generate_title(&catalog, &messages, &CancellationToken::new())
            .await;

        assert_eq!(title, "Trip Planning");
        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Help me plan a week in Portugal"));
    }

    #[tokio::test]
    async fn empty_title_gets_fallback() {
        let (catalog, _) = catalog_with(Reply::Object(json!({"title": "  "})));
        let title = generator()
            .generate_title(&catalog, &[ChatMessage::user("hi")], &CancellationToken::new())
            .await;
        assert_eq!(title, "New Chat");
    }

    #[tokio::test]
    async fn provider_failures_get_fallback() {
        let failures: [fn() -> LLMError; 3] = [
            || LLMError::Stream("connection reset".to_string()),
            || LLMError::Auth("missing key".to_string()),
            || LLMError::Schema("not json".to_string()),
        ];
        for make in failures {
            let (catalog, _) = catalog_with(Reply::Fail(make));
            let title = generator()
                .generate_title(&catalog, &[ChatMessage::user("hi")], &CancellationToken::new())
                .await;
            assert_eq!(title, "New Chat");
        }
    }

    #[tokio::test]
    async fn malformed_object_gets_fallback() {
        let (catalog, _) = catalog_with(Reply::Object(json!({"heading": "Trip"})));
        let title = generator()
            .generate_title(&catalog, &[ChatMessage::user("hi")], &CancellationToken::new())
            .await;
        assert_eq!(title, "New Chat");
    }

    #[tokio::test]
    async fn timeout_gets_fallback() {
        let (catalog, _) = catalog_with(Reply::Hang);
        let generator = TitleGenerator::new("titler", Duration::from_millis(20));
        let title = generator
            .generate_title(&catalog, &[ChatMessage::user("hi")], &CancellationToken::new())
            .await;
        assert_eq!(title, "New Chat");
    }

    #[tokio::test]
    async fn cancellation_gets_fallback() {
        let (catalog, _) = catalog_with(Reply::Hang);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let generator = TitleGenerator::new("titler", Duration::from_secs(60));
        let title = generator
            .generate_title(&catalog, &[ChatMessage::user("hi")], &cancel)
            .await;
        assert_eq!(title, "New Chat");
    }

    #[tokio::test]
    async fn unknown_title_model_gets_fallback() {
        let (catalog, _) = catalog_with(Reply::Object(json!({"title": "x"})));
        let generator = TitleGenerator::new("missing", Duration::from_secs(1));
        let title = generator
            .generate_title(&catalog, &[ChatMessage::user("hi")], &CancellationToken::new())
            .await;
        assert_eq!(title, "New Chat");
    }

    #[test]
    fn from_config_uses_title_settings() {
        let config = Config {
            title_model: "llama4".to_string(),
            title_timeout_secs: 7,
            ..Config::default()
        };
        let generator = TitleGenerator::from_config(&config);
        assert_eq!(generator.model_id(), "llama4");
        assert_eq!(generator.timeout, Duration::from_secs(7));
    }
}
