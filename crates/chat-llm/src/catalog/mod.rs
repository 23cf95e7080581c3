//! Model catalog
//!
//! A fixed, ordered set of models built once from [`ModelSpec`]s. Every entry
//! gets a [`ModelHandle`] at construction time; credentials are resolved at
//! that point and never change afterwards. To pick up new credentials, build
//! a new catalog.

mod builtin;
mod handle;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::credentials::CredentialResolver;
use crate::provider::LLMProvider;
use crate::providers::{OpenAIProvider, ReasoningTagDecorator};

pub use builtin::{builtin_specs, DEFAULT_MODEL_ID};
pub use handle::ModelHandle;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Duplicate model id: {0}")]
    DuplicateModel(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    Reasoning,
    Balanced,
    Efficient,
    Agentic,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Reasoning => "Reasoning",
            Capability::Balanced => "Balanced",
            Capability::Efficient => "Efficient",
            Capability::Agentic => "Agentic",
        };
        f.write_str(name)
    }
}

/// Static metadata for one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    pub id: String,
    pub provider: String,
    pub display_name: String,
    pub description: String,
    /// Model string sent to the remote service.
    pub api_version: String,
    pub capabilities: Vec<Capability>,
}

/// OpenAI-compatible hosts the catalog knows how to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderHost {
    Groq,
    OpenRouter,
    Xai,
}

impl ProviderHost {
    pub fn base_url(&self) -> &'static str {
        match self {
            ProviderHost::Groq => "https://api.groq.com/openai/v1",
            ProviderHost::OpenRouter => "https://openrouter.ai/api/v1",
            ProviderHost::Xai => "https://api.x.ai/v1",
        }
    }

    /// Credential names in lookup order.
    pub fn credential_keys(&self) -> &'static [&'static str] {
        match self {
            ProviderHost::Groq => &["GROQ_API_KEY"],
            ProviderHost::OpenRouter => &["OPENROUTER_API_KEY", "OPENROUTE_API_KEY"],
            ProviderHost::Xai => &["XAI_API_KEY"],
        }
    }

    /// Every credential name any host reads.
    pub fn all_credential_keys() -> Vec<&'static str> {
        [ProviderHost::Groq, ProviderHost::OpenRouter, ProviderHost::Xai]
            .iter()
            .flat_map(|host| host.credential_keys().iter().copied())
            .collect()
    }
}

/// Declaration of a catalog entry before it is bound to a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSpec {
    pub descriptor: ModelDescriptor,
    pub host: ProviderHost,
    /// Inline reasoning tag (e.g. `think`) to split out of streamed text.
    pub reasoning_tag: Option<String>,
}

impl ModelSpec {
    pub fn with_reasoning_tag(mut self, tag: impl Into<String>) -> Self {
        self.reasoning_tag = Some(tag.into());
        self
    }
}

#[derive(Debug)]
pub struct ModelCatalog {
    handles: Vec<ModelHandle>,
    index: HashMap<String, usize>,
    default_id: String,
}

impl ModelCatalog {
    /// The built-in models, with credentials from `credentials`.
    pub fn builtin(
        credentials: &CredentialResolver,
        default_id: &str,
    ) -> Result<Self, CatalogError> {
        Self::from_specs(builtin_specs(), credentials, default_id)
    }

    pub fn from_specs(
        specs: Vec<ModelSpec>,
        credentials: &CredentialResolver,
        default_id: &str,
    ) -> Result<Self, CatalogError> {
        let client = reqwest::Client::new();
        let mut keys: HashMap<ProviderHost, Option<String>> = HashMap::new();

        let handles = specs
            .into_iter()
            .map(|spec| {
                let api_key = keys
                    .entry(spec.host)
                    .or_insert_with(|| {
                        let key = credentials.resolve_any(spec.host.credential_keys());
                        if key.is_none() {
                            log::warn!(
                                "No API key for {:?} (tried {}); its models will fail with an authentication error",
                                spec.host,
                                spec.host.credential_keys().join(", ")
                            );
                        }
                        key
                    })
                    .clone();

                let provider = OpenAIProvider::new(api_key)
                    .with_client(client.clone())
                    .with_base_url(spec.host.base_url())
                    .with_model(spec.descriptor.api_version.clone());

                let provider: Arc<dyn LLMProvider> = match spec.reasoning_tag {
                    Some(tag) => Arc::new(ReasoningTagDecorator::new(provider, tag)),
                    None => Arc::new(provider),
                };

                ModelHandle::new(spec.descriptor, provider)
            })
            .collect();

        Self::from_handles(handles, default_id)
    }

    /// Build from pre-bound handles, keeping their order.
    pub fn from_handles(handles: Vec<ModelHandle>, default_id: &str) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(handles.len());
        for (position, handle) in handles.iter().enumerate() {
            if index.insert(handle.id().to_string(), position).is_some() {
                return Err(CatalogError::DuplicateModel(handle.id().to_string()));
            }
        }

        if !index.contains_key(default_id) {
            return Err(CatalogError::UnknownModel(default_id.to_string()));
        }

        log::info!(
            "Model catalog ready with {} model(s), default '{}'",
            handles.len(),
            default_id
        );

        Ok(Self {
            handles,
            index,
            default_id: default_id.to_string(),
        })
    }

    fn lookup(&self, id: &str) -> Result<&ModelHandle, CatalogError> {
        self.index
            .get(id)
            .map(|&position| &self.handles[position])
            .ok_or_else(|| CatalogError::UnknownModel(id.to_string()))
    }

    pub fn resolve(&self, id: &str) -> Result<ModelHandle, CatalogError> {
        self.lookup(id).cloned()
    }

    pub fn describe(&self, id: &str) -> Result<&ModelDescriptor, CatalogError> {
        self.lookup(id).map(ModelHandle::descriptor)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Ids in declaration order.
    pub fn list_ids(&self) -> Vec<&str> {
        self.handles.iter().map(ModelHandle::id).collect()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.handles.iter().map(ModelHandle::descriptor)
    }

    pub fn default_id(&self) -> &str {
        &self.default_id
    }
}
