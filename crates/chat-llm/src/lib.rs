//! chat-llm - model access for the chat service
//!
//! - `provider` - the [`LLMProvider`] trait and its error type
//! - `providers` - OpenAI-compatible HTTP provider and decorators
//! - `credentials` - ordered API key lookup
//! - `catalog` - the fixed model catalog and its handles

pub mod catalog;
pub mod credentials;
pub mod provider;
pub mod providers;
pub mod structured;
pub mod types;

pub use catalog::{
    builtin_specs, Capability, CatalogError, ModelCatalog, ModelDescriptor, ModelHandle, ModelSpec,
    ProviderHost, DEFAULT_MODEL_ID,
};
pub use credentials::{CredentialResolver, CredentialSource, EnvCredentials, OverrideCredentials};
pub use provider::{LLMError, LLMProvider, LLMStream};
pub use providers::{OpenAIProvider, ReasoningTagDecorator};
pub use structured::ObjectRequest;
pub use types::LLMChunk;
