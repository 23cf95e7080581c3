//! LLM Providers
//!
//! Every supported host speaks the OpenAI chat completions protocol, so a
//! single provider implementation covers them all.

pub(crate) mod common;
pub mod openai;

pub use common::ReasoningTagDecorator;
pub use openai::OpenAIProvider;
