//! Building blocks shared by the OpenAI-compatible providers.

pub mod openai_compat;
pub mod reasoning_decorator;
pub mod sse;

pub use reasoning_decorator::ReasoningTagDecorator;
