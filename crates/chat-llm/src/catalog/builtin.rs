//! Models shipped with the service.

use super::{Capability, ModelDescriptor, ModelSpec, ProviderHost};

pub const DEFAULT_MODEL_ID: &str = "glm-4.5-air";

const REASONING: [Capability; 3] = [
    Capability::Reasoning,
    Capability::Efficient,
    Capability::Agentic,
];

const BALANCED: [Capability; 3] = [
    Capability::Balanced,
    Capability::Efficient,
    Capability::Agentic,
];

fn spec(
    id: &str,
    provider: &str,
    display_name: &str,
    description: &str,
    api_version: &str,
    capabilities: &[Capability],
    host: ProviderHost,
) -> ModelSpec {
    ModelSpec {
        descriptor: ModelDescriptor {
            id: id.to_string(),
            provider: provider.to_string(),
            display_name: display_name.to_string(),
            description: description.to_string(),
            api_version: api_version.to_string(),
            capabilities: capabilities.to_vec(),
        },
        host,
        reasoning_tag: None,
    }
}

/// Built-in entries in selector order.
pub fn builtin_specs() -> Vec<ModelSpec> {
    vec![
        spec(
            "qwen3-32b",
            "Groq",
            "Qwen 3 32B",
            "Latest version of Alibaba's Qwen 32B with strong reasoning and coding capabilities.",
            "qwen/qwen3-32b",
            &REASONING,
            ProviderHost::Groq,
        )
        .with_reasoning_tag("think"),
        spec(
            "kimi-k2",
            "Groq",
            "Kimi K2",
            "Latest version of Moonshot AI's Kimi K2 with good balance of capabilities.",
            "moonshotai/kimi-k2-instruct",
            &BALANCED,
            ProviderHost::Groq,
        ),
        spec(
            "llama4",
            "Groq",
            "Llama 4",
            "Latest version of Meta's Llama 4 with good balance of capabilities.",
            "meta-llama/llama-4-scout-17b-16e-instruct",
            &BALANCED,
            ProviderHost::Groq,
        ),
        spec(
            "gpt-oss-20b",
            "OpenAI",
            "GPT-OSS 20B",
            "Latest version of OpenAI's GPT-OSS 20B with strong reasoning and coding capabilities.",
            "openai/gpt-oss-20b:free",
            &REASONING,
            ProviderHost::OpenRouter,
        ),
        spec(
            "glm-4.5-air",
            "Z-AI",
            "GLM 4.5 Air",
            "Latest version of Z-AI's GLM 4.5 Air with strong reasoning and coding capabilities.",
            "z-ai/glm-4.5-air:free",
            &REASONING,
            ProviderHost::OpenRouter,
        ),
    ]
}
