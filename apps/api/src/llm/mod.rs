//! Provider seam for all outbound LLM calls.
//!
//! Every stage talks to a `ChatProvider` trait object held in `AppState`,
//! never to a concrete SDK client. Tests substitute stub providers; production
//! wires `OpenAiClient` (primary) and `AnthropicClient` (fallback) at startup.

use async_trait::async_trait;
use thiserror::Error;

pub mod anthropic;
pub mod extract;
pub mod openai;
pub mod usage;

/// Errors surfaced by a provider client after its own retry loop is exhausted.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Provider returned empty content")]
    EmptyContent,
}

/// A provider-neutral chat completion request.
///
/// `temperature` is advisory: clients drop it for reasoning models per
/// `TokenParamPolicy`.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A completed chat call: non-empty text plus token accounting.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub usage: TokenUsage,
}

/// The chat seam. One call, one response; retries happen inside the client.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Short provider name for logs ("openai", "anthropic", stub names in tests).
    fn name(&self) -> &str;

    async fn complete(&self, request: ChatRequest) -> Result<Completion, ProviderError>;
}

/// An image-generation result from the provider.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub url: String,
    pub revised_prompt: Option<String>,
}

/// Image-generation seam, separate from chat so only the OpenAI client
/// (which serves DALL-E) needs to implement it.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate_image(&self, prompt: &str, size: &str) -> Result<GeneratedImage, ProviderError>;
}

/// How token limits and temperature are passed for a given model family.
///
/// Reasoning models (o1-/o3-/gpt-5 series) take `max_completion_tokens` and
/// reject the temperature parameter; everything else takes `max_tokens` plus
/// temperature. Pure name-pattern lookup, no dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenParamPolicy {
    Standard,
    Reasoning,
}

impl TokenParamPolicy {
    pub fn for_model(model: &str) -> Self {
        let model = model.to_lowercase();
        if ["o1-", "o3-", "gpt-5"].iter().any(|p| model.contains(p)) {
            TokenParamPolicy::Reasoning
        } else {
            TokenParamPolicy::Standard
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reasoning_models_detected() {
        assert_eq!(
            TokenParamPolicy::for_model("o1-preview"),
            TokenParamPolicy::Reasoning
        );
        assert_eq!(
            TokenParamPolicy::for_model("o3-mini"),
            TokenParamPolicy::Reasoning
        );
        assert_eq!(
            TokenParamPolicy::for_model("gpt-5"),
            TokenParamPolicy::Reasoning
        );
        assert_eq!(
            TokenParamPolicy::for_model("GPT-5-turbo"),
            TokenParamPolicy::Reasoning
        );
    }

    #[test]
    fn test_standard_models_detected() {
        assert_eq!(
            TokenParamPolicy::for_model("gpt-4o"),
            TokenParamPolicy::Standard
        );
        assert_eq!(
            TokenParamPolicy::for_model("gpt-4o-mini"),
            TokenParamPolicy::Standard
        );
        assert_eq!(
            TokenParamPolicy::for_model("claude-sonnet-4-5"),
            TokenParamPolicy::Standard
        );
    }

    #[test]
    fn test_o1_requires_dash() {
        // "o1" only counts with the trailing dash; a bare "o1" substring
        // in a custom model name must not flip the policy.
        assert_eq!(
            TokenParamPolicy::for_model("turbo1"),
            TokenParamPolicy::Standard
        );
    }
}
