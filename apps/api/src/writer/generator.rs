//! Article Generator — primary provider with a single fallback attempt.
//!
//! The fallback call reuses the exact system prompt, user prompt and
//! token/temperature budget of the failed primary call so both providers
//! produce comparable output. If both fail, the last error propagates; there
//! is no partial-content recovery.

use tracing::{info, warn};

use crate::config::Config;
use crate::errors::AppError;
use crate::llm::{ChatProvider, ChatRequest};
use crate::writer::prompts::{GENERATOR_SYSTEM, GENERATOR_USER_TEMPLATE};

/// Generates a full markdown article for an already-refined topic.
pub async fn generate_article(
    primary: &dyn ChatProvider,
    fallback: &dyn ChatProvider,
    config: &Config,
    topic: &str,
    model_override: Option<&str>,
) -> Result<String, AppError> {
    let user_prompt = GENERATOR_USER_TEMPLATE.replace("{topic}", topic);

    let request = ChatRequest {
        model: model_override
            .unwrap_or(config.model_primary.as_str())
            .to_string(),
        system: GENERATOR_SYSTEM.to_string(),
        user: user_prompt,
        max_tokens: config.default_max_tokens,
        temperature: Some(config.default_temperature),
    };

    match primary.complete(request.clone()).await {
        Ok(completion) => {
            info!(
                provider = primary.name(),
                length = completion.text.len(),
                "Article generated"
            );
            Ok(completion.text)
        }
        Err(primary_err) => {
            warn!(
                provider = primary.name(),
                "Primary generation failed, trying fallback: {primary_err}"
            );

            // Exactly one fallback attempt, prompt and parameters unchanged
            // apart from the provider's own model identifier.
            let fallback_request = ChatRequest {
                model: config.model_fallback.clone(),
                ..request
            };

            match fallback.complete(fallback_request).await {
                Ok(completion) => {
                    info!(
                        provider = fallback.name(),
                        length = completion.text.len(),
                        "Article generated via fallback"
                    );
                    Ok(completion.text)
                }
                Err(fallback_err) => {
                    warn!(
                        provider = fallback.name(),
                        "Fallback generation failed: {fallback_err}"
                    );
                    Err(AppError::Provider(fallback_err))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{Completion, ProviderError, TokenUsage};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubProvider {
        reply: Option<String>,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn ok(text: &str) -> Self {
            Self {
                reply: Some(text.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ChatProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn complete(&self, _request: ChatRequest) -> Result<Completion, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Some(text) => Ok(Completion {
                    text: text.clone(),
                    usage: TokenUsage::default(),
                }),
                None => Err(ProviderError::Api {
                    status: 500,
                    message: "boom".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let primary = StubProvider::ok("# Article");
        let fallback = StubProvider::ok("# Fallback article");

        let result = generate_article(&primary, &fallback, &Config::for_tests(), "Topic?", None)
            .await
            .unwrap();

        assert_eq!(result, "# Article");
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_primary_failure_invokes_fallback_once() {
        let primary = StubProvider::failing();
        let fallback = StubProvider::ok("# Fallback article");

        let result = generate_article(&primary, &fallback, &Config::for_tests(), "Topic?", None)
            .await
            .unwrap();

        assert_eq!(result, "# Fallback article");
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_both_failures_propagate() {
        let primary = StubProvider::failing();
        let fallback = StubProvider::failing();

        let result =
            generate_article(&primary, &fallback, &Config::for_tests(), "Topic?", None).await;

        assert!(matches!(result, Err(AppError::Provider(_))));
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
    }
}
