//! Content Validator — one scoring call, embedded-JSON parse, clamped report.
//!
//! Malformed provider output is absorbed: the caller always gets a report,
//! never an error. Scores are clamped into [0, 10] after parsing.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Config;
use crate::llm::extract::extract_json;
use crate::llm::{ChatProvider, ChatRequest};
use crate::writer::prompts::{VALIDATOR_SYSTEM, VALIDATOR_USER_TEMPLATE};

const VALIDATOR_MAX_TOKENS: u32 = 800;
const VALIDATOR_TEMPERATURE: f32 = 0.3;

/// Quality report for one piece of content. Immutable once produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub grammar_score: u8,
    pub human_score: u8,
    pub seo_score: u8,
    pub has_faq: bool,
    pub suggestions: Vec<String>,
}

/// Wire shape of the model's reply. Scores arrive as floats, suggestions as
/// either bare strings or `{type, message}` objects depending on how closely
/// the model followed the prompt.
#[derive(Debug, Deserialize)]
struct RawReport {
    #[serde(default)]
    grammar_score: f64,
    #[serde(default)]
    human_score: f64,
    #[serde(default)]
    seo_score: f64,
    #[serde(default)]
    has_faq: bool,
    #[serde(default)]
    suggestions: Vec<RawSuggestion>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSuggestion {
    Typed {
        #[serde(rename = "type")]
        #[serde(default)]
        _kind: Option<String>,
        message: String,
    },
    Text(String),
}

impl RawSuggestion {
    fn into_message(self) -> String {
        match self {
            RawSuggestion::Typed { message, .. } => message,
            RawSuggestion::Text(text) => text,
        }
    }
}

fn clamp_score(value: f64) -> u8 {
    value.clamp(0.0, 10.0).round() as u8
}

impl From<RawReport> for ValidationReport {
    fn from(raw: RawReport) -> Self {
        ValidationReport {
            grammar_score: clamp_score(raw.grammar_score),
            human_score: clamp_score(raw.human_score),
            seo_score: clamp_score(raw.seo_score),
            has_faq: raw.has_faq,
            suggestions: raw
                .suggestions
                .into_iter()
                .map(RawSuggestion::into_message)
                .collect(),
        }
    }
}

/// Scores `content` via the primary provider. `model` overrides the
/// configured default. Provider failure and unparseable output both yield
/// the zeroed default report.
pub async fn validate_content(
    provider: &dyn ChatProvider,
    config: &Config,
    content: &str,
    model: Option<&str>,
) -> ValidationReport {
    let request = ChatRequest {
        model: model.unwrap_or(config.model_primary.as_str()).to_string(),
        system: VALIDATOR_SYSTEM.to_string(),
        user: VALIDATOR_USER_TEMPLATE.replace("{content}", content),
        max_tokens: VALIDATOR_MAX_TOKENS,
        temperature: Some(VALIDATOR_TEMPERATURE),
    };

    let reply = match provider.complete(request).await {
        Ok(completion) => completion.text,
        Err(e) => {
            warn!("Validation call failed, returning default report: {e}");
            return ValidationReport::default();
        }
    };

    match extract_json::<RawReport>(&reply) {
        Ok(raw) => {
            let report = ValidationReport::from(raw);
            info!(
                grammar = report.grammar_score,
                human = report.human_score,
                seo = report.seo_score,
                has_faq = report.has_faq,
                "Validation completed"
            );
            report
        }
        Err(e) => {
            warn!("Validation reply was not parseable JSON: {e}");
            ValidationReport::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{Completion, ProviderError, TokenUsage};
    use async_trait::async_trait;

    struct StubProvider {
        reply: Result<String, ()>,
    }

    #[async_trait]
    impl ChatProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn complete(&self, _request: ChatRequest) -> Result<Completion, ProviderError> {
            match &self.reply {
                Ok(text) => Ok(Completion {
                    text: text.clone(),
                    usage: TokenUsage::default(),
                }),
                Err(()) => Err(ProviderError::Api {
                    status: 500,
                    message: "boom".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_validate_parses_fenced_json() {
        let provider = StubProvider {
            reply: Ok("```json\n{\"grammar_score\":9,\"human_score\":7,\"seo_score\":8,\
                       \"has_faq\":true,\"suggestions\":[{\"type\":\"ai_tone\",\
                       \"message\":\"Vary sentence openings.\"}]}\n```"
                .to_string()),
        };

        let report =
            validate_content(&provider, &Config::for_tests(), "# Article body", None).await;

        assert_eq!(report.grammar_score, 9);
        assert_eq!(report.human_score, 7);
        assert_eq!(report.seo_score, 8);
        assert!(report.has_faq);
        assert_eq!(report.suggestions, vec!["Vary sentence openings."]);
    }

    #[tokio::test]
    async fn test_validate_clamps_out_of_range_scores() {
        let provider = StubProvider {
            reply: Ok("{\"grammar_score\":15,\"human_score\":-3,\"seo_score\":10,\
                       \"has_faq\":false,\"suggestions\":[]}"
                .to_string()),
        };

        let report = validate_content(&provider, &Config::for_tests(), "text", None).await;

        assert_eq!(report.grammar_score, 10);
        assert_eq!(report.human_score, 0);
        assert_eq!(report.seo_score, 10);
    }

    #[tokio::test]
    async fn test_validate_defaults_on_malformed_output() {
        let provider = StubProvider {
            reply: Ok("Sorry, I cannot score this article.".to_string()),
        };

        let report = validate_content(&provider, &Config::for_tests(), "text", None).await;

        assert_eq!(report.grammar_score, 0);
        assert_eq!(report.human_score, 0);
        assert_eq!(report.seo_score, 0);
        assert!(!report.has_faq);
        assert!(report.suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_validate_defaults_on_provider_failure() {
        let provider = StubProvider { reply: Err(()) };

        let report = validate_content(&provider, &Config::for_tests(), "text", None).await;

        assert_eq!(report.grammar_score, 0);
        assert!(!report.has_faq);
    }

    #[tokio::test]
    async fn test_validate_accepts_bare_string_suggestions() {
        let provider = StubProvider {
            reply: Ok("{\"grammar_score\":6,\"human_score\":6,\"seo_score\":6,\
                       \"has_faq\":false,\"suggestions\":[\"Add an FAQ section.\"]}"
                .to_string()),
        };

        let report = validate_content(&provider, &Config::for_tests(), "text", None).await;

        assert_eq!(report.suggestions, vec!["Add an FAQ section."]);
    }
}
