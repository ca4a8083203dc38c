//! Writer pipeline — refine → generate → validate, each stage a stateless
//! async function over the injected provider handles.

pub mod fixer;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod refiner;
pub mod validator;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;
use crate::llm::ChatProvider;
use crate::writer::validator::ValidationReport;

/// Output of one full pipeline run. Nothing is persisted; the run id only
/// ties log lines and the response together.
#[derive(Debug, Serialize)]
pub struct PipelineResult {
    pub run_id: Uuid,
    pub input_topic: String,
    pub refined_topic: String,
    pub content: String,
    pub validation: ValidationReport,
}

/// Runs the full chain for a topic: refine the title, generate the article
/// (primary with one fallback attempt), then score it. Only generation can
/// fail; refinement and validation degrade to identity/default results.
pub async fn run_pipeline(
    primary: &dyn ChatProvider,
    fallback: &dyn ChatProvider,
    config: &Config,
    topic: &str,
    model_override: Option<&str>,
) -> Result<PipelineResult, AppError> {
    let run_id = Uuid::new_v4();
    info!(%run_id, topic, "Pipeline started");

    let refined_topic = refiner::refine_topic(primary, config, topic).await;
    info!(%run_id, refined = refined_topic, "Stage 1/3: topic refined");

    let content =
        generator::generate_article(primary, fallback, config, &refined_topic, model_override)
            .await?;
    info!(%run_id, length = content.len(), "Stage 2/3: article generated");

    let validation = validator::validate_content(primary, config, &content, model_override).await;
    info!(
        %run_id,
        grammar = validation.grammar_score,
        human = validation.human_score,
        seo = validation.seo_score,
        "Stage 3/3: validation completed"
    );

    Ok(PipelineResult {
        run_id,
        input_topic: topic.to_string(),
        refined_topic,
        content,
        validation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatRequest, Completion, ProviderError, TokenUsage};
    use async_trait::async_trait;

    /// Answers refine, generate and validate calls in order.
    struct ScriptedProvider {
        replies: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ChatProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, _request: ChatRequest) -> Result<Completion, ProviderError> {
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                return Err(ProviderError::EmptyContent);
            }
            Ok(Completion {
                text: replies.remove(0),
                usage: TokenUsage::default(),
            })
        }
    }

    #[tokio::test]
    async fn test_pipeline_chains_all_stages() {
        let primary = ScriptedProvider {
            replies: std::sync::Mutex::new(vec![
                "How do you scrape the web with Python?".to_string(),
                "# Web Scraping\n\nArticle body.".to_string(),
                "{\"grammar_score\":8,\"human_score\":7,\"seo_score\":9,\"has_faq\":false,\
                 \"suggestions\":[]}"
                    .to_string(),
            ]),
        };
        let fallback = ScriptedProvider {
            replies: std::sync::Mutex::new(vec![]),
        };

        let result = run_pipeline(
            &primary,
            &fallback,
            &Config::for_tests(),
            "python web scraping",
            None,
        )
        .await
        .unwrap();

        assert_eq!(result.input_topic, "python web scraping");
        assert_eq!(result.refined_topic, "How do you scrape the web with Python?");
        assert!(result.content.starts_with("# Web Scraping"));
        assert_eq!(result.validation.grammar_score, 8);
        assert_eq!(result.validation.seo_score, 9);
    }
}
