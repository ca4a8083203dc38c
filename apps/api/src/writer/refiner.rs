//! Topic Refiner — rewrites a raw keyword into a question-style title.
//!
//! One prompt, one parse. Provider failure, an empty reply and an echo of
//! the input all collapse to the original topic: refinement is best-effort
//! and must never fail the pipeline.

use tracing::{info, warn};

use crate::config::Config;
use crate::llm::{ChatProvider, ChatRequest};
use crate::writer::prompts::REFINER_SYSTEM;

const REFINER_MAX_TOKENS: u32 = 500;

/// Refines `topic` into a question-style title via the primary provider.
/// Always returns a non-empty string; on any failure the original topic
/// comes back unchanged.
pub async fn refine_topic(provider: &dyn ChatProvider, config: &Config, topic: &str) -> String {
    let topic = topic.trim();

    let request = ChatRequest {
        model: config.model_primary.clone(),
        system: REFINER_SYSTEM.to_string(),
        user: topic.to_string(),
        max_tokens: REFINER_MAX_TOKENS,
        temperature: Some(config.default_temperature),
    };

    let reply = match provider.complete(request).await {
        Ok(completion) => completion.text,
        Err(e) => {
            warn!("Topic refinement failed, keeping original: {e}");
            return topic.to_string();
        }
    };

    let title = reply.trim().replace(['"', '\''], "");
    let title = title.trim();

    // An empty reply or the input echoed back is a non-answer.
    if title.is_empty() || title.eq_ignore_ascii_case(topic) {
        warn!("Model returned unchanged topic, keeping original: {topic}");
        return topic.to_string();
    }

    info!(refined = title, "Topic refined");
    title.to_string()
}
