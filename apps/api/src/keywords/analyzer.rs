//! Keyword Analyzer — topic → ranked SEO keyword list.
//!
//! One extraction call returning a JSON array, normalized and clamped into
//! range. When the provider fails or the reply is unusable, a deterministic
//! heuristic fallback keyed on the topic's word count stands in, so the
//! endpoint never errors on provider trouble.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Config;
use crate::keywords::prompts::{KEYWORD_EXTRACTION_SYSTEM, KEYWORD_EXTRACTION_USER_TEMPLATE};
use crate::llm::extract::extract_json;
use crate::llm::{ChatProvider, ChatRequest};

const ANALYZER_MAX_TOKENS: u32 = 2000;
const ANALYZER_TEMPERATURE: f32 = 0.3;

/// One keyword with estimated metrics. Competition and difficulty are
/// always within [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordInsight {
    pub keyword: String,
    pub search_volume: u32,
    pub competition: f64,
    pub difficulty: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Wire shape of one model-returned entry; every field is optional because
/// models drop or mistype them.
#[derive(Debug, Deserialize)]
struct RawKeyword {
    #[serde(default)]
    keyword: String,
    #[serde(default = "default_volume")]
    search_volume: f64,
    #[serde(default = "default_half")]
    competition: f64,
    #[serde(default = "default_half")]
    difficulty: f64,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

fn default_volume() -> f64 {
    1000.0
}

fn default_half() -> f64 {
    0.5
}

fn clamp_unit(value: f64) -> f64 {
    (value.clamp(0.0, 1.0) * 100.0).round() / 100.0
}

impl RawKeyword {
    fn normalize(self) -> Option<KeywordInsight> {
        let keyword = self.keyword.trim().to_string();
        if keyword.is_empty() {
            return None;
        }
        Some(KeywordInsight {
            keyword,
            search_volume: self.search_volume.max(0.0) as u32,
            competition: clamp_unit(self.competition),
            difficulty: clamp_unit(self.difficulty),
            kind: self
                .kind
                .filter(|k| !k.trim().is_empty())
                .unwrap_or_else(|| "primary".to_string()),
        })
    }
}

/// Extracts SEO keywords for `topic`, sorted by search volume descending and
/// truncated to `max_results`. Falls back to heuristics on any failure.
pub async fn analyze_keywords(
    provider: &dyn ChatProvider,
    config: &Config,
    topic: &str,
    max_results: usize,
) -> Vec<KeywordInsight> {
    let request = ChatRequest {
        model: config.model_primary.clone(),
        system: KEYWORD_EXTRACTION_SYSTEM.to_string(),
        user: KEYWORD_EXTRACTION_USER_TEMPLATE.replace("{topic}", topic),
        max_tokens: ANALYZER_MAX_TOKENS,
        temperature: Some(ANALYZER_TEMPERATURE),
    };

    let reply = match provider.complete(request).await {
        Ok(completion) => completion.text,
        Err(e) => {
            warn!("Keyword extraction call failed, using heuristic fallback: {e}");
            return fallback_keywords(topic, max_results);
        }
    };

    let raw: Vec<RawKeyword> = match extract_json(&reply) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Keyword reply was not a parseable JSON array, using heuristic fallback: {e}");
            return fallback_keywords(topic, max_results);
        }
    };

    let mut keywords: Vec<KeywordInsight> =
        raw.into_iter().filter_map(RawKeyword::normalize).collect();

    if keywords.is_empty() {
        warn!("Keyword reply contained no usable entries, using heuristic fallback");
        return fallback_keywords(topic, max_results);
    }

    keywords.sort_by(|a, b| b.search_volume.cmp(&a.search_volume));
    keywords.truncate(max_results);

    info!(count = keywords.len(), "Keyword analysis completed");
    keywords
}

/// Deterministic heuristic keywords for when the provider cannot help.
/// Volumes derive from word-count banding: long phrases search less but
/// compete less too.
pub fn fallback_keywords(topic: &str, max_results: usize) -> Vec<KeywordInsight> {
    let topic = topic.trim();
    let words: Vec<&str> = topic.split_whitespace().collect();

    let is_question = topic.ends_with('?')
        || words
            .first()
            .map(|w| {
                matches!(
                    w.to_lowercase().as_str(),
                    "how" | "why" | "what" | "when" | "where"
                )
            })
            .unwrap_or(false);

    let (volume, competition, difficulty) = if is_question {
        (2500, 0.35, 0.45)
    } else if words.len() >= 4 {
        (1200, 0.25, 0.35)
    } else if words.len() == 3 {
        (4000, 0.45, 0.55)
    } else {
        (15000, 0.70, 0.75)
    };

    let mut keywords = vec![KeywordInsight {
        keyword: topic.to_string(),
        search_volume: volume,
        competition,
        difficulty,
        kind: (if is_question { "question" } else { "primary" }).to_string(),
    }];

    if words.len() > 2 {
        keywords.push(KeywordInsight {
            keyword: words[..2].join(" "),
            search_volume: 20000,
            competition: 0.75,
            difficulty: 0.80,
            kind: "primary".to_string(),
        });
    }

    let variations: [(String, u32, &str); 4] = [
        (format!("how to {topic}"), 1500, "question"),
        (format!("{topic} guide"), 1200, "long-tail"),
        (format!("{topic} tutorial"), 900, "long-tail"),
        (format!("{topic} examples"), 2500, "semantic"),
    ];
    for (keyword, search_volume, kind) in variations {
        keywords.push(KeywordInsight {
            keyword,
            search_volume,
            competition: 0.30,
            difficulty: 0.40,
            kind: kind.to_string(),
        });
    }

    keywords.sort_by(|a, b| b.search_volume.cmp(&a.search_volume));
    keywords.truncate(max_results);
    keywords
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
    async fn test_analyze_normalizes_and_sorts() {
        let provider = StubProvider {
            reply: Ok(r#"```json
[
  {"keyword": "rust web scraping", "search_volume": 3000, "competition": 0.4, "difficulty": 0.5, "type": "primary"},
  {"keyword": "rust reqwest tutorial", "search_volume": 9000, "competition": 1.7, "difficulty": -0.2, "type": "long-tail"},
  {"keyword": "   ", "search_volume": 100, "competition": 0.1, "difficulty": 0.1, "type": "semantic"}
]
```"#
            .to_string()),
        };

        let keywords =
            analyze_keywords(&provider, &Config::for_tests(), "rust web scraping", 10).await;

        assert_eq!(keywords.len(), 2); // blank keyword dropped
        assert_eq!(keywords[0].keyword, "rust reqwest tutorial"); // volume desc
        assert_eq!(keywords[0].competition, 1.0); // clamped
        assert_eq!(keywords[0].difficulty, 0.0); // clamped
    }

    #[tokio::test]
    async fn test_analyze_truncates_to_max_results() {
        let provider = StubProvider {
            reply: Ok(r#"[
                {"keyword": "a", "search_volume": 1},
                {"keyword": "b", "search_volume": 2},
                {"keyword": "c", "search_volume": 3}
            ]"#
            .to_string()),
        };

        let keywords = analyze_keywords(&provider, &Config::for_tests(), "topic", 2).await;

        assert_eq!(keywords.len(), 2);
        assert_eq!(keywords[0].keyword, "c");
        assert_eq!(keywords[0].kind, "primary"); // missing type defaults
    }

    #[tokio::test]
    async fn test_analyze_falls_back_on_provider_failure() {
        let provider = StubProvider { reply: Err(()) };

        let keywords =
            analyze_keywords(&provider, &Config::for_tests(), "python web scraping", 5).await;

        assert!(!keywords.is_empty());
        assert!(keywords.iter().any(|k| k.keyword == "python web scraping"));
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let a = fallback_keywords("python web scraping", 10);
        let b = fallback_keywords("python web scraping", 10);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.keyword, y.keyword);
            assert_eq!(x.search_volume, y.search_volume);
        }
    }

    #[test]
    fn test_fallback_metrics_in_range_and_sorted() {
        let keywords = fallback_keywords("learn rust fast", 10);
        for kw in &keywords {
            assert!((0.0..=1.0).contains(&kw.competition));
            assert!((0.0..=1.0).contains(&kw.difficulty));
        }
        for pair in keywords.windows(2) {
            assert!(pair[0].search_volume >= pair[1].search_volume);
        }
    }

    #[test]
    fn test_fallback_detects_question_topics() {
        let keywords = fallback_keywords("how does rust ownership work", 1);
        assert_eq!(keywords[0].kind, "primary"); // sorted by volume, short variation wins
        let direct = fallback_keywords("why rust", 10);
        assert!(direct.iter().any(|k| k.kind == "question"));
    }
}
