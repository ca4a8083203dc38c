//! Content Fixer — threshold-driven correction pass over validated content.
//!
//! Which fixes apply is decided locally from the report (scores below 7,
//! missing FAQ); the model gets one prompt describing all of them. The reply
//! is parsed like the validator's (fence strip, embedded JSON), then
//! post-processed: whitespace normalization, FAQ-heading detection and
//! keyword-density accounting with fenced code blocks excluded. Every
//! failure path returns the original content with an explanatory summary.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Config;
use crate::llm::extract::extract_json;
use crate::llm::{ChatProvider, ChatRequest};
use crate::writer::prompts::{FIXER_SYSTEM, FIXER_USER_TEMPLATE};
use crate::writer::validator::ValidationReport;

const FIXER_MAX_TOKENS: u32 = 3000;
const FIXER_TEMPERATURE: f32 = 0.4;
const SCORE_FIX_THRESHOLD: u8 = 7;
const SKIP_GRAMMAR_THRESHOLD: u8 = 8;
const DENSITY_MIN: f64 = 1.5;
const DENSITY_MAX: f64 = 2.5;

static MULTI_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" {2,}").expect("invalid space pattern"));
static MULTI_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("invalid newline pattern"));
static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[\s\S]*?```").expect("invalid fence pattern"));
static MARKDOWN_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[#*`\[\]()]").expect("invalid markdown pattern"));
static FAQ_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)##\s*(faq|frequently\s+asked\s+questions)").expect("invalid FAQ pattern")
});

/// Optional fix metadata supplied by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct FixMetadata {
    #[serde(default)]
    pub focus_keyphrase: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_style")]
    pub style: String,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_style() -> String {
    "informational".to_string()
}

impl Default for FixMetadata {
    fn default() -> Self {
        FixMetadata {
            focus_keyphrase: String::new(),
            language: default_language(),
            style: default_style(),
        }
    }
}

/// Outcome of one fix pass.
#[derive(Debug, Clone, Serialize)]
pub struct FixResult {
    pub fixed_content: String,
    pub fix_summary: Vec<String>,
    pub added_faq: bool,
    pub keyword_density: f64,
}

/// Wire shape of the fixer model's reply.
#[derive(Debug, Deserialize)]
struct FixerReply {
    fixed_content: String,
    #[serde(default)]
    changes: Vec<String>,
}

/// Derives the fix categories from report scores and the FAQ flag.
fn extract_fix_needs(report: &ValidationReport) -> Vec<&'static str> {
    let mut needs = Vec::new();
    if report.grammar_score < SCORE_FIX_THRESHOLD {
        needs.push("grammar_improvement");
    }
    if report.human_score < SCORE_FIX_THRESHOLD {
        needs.push("humanize_content");
    }
    if report.seo_score < SCORE_FIX_THRESHOLD {
        needs.push("seo_optimization");
    }
    if !report.has_faq {
        needs.push("faq_missing");
    }
    needs
}

/// Normalizes whitespace: collapses space runs, squeezes 3+ newlines to 2
/// and trims trailing line whitespace.
pub fn post_process_content(content: &str) -> String {
    let content = MULTI_SPACE.replace_all(content, " ");
    let content = MULTI_NEWLINE.replace_all(&content, "\n\n");
    content
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn has_faq_heading(content: &str) -> bool {
    FAQ_HEADING.is_match(content)
}

/// Keyword density as (case-insensitive keyphrase occurrences / total words)
/// × 100, with fenced code blocks excluded from both counts. Rounded to two
/// decimals.
pub fn keyword_density(content: &str, keyphrase: &str) -> f64 {
    if content.is_empty() || keyphrase.trim().is_empty() {
        return 0.0;
    }

    let without_code = CODE_FENCE.replace_all(content, "");
    let clean_text = MARKDOWN_CHARS.replace_all(&without_code, "");

    let total_words = clean_text.split_whitespace().count();
    if total_words == 0 {
        return 0.0;
    }

    let occurrences = clean_text
        .to_lowercase()
        .matches(&keyphrase.trim().to_lowercase())
        .count();

    let density = (occurrences as f64 / total_words as f64) * 100.0;
    (density * 100.0).round() / 100.0
}

fn failure_result(content: &str, reason: String) -> FixResult {
    warn!("{reason}");
    FixResult {
        fixed_content: content.to_string(),
        fix_summary: vec![reason],
        added_faq: false,
        keyword_density: 0.0,
    }
}

/// Applies the fixes a validation report calls for. Never fails: provider
/// errors, unparseable replies and empty output all return the original
/// content with a summary entry describing what went wrong.
pub async fn fix_content(
    provider: &dyn ChatProvider,
    config: &Config,
    content: &str,
    report: &ValidationReport,
    metadata: &FixMetadata,
) -> FixResult {
    let fix_needs = extract_fix_needs(report);
    info!(?fix_needs, content_length = content.len(), "Fix analysis");

    // Nothing to fix and grammar is already strong: skip the call entirely.
    if fix_needs.is_empty() && report.grammar_score >= SKIP_GRAMMAR_THRESHOLD {
        return FixResult {
            fixed_content: content.to_string(),
            fix_summary: vec!["Content already meets quality thresholds; no fixes applied".to_string()],
            added_faq: report.has_faq,
            keyword_density: keyword_density(content, &metadata.focus_keyphrase),
        };
    }

    let report_json =
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());

    let user_prompt = FIXER_USER_TEMPLATE
        .replace("{report}", &report_json)
        .replace("{fix_needs}", &fix_needs.join(", "))
        .replace("{content}", content)
        .replace("{keyphrase}", &metadata.focus_keyphrase)
        .replace("{language}", &metadata.language)
        .replace("{style}", &metadata.style);

    let request = ChatRequest {
        model: config.model_fixer.clone(),
        system: FIXER_SYSTEM.to_string(),
        user: user_prompt,
        max_tokens: FIXER_MAX_TOKENS,
        temperature: Some(FIXER_TEMPERATURE),
    };

    let reply = match provider.complete(request).await {
        Ok(completion) => completion.text,
        Err(e) => {
            return failure_result(content, format!("Fix call failed, returning original content: {e}"))
        }
    };

    let parsed = match extract_json::<FixerReply>(&reply) {
        Ok(parsed) => parsed,
        Err(e) => {
            return failure_result(
                content,
                format!("Fix reply was not parseable JSON, returning original content: {e}"),
            )
        }
    };

    let fixed = post_process_content(&parsed.fixed_content);
    if fixed.is_empty() {
        return failure_result(
            content,
            "Fixer returned empty content, returning original".to_string(),
        );
    }

    let added_faq = !report.has_faq && has_faq_heading(&fixed);
    let density = keyword_density(&fixed, &metadata.focus_keyphrase);

    let mut summary = parsed.changes;
    if added_faq {
        summary.push("Added FAQ section".to_string());
    }
    if !metadata.focus_keyphrase.is_empty() {
        summary.push(format!("Keyword density after fix: {density}%"));
        if !(DENSITY_MIN..=DENSITY_MAX).contains(&density) {
            summary.push(format!(
                "Warning: keyword density {density}% is outside the {DENSITY_MIN}%-{DENSITY_MAX}% target; manual adjustment recommended"
            ));
        }
    }
    if summary.is_empty() {
        summary.push("General quality improvements applied".to_string());
    }

    info!(
        fixed_length = fixed.len(),
        added_faq, density, "Fix completed"
    );

    FixResult {
        fixed_content: fixed,
        fix_summary: summary,
        added_faq,
        keyword_density: density,
    }
}
