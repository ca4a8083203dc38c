use anyhow::{Context, Result};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub anthropic_api_key: String,
    /// Chat model used for every stage unless overridden per-request.
    pub model_primary: String,
    /// Fallback chat model, used only when the primary provider fails.
    pub model_fallback: String,
    /// Fixed higher-capability model used by the content fixer.
    pub model_fixer: String,
    pub default_temperature: f32,
    pub default_max_tokens: u32,
    pub max_retries: u32,
    /// Base URL overrides so tests and local gateways can redirect calls.
    pub openai_base_url: String,
    pub anthropic_base_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            model_primary: env_or("MODEL_PRIMARY", "gpt-4o-mini"),
            model_fallback: env_or("MODEL_FALLBACK", "claude-sonnet-4-5"),
            model_fixer: env_or("MODEL_FIXER", "gpt-4o"),
            default_temperature: std::env::var("DEFAULT_TEMPERATURE")
                .unwrap_or_else(|_| "0.7".to_string())
                .parse::<f32>()
                .context("DEFAULT_TEMPERATURE must be a valid float")?,
            default_max_tokens: std::env::var("DEFAULT_MAX_TOKENS")
                .unwrap_or_else(|_| "4096".to_string())
                .parse::<u32>()
                .context("DEFAULT_MAX_TOKENS must be a valid integer")?,
            max_retries: std::env::var("MAX_RETRIES")
                .unwrap_or_else(|_| "3".to_string())
                .parse::<u32>()
                .context("MAX_RETRIES must be a valid integer")?,
            openai_base_url: env_or("OPENAI_BASE_URL", OPENAI_BASE_URL),
            anthropic_base_url: env_or("ANTHROPIC_BASE_URL", ANTHROPIC_BASE_URL),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            openai_api_key: "test-key".to_string(),
            anthropic_api_key: "test-key".to_string(),
            model_primary: "gpt-4o-mini".to_string(),
            model_fallback: "claude-sonnet-4-5".to_string(),
            model_fixer: "gpt-4o".to_string(),
            default_temperature: 0.7,
            default_max_tokens: 4096,
            max_retries: 3,
            openai_base_url: OPENAI_BASE_URL.to_string(),
            anthropic_base_url: ANTHROPIC_BASE_URL.to_string(),
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
