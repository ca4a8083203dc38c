//! OpenAI chat-completions client (primary provider). Also serves DALL-E
//! image generation for thumbnails.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm::usage::log_usage;
use crate::llm::{
    ChatProvider, ChatRequest, Completion, GeneratedImage, ImageProvider, ProviderError,
    TokenParamPolicy, TokenUsage,
};

const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat-completions request body. The token-limit field and temperature are
/// switched per `TokenParamPolicy`: reasoning models take
/// `max_completion_tokens` and reject temperature.
#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ImageGenerationBody<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    quality: &'a str,
    n: u32,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    url: String,
    #[serde(default)]
    revised_prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// OpenAI client with Bearer auth and retry on 429/5xx/transport errors
/// (exponential backoff, bounded by the configured retry count).
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    max_retries: u32,
}

impl OpenAiClient {
    pub fn new(api_key: String, base_url: String, max_retries: u32) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            base_url,
            max_retries,
        }
    }

    /// POSTs a JSON body with the retry loop shared by chat and image calls.
    /// Retries 429 and 5xx; other non-success statuses fail immediately with
    /// the provider's error message when one can be parsed.
    async fn post_with_retry<B, R>(&self, path: &str, body: &B) -> Result<R, ProviderError>
    where
        B: Serialize,
        R: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut last_error: Option<ProviderError> = None;

        for attempt in 0..self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "OpenAI call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .header("content-type", "application/json")
                .json(body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(ProviderError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("OpenAI API returned {}: {}", status, body);
                last_error = Some(ProviderError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(ProviderError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            return response.json::<R>().await.map_err(ProviderError::Http);
        }

        Err(last_error.unwrap_or(ProviderError::RateLimited {
            retries: self.max_retries,
        }))
    }
}

#[async_trait]
impl ChatProvider for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: ChatRequest) -> Result<Completion, ProviderError> {
        let policy = TokenParamPolicy::for_model(&request.model);

        let body = ChatCompletionBody {
            model: &request.model,
            messages: vec![
                WireMessage {
                    role: "system",
                    content: &request.system,
                },
                WireMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            max_tokens: match policy {
                TokenParamPolicy::Standard => Some(request.max_tokens),
                TokenParamPolicy::Reasoning => None,
            },
            max_completion_tokens: match policy {
                TokenParamPolicy::Standard => None,
                TokenParamPolicy::Reasoning => Some(request.max_tokens),
            },
            temperature: match policy {
                TokenParamPolicy::Standard => request.temperature,
                TokenParamPolicy::Reasoning => None,
            },
        };

        let response: ChatCompletionResponse =
            self.post_with_retry("/chat/completions", &body).await?;

        let text = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ProviderError::EmptyContent);
        }

        let wire = response.usage.unwrap_or_default();
        let usage = TokenUsage {
            input_tokens: wire.prompt_tokens,
            output_tokens: wire.completion_tokens,
        };
        log_usage(self.name(), &request.model, &usage);

        Ok(Completion {
            text: text.to_string(),
            usage,
        })
    }
}

#[async_trait]
impl ImageProvider for OpenAiClient {
    async fn generate_image(&self, prompt: &str, size: &str) -> Result<GeneratedImage, ProviderError> {
        let body = ImageGenerationBody {
            model: "dall-e-3",
            prompt,
            size,
            quality: "standard",
            n: 1,
        };

        let response: ImageGenerationResponse =
            self.post_with_retry("/images/generations", &body).await?;

        let datum = response
            .data
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyContent)?;

        Ok(GeneratedImage {
            url: datum.url,
            revised_prompt: datum.revised_prompt,
        })
    }
}
