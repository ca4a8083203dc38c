//! Thumbnail generation: prompt + size → image URL.
//!
//! Unsupported sizes coerce to 1024x1024 instead of erroring; the image
//! model handles every supported resolution.

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm::ImageProvider;

const DEFAULT_SIZE: &str = "1024x1024";
const SUPPORTED_SIZES: &[&str] = &[
    "256x256",
    "512x512",
    "1024x1024",
    "1792x1024",
    "1024x1792",
];

/// A generated thumbnail.
#[derive(Debug, Clone, Serialize)]
pub struct Thumbnail {
    pub url: String,
    pub prompt_used: String,
    pub size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
}

/// Coerces a requested size to a supported one; anything unrecognized
/// becomes the default square.
pub fn coerce_size(size: &str) -> &str {
    let size = size.trim();
    if SUPPORTED_SIZES.contains(&size) {
        size
    } else {
        warn!("Unsupported image size '{size}', defaulting to {DEFAULT_SIZE}");
        DEFAULT_SIZE
    }
}

/// Generates one thumbnail image. Provider failure propagates as an error
/// payload through `AppError`; the process never crashes.
pub async fn generate_thumbnail(
    provider: &dyn ImageProvider,
    prompt: &str,
    size: Option<&str>,
) -> Result<Thumbnail, AppError> {
    let size = coerce_size(size.unwrap_or(DEFAULT_SIZE));

    info!(size, prompt_length = prompt.len(), "Generating thumbnail");

    let image = provider.generate_image(prompt, size).await?;

    info!(url = %image.url, "Thumbnail generated");

    Ok(Thumbnail {
        url: image.url,
        prompt_used: prompt.to_string(),
        size: size.to_string(),
        revised_prompt: image.revised_prompt,
    })
}
