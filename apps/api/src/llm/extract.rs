//! JSON-in-text extraction for model replies.
//!
//! Models asked for "JSON only" still wrap output in markdown fences or
//! surround it with prose. `extract_json` is a pure string → typed-result
//! function: strip fences, try a direct parse, then fall back to slicing the
//! outermost `{...}` or `[...]` span. Callers apply their own default-value
//! policy on failure; nothing here panics.

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("response text is empty")]
    Empty,

    #[error("no JSON object or array found in response")]
    NoJson,

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
/// Idempotent: already-clean text passes through unchanged.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Parses a typed value out of raw model text.
///
/// Order: fence strip → direct parse → outermost-delimiter slice. The slice
/// fallback picks whichever of `{` / `[` appears first so array targets are
/// not truncated to their first element.
pub fn extract_json<T: DeserializeOwned>(text: &str) -> Result<T, ExtractError> {
    let cleaned = strip_code_fences(text);
    if cleaned.is_empty() {
        return Err(ExtractError::Empty);
    }

    match serde_json::from_str(cleaned) {
        Ok(value) => Ok(value),
        Err(direct_err) => {
            let object = slice_delimited(cleaned, '{', '}');
            let array = slice_delimited(cleaned, '[', ']');

            let candidate = match (object, array) {
                (Some(o), Some(a)) => {
                    // Prefer whichever opens first in the text.
                    let obj_at = cleaned.find('{').unwrap_or(usize::MAX);
                    let arr_at = cleaned.find('[').unwrap_or(usize::MAX);
                    if arr_at < obj_at {
                        Some(a)
                    } else {
                        Some(o)
                    }
                }
                (Some(o), None) => Some(o),
                (None, Some(a)) => Some(a),
                (None, None) => None,
            };

            match candidate {
                Some(slice) if slice != cleaned => {
                    serde_json::from_str(slice).map_err(ExtractError::Parse)
                }
                Some(_) => Err(ExtractError::Parse(direct_err)),
                None => Err(ExtractError::NoJson),
            }
        }
    }
}

fn slice_delimited(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}
