use std::sync::Arc;

use crate::config::Config;
use crate::llm::{ChatProvider, ImageProvider};

/// Shared application state injected into all route handlers via Axum
/// extractors. Providers are trait objects so tests can substitute stubs
/// without touching process-wide state.
#[derive(Clone)]
pub struct AppState {
    /// Primary chat provider (OpenAI in production).
    pub primary: Arc<dyn ChatProvider>,
    /// Fallback chat provider, used only when the primary fails.
    pub fallback: Arc<dyn ChatProvider>,
    /// Image-generation provider for thumbnails.
    pub images: Arc<dyn ImageProvider>,
    pub config: Config,
}
