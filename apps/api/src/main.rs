mod config;
mod errors;
mod guard;
mod keywords;
mod llm;
mod media;
mod routes;
mod state;
mod writer;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm::anthropic::AnthropicClient;
use crate::llm::openai::OpenAiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Draftsmith API v{}", env!("CARGO_PKG_VERSION"));

    // Primary provider (chat + images)
    let openai = Arc::new(OpenAiClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        config.max_retries,
    ));
    info!("OpenAI client initialized (model: {})", config.model_primary);

    // Fallback provider
    let anthropic = Arc::new(AnthropicClient::new(
        config.anthropic_api_key.clone(),
        config.anthropic_base_url.clone(),
        config.max_retries,
    ));
    info!(
        "Anthropic client initialized (model: {})",
        config.model_fallback
    );

    // Build app state
    let state = AppState {
        primary: openai.clone(),
        fallback: anthropic,
        images: openai,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
