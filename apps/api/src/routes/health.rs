use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Returns a simple status object with service version and timestamp.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "draftsmith-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
