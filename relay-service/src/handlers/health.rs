use crate::config::SERVICE_NAME;
use crate::models::analysis::now_timestamp;
use crate::startup::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};

/// Liveness probe. Always 200, whether or not the key is configured.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "api_key_configured": state.config.api_key_configured(),
        "timestamp": now_timestamp(),
    }))
}

/// Connectivity check used by the browser client.
pub async fn api_test(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "success",
        "message": "Braille relay server is running",
        "service": SERVICE_NAME,
        "model": state.config.gemini.model,
        "prompt_variant": state.config.prompt.as_str(),
        "api_key_configured": state.config.api_key_configured(),
        "timestamp": now_timestamp(),
    }))
}
