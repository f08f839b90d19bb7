use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus whether URL extraction can run.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "job-tracker-api",
        "jobs": state.store.len().await,
        "extraction": {
            "configured": state.config.openrouter_api_key.is_some(),
            "model": state.config.llm_model,
            "prompt": state.config.extraction_prompt,
        }
    }))
}
