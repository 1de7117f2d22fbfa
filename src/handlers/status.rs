// src/handlers/status.rs
use crate::AppState;
use axum::{extract::Extension, response::Json};
use serde_json::{json, Value};
use std::sync::Arc;

// API Status endpoint
pub async fn api_status(Extension(state): Extension<Arc<AppState>>) -> Json<Value> {
    let assistant = state.conversation.assistant();
    let gemini_status = if assistant.is_configured() { "configured" } else { "not_configured" };
    let session_status = if assistant.has_session().await { "active" } else { "not_started" };
    let uptime = chrono::Utc::now().signed_duration_since(state.started_at);

    Json(json!({
        "status": "operational",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": uptime.num_seconds(),
        "services": {
            "gemini_ai": gemini_status,
            "gemini_model": assistant.model(),
            "chat_session": session_status,
        },
        "features": {
            "simulated_inference": true,
            "inference_delay_ms": state.config.demo_delay.as_millis() as u64,
            "max_upload_bytes": state.config.max_upload_bytes,
        },
        "endpoints": {
            "status": "/api/status",
            "demo": "/api/demo/*",
            "assistant": "/api/assistant/messages"
        }
    }))
}
