// src/handlers/assistant.rs
use crate::assistant::ConversationError;
use crate::models::chat::{SendMessageRequest, SendMessageResponse, TranscriptResponse};
use crate::AppState;
use axum::{
    extract::Extension,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

pub fn assistant_routes() -> Router {
    Router::new().route(
        "/api/assistant/messages",
        get(get_transcript).post(send_message),
    )
}

pub async fn get_transcript(Extension(state): Extension<Arc<AppState>>) -> Json<TranscriptResponse> {
    Json(TranscriptResponse {
        messages: state.conversation.messages().await,
        is_loading: state.conversation.is_loading(),
    })
}

pub async fn send_message(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, (StatusCode, Json<Value>)> {
    match state.conversation.submit(&payload.text).await {
        Ok(reply) => Ok(Json(SendMessageResponse {
            reply,
            messages: state.conversation.messages().await,
        })),
        Err(e) => {
            let status = match e {
                ConversationError::EmptyMessage => StatusCode::BAD_REQUEST,
                ConversationError::Busy => StatusCode::CONFLICT,
                ConversationError::Interrupted(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err((status, Json(json!({ "error": e.to_string() }))))
        }
    }
}
