// lib.rs - Main library file that exports all modules
pub mod assistant;
pub mod config;
pub mod demo;
pub mod gemini_client;
pub mod handlers;
pub mod middleware;
pub mod models;

use axum::{Extension, Router};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use assistant::{AssistantService, Conversation};
use config::AppConfig;
use demo::{DemoWorkflow, SimulatedEngine};
use gemini_client::GeminiClient;

// AppState holds the demo lab workflow and the assistant transcript; both live for the whole process
pub struct AppState {
    pub config: AppConfig,
    pub demo: Arc<DemoWorkflow>,
    pub conversation: Conversation,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let gemini_client = match &config.gemini_api_key {
            Some(api_key) => {
                tracing::info!("Initializing Gemini AI client ({})...", config.gemini_model);
                Some(GeminiClient::with_base_url(
                    api_key.clone(),
                    config.gemini_base_url.clone(),
                ))
            }
            None => {
                tracing::warn!("GEMINI_API_KEY not found. The assistant will ask for an API key.");
                tracing::info!("To enable the assistant, set: GEMINI_API_KEY (or API_KEY)");
                None
            }
        };

        let assistant = Arc::new(AssistantService::gemini(
            gemini_client,
            config.gemini_model.clone(),
        ));
        let engine = Arc::new(SimulatedEngine::new(config.demo_delay));

        Self {
            demo: Arc::new(DemoWorkflow::new(engine)),
            conversation: Conversation::new(assistant),
            started_at: Utc::now(),
            config,
        }
    }
}

/// All routes with logging, CORS and the shared state attached.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(handlers::ui::ui_routes())
        .merge(handlers::demo::demo_routes(state.config.max_upload_bytes))
        .merge(handlers::assistant::assistant_routes())
        .route("/api/status", axum::routing::get(handlers::status::api_status))
        .layer(axum::middleware::from_fn(middleware::logging::request_logging_middleware))
        .layer(CorsLayer::permissive())
        .layer(Extension(state))
}
