// src/assistant/service.rs
use std::sync::Arc;
use tokio::sync::Mutex;

use super::prompts::{EMPTY_REPLY, MISSING_API_KEY, REQUEST_FAILED, SESSION_INIT_FAILED};
use super::session::{ChatConfig, ChatProvider, ChatSession, GeminiChatProvider};
use crate::gemini_client::GeminiClient;

/// Owns the single chat session and turns every outcome into display text.
///
/// The session is created on the first send. A failed creation leaves it
/// unset so the next send retries; a failed send leaves it as it was.
pub struct AssistantService {
    provider: Option<Arc<dyn ChatProvider>>,
    config: ChatConfig,
    session: Mutex<Option<Box<dyn ChatSession>>>,
}

impl AssistantService {
    /// `provider` is `None` when no API key is configured.
    pub fn new(provider: Option<Arc<dyn ChatProvider>>, config: ChatConfig) -> Self {
        Self {
            provider,
            config,
            session: Mutex::new(None),
        }
    }

    pub fn gemini(client: Option<GeminiClient>, model: impl Into<String>) -> Self {
        let provider = client.map(|client| {
            Arc::new(GeminiChatProvider::new(Arc::new(client))) as Arc<dyn ChatProvider>
        });
        Self::new(provider, ChatConfig::project_assistant(model))
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub async fn has_session(&self) -> bool {
        self.session.lock().await.is_some()
    }

    /// Never fails: errors are logged and mapped to fixed messages.
    pub async fn send_message(&self, text: &str) -> String {
        let Some(provider) = &self.provider else {
            tracing::warn!("Assistant called without an API key configured");
            return MISSING_API_KEY.to_string();
        };

        // held across the remote call: one exchange at a time
        let mut session = self.session.lock().await;

        if session.is_none() {
            match provider.start_chat(&self.config).await {
                Ok(new_session) => *session = Some(new_session),
                Err(e) => {
                    tracing::error!("Failed to initialize chat: {}", e);
                    return SESSION_INIT_FAILED.to_string();
                }
            }
        }

        let Some(chat) = session.as_mut() else {
            return SESSION_INIT_FAILED.to_string();
        };

        match chat.send_message(text).await {
            Ok(reply) if reply.is_empty() => {
                tracing::warn!("Gemini returned an empty reply");
                EMPTY_REPLY.to_string()
            }
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!("Gemini API Error: {}", e);
                REQUEST_FAILED.to_string()
            }
        }
    }
}
