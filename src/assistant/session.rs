// src/assistant/session.rs
use async_trait::async_trait;
use std::sync::Arc;

use super::prompts::{SYSTEM_INSTRUCTION, TEMPERATURE};
use super::AssistantError;
use crate::gemini_client::{Content, GeminiClient, GenerateContentRequest, GenerationConfig};

/// Settings a chat session is created with.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    pub model: String,
    pub system_instruction: String,
    pub temperature: f32,
}

impl ChatConfig {
    pub fn project_assistant(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            temperature: TEMPERATURE,
        }
    }
}

/// A multi-turn exchange with a conversational backend.
#[async_trait]
pub trait ChatSession: Send + Sync {
    /// Append a user turn and return the assistant's reply text.
    async fn send_message(&mut self, text: &str) -> Result<String, AssistantError>;
}

#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn start_chat(&self, config: &ChatConfig) -> Result<Box<dyn ChatSession>, AssistantError>;
}

pub struct GeminiChatProvider {
    client: Arc<GeminiClient>,
}

impl GeminiChatProvider {
    pub fn new(client: Arc<GeminiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChatProvider for GeminiChatProvider {
    async fn start_chat(&self, config: &ChatConfig) -> Result<Box<dyn ChatSession>, AssistantError> {
        if config.model.trim().is_empty() {
            return Err(AssistantError::Session("no model configured".to_string()));
        }
        tracing::info!(
            "💬 Creating Gemini chat session (model={}, temperature={})",
            config.model,
            config.temperature
        );
        Ok(Box::new(GeminiChatSession::new(self.client.clone(), config.clone())))
    }
}

/// generateContent is stateless, so the session keeps the turn history and
/// replays it with every request.
pub struct GeminiChatSession {
    client: Arc<GeminiClient>,
    config: ChatConfig,
    history: Vec<Content>,
}

impl GeminiChatSession {
    pub fn new(client: Arc<GeminiClient>, config: ChatConfig) -> Self {
        Self {
            client,
            config,
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[Content] {
        &self.history
    }

    fn build_request(&self, text: &str) -> GenerateContentRequest {
        let mut contents = self.history.clone();
        contents.push(Content::user(text));
        GenerateContentRequest {
            contents,
            system_instruction: Some(Content::system(self.config.system_instruction.clone())),
            generation_config: Some(GenerationConfig {
                temperature: self.config.temperature,
            }),
        }
    }
}

#[async_trait]
impl ChatSession for GeminiChatSession {
    async fn send_message(&mut self, text: &str) -> Result<String, AssistantError> {
        let request = self.build_request(text);
        let response = self.client.generate_content(&self.config.model, &request).await?;
        let reply = response.text();

        // Gemini rejects empty model turns, so an empty reply leaves no trace
        // in the history.
        if !reply.is_empty() {
            self.history.push(Content::user(text));
            self.history.push(Content::model(reply.clone()));
        }
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> GeminiChatSession {
        let client = Arc::new(GeminiClient::with_base_url(
            "test-key".to_string(),
            "http://127.0.0.1:9".to_string(),
        ));
        GeminiChatSession::new(client, ChatConfig::project_assistant("gemini-2.5-flash"))
    }

    #[test]
    fn test_project_assistant_config() {
        let config = ChatConfig::project_assistant("gemini-2.5-flash");
        assert_eq!(config.temperature, 0.7);
        assert!(config.system_instruction.contains("DeepCrack"));
    }

    #[test]
    fn test_request_replays_history_then_new_turn() {
        let mut session = session();
        session.history.push(Content::user("第一问"));
        session.history.push(Content::model("第一答"));

        let request = session.build_request("第二问");
        assert_eq!(request.contents.len(), 3);
        assert_eq!(request.contents[2], Content::user("第二问"));
        assert_eq!(request.contents[1].role.as_deref(), Some("model"));
        let system = request.system_instruction.unwrap();
        assert!(system.role.is_none());
        assert!(system.text().contains("U-Net"));
        assert_eq!(request.generation_config.unwrap().temperature, 0.7);
    }

    #[tokio::test]
    async fn test_failed_send_leaves_history_untouched() {
        // nothing listens on port 9, so the request fails
        let mut session = session();
        let result = session.send_message("你好").await;
        assert!(result.is_err());
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_provider_rejects_blank_model() {
        let client = Arc::new(GeminiClient::new("test-key".to_string()));
        let provider = GeminiChatProvider::new(client);
        let result = provider.start_chat(&ChatConfig::project_assistant(" ")).await;
        assert!(matches!(result, Err(AssistantError::Session(_))));
    }
}
