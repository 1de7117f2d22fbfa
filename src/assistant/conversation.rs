// src/assistant/conversation.rs
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::prompts::GREETING;
use super::service::AssistantService;
use super::ConversationError;
use crate::models::chat::ChatMessage;

/// The assistant transcript: greeting first, then user and model turns in
/// the order they were sent. Only one exchange may be pending at a time.
pub struct Conversation {
    messages: Arc<RwLock<Vec<ChatMessage>>>,
    in_flight: Arc<AtomicBool>,
    assistant: Arc<AssistantService>,
}

/// Clears the in-flight flag once the exchange task ends.
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Conversation {
    pub fn new(assistant: Arc<AssistantService>) -> Self {
        Self {
            messages: Arc::new(RwLock::new(vec![ChatMessage::model(GREETING)])),
            in_flight: Arc::new(AtomicBool::new(false)),
            assistant,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.messages.read().await.clone()
    }

    pub fn assistant(&self) -> &AssistantService {
        &self.assistant
    }

    /// Append `input` as a user turn, wait for the reply and append it.
    ///
    /// The exchange runs on its own task: dropping the returned future does
    /// not stop the reply from being appended.
    pub async fn submit(&self, input: &str) -> Result<ChatMessage, ConversationError> {
        if input.trim().is_empty() {
            return Err(ConversationError::EmptyMessage);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Rejected message while a reply is pending");
            return Err(ConversationError::Busy);
        }
        let in_flight = InFlight(self.in_flight.clone());

        let messages = self.messages.clone();
        let assistant = self.assistant.clone();
        let input = input.to_string();

        let exchange = tokio::spawn(async move {
            let _in_flight = in_flight;

            let user_message = ChatMessage::user(input.as_str());
            tracing::info!("💬 User message {} ({} chars)", user_message.id, input.chars().count());
            messages.write().await.push(user_message);

            let reply = ChatMessage::model(assistant.send_message(&input).await);
            messages.write().await.push(reply.clone());
            tracing::info!("🤖 Assistant reply {} ({} chars)", reply.id, reply.text.chars().count());

            reply
        });

        exchange.await.map_err(|e| {
            tracing::error!("Assistant exchange task failed: {}", e);
            ConversationError::Interrupted(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::prompts::{MISSING_API_KEY, REQUEST_FAILED};
    use crate::assistant::service::tests::ScriptedProvider;
    use crate::assistant::session::{ChatConfig, ChatProvider, ChatSession};
    use crate::assistant::AssistantError;
    use crate::models::chat::Role;
    use async_trait::async_trait;
    use tokio::sync::Notify;

    fn conversation(provider: Arc<dyn ChatProvider>) -> Conversation {
        Conversation::new(Arc::new(AssistantService::new(
            Some(provider),
            ChatConfig::project_assistant("gemini-2.5-flash"),
        )))
    }

    #[tokio::test]
    async fn test_starts_with_greeting() {
        let conv = Conversation::new(Arc::new(AssistantService::gemini(None, "gemini-2.5-flash")));
        let messages = conv.messages().await;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::Model);
        assert_eq!(messages[0].text, GREETING);
        assert!(!conv.is_loading());
    }

    #[tokio::test]
    async fn test_blank_input_appends_nothing() {
        let conv = Conversation::new(Arc::new(AssistantService::gemini(None, "gemini-2.5-flash")));
        assert!(matches!(conv.submit("").await, Err(ConversationError::EmptyMessage)));
        assert!(matches!(conv.submit("  \n\t ").await, Err(ConversationError::EmptyMessage)));
        assert_eq!(conv.messages().await.len(), 1);
    }

    #[tokio::test]
    async fn test_unet_question_scenario() {
        let provider = Arc::new(ScriptedProvider::with_replies(vec![Ok(
            "U-Net 是一种对称的编码器-解码器结构，带有跳跃连接。",
        )]));
        let conv = conversation(provider);

        let reply = conv.submit("什么是U-Net？").await.unwrap();

        let messages = conv.messages().await;
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].text, GREETING);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].text, "什么是U-Net？");
        assert_eq!(messages[2].role, Role::Model);
        assert_eq!(messages[2], reply);
        assert!(reply.text.starts_with("U-Net"));
        assert!(!conv.is_loading());
    }

    #[tokio::test]
    async fn test_remote_failure_becomes_apology_message() {
        let provider = Arc::new(ScriptedProvider::with_replies(vec![Err("connection reset")]));
        let conv = conversation(provider);

        let reply = conv.submit("你好").await.unwrap();
        assert_eq!(reply.text, REQUEST_FAILED);
        assert_eq!(conv.messages().await.len(), 3);
        assert!(conv.assistant().has_session().await);
    }

    #[tokio::test]
    async fn test_without_key_transcript_shows_instruction() {
        let conv = Conversation::new(Arc::new(AssistantService::gemini(None, "gemini-2.5-flash")));
        let reply = conv.submit("你好").await.unwrap();
        assert_eq!(reply.text, MISSING_API_KEY);
    }

    /// Holds every reply until released.
    struct GatedProvider {
        gate: Arc<Notify>,
    }

    struct GatedSession {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl ChatSession for GatedSession {
        async fn send_message(&mut self, text: &str) -> Result<String, AssistantError> {
            self.gate.notified().await;
            Ok(format!("echo: {}", text))
        }
    }

    #[async_trait]
    impl ChatProvider for GatedProvider {
        async fn start_chat(&self, _config: &ChatConfig) -> Result<Box<dyn ChatSession>, AssistantError> {
            Ok(Box::new(GatedSession { gate: self.gate.clone() }))
        }
    }

    #[tokio::test]
    async fn test_second_submit_while_pending_is_rejected() {
        let gate = Arc::new(Notify::new());
        let conv = Arc::new(conversation(Arc::new(GatedProvider { gate: gate.clone() })));

        let pending = {
            let conv = conv.clone();
            tokio::spawn(async move { conv.submit("first").await })
        };
        while !conv.is_loading() {
            tokio::task::yield_now().await;
        }

        assert!(matches!(conv.submit("second").await, Err(ConversationError::Busy)));

        gate.notify_one();
        let reply = pending.await.unwrap().unwrap();
        assert_eq!(reply.text, "echo: first");
        assert!(!conv.is_loading());

        let texts: Vec<String> = conv.messages().await.into_iter().map(|m| m.text).collect();
        assert_eq!(texts, vec![GREETING.to_string(), "first".to_string(), "echo: first".to_string()]);
    }

    #[tokio::test]
    async fn test_dropped_caller_still_gets_reply_appended() {
        let gate = Arc::new(Notify::new());
        let conv = Arc::new(conversation(Arc::new(GatedProvider { gate: gate.clone() })));

        let caller = {
            let conv = conv.clone();
            tokio::spawn(async move { conv.submit("什么是U-Net？").await })
        };
        while !conv.is_loading() {
            tokio::task::yield_now().await;
        }
        caller.abort();
        assert!(caller.await.unwrap_err().is_cancelled());
        assert!(conv.is_loading());

        gate.notify_one();
        while conv.is_loading() {
            tokio::task::yield_now().await;
        }

        let messages = conv.messages().await;
        let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::Model, Role::User, Role::Model]);
        assert_eq!(messages[2].text, "echo: 什么是U-Net？");
    }
}
