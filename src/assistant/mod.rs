// src/assistant/mod.rs
//! Project assistant: a Gemini chat session behind a transcript.

use thiserror::Error;

use crate::gemini_client::GeminiError;

pub mod conversation;
pub mod prompts;
pub mod service;
pub mod session;

pub use conversation::Conversation;
pub use service::AssistantService;
pub use session::{ChatConfig, ChatProvider, ChatSession, GeminiChatProvider};

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error(transparent)]
    Gemini(#[from] GeminiError),
    #[error("Chat session error: {0}")]
    Session(String),
}

#[derive(Error, Debug)]
pub enum ConversationError {
    #[error("Message is empty")]
    EmptyMessage,
    #[error("A reply is still pending")]
    Busy,
    #[error("Assistant exchange failed: {0}")]
    Interrupted(String),
}
