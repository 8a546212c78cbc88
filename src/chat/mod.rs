//! Conversational front end.
//!
//! The workflow talks to the messaging platform only through
//! [`ChatTransport`] and receives work through [`UpdateSource`], so it can be
//! driven entirely in-process.

pub mod messages;
mod runner;
mod workflow;

pub use runner::{process_updates, BotCommand};
pub use workflow::{ChatWorkflow, WorkflowReport};

use crate::error::Result;
use crate::media::DeliveryPayload;
use async_trait::async_trait;

/// An incoming text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatUpdate {
    pub chat_id: i64,
    pub text: String,
}

impl ChatUpdate {
    pub fn new(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
        }
    }
}

/// Handle to a message the bot sent earlier, so it can be edited in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    pub chat_id: i64,
    pub message_id: i32,
}

/// Outbound side of the messaging platform.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send a new text message.
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<MessageRef>;

    /// Replace the text of an earlier message.
    async fn edit_text(&self, message: &MessageRef, text: &str) -> Result<()>;

    /// Send an audio attachment backed by a URL or a local file.
    async fn send_audio(&self, chat_id: i64, payload: &DeliveryPayload, caption: &str) -> Result<()>;
}

/// Inbound side of the messaging platform.
#[async_trait]
pub trait UpdateSource: Send {
    /// Next update, or `None` once the source is closed.
    async fn receive(&mut self) -> Option<ChatUpdate>;
}
