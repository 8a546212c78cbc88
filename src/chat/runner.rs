//! Bot receive loop.

use super::messages;
use super::{ChatTransport, ChatUpdate, ChatWorkflow, UpdateSource};
use tracing::{debug, error, info};

/// Slash commands the bot understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Help,
    /// Any other command. Ignored, never treated as a search.
    Other(String),
}

impl BotCommand {
    /// Parse a message as a command. Returns `None` for plain text.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if !text.starts_with('/') {
            return None;
        }

        let command = text.split_whitespace().next().unwrap_or(text);
        // Strip @bot_username suffix (e.g. /start@vofo_bot)
        let command = command.split('@').next().unwrap_or(command);

        Some(match command {
            "/start" => BotCommand::Start,
            "/help" => BotCommand::Help,
            other => BotCommand::Other(other.to_string()),
        })
    }
}

/// Process updates one at a time until the source closes.
///
/// Returns the number of updates processed.
pub async fn process_updates<S>(source: &mut S, transport: &dyn ChatTransport, workflow: &ChatWorkflow) -> usize
where
    S: UpdateSource + ?Sized,
{
    info!(strategy = %workflow.strategy(), "Bot receive loop started");

    let mut processed = 0;
    while let Some(update) = source.receive().await {
        dispatch(&update, transport, workflow).await;
        processed += 1;
    }

    info!(processed, "Update source closed");
    processed
}

async fn dispatch(update: &ChatUpdate, transport: &dyn ChatTransport, workflow: &ChatWorkflow) {
    match BotCommand::parse(&update.text) {
        Some(BotCommand::Start) | Some(BotCommand::Help) => {
            if let Err(e) = transport.send_text(update.chat_id, messages::WELCOME).await {
                error!(chat_id = update.chat_id, error = %e, "Failed to send welcome");
            }
        }
        Some(BotCommand::Other(command)) => {
            debug!(chat_id = update.chat_id, %command, "Ignoring unknown command");
        }
        None => {
            let report = workflow.handle(transport, update).await;
            debug!(chat_id = update.chat_id, ?report, "Request finished");
        }
    }
}
