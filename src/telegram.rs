//! Telegram transport built on teloxide.

use crate::chat::{ChatTransport, ChatUpdate, MessageRef, UpdateSource};
use crate::error::{Result, VofoError};
use crate::media::DeliveryPayload;
use async_trait::async_trait;
use teloxide::{
    payloads::{DeleteWebhookSetters, SendAudioSetters},
    prelude::*,
    types::{ChatId, InputFile, Message as TelegramMessage, MessageId},
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

fn transport_error(e: teloxide::RequestError) -> VofoError {
    VofoError::Transport(e.to_string())
}

/// Clear any registered webhook so long polling does not conflict with it.
pub async fn reset_webhook(bot: &Bot) -> Result<()> {
    bot.delete_webhook()
        .drop_pending_updates(true)
        .await
        .map_err(transport_error)?;
    info!("Bot webhook reset");
    Ok(())
}

/// Outbound Telegram calls.
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub fn from_token(token: &str) -> Self {
        Self::new(Bot::new(token))
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

/// Build the attachment for a payload: a remote URL or a local file.
fn input_file(payload: &DeliveryPayload) -> Result<InputFile> {
    match payload {
        DeliveryPayload::Stream { playable_url, .. } => {
            let url: url::Url = playable_url.parse().map_err(|e| {
                VofoError::InvalidInput(format!("Bad playable URL: {}", e))
            })?;
            Ok(InputFile::url(url))
        }
        DeliveryPayload::File { path, .. } => {
            if !path.is_file() {
                return Err(VofoError::Download(format!("Missing audio file: {}", path.display())));
            }
            Ok(InputFile::file(path.clone()))
        }
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<MessageRef> {
        let sent = self
            .bot
            .send_message(ChatId(chat_id), text)
            .await
            .map_err(transport_error)?;

        Ok(MessageRef {
            chat_id,
            message_id: sent.id.0,
        })
    }

    async fn edit_text(&self, message: &MessageRef, text: &str) -> Result<()> {
        self.bot
            .edit_message_text(ChatId(message.chat_id), MessageId(message.message_id), text)
            .await
            .map_err(transport_error)?;
        Ok(())
    }

    async fn send_audio(&self, chat_id: i64, payload: &DeliveryPayload, caption: &str) -> Result<()> {
        let file = input_file(payload)?;

        self.bot
            .send_audio(ChatId(chat_id), file)
            .caption(caption)
            .title(payload.title())
            .await
            .map_err(transport_error)?;
        Ok(())
    }
}

fn to_update(msg: &TelegramMessage) -> Option<ChatUpdate> {
    msg.text().map(|text| ChatUpdate::new(msg.chat.id.0, text))
}

/// Long-polling update source.
///
/// A teloxide dispatcher runs in a background task and forwards text messages
/// into a channel; [`UpdateSource::receive`] drains it.
pub struct TelegramUpdates {
    rx: mpsc::Receiver<ChatUpdate>,
    dispatcher: JoinHandle<()>,
}

impl TelegramUpdates {
    /// Start polling. Call [`reset_webhook`] first.
    pub fn spawn(bot: Bot, buffer: usize) -> Self {
        let (tx, rx) = mpsc::channel(buffer.max(1));

        let handler = Update::filter_message().endpoint(move |msg: TelegramMessage| {
            let tx = tx.clone();
            async move {
                match to_update(&msg) {
                    Some(update) => {
                        if tx.send(update).await.is_err() {
                            warn!("Update receiver dropped");
                        }
                    }
                    None => debug!(chat_id = msg.chat.id.0, "Ignoring non-text message"),
                }
                respond(())
            }
        });

        let dispatcher = tokio::spawn(async move {
            Dispatcher::builder(bot, handler)
                .default_handler(|_| async {})
                .enable_ctrlc_handler()
                .build()
                .dispatch()
                .await;
            info!("Telegram dispatcher stopped");
        });

        Self { rx, dispatcher }
    }
}

impl Drop for TelegramUpdates {
    fn drop(&mut self) {
        self.dispatcher.abort();
    }
}

#[async_trait]
impl UpdateSource for TelegramUpdates {
    async fn receive(&mut self) -> Option<ChatUpdate> {
        self.rx.recv().await
    }
}
