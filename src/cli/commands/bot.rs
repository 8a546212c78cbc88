//! Bot command - run the chat bot in the foreground.

use crate::chat::{process_updates, ChatWorkflow};
use crate::cli::preflight::{self, Operation};
use crate::config::Settings;
use crate::media::{MediaExtractor, YtDlpExtractor};
use crate::playback::player_from_settings;
use crate::telegram::{self, TelegramTransport, TelegramUpdates};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Pending updates buffered between the poller and the workflow.
const UPDATE_BUFFER: usize = 64;

/// Run the bot command.
pub async fn run_bot(settings: Arc<Settings>) -> Result<()> {
    preflight::check(Operation::Bot, &settings)?;

    let extractor: Arc<dyn MediaExtractor> =
        Arc::new(YtDlpExtractor::new(settings.extractor.clone()));
    start_bot(&settings, extractor).await
}

/// Reset the webhook, start polling, and process updates until shutdown.
pub(crate) async fn start_bot(settings: &Settings, extractor: Arc<dyn MediaExtractor>) -> Result<()> {
    let transport = TelegramTransport::from_token(settings.bot_token()?);
    telegram::reset_webhook(transport.bot()).await?;

    let player = player_from_settings(&settings.playback);
    let workflow = ChatWorkflow::new(settings, extractor, player);

    let mut updates = TelegramUpdates::spawn(transport.bot().clone(), UPDATE_BUFFER);
    info!(delivery = %settings.bot.delivery, "Telegram bot running with polling");

    process_updates(&mut updates, &transport, &workflow).await;
    Ok(())
}
