//! Query resolution and delivery for a single chat message.

use super::messages;
use super::{ChatTransport, ChatUpdate, MessageRef};
use crate::config::{DeliveryStrategy, Settings};
use crate::error::Result;
use crate::media::{DeliveryPayload, Lookup, MediaExtractor, SearchResult};
use crate::playback::LocalPlayer;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// How a single request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowReport {
    /// Blank query, nothing searched.
    Rejected,
    /// The search returned no candidates.
    NotFound,
    /// The candidate had no playable audio URL.
    MissingStream,
    /// Audio was sent.
    Delivered { title: String },
    /// A collaborator or transport call failed.
    Failed,
}

/// Turns a text query into one delivered audio result.
pub struct ChatWorkflow {
    extractor: Arc<dyn MediaExtractor>,
    player: Arc<dyn LocalPlayer>,
    strategy: DeliveryStrategy,
    search_limit: usize,
    scratch_dir: PathBuf,
    keep_downloads: bool,
}

impl ChatWorkflow {
    pub fn new(
        settings: &Settings,
        extractor: Arc<dyn MediaExtractor>,
        player: Arc<dyn LocalPlayer>,
    ) -> Self {
        Self {
            extractor,
            player,
            strategy: settings.bot.delivery,
            search_limit: settings.extractor.search_limit,
            scratch_dir: settings.scratch_dir(),
            keep_downloads: settings.bot.keep_downloads,
        }
    }

    pub fn strategy(&self) -> DeliveryStrategy {
        self.strategy
    }

    /// Handle one text message end to end. Never returns an error: every
    /// failure is reported to the conversation and logged.
    pub async fn handle(&self, transport: &dyn ChatTransport, update: &ChatUpdate) -> WorkflowReport {
        let query = update.text.trim();

        if query.is_empty() {
            if let Err(e) = transport.send_text(update.chat_id, messages::INVALID_QUERY).await {
                error!(chat_id = update.chat_id, error = %e, "Failed to send rejection");
            }
            return WorkflowReport::Rejected;
        }

        let status = match transport
            .send_text(update.chat_id, &messages::searching(query))
            .await
        {
            Ok(status) => status,
            Err(e) => {
                error!(chat_id = update.chat_id, error = %e, "Failed to send status message");
                return WorkflowReport::Failed;
            }
        };

        match self.resolve_and_deliver(transport, update.chat_id, query, &status).await {
            Ok(report) => report,
            Err(e) => {
                error!(chat_id = update.chat_id, %query, error = %e, "Chat request failed");
                edit_status(transport, &status, messages::FAILURE).await;
                WorkflowReport::Failed
            }
        }
    }

    async fn resolve_and_deliver(
        &self,
        transport: &dyn ChatTransport,
        chat_id: i64,
        query: &str,
        status: &MessageRef,
    ) -> Result<WorkflowReport> {
        let candidate = match Lookup::first_of(self.extractor.search(query, self.search_limit).await) {
            Lookup::Found(candidate) => candidate,
            Lookup::Empty => {
                info!(chat_id, %query, "No results");
                edit_status(transport, status, &messages::not_found(query)).await;
                return Ok(WorkflowReport::NotFound);
            }
            Lookup::Failed(e) => return Err(e),
        };

        debug!(id = %candidate.id, title = %candidate.title, "Selected first candidate");

        transport
            .edit_text(status, &messages::fetching(self.strategy, &candidate.title))
            .await?;

        let (payload, job_dir) = match self.strategy {
            DeliveryStrategy::Stream => {
                match Lookup::from(self.extractor.stream_url(&candidate.source_url).await) {
                    Lookup::Found(playable_url) => (
                        DeliveryPayload::Stream {
                            playable_url,
                            title: candidate.title.clone(),
                        },
                        None,
                    ),
                    Lookup::Empty => {
                        warn!(id = %candidate.id, "No playable audio URL");
                        edit_status(transport, status, messages::MISSING_STREAM).await;
                        return Ok(WorkflowReport::MissingStream);
                    }
                    Lookup::Failed(e) => return Err(e),
                }
            }
            DeliveryStrategy::Download => {
                let (payload, dir) = self.download(&candidate).await?;
                (payload, Some(dir))
            }
        };

        let title = payload.title().to_string();
        let sent = transport
            .send_audio(chat_id, &payload, &messages::caption(self.strategy, &title))
            .await;

        if let (DeliveryPayload::File { path, .. }, Some(dir)) = (&payload, &job_dir) {
            let playing = sent.is_ok() && self.play_locally(path).await;
            if !playing {
                self.discard(dir).await;
            }
        }
        sent?;

        edit_status(transport, status, &messages::done(self.strategy, &title)).await;
        Ok(WorkflowReport::Delivered { title })
    }

    /// Download into a fresh directory under the scratch root. Returns the
    /// payload and the directory that owns it.
    async fn download(&self, candidate: &SearchResult) -> Result<(DeliveryPayload, PathBuf)> {
        let dest = self.scratch_dir.join(Uuid::new_v4().to_string());

        match self.extractor.download_audio(&candidate.source_url, &dest).await {
            Ok(path) => Ok((
                DeliveryPayload::File {
                    path,
                    title: candidate.title.clone(),
                },
                dest,
            )),
            Err(e) => {
                let _ = tokio::fs::remove_dir_all(&dest).await;
                Err(e)
            }
        }
    }

    /// Hand a delivered file to the local player. Returns whether playback started.
    async fn play_locally(&self, path: &Path) -> bool {
        if !self.player.is_enabled() {
            return false;
        }
        match self.player.play(path).await {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Local playback unavailable");
                false
            }
        }
    }

    /// Remove a per-download directory unless downloads are kept.
    async fn discard(&self, dir: &Path) {
        if self.keep_downloads {
            return;
        }

        if let Err(e) = tokio::fs::remove_dir_all(dir).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %dir.display(), error = %e, "Failed to remove scratch directory");
            }
        }
    }
}

async fn edit_status(transport: &dyn ChatTransport, status: &MessageRef, text: &str) {
    if let Err(e) = transport.edit_text(status, text).await {
        error!(message_id = status.message_id, error = %e, "Failed to edit status message");
    }
}
