//! Media search and extraction.
//!
//! The search/extraction backend is reached only through the [`MediaExtractor`]
//! trait. [`YtDlpExtractor`] is the production implementation.

mod ytdlp;

pub use ytdlp::YtDlpExtractor;

use crate::error::{Result, VofoError};
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// One candidate returned by a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Backend identifier of the media.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Canonical page URL, used for further extraction.
    pub source_url: String,
}

/// What gets handed to the chat transport for a single delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryPayload {
    /// Remote, time-limited playable URL.
    Stream { playable_url: String, title: String },
    /// Locally transcoded file.
    File { path: PathBuf, title: String },
}

impl DeliveryPayload {
    pub fn title(&self) -> &str {
        match self {
            DeliveryPayload::Stream { title, .. } | DeliveryPayload::File { title, .. } => title,
        }
    }
}

/// Outcome of a collaborator lookup.
#[derive(Debug)]
pub enum Lookup<T> {
    Found(T),
    Empty,
    Failed(VofoError),
}

impl<T> Lookup<T> {
    /// Keep only the first entry of an ordered result set.
    pub fn first_of(result: Result<Vec<T>>) -> Self {
        match result {
            Ok(items) => items.into_iter().next().into(),
            Err(e) => Lookup::Failed(e),
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Lookup::Found(v),
            None => Lookup::Empty,
        }
    }
}

impl<T> From<Result<Option<T>>> for Lookup<T> {
    fn from(result: Result<Option<T>>) -> Self {
        match result {
            Ok(value) => value.into(),
            Err(e) => Lookup::Failed(e),
        }
    }
}

/// Search/extraction collaborator.
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Search for up to `limit` candidates, in backend order.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>>;

    /// Resolve a page URL to a direct best-audio URL without downloading.
    async fn stream_url(&self, source_url: &str) -> Result<Option<String>>;

    /// Fetch and transcode audio into `dest_dir`, returning the file path.
    async fn download_audio(&self, source_url: &str, dest_dir: &Path) -> Result<PathBuf>;

    /// Canonical page URL for a media id.
    fn watch_url(&self, id: &str) -> String;
}

fn media_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("Invalid regex"))
}

/// Whether `id` is safe to splice into a canonical media URL.
pub fn is_valid_media_id(id: &str) -> bool {
    media_id_regex().is_match(id)
}
