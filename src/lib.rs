//! VoFo - music search bot and web front end
//!
//! Takes a free-text query from a Telegram chat or an HTTP request, asks
//! yt-dlp for matching media, and hands back the first audio result.
//!
//! # Architecture
//!
//! - `config` - Settings, loaded once and passed explicitly
//! - `media` - Search results, delivery payloads, the extractor trait and its yt-dlp implementation
//! - `chat` - Transport-agnostic chat workflow and receive loop
//! - `telegram` - teloxide transport and long-polling update source
//! - `server` - axum HTTP service
//! - `playback` - Optional local playback of downloaded audio
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vofo::config::Settings;
//! use vofo::media::YtDlpExtractor;
//! use vofo::server::{self, AppState};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Arc::new(Settings::load()?);
//!     let extractor = Arc::new(YtDlpExtractor::new(settings.extractor.clone()));
//!
//!     let listener = server::bind(&settings).await?;
//!     server::serve(listener, Arc::new(AppState::new(settings, extractor))).await?;
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod media;
pub mod playback;
pub mod server;
pub mod telegram;

pub use error::{Result, VofoError};
