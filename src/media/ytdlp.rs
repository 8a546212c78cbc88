//! yt-dlp backed extractor.

use super::{MediaExtractor, SearchResult};
use crate::config::ExtractorSettings;
use crate::error::{Result, VofoError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Extensions yt-dlp may leave behind after audio extraction.
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "m4a", "opus", "ogg", "aac", "flac", "wav", "webm"];

/// Drives the `yt-dlp` executable.
pub struct YtDlpExtractor {
    settings: ExtractorSettings,
}

impl YtDlpExtractor {
    pub fn new(settings: ExtractorSettings) -> Self {
        Self { settings }
    }

    /// Turn a free-text query into a yt-dlp input. URLs pass through untouched.
    fn search_target(query: &str, limit: usize) -> String {
        let query = query.trim();
        if query.starts_with("http://") || query.starts_with("https://") {
            query.to_string()
        } else {
            format!("ytsearch{}:{}", limit.max(1), query)
        }
    }

    async fn run(&self, args: &[&str]) -> Result<Output> {
        debug!(binary = %self.settings.binary, ?args, "Running extractor");

        Command::new(&self.settings.binary)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    VofoError::ToolNotFound(self.settings.binary.clone())
                } else {
                    VofoError::ToolFailed(format!("Failed to run {}: {}", self.settings.binary, e))
                }
            })
    }
}

impl Default for YtDlpExtractor {
    fn default() -> Self {
        Self::new(ExtractorSettings::default())
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let target = Self::search_target(query, limit);

        let output = self
            .run(&[
                "--dump-json",
                "--flat-playlist",
                "--no-warnings",
                "--ignore-errors",
                &target,
            ])
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() && stdout.trim().is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VofoError::Extraction(format!("Search failed: {}", stderr.trim())));
        }

        let results = parse_search_output(&stdout, &self.settings.watch_url_prefix, limit);
        info!(count = results.len(), "Search completed");
        Ok(results)
    }

    #[instrument(skip(self))]
    async fn stream_url(&self, source_url: &str) -> Result<Option<String>> {
        let output = self
            .run(&[
                "--dump-json",
                "--format",
                "bestaudio",
                "--no-playlist",
                "--no-warnings",
                source_url,
            ])
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VofoError::Extraction(format!(
                "Could not resolve audio for {}: {}",
                source_url,
                stderr.trim()
            )));
        }

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).map_err(|e| {
            VofoError::Extraction(format!("Failed to parse yt-dlp output: {}", e))
        })?;

        Ok(json["url"]
            .as_str()
            .filter(|u| !u.is_empty())
            .map(|u| u.to_string()))
    }

    #[instrument(skip(self, dest_dir))]
    async fn download_audio(&self, source_url: &str, dest_dir: &Path) -> Result<PathBuf> {
        tokio::fs::create_dir_all(dest_dir).await?;

        let template = dest_dir.join("%(title)s.%(ext)s");
        let template = template.to_str().ok_or_else(|| {
            VofoError::Download(format!("Non UTF-8 scratch path: {:?}", dest_dir))
        })?;

        info!("Downloading audio from {}", source_url);

        let output = self
            .run(&[
                "--format",
                "bestaudio/best",
                "--extract-audio",
                "--audio-format",
                &self.settings.audio_format,
                "--audio-quality",
                &self.settings.audio_quality,
                "--output",
                template,
                "--print",
                "after_move:filepath",
                "--no-playlist",
                "--no-warnings",
                "--quiet",
                source_url,
            ])
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VofoError::Download(format!("yt-dlp failed: {}", stderr.trim())));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let reported = stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(PathBuf::from)
            .filter(|p| p.exists());

        match reported {
            Some(path) => Ok(path),
            None => find_audio_file(dest_dir),
        }
    }

    fn watch_url(&self, id: &str) -> String {
        format!("{}{}", self.settings.watch_url_prefix, id)
    }
}

/// Parse line-delimited `--dump-json` output into search results.
///
/// Entries without an id are skipped; at most `limit` are returned.
pub(crate) fn parse_search_output(stdout: &str, watch_url_prefix: &str, limit: usize) -> Vec<SearchResult> {
    let mut results = Vec::new();

    for line in stdout.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let Ok(json) = serde_json::from_str::<serde_json::Value>(line) else {
            debug!("Skipping unparseable extractor line");
            continue;
        };

        let Some(id) = json["id"].as_str().filter(|s| !s.is_empty()) else {
            continue;
        };

        let title = json["title"]
            .as_str()
            .unwrap_or("Unknown Title")
            .to_string();

        let source_url = json["webpage_url"]
            .as_str()
            .or_else(|| json["url"].as_str())
            .filter(|u| u.starts_with("http"))
            .map(|u| u.to_string())
            .unwrap_or_else(|| format!("{}{}", watch_url_prefix, id));

        results.push(SearchResult {
            id: id.to_string(),
            title,
            source_url,
        });

        if results.len() >= limit {
            break;
        }
    }

    results
}

/// Locate the single audio file yt-dlp left in a fresh directory.
fn find_audio_file(dir: &Path) -> Result<PathBuf> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| VofoError::Download(format!("Cannot read directory: {e}")))?;

    for entry in entries.flatten() {
        let path = entry.path();
        let is_audio = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| AUDIO_EXTENSIONS.contains(&e.to_lowercase().as_str()));
        if is_audio {
            return Ok(path);
        }
    }

    Err(VofoError::Download("Audio file not found after download".into()))
}
