//! Configuration settings for VoFo.

use crate::error::{Result, VofoError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the bot access token.
pub const BOT_TOKEN_ENV: &str = "BOT_TOKEN";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub bot: BotSettings,
    pub server: ServerSettings,
    pub extractor: ExtractorSettings,
    pub playback: PlaybackSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Scratch directory for downloaded audio.
    pub scratch_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            scratch_dir: "./downloads".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// How the chat workflow hands audio to the user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStrategy {
    /// Send the remote playable URL, nothing touches local storage.
    #[default]
    Stream,
    /// Fetch and transcode to a local file, then upload it.
    Download,
}

impl std::str::FromStr for DeliveryStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stream" | "url" => Ok(DeliveryStrategy::Stream),
            "download" | "file" => Ok(DeliveryStrategy::Download),
            _ => Err(format!("Unknown delivery strategy: {}", s)),
        }
    }
}

impl std::fmt::Display for DeliveryStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryStrategy::Stream => write!(f, "stream"),
            DeliveryStrategy::Download => write!(f, "download"),
        }
    }
}

/// Chat bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotSettings {
    /// Bot access token. `BOT_TOKEN` in the environment takes precedence.
    pub token: Option<String>,
    /// Delivery strategy for chat requests.
    pub delivery: DeliveryStrategy,
    /// Keep downloaded files in the scratch directory after delivery.
    pub keep_downloads: bool,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            token: None,
            delivery: DeliveryStrategy::Stream,
            keep_downloads: false,
        }
    }
}

/// HTTP service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory holding `index.html` and other front-end assets.
    pub static_dir: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            static_dir: "./static".to_string(),
        }
    }
}

/// Search/extraction backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorSettings {
    /// yt-dlp executable name or path.
    pub binary: String,
    /// Number of candidates requested per search.
    pub search_limit: usize,
    /// Prefix joined with a media id to build its canonical URL.
    pub watch_url_prefix: String,
    /// Target audio format for downloads.
    pub audio_format: String,
    /// Target audio quality for downloads.
    pub audio_quality: String,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            binary: "yt-dlp".to_string(),
            search_limit: 10,
            watch_url_prefix: "https://www.youtube.com/watch?v=".to_string(),
            audio_format: "mp3".to_string(),
            audio_quality: "192K".to_string(),
        }
    }
}

/// Local playback settings (download strategy only).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Play downloaded audio on the host.
    pub enabled: bool,
    /// Player executable.
    pub command: String,
    /// Arguments passed before the file path.
    pub args: Vec<String>,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            command: "ffplay".to_string(),
            args: vec![
                "-nodisp".to_string(),
                "-autoexit".to_string(),
                "-loglevel".to_string(),
                "quiet".to_string(),
            ],
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    ///
    /// Environment overrides are applied after the file is read.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Apply environment overrides using the given lookup.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(BOT_TOKEN_ENV).filter(|t| !t.trim().is_empty()) {
            self.bot.token = Some(token.trim().to_string());
        }
    }

    /// The bot token. There is no built-in fallback.
    pub fn bot_token(&self) -> Result<&str> {
        self.bot
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                VofoError::Config(format!(
                    "{} not set. Set it with: export {}='123456:ABC...'",
                    BOT_TOKEN_ENV, BOT_TOKEN_ENV
                ))
            })
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| VofoError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Render as TOML with the token redacted.
    pub fn to_toml(&self) -> Result<String> {
        let mut redacted = self.clone();
        if redacted.bot.token.is_some() {
            redacted.bot.token = Some("<redacted>".to_string());
        }
        toml::to_string_pretty(&redacted).map_err(|e| VofoError::Config(e.to_string()))
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vofo")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded scratch directory path.
    pub fn scratch_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.scratch_dir)
    }

    /// Get the expanded static asset directory path.
    pub fn static_dir(&self) -> PathBuf {
        Self::expand_path(&self.server.static_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.extractor.search_limit, 10);
        assert_eq!(settings.bot.delivery, DeliveryStrategy::Stream);
        assert!(!settings.playback.enabled);
        assert!(settings.bot.token.is_none());
    }

    #[test]
    fn test_missing_token_is_an_error() {
        let settings = Settings::default();
        assert!(matches!(settings.bot_token(), Err(VofoError::Config(_))));
    }

    #[test]
    fn test_env_token_overrides_file() {
        let mut settings: Settings = toml::from_str(
            r#"
            [bot]
            token = "from-file"
            delivery = "download"
            "#,
        )
        .unwrap();
        assert_eq!(settings.bot.delivery, DeliveryStrategy::Download);

        settings.apply_env(|key| (key == BOT_TOKEN_ENV).then(|| "from-env".to_string()));
        assert_eq!(settings.bot_token().unwrap(), "from-env");
    }

    #[test]
    fn test_blank_env_token_ignored() {
        let mut settings = Settings::default();
        settings.apply_env(|_| Some("   ".to_string()));
        assert!(settings.bot_token().is_err());
    }

    #[test]
    fn test_delivery_strategy_parse() {
        assert_eq!("Stream".parse::<DeliveryStrategy>(), Ok(DeliveryStrategy::Stream));
        assert_eq!("file".parse::<DeliveryStrategy>(), Ok(DeliveryStrategy::Download));
        assert!("carrier-pigeon".parse::<DeliveryStrategy>().is_err());
        assert_eq!(DeliveryStrategy::Download.to_string(), "download");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: Settings = toml::from_str("[server]\nport = 9000\n").unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.extractor.binary, "yt-dlp");
    }

    #[test]
    fn test_to_toml_redacts_token() {
        let mut settings = Settings::default();
        settings.bot.token = Some("123:secret".to_string());
        let rendered = settings.to_toml().unwrap();
        assert!(!rendered.contains("123:secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.server.port = 9100;
        settings.bot.delivery = DeliveryStrategy::Download;
        settings.save_to(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let reloaded: Settings = toml::from_str(&content).unwrap();
        assert_eq!(reloaded.server.port, 9100);
        assert_eq!(reloaded.bot.delivery, DeliveryStrategy::Download);
    }

    #[test]
    fn test_saved_token_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut settings = Settings::default();
        settings.bot.token = Some("42:secret".to_string());
        settings.save_to(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let reloaded: Settings = toml::from_str(&content).unwrap();
        assert_eq!(reloaded.bot_token().unwrap(), "42:secret");
        assert!(!content.contains("<redacted>"));
    }
}
