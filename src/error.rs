//! Error types for VoFo.

use thiserror::Error;

/// Library-level error type for VoFo operations.
#[derive(Error, Debug)]
pub enum VofoError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Audio download failed: {0}")]
    Download(String),

    #[error("Chat transport error: {0}")]
    Transport(String),

    #[error("Local playback failed: {0}")]
    Playback(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("External tool failed: {0}")]
    ToolFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias for VoFo operations.
pub type Result<T> = std::result::Result<T, VofoError>;
