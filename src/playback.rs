//! Optional local playback of downloaded audio on the host machine.
//!
//! Servers normally run without audio hardware, so the default player does
//! nothing. Enabling playback is a configuration choice.

use crate::config::PlaybackSettings;
use crate::error::{Result, VofoError};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, warn};

/// Plays a local audio file.
#[async_trait]
pub trait LocalPlayer: Send + Sync {
    /// Whether this player actually does anything.
    fn is_enabled(&self) -> bool;

    /// Start playback. Returns once playback has been started, not finished.
    async fn play(&self, path: &Path) -> Result<()>;
}

/// Player for hosts without audio output.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPlayer;

#[async_trait]
impl LocalPlayer for NoopPlayer {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn play(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

/// Spawns an external player process per file.
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    command: String,
    args: Vec<String>,
}

impl CommandPlayer {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }
}

#[async_trait]
impl LocalPlayer for CommandPlayer {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn play(&self, path: &Path) -> Result<()> {
        let mut child = Command::new(&self.command)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    VofoError::ToolNotFound(self.command.clone())
                } else {
                    VofoError::Playback(format!("{}: {}", self.command, e))
                }
            })?;

        let command = self.command.clone();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => debug!(player = %command, "Playback finished"),
                Ok(status) => warn!(player = %command, %status, "Player exited with failure"),
                Err(e) => warn!(player = %command, error = %e, "Player wait failed"),
            }
        });

        Ok(())
    }
}

/// Pick the player the settings ask for.
pub fn player_from_settings(settings: &PlaybackSettings) -> Arc<dyn LocalPlayer> {
    if settings.enabled {
        Arc::new(CommandPlayer::new(settings.command.clone(), settings.args.clone()))
    } else {
        Arc::new(NoopPlayer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_player_from_settings() {
        let disabled = player_from_settings(&PlaybackSettings::default());
        assert!(!disabled.is_enabled());

        let enabled = player_from_settings(&PlaybackSettings {
            enabled: true,
            ..PlaybackSettings::default()
        });
        assert!(enabled.is_enabled());
    }

    #[tokio::test]
    async fn test_noop_player_succeeds() {
        assert_ok!(NoopPlayer.play(Path::new("/nonexistent.mp3")).await);
    }

    #[tokio::test]
    async fn test_missing_player_binary() {
        let player = CommandPlayer::new("vofo-no-such-player", vec![]);
        let result = player.play(Path::new("/tmp/a.mp3")).await;
        assert_err!(&result);
        assert!(matches!(result, Err(VofoError::ToolNotFound(_))));
    }
}
