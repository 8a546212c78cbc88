//! Pre-flight checks before starting long-running components.
//!
//! Validates that required tools and configuration are available so a
//! misconfigured deployment fails at startup instead of on the first request.

use crate::config::{DeliveryStrategy, Settings};
use crate::error::{Result, VofoError};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Bot and HTTP service together.
    Run,
    /// Chat bot only: token, extractor, and ffmpeg for downloads.
    Bot,
    /// HTTP service only: extractor.
    Serve,
    /// Terminal search: extractor.
    Search,
}

impl Operation {
    fn needs_token(self) -> bool {
        matches!(self, Operation::Run | Operation::Bot)
    }

    fn runs_bot(self) -> bool {
        self.needs_token()
    }
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    if operation.needs_token() {
        settings.bot_token()?;
    }

    check_tool(&settings.extractor.binary)?;

    if operation.runs_bot() && settings.bot.delivery == DeliveryStrategy::Download {
        check_tool("ffmpeg")?;
    }

    Ok(())
}

/// Check if an external tool is available.
pub fn check_tool(name: &str) -> Result<()> {
    // ffmpeg-family tools use -version (single dash), others use --version
    let version_arg = match name {
        "ffmpeg" | "ffprobe" | "ffplay" => "-version",
        _ => "--version",
    };
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(VofoError::ToolFailed(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(VofoError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(VofoError::ToolFailed(format!("{} could not be started: {}", name, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_missing_binary() -> Settings {
        let mut settings = Settings::default();
        settings.extractor.binary = "vofo-missing-extractor".to_string();
        settings
    }

    #[test]
    fn test_bot_requires_token() {
        let settings = settings_with_missing_binary();
        assert!(matches!(
            check(Operation::Bot, &settings),
            Err(VofoError::Config(_))
        ));
        assert!(matches!(
            check(Operation::Run, &settings),
            Err(VofoError::Config(_))
        ));
    }

    #[test]
    fn test_serve_does_not_require_token() {
        let settings = settings_with_missing_binary();
        assert!(matches!(
            check(Operation::Serve, &settings),
            Err(VofoError::ToolNotFound(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_unrunnable_tool_is_tool_failed() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("not-executable");
        std::fs::write(&tool, "#!/bin/sh\n").unwrap();

        let err = check_tool(tool.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, VofoError::ToolFailed(_)));
    }

    #[test]
    fn test_missing_tool() {
        assert!(matches!(
            check_tool("vofo-missing-extractor"),
            Err(VofoError::ToolNotFound(_))
        ));
    }
}
