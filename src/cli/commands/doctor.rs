//! Doctor command - verify system requirements and configuration.

use crate::cli::Output;
use crate::config::{DeliveryStrategy, Settings};
use console::style;
use std::path::Path;
use std::process::Command;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("VoFo Doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("External Tools").bold());
    let mut tool_checks = vec![
        check_tool(&settings.extractor.binary, "--version", install_hint_ytdlp(), true),
        check_tool(
            "ffmpeg",
            "-version",
            install_hint_ffmpeg(),
            settings.bot.delivery == DeliveryStrategy::Download,
        ),
    ];
    if settings.playback.enabled {
        tool_checks.push(check_tool(
            &settings.playback.command,
            "-version",
            "Install a command-line audio player or set playback.enabled = false",
            false,
        ));
    }
    for check in &tool_checks {
        check.print();
    }
    checks.extend(tool_checks);

    println!();

    println!("{}", style("Bot Configuration").bold());
    let token_check = check_bot_token(settings);
    token_check.print();
    checks.push(token_check);
    let delivery = CheckResult::ok("Delivery", &settings.bot.delivery.to_string());
    delivery.print();
    checks.push(delivery);

    println!();

    println!("{}", style("Directories").bold());
    let dir_checks = vec![
        check_scratch_dir(&settings.scratch_dir()),
        check_static_dir(&settings.static_dir()),
    ];
    for check in &dir_checks {
        check.print();
    }
    checks.extend(dir_checks);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before starting VoFo.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! VoFo is ready to run.");
    }

    Ok(())
}

/// Check if an external tool is available. Missing optional tools only warn.
fn check_tool(name: &str, version_arg: &str, hint: &str, required: bool) -> CheckResult {
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or("installed")
                .trim()
                .to_string();

            let version_display: String = if version.chars().count() > 50 {
                format!("{}...", version.chars().take(50).collect::<String>())
            } else {
                version
            };

            CheckResult::ok(name, &version_display)
        }
        Ok(_) => CheckResult::error(name, "installed but not working", hint),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && required => {
            CheckResult::error(name, "not found", hint)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            CheckResult::warning(name, "not found (only needed for downloads/playback)", hint)
        }
        Err(e) => CheckResult::error(name, &format!("error: {}", e), hint),
    }
}

fn check_bot_token(settings: &Settings) -> CheckResult {
    match settings.bot_token() {
        Ok(token) => CheckResult::ok("BOT_TOKEN", &format!("configured ({})", mask_token(token))),
        Err(_) => CheckResult::error(
            "BOT_TOKEN",
            "not set",
            "Set with: export BOT_TOKEN='123456:ABC...' (the HTTP service runs without it)",
        ),
    }
}

/// Show only the bot id part of a token.
fn mask_token(token: &str) -> String {
    match token.split_once(':') {
        Some((bot_id, _)) => format!("{}:***", bot_id),
        None => "***".to_string(),
    }
}

fn check_scratch_dir(dir: &Path) -> CheckResult {
    if dir.is_dir() {
        CheckResult::ok("Scratch directory", &format!("{}", dir.display()))
    } else {
        CheckResult::warning(
            "Scratch directory",
            &format!("{} (will be created)", dir.display()),
            "Directory is created at startup",
        )
    }
}

fn check_static_dir(dir: &Path) -> CheckResult {
    let index = dir.join("index.html");
    if index.is_file() {
        CheckResult::ok("Front end", &format!("{}", index.display()))
    } else {
        CheckResult::warning(
            "Front end",
            &format!("{} not found", index.display()),
            "Set server.static_dir to the directory holding index.html",
        )
    }
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: vofo config init",
        )
    }
}

/// Platform-specific install hint for yt-dlp.
fn install_hint_ytdlp() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install yt-dlp"
    } else if cfg!(target_os = "linux") {
        "Install with: pip install yt-dlp (or your package manager)"
    } else {
        "Install from: https://github.com/yt-dlp/yt-dlp"
    }
}

/// Platform-specific install hint for ffmpeg.
fn install_hint_ffmpeg() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install ffmpeg"
    } else if cfg!(target_os = "linux") {
        "Install with: sudo apt install ffmpeg (or your package manager)"
    } else {
        "Install from: https://ffmpeg.org/download.html"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("123456:ABCdefSecret"), "123456:***");
        assert_eq!(mask_token("garbage"), "***");
    }

    #[test]
    fn test_optional_tool_only_warns() {
        let optional = check_tool("vofo-missing-tool", "--version", "hint", false);
        assert_eq!(optional.status, CheckStatus::Warning);

        let required = check_tool("vofo-missing-tool", "--version", "hint", true);
        assert_eq!(required.status, CheckStatus::Error);
    }

    #[test]
    fn test_token_check() {
        let mut settings = Settings::default();
        assert_eq!(check_bot_token(&settings).status, CheckStatus::Error);

        settings.bot.token = Some("42:secret".to_string());
        let check = check_bot_token(&settings);
        assert_eq!(check.status, CheckStatus::Ok);
        assert!(!check.message.contains("secret"));
    }

    #[test]
    fn test_static_dir_check() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(check_static_dir(dir.path()).status, CheckStatus::Warning);

        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        assert_eq!(check_static_dir(dir.path()).status, CheckStatus::Ok);
    }
}
