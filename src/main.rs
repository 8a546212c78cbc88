//! VoFo entry point.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vofo::cli::{commands, Cli, Commands};
use vofo::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.as_ref().map(PathBuf::from);
    let mut settings = Settings::load_from(config_path.as_ref())?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("vofo={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Ensure the scratch directory exists
    std::fs::create_dir_all(settings.scratch_dir())?;

    match cli.command.unwrap_or_default() {
        Commands::Run { host, port } => {
            apply_listen_overrides(&mut settings, host, port);
            commands::run_all(Arc::new(settings)).await?;
        }

        Commands::Bot => {
            commands::run_bot(Arc::new(settings)).await?;
        }

        Commands::Serve { host, port } => {
            apply_listen_overrides(&mut settings, host, port);
            commands::run_serve(Arc::new(settings)).await?;
        }

        Commands::Search { query, limit } => {
            commands::run_search(&query, limit, &settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, &settings, config_path.as_ref())?;
        }
    }

    Ok(())
}

fn apply_listen_overrides(settings: &mut Settings, host: Option<String>, port: Option<u16>) {
    if let Some(host) = host {
        settings.server.host = host;
    }
    if let Some(port) = port {
        settings.server.port = port;
    }
}
