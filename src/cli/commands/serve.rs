//! Serve command - run the HTTP service in the foreground.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::media::YtDlpExtractor;
use crate::server::{self, AppState};
use anyhow::Result;
use std::sync::Arc;

/// Run the HTTP service.
pub async fn run_serve(settings: Arc<Settings>) -> Result<()> {
    preflight::check(Operation::Serve, &settings)?;

    let extractor = Arc::new(YtDlpExtractor::new(settings.extractor.clone()));
    let listener = server::bind(&settings).await?;

    print_endpoints(&settings);

    let state = Arc::new(AppState::new(settings, extractor));
    server::serve(listener, state).await?;

    Ok(())
}

pub(crate) fn print_endpoints(settings: &Settings) {
    Output::header("VoFo HTTP Service");
    println!();
    Output::success(&format!(
        "Listening on http://{}:{}",
        settings.server.host, settings.server.port
    ));
    println!();
    println!("Endpoints:");
    Output::kv("Front end", "GET  /");
    Output::kv("Search", "GET  /search?q=  |  POST /search (query=)");
    Output::kv("Stream", "GET  /api/stream/{id}");
    Output::kv("Health", "GET  /health");
    println!();
}
