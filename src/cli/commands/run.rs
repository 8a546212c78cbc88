//! Run command - HTTP service in the background, chat bot in the foreground.

use super::bot::start_bot;
use super::serve::print_endpoints;
use crate::cli::preflight::{self, Operation};
use crate::config::Settings;
use crate::media::{MediaExtractor, YtDlpExtractor};
use crate::server::{self, AppState};
use anyhow::Result;
use std::sync::Arc;
use tracing::error;

/// Run both components.
pub async fn run_all(settings: Arc<Settings>) -> Result<()> {
    preflight::check(Operation::Run, &settings)?;

    let extractor: Arc<dyn MediaExtractor> =
        Arc::new(YtDlpExtractor::new(settings.extractor.clone()));

    let listener = server::bind(&settings).await?;
    print_endpoints(&settings);

    let state = Arc::new(AppState::new(settings.clone(), extractor.clone()));
    let http = tokio::spawn(async move {
        if let Err(e) = server::serve(listener, state).await {
            error!(error = %e, "HTTP service stopped");
        }
    });

    let result = start_bot(&settings, extractor).await;
    http.abort();
    result
}
