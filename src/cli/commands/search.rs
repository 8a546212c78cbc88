//! Search command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::media::{MediaExtractor, YtDlpExtractor};
use anyhow::Result;

/// Run the search command.
pub async fn run_search(query: &str, limit: Option<usize>, settings: &Settings) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        Output::warning("Please give a song name or artist.");
        return Ok(());
    }

    preflight::check(Operation::Search, settings)?;

    let extractor = YtDlpExtractor::new(settings.extractor.clone());
    let limit = limit.unwrap_or(settings.extractor.search_limit);

    let spinner = Output::spinner("Searching...");
    let results = extractor.search(query, limit).await;
    spinner.finish_and_clear();

    match results {
        Ok(results) if results.is_empty() => {
            Output::warning(&format!("No results found for '{}'", query));
        }
        Ok(results) => {
            Output::success(&format!("Found {} results", results.len()));
            for (i, result) in results.iter().enumerate() {
                Output::search_result(i + 1, &result.title, &result.id, &result.source_url);
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
