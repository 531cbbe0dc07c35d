// src/pipeline.rs
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::RepoConfig;
use crate::error::ResolveError;
use crate::history::HistoryService;
use crate::listing::{filter_candidates, ListingSource};
use crate::render::RenderSink;
use crate::selector::{LatestFileSelector, Resolution};

/// One full pass: fetch listing, filter, resolve, render.
///
/// The sink gets exactly one final call. Fatal errors are rendered as a
/// user-facing message and also returned to the caller.
pub async fn run(
    listing: &dyn ListingSource,
    history: Arc<dyn HistoryService>,
    sink: &dyn RenderSink,
    cfg: &RepoConfig,
) -> Result<Resolution, ResolveError> {
    match resolve(listing, history, sink, cfg).await {
        Ok(res) => {
            sink.render(&res.file);
            Ok(res)
        }
        Err(e) => {
            warn!(error = %e, "resolution failed");
            sink.error(&e.user_message());
            Err(e)
        }
    }
}

async fn resolve(
    listing: &dyn ListingSource,
    history: Arc<dyn HistoryService>,
    sink: &dyn RenderSink,
    cfg: &RepoConfig,
) -> Result<Resolution, ResolveError> {
    let entries = listing.list().await?;
    let candidates = filter_candidates(entries, &cfg.extensions);
    info!(candidates = candidates.len(), dir = %cfg.dir, "candidates after extension filter");

    let no_files = || ResolveError::NoEligibleFiles {
        dir: cfg.dir.clone(),
    };
    if candidates.is_empty() {
        return Err(no_files());
    }

    LatestFileSelector::new(history)
        .select_observed(&candidates, Some(sink))
        .await
        .ok_or_else(no_files)
}
