// src/selector.rs
//! Three-tier "latest file" resolution.
//!
//! Tiers run in a fixed order (filename timestamps, history timestamps,
//! declared size); the first tier that picks something decides. Every tier
//! breaks ties by listing order: the first candidate with the maximum key wins.

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use futures::FutureExt;
use metrics::counter;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::filename_date;
use crate::history::{HistoryDateResolver, HistoryService};
use crate::listing::CandidateFile;
use crate::render::RenderSink;

/// Which tier produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Filename,
    History,
    Size,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Filename => "filename",
            Tier::History => "history",
            Tier::Size => "size",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The chosen candidate plus the tier that chose it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub file: CandidateFile,
    pub tier: Tier,
}

/// One resolution stage. Returns an index into `candidates`, or `None` to defer
/// to the next stage.
#[async_trait]
pub trait TierStrategy: Send + Sync {
    fn tier(&self) -> Tier;

    /// Progress text shown before this tier starts, if it is slow.
    fn progress_note(&self) -> Option<&'static str> {
        None
    }

    async fn pick(&self, candidates: &[CandidateFile]) -> Option<usize>;
}

/// Index of the first maximum. A later equal key never replaces an earlier one.
fn first_max<K: Ord>(keyed: impl IntoIterator<Item = (usize, K)>) -> Option<usize> {
    let mut best: Option<(usize, K)> = None;
    for (idx, key) in keyed {
        let replace = match &best {
            Some((_, top)) => key > *top,
            None => true,
        };
        if replace {
            best = Some((idx, key));
        }
    }
    best.map(|(idx, _)| idx)
}

/// Tier 1: timestamps encoded in filenames.
pub struct FilenameTier;

#[async_trait]
impl TierStrategy for FilenameTier {
    fn tier(&self) -> Tier {
        Tier::Filename
    }

    async fn pick(&self, candidates: &[CandidateFile]) -> Option<usize> {
        first_max(
            candidates
                .iter()
                .enumerate()
                .filter_map(|(i, c)| filename_date::parse(&c.name).map(|ts| (i, ts))),
        )
    }
}

/// Tier 2: last-modified time from the history service, looked up for every
/// candidate concurrently. A failed lookup only removes that one candidate.
pub struct HistoryTier {
    service: Arc<dyn HistoryService>,
}

impl HistoryTier {
    pub fn new(service: Arc<dyn HistoryService>) -> Self {
        Self { service }
    }

    /// One slot per candidate, same order as the input. An error or a panic
    /// inside one lookup leaves only that slot empty.
    pub async fn lookup_all(&self, candidates: &[CandidateFile]) -> Vec<Option<DateTime<Utc>>> {
        let resolver = HistoryDateResolver::new(self.service.as_ref());
        let resolver = &resolver;
        let lookups = candidates.iter().map(|c| async move {
            match AssertUnwindSafe(resolver.resolve(&c.path)).catch_unwind().await {
                Ok(Ok(ts)) => ts,
                Ok(Err(e)) => {
                    debug!(error = %e, path = %c.path, "history lookup failed; skipping candidate");
                    counter!("history_lookup_failures_total").increment(1);
                    None
                }
                Err(_) => {
                    warn!(path = %c.path, "history lookup panicked; skipping candidate");
                    counter!("history_lookup_failures_total").increment(1);
                    None
                }
            }
        });
        join_all(lookups).await
    }
}

#[async_trait]
impl TierStrategy for HistoryTier {
    fn tier(&self) -> Tier {
        Tier::History
    }

    fn progress_note(&self) -> Option<&'static str> {
        Some("Determining latest PDF (checking file timestamps)...")
    }

    async fn pick(&self, candidates: &[CandidateFile]) -> Option<usize> {
        let slots = self.lookup_all(candidates).await;
        first_max(
            slots
                .into_iter()
                .enumerate()
                .filter_map(|(i, ts)| ts.map(|ts| (i, ts))),
        )
    }
}

/// Tier 3: largest declared size.
pub struct SizeTier;

#[async_trait]
impl TierStrategy for SizeTier {
    fn tier(&self) -> Tier {
        Tier::Size
    }

    async fn pick(&self, candidates: &[CandidateFile]) -> Option<usize> {
        first_max(candidates.iter().enumerate().map(|(i, c)| (i, c.size)))
    }
}

pub struct LatestFileSelector {
    tiers: Vec<Box<dyn TierStrategy>>,
}

impl LatestFileSelector {
    /// Standard filename → history → size order.
    pub fn new(history: Arc<dyn HistoryService>) -> Self {
        Self::with_tiers(vec![
            Box::new(FilenameTier),
            Box::new(HistoryTier::new(history)),
            Box::new(SizeTier),
        ])
    }

    pub fn with_tiers(tiers: Vec<Box<dyn TierStrategy>>) -> Self {
        Self { tiers }
    }

    pub async fn select(&self, candidates: &[CandidateFile]) -> Option<Resolution> {
        self.select_observed(candidates, None).await
    }

    /// Like [`select`](Self::select), forwarding tier progress notes to `observer`.
    pub async fn select_observed(
        &self,
        candidates: &[CandidateFile],
        observer: Option<&dyn RenderSink>,
    ) -> Option<Resolution> {
        if candidates.is_empty() {
            debug!("no candidates to resolve");
            return None;
        }
        debug!(candidates = candidates.len(), "resolving latest file");

        for strategy in &self.tiers {
            let tier = strategy.tier();
            if let (Some(note), Some(sink)) = (strategy.progress_note(), observer) {
                sink.progress(note);
            }
            match strategy.pick(candidates).await {
                Some(idx) => {
                    // strategies index into the slice they were given
                    let file = candidates.get(idx)?.clone();
                    info!(tier = %tier, path = %file.path, "latest file resolved");
                    counter!("resolve_tier_total", "tier" => tier.as_str()).increment(1);
                    return Some(Resolution { file, tier });
                }
                None => debug!(tier = %tier, "tier yielded no choice"),
            }
        }
        None
    }
}
