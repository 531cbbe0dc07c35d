// src/github.rs
//! GitHub REST transport: folder listing (`contents`) and per-path history
//! (`commits`). Unauthenticated; no pagination.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::RepoConfig;
use crate::error::{HistoryLookupError, ResolveError};
use crate::history::{HistoryEntry, HistoryService};
use crate::listing::{ListingEntry, ListingSource};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

#[derive(Clone)]
pub struct GitHubClient {
    cfg: RepoConfig,
    client: Client,
}

impl GitHubClient {
    pub fn new(cfg: RepoConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("latest-pdf/", env!("CARGO_PKG_VERSION")))
            .timeout(cfg.timeout())
            .build()
            .context("building GitHub http client")?;
        Ok(Self { cfg, client })
    }
}

/// Body as JSON, or `Value::Null` when it is not JSON at all.
async fn body_json(resp: Response) -> Value {
    match resp.text().await {
        Ok(text) => serde_json::from_str(&text).unwrap_or(Value::Null),
        Err(e) => {
            debug!(error = ?e, "reading response body failed");
            Value::Null
        }
    }
}

#[async_trait]
impl ListingSource for GitHubClient {
    async fn list(&self) -> Result<Vec<ListingEntry>, ResolveError> {
        let url = self.cfg.contents_url();
        let resp = self
            .client
            .get(&url)
            .header(header::ACCEPT, GITHUB_ACCEPT)
            .query(&[("ref", self.cfg.branch.as_str())])
            .send()
            .await
            .map_err(|e| {
                warn!(error = ?e, url = %url, "listing request failed");
                ResolveError::Transport {
                    status: e.status().map(|s| s.as_u16()),
                    message: e.to_string(),
                }
            })?;

        let status = resp.status();
        let body = body_json(resp).await;

        if !status.is_success() {
            // GitHub errors look like {"message": "...", "documentation_url": "..."}
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            warn!(status = status.as_u16(), reason = %message, "listing fetch failed");
            return Err(ResolveError::Transport {
                status: Some(status.as_u16()),
                message,
            });
        }

        let Value::Array(items) = body else {
            return Err(ResolveError::MalformedResponse {
                dir: self.cfg.dir.clone(),
                detail: "listing body is not a JSON array".to_string(),
            });
        };

        let total = items.len();
        let entries: Vec<ListingEntry> = items
            .into_iter()
            .enumerate()
            .filter_map(|(idx, v)| match serde_json::from_value(v) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!(idx, error = %e, "skipping listing item that is not an entry");
                    None
                }
            })
            .collect();
        debug!(total, kept = entries.len(), "listing fetched");
        Ok(entries)
    }
}

#[async_trait]
impl HistoryService for GitHubClient {
    async fn latest_entries(&self, path: &str) -> Result<Vec<HistoryEntry>, HistoryLookupError> {
        let resp = self
            .client
            .get(self.cfg.commits_url())
            .header(header::ACCEPT, GITHUB_ACCEPT)
            .query(&[
                ("path", path),
                ("sha", self.cfg.branch.as_str()),
                ("per_page", "1"),
            ])
            .send()
            .await
            .map_err(|e| HistoryLookupError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(HistoryLookupError::Status(status.as_u16()));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| HistoryLookupError::Decode(e.to_string()))?;

        // anything but an array means "no recorded history"
        let Value::Array(items) = body else {
            return Ok(Vec::new());
        };
        items
            .into_iter()
            .map(serde_json::from_value::<HistoryEntry>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| HistoryLookupError::Decode(e.to_string()))
    }
}
