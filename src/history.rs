//! history.rs — last-modification lookup for one repository path.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::HistoryLookupError;

/// One history record as the commits endpoint returns it.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    #[serde(default)]
    pub commit: CommitInfo,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct CommitInfo {
    #[serde(default)]
    pub author: Option<Signature>,
    #[serde(default)]
    pub committer: Option<Signature>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Signature {
    #[serde(default)]
    pub date: Option<String>,
}

impl HistoryEntry {
    /// Build an entry from raw author/committer dates (mostly for tests and mocks).
    pub fn from_dates(author: Option<&str>, committer: Option<&str>) -> Self {
        let sig = |d: Option<&str>| {
            d.map(|s| Signature {
                date: Some(s.to_string()),
            })
        };
        Self {
            commit: CommitInfo {
                author: sig(author),
                committer: sig(committer),
            },
        }
    }

    /// Author date if present, committer date otherwise.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let author = self.commit.author.as_ref().and_then(|s| s.date.as_deref());
        let committer = self.commit.committer.as_ref().and_then(|s| s.date.as_deref());
        author
            .or(committer)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// External record of prior versions of a path.
#[async_trait]
pub trait HistoryService: Send + Sync {
    /// Most recent entries for `path`, newest first. Empty is a valid answer.
    async fn latest_entries(&self, path: &str) -> Result<Vec<HistoryEntry>, HistoryLookupError>;
}

/// Resolves the most recent modification time of a path.
pub struct HistoryDateResolver<'a> {
    service: &'a dyn HistoryService,
}

impl<'a> HistoryDateResolver<'a> {
    pub fn new(service: &'a dyn HistoryService) -> Self {
        Self { service }
    }

    /// `Ok(None)` when the path has no recorded history.
    pub async fn resolve(&self, path: &str) -> Result<Option<DateTime<Utc>>, HistoryLookupError> {
        let entries = self.service.latest_entries(path).await?;
        Ok(entries.first().and_then(HistoryEntry::timestamp))
    }
}
