// src/listing.rs
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ResolveError;

/// One raw entry of a repository folder listing.
///
/// Deserialized leniently: GitHub also lists directories and symlinks, and
/// the filter below decides what is a candidate.
///
/// `null` or a wrongly-typed field falls back to its default instead of
/// rejecting the whole entry.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ListingEntry {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub path: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub size: u64,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub download_url: Option<String>,
}

fn lenient_value<'de, D: Deserializer<'de>>(d: D) -> Result<Value, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.unwrap_or(Value::Null))
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(lenient_value(d)?.as_str().unwrap_or_default().to_string())
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(lenient_value(d)?.as_str().map(str::to_string))
}

fn lenient_u64<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    Ok(lenient_value(d)?.as_u64().unwrap_or(0))
}

impl ListingEntry {
    pub fn name_str(&self) -> Option<&str> {
        self.name.as_ref().and_then(|v| v.as_str())
    }
}

/// A file eligible for latest-version resolution. Identity is `path`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidateFile {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub download_url: Option<String>,
}

impl CandidateFile {
    pub fn new(name: &str, path: &str, size: u64) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            size,
            download_url: None,
        }
    }

    pub fn with_download_url(mut self, url: &str) -> Self {
        self.download_url = Some(url.to_string());
        self
    }
}

/// Supplies the folder listing the candidates come from.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn list(&self) -> Result<Vec<ListingEntry>, ResolveError>;
}

/// Keep entries whose name ends in one of `extensions` (case-insensitive),
/// preserving listing order.
pub fn filter_candidates(entries: Vec<ListingEntry>, extensions: &[String]) -> Vec<CandidateFile> {
    let exts: Vec<String> = extensions.iter().map(|e| e.to_ascii_lowercase()).collect();
    entries
        .into_iter()
        .filter_map(|e| {
            let name = e.name_str()?.to_string();
            let lower = name.to_ascii_lowercase();
            if !exts.iter().any(|ext| lower.ends_with(ext.as_str())) {
                return None;
            }
            Some(CandidateFile {
                name,
                path: e.path,
                size: e.size,
                download_url: e.download_url,
            })
        })
        .collect()
}
