// src/config.rs
use std::env;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_OWNER: &str = "kmadsdev";
pub const DEFAULT_REPO: &str = "curriculum";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_DIR: &str = "assets";
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const ENV_OWNER: &str = "LATEST_PDF_OWNER";
pub const ENV_REPO: &str = "LATEST_PDF_REPO";
pub const ENV_BRANCH: &str = "LATEST_PDF_BRANCH";
pub const ENV_DIR: &str = "LATEST_PDF_DIR";
pub const ENV_EXTENSIONS: &str = "LATEST_PDF_EXTENSIONS";
pub const ENV_API_BASE: &str = "LATEST_PDF_API_BASE";
pub const ENV_TIMEOUT_SECS: &str = "LATEST_PDF_TIMEOUT_SECS";

/// Repository identity plus transport knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoConfig {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Folder inside the repo holding the PDFs.
    pub dir: String,
    /// Recognized extensions, with leading dot (".pdf").
    pub extensions: Vec<String>,
    pub api_base: String,
    pub timeout_secs: u64,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            owner: DEFAULT_OWNER.to_string(),
            repo: DEFAULT_REPO.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            dir: DEFAULT_DIR.to_string(),
            extensions: vec![".pdf".to_string()],
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl RepoConfig {
    /// Defaults overridden by any non-blank `LATEST_PDF_*` variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(v) = env_nonempty(ENV_OWNER) {
            cfg.owner = v;
        }
        if let Some(v) = env_nonempty(ENV_REPO) {
            cfg.repo = v;
        }
        if let Some(v) = env_nonempty(ENV_BRANCH) {
            cfg.branch = v;
        }
        if let Some(v) = env_nonempty(ENV_DIR) {
            cfg.dir = v.trim_matches('/').to_string();
        }
        if let Some(v) = env_nonempty(ENV_EXTENSIONS) {
            let exts = parse_extensions(&v);
            if !exts.is_empty() {
                cfg.extensions = exts;
            }
        }
        if let Some(v) = env_nonempty(ENV_API_BASE) {
            cfg.api_base = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = env_nonempty(ENV_TIMEOUT_SECS) {
            match v.parse::<u64>() {
                Ok(secs) if secs > 0 => cfg.timeout_secs = secs,
                _ => warn!(value = %v, "invalid {ENV_TIMEOUT_SECS}; using default"),
            }
        }
        cfg
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `GET` target for the folder listing.
    pub fn contents_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base, self.owner, self.repo, self.dir
        )
    }

    /// `GET` target for the per-path commit history.
    pub fn commits_url(&self) -> String {
        format!("{}/repos/{}/{}/commits", self.api_base, self.owner, self.repo)
    }
}

/// "pdf, .PDF ,,docx" -> [".pdf", ".pdf", ".docx"] (lowercased, dotted).
fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let s = s.to_ascii_lowercase();
            if s.starts_with('.') {
                s
            } else {
                format!(".{s}")
            }
        })
        .collect()
}
