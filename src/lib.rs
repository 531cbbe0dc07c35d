// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod config;
pub mod error;
pub mod filename_date;
pub mod github;
pub mod history;
pub mod listing;
pub mod pipeline;
pub mod render;
pub mod selector;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::config::RepoConfig;
pub use crate::error::{HistoryLookupError, ResolveError};
pub use crate::listing::CandidateFile;
pub use crate::selector::{LatestFileSelector, Resolution, Tier};
