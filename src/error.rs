// src/error.rs
use thiserror::Error;

/// Fatal errors of one resolution pass. Each one is rendered to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Listing fetch did not succeed at the protocol level.
    #[error("listing transport error: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// Listing body was not a JSON array.
    #[error("malformed listing response for '{dir}': {detail}")]
    MalformedResponse { dir: String, detail: String },

    /// Nothing left after the extension filter (or no tier produced a choice).
    #[error("no eligible files in '{dir}'")]
    NoEligibleFiles { dir: String },
}

impl ResolveError {
    /// Human-readable text for the render sink.
    pub fn user_message(&self) -> String {
        match self {
            ResolveError::Transport { message, .. } => message.clone(),
            ResolveError::MalformedResponse { dir, .. } => format!(
                "Unexpected API response — not a list. Check repo/path/branch and that '{dir}' exists and is public."
            ),
            ResolveError::NoEligibleFiles { dir } => format!("No PDF files found in {dir}/."),
        }
    }

    /// HTTP status the router answers with.
    pub fn http_status(&self) -> u16 {
        match self {
            ResolveError::NoEligibleFiles { .. } => 404,
            _ => 502,
        }
    }
}

/// Per-candidate history lookup failure. Always absorbed by the history tier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryLookupError {
    #[error("commit lookup failed ({0})")]
    Status(u16),

    #[error("commit lookup request failed: {0}")]
    Request(String),

    #[error("commit lookup returned unexpected body: {0}")]
    Decode(String),
}
