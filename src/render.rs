// src/render.rs
use std::sync::Mutex;

use tracing::{error, info};

use crate::listing::CandidateFile;

/// Output channel for one resolution pass. Receives exactly one final call:
/// `render` on success or `error` on failure.
pub trait RenderSink: Send + Sync {
    fn render(&self, file: &CandidateFile);
    fn error(&self, message: &str);
    /// Interim status while a slow tier runs.
    fn progress(&self, _message: &str) {}
}

/// What an [`HtmlPage`] ended up showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    Loading(String),
    Embedded(String),
    Failed(String),
}

/// Renders a standalone HTML document that embeds the chosen PDF.
#[derive(Debug)]
pub struct HtmlPage {
    title: String,
    state: Mutex<PageState>,
}

impl HtmlPage {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            state: Mutex::new(PageState::Loading("Loading latest PDF...".to_string())),
        }
    }

    pub fn state(&self) -> PageState {
        self.state.lock().expect("page mutex poisoned").clone()
    }

    pub fn is_error(&self) -> bool {
        matches!(self.state(), PageState::Failed(_))
    }

    /// Full HTML for the current state.
    pub fn document(&self) -> String {
        let title = html_escape::encode_text(&self.title);
        let body = match self.state() {
            PageState::Loading(msg) => {
                format!(r#"<div class="msg">{}</div>"#, html_escape::encode_text(&msg))
            }
            PageState::Embedded(src) => format!(
                r#"<embed src="{}" type="application/pdf" class="embed-full">"#,
                html_escape::encode_double_quoted_attribute(&src)
            ),
            PageState::Failed(msg) => format!(
                r#"<div class="err">Error: {}</div>"#,
                html_escape::encode_text(&msg)
            ),
        };
        format!(
            "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n"
        )
    }

    fn set(&self, next: PageState) {
        *self.state.lock().expect("page mutex poisoned") = next;
    }
}

const STYLE: &str = "html,body{margin:0;height:100%}\
.embed-full{width:100%;height:100vh;border:0}\
.err{color:#b00020;font-family:sans-serif;padding:1rem}\
.msg{font-family:sans-serif;padding:1rem}";

impl RenderSink for HtmlPage {
    fn render(&self, file: &CandidateFile) {
        // no download_url (e.g. submodule entries) falls back to the repo path
        let src = file.download_url.clone().unwrap_or_else(|| file.path.clone());
        self.set(PageState::Embedded(src));
    }

    fn error(&self, message: &str) {
        self.set(PageState::Failed(message.to_string()));
    }

    fn progress(&self, message: &str) {
        if matches!(self.state(), PageState::Loading(_)) {
            self.set(PageState::Loading(message.to_string()));
        }
    }
}

/// Writes the outcome to the log.
pub struct LogSink;

impl RenderSink for LogSink {
    fn render(&self, file: &CandidateFile) {
        info!(
            name = %file.name,
            url = file.download_url.as_deref().unwrap_or("-"),
            "latest PDF"
        );
    }

    fn error(&self, message: &str) {
        error!(reason = message, "could not resolve latest PDF");
    }

    fn progress(&self, message: &str) {
        info!(note = message, "resolution progress");
    }
}
