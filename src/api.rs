use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::config::RepoConfig;
use crate::history::HistoryService;
use crate::listing::ListingSource;
use crate::pipeline;
use crate::render::{HtmlPage, RenderSink};

/// Shared, read-only state: config plus the two remote collaborators.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<RepoConfig>,
    pub listing: Arc<dyn ListingSource>,
    pub history: Arc<dyn HistoryService>,
}

impl AppState {
    pub fn new(
        cfg: RepoConfig,
        listing: Arc<dyn ListingSource>,
        history: Arc<dyn HistoryService>,
    ) -> Self {
        Self {
            cfg: Arc::new(cfg),
            listing,
            history,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/", get(page))
        .route("/latest", get(latest))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

fn status_of(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_GATEWAY)
}

/// HTML page embedding the latest PDF (or the error text).
async fn page(State(state): State<AppState>) -> Response {
    let title = format!("{} - latest", state.cfg.repo);
    let page = HtmlPage::new(&title);
    let outcome = pipeline::run(
        state.listing.as_ref(),
        state.history.clone(),
        &page,
        &state.cfg,
    )
    .await;

    let status = match &outcome {
        Ok(_) => StatusCode::OK,
        Err(e) => status_of(e.http_status()),
    };
    (status, Html(page.document())).into_response()
}

/// Silent sink: the JSON handler only needs the returned resolution.
struct NullSink;

impl RenderSink for NullSink {
    fn render(&self, _file: &crate::listing::CandidateFile) {}
    fn error(&self, _message: &str) {}
}

async fn latest(State(state): State<AppState>) -> Response {
    let outcome = pipeline::run(
        state.listing.as_ref(),
        state.history.clone(),
        &NullSink,
        &state.cfg,
    )
    .await;

    match outcome {
        Ok(res) => Json(json!({
            "name": res.file.name,
            "path": res.file.path,
            "size": res.file.size,
            "download_url": res.file.download_url,
            "tier": res.tier,
        }))
        .into_response(),
        Err(e) => (
            status_of(e.http_status()),
            Json(json!({ "error": e.user_message() })),
        )
            .into_response(),
    }
}
