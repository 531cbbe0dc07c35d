//! latest-pdf — binary entrypoint.
//! Resolves the latest PDF once at startup (logged), then serves the page,
//! a JSON view and Prometheus metrics over HTTP.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use latest_pdf::github::GitHubClient;
use latest_pdf::telemetry::Metrics;
use latest_pdf::render::LogSink;
use latest_pdf::{pipeline, router, AppState, RepoConfig};

const ENV_BIND: &str = "LATEST_PDF_BIND";
const DEFAULT_BIND: &str = "0.0.0.0:8000";

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("latest_pdf=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = RepoConfig::from_env();
    info!(
        owner = %cfg.owner,
        repo = %cfg.repo,
        branch = %cfg.branch,
        dir = %cfg.dir,
        "config loaded"
    );

    let github = Arc::new(GitHubClient::new(cfg.clone())?);
    let metrics = Metrics::init(cfg.timeout_secs)?;

    // Startup check: log what would be served. Failure is not fatal here.
    if let Err(e) = pipeline::run(github.as_ref(), github.clone(), &LogSink, &cfg).await {
        warn!(error = %e, "startup resolution failed; serving anyway");
    }

    let state = AppState::new(cfg, github.clone(), github);
    let app = router(state).merge(metrics.router());

    let bind = std::env::var(ENV_BIND).unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("binding {bind}"))?;
    info!(addr = %bind, "listening");

    axum::serve(listener, app).await.context("http server")?;
    Ok(())
}
