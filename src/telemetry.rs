// src/telemetry.rs — Prometheus recorder and metric descriptions.
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// One-time metric descriptions (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "resolve_tier_total",
            "Resolutions, labelled by the tier that decided."
        );
        describe_counter!(
            "history_lookup_failures_total",
            "History lookups that failed and were skipped."
        );
        describe_gauge!(
            "github_timeout_secs",
            "Configured GitHub request timeout in seconds."
        );
    });
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder and publish the transport timeout.
    pub fn init(timeout_secs: u64) -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| anyhow::anyhow!("prometheus: install recorder: {e}"))?;

        ensure_metrics_described();
        gauge!("github_timeout_secs").set(timeout_secs as f64);

        Ok(Self { handle })
    }

    /// `/metrics` route serving the tier and history-failure counters.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        let scrape = move || {
            let snapshot = handle.render();
            async move { snapshot }
        };
        Router::new().route("/metrics", get(scrape))
    }
}
