// src/telemetry.rs
//! Tracing subscriber setup and metric registration.

use anyhow::{Context, Result};
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const ENV_LOG_JSON: &str = "SIGNAL_LOG_JSON";
const DEFAULT_FILTER: &str = "signal_radar=info,warn";

/// Describe every metric once per process.
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("pipeline_candidates_total", "Raw candidates entering the pipeline.");
        describe_counter!(
            "pipeline_irrelevant_total",
            "Candidates rejected by the relevance filter."
        );
        describe_counter!("pipeline_duplicates_total", "Candidates dropped as duplicates.");
        describe_counter!("pipeline_classified_total", "Items emitted by the pipeline.");
        describe_counter!(
            "collector_source_errors_total",
            "Provider fetches that failed or timed out."
        );
        describe_counter!(
            "collector_stale_served_total",
            "Collection cycles that fell back to the last good batch."
        );
        describe_gauge!(
            "collector_last_refresh_ts",
            "Unix timestamp of the last successful collection cycle."
        );
        describe_gauge!("store_items", "Items held by the in-memory store.");
        describe_histogram!("ingest_fetch_ms", "Provider fetch time in milliseconds.");
        describe_histogram!("ingest_parse_ms", "Provider parse time in milliseconds.");
    });
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter; JSON output
/// when `SIGNAL_LOG_JSON=1`. A second call is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let json = std::env::var(ENV_LOG_JSON).ok().is_some_and(|v| v == "1");

    let res = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init()
    };
    if res.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Install the Prometheus recorder; the handle renders the exposition text.
pub fn install_prometheus() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("prometheus: install recorder")?;
    ensure_metrics_described();
    Ok(handle)
}
