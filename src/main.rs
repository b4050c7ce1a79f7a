//! signal-radar — command-line entrypoint.
//!
//! One-shot (default): collect from the configured feeds, classify, and print the
//! analytics report for `$SIGNAL_WINDOW` as JSON.
//! Watch (`SIGNAL_WATCH=1`): run the periodic collector and log a report every tick.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use signal_radar::ingest::cache::SystemClock;
use signal_radar::ingest::providers;
use signal_radar::ingest::scheduler::spawn_collector;
use signal_radar::store::{ItemStore, MemoryStore};
use signal_radar::telemetry::{init_tracing, install_prometheus};
use signal_radar::{AnalyticsEngine, Collector, EngineConfig, Rulebook, TimeWindow};

const ENV_WINDOW: &str = "SIGNAL_WINDOW";
const ENV_WATCH: &str = "SIGNAL_WATCH";
const ENV_METRICS_DUMP: &str = "SIGNAL_METRICS_DUMP";

fn flag(name: &str) -> bool {
    std::env::var(name).ok().is_some_and(|v| v == "1")
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();
    let prom = install_prometheus()?;

    let cfg = EngineConfig::load_default().context("loading engine config")?;
    let rules = Arc::new(Rulebook::load_default().context("loading rulebook")?);
    let window = std::env::var(ENV_WINDOW)
        .map(|t| TimeWindow::from_token(&t))
        .unwrap_or_default();

    let feeds = providers::from_feeds(&cfg.collector.feeds);
    info!(feeds = feeds.len(), window = %window, "starting");

    let collector = Arc::new(Collector::new(
        feeds,
        rules,
        cfg.collector.fetch_timeout(),
        cfg.collector.cache_ttl(),
        Arc::new(SystemClock),
    ));
    let store: Arc<dyn ItemStore> = Arc::new(MemoryStore::with_capacity(cfg.store.capacity));
    let engine = AnalyticsEngine::from_config(&cfg);

    if flag(ENV_WATCH) {
        let _task = spawn_collector(Arc::clone(&collector), Arc::clone(&store), cfg.collector.interval());
        // First report once the scheduler's initial cycle has had its full fetch budget.
        let first = tokio::time::Instant::now() + cfg.collector.fetch_timeout() + Duration::from_secs(1);
        let mut ticker = tokio::time::interval_at(first, cfg.collector.interval());
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let report = engine.report(&store.all(), window, chrono::Utc::now());
                    info!(
                        risk = report.risk.score,
                        level = ?report.risk.level,
                        alerts = report.alerts.entries.len(),
                        items = store.len(),
                        stale = collector.is_stale(),
                        "report"
                    );
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("shutting down");
                    break;
                }
            }
        }
    } else {
        let snap = collector.snapshot().await;
        store.upsert(&snap.items);
        let report = engine.report(&store.all(), window, chrono::Utc::now());
        let out = serde_json::json!({
            "stale": snap.stale,
            "collected_at": snap.collected_at,
            "sources": snap.reports,
            "report": report,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    }

    if flag(ENV_METRICS_DUMP) {
        eprintln!("{}", prom.render());
    }
    Ok(())
}
