// src/ingest/scheduler.rs
use metrics::gauge;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::ingest::collector::Collector;
use crate::store::ItemStore;

/// Spawn the periodic collection loop. Each tick forces a refresh and upserts the
/// batch into the store; stale fallback batches are not re-stored.
pub fn spawn_collector(
    collector: Arc<Collector>,
    store: Arc<dyn ItemStore>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let snap = collector.refresh().await;
            if snap.stale {
                tracing::warn!(target: "collector", "tick served stale data; store unchanged");
                continue;
            }
            let added = store.upsert(&snap.items);
            gauge!("store_items").set(store.len() as f64);
            tracing::info!(
                target: "collector",
                batch = snap.items.len(),
                added,
                stored = store.len(),
                "collector tick"
            );
        }
    })
}
