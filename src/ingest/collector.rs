// src/ingest/collector.rs
//! Collection cycle: cache check → provider fan-out → classification pipeline → cache.
//!
//! A fully failed cycle serves the last good batch with `stale = true`. Concurrent
//! callers share one refresh (the guard is re-checked after it is acquired).

use chrono::{DateTime, Utc};
use metrics::{counter, gauge};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{info, warn};

use crate::classify::Rulebook;
use crate::ingest::cache::{Clock, FeedCache};
use crate::ingest::collect_all;
use crate::ingest::types::{SourceProvider, SourceReport};
use crate::model::ClassifiedItem;
use crate::pipeline::{self, PipelineStats};

/// What downstream consumers get from the collector.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub items: Arc<Vec<ClassifiedItem>>,
    /// Served from the cache after every source failed.
    pub stale: bool,
    /// When the served batch was collected (`None` if nothing was ever collected).
    pub collected_at: Option<DateTime<Utc>>,
    /// Served from a fresh cache entry without fetching.
    pub cached: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reports: Vec<SourceReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<PipelineStats>,
}

impl Snapshot {
    fn empty() -> Self {
        Self {
            items: Arc::new(Vec::new()),
            stale: false,
            collected_at: None,
            cached: false,
            reports: Vec::new(),
            stats: None,
        }
    }
}

pub struct Collector {
    providers: Vec<Arc<dyn SourceProvider>>,
    rules: Arc<Rulebook>,
    fetch_timeout: Duration,
    cache: RwLock<FeedCache<Arc<Vec<ClassifiedItem>>>>,
    refresh_guard: tokio::sync::Mutex<()>,
    last_stale: AtomicBool,
}

impl Collector {
    pub fn new(
        providers: Vec<Arc<dyn SourceProvider>>,
        rules: Arc<Rulebook>,
        fetch_timeout: Duration,
        cache_ttl: chrono::Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            providers,
            rules,
            fetch_timeout,
            cache: RwLock::new(FeedCache::new(cache_ttl, clock)),
            refresh_guard: tokio::sync::Mutex::new(()),
            last_stale: AtomicBool::new(false),
        }
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Serve the cached batch while fresh, otherwise run a collection cycle.
    pub async fn snapshot(&self) -> Snapshot {
        if let Some(s) = self.fresh_snapshot() {
            return s;
        }
        let _guard = self.refresh_guard.lock().await;
        // Another caller may have refreshed while we waited.
        if let Some(s) = self.fresh_snapshot() {
            return s;
        }
        self.refresh_locked().await
    }

    /// Run a collection cycle now, ignoring cache freshness.
    pub async fn refresh(&self) -> Snapshot {
        let _guard = self.refresh_guard.lock().await;
        self.refresh_locked().await
    }

    /// Whether the most recent collection cycle fell back to the last good batch.
    pub fn is_stale(&self) -> bool {
        self.last_stale.load(Ordering::Relaxed)
    }

    /// Mark the cached batch stale so the next `snapshot` refetches.
    pub fn expire(&self) {
        if let Ok(mut c) = self.cache.write() {
            c.expire();
        }
    }

    fn fresh_snapshot(&self) -> Option<Snapshot> {
        let cache = self.cache.read().ok()?;
        let items = cache.get()?;
        let collected_at = cache.last_good().map(|(_, at)| at);
        Some(Snapshot {
            items,
            collected_at,
            cached: true,
            ..Snapshot::empty()
        })
    }

    async fn refresh_locked(&self) -> Snapshot {
        let collection = collect_all(&self.providers, self.fetch_timeout).await;

        if collection.all_failed() {
            self.last_stale.store(true, Ordering::Relaxed);
            counter!("collector_stale_served_total").increment(1);
            let last = self.cache.read().ok().and_then(|c| c.last_good());
            warn!(
                target: "collector",
                providers = collection.reports.len(),
                have_fallback = last.is_some(),
                "all sources failed; serving last good batch"
            );
            return match last {
                Some((items, at)) => Snapshot {
                    items,
                    stale: true,
                    collected_at: Some(at),
                    reports: collection.reports,
                    ..Snapshot::empty()
                },
                None => Snapshot {
                    stale: true,
                    reports: collection.reports,
                    ..Snapshot::empty()
                },
            };
        }

        let now = match self.cache.read() {
            Ok(c) => c.now(),
            Err(_) => Utc::now(),
        };
        let (items, stats) = pipeline::run(&self.rules, collection.candidates, now);
        let items = Arc::new(items);

        if let Ok(mut c) = self.cache.write() {
            c.set(Arc::clone(&items));
        }
        self.last_stale.store(false, Ordering::Relaxed);
        gauge!("collector_last_refresh_ts").set(now.timestamp() as f64);
        info!(
            target: "collector",
            items = items.len(),
            failed_sources = collection.reports.iter().filter(|r| !r.ok).count(),
            "collection cycle complete"
        );

        Snapshot {
            items,
            collected_at: Some(now),
            reports: collection.reports,
            stats: Some(stats),
            ..Snapshot::empty()
        }
    }
}
