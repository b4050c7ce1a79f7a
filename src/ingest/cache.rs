// src/ingest/cache.rs
//! TTL cache for the last collected item batch, with an injected clock.
//!
//! The cache never forgets its last value on expiry: `get` stops returning it once
//! the TTL has passed, but `last_good` still does, so a fully failed collection cycle
//! can fall back to it and flag the result as stale.

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};

/// Time source, injectable for tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut t = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        *t += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.inner.lock().unwrap_or_else(|p| p.into_inner()) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    stored_at: DateTime<Utc>,
}

/// Single-slot TTL cache.
pub struct FeedCache<T> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entry: Option<Entry<T>>,
    expired: bool,
}

impl<T: Clone> FeedCache<T> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entry: None,
            expired: false,
        }
    }

    /// Fresh value, if one was stored within the TTL and not force-expired.
    pub fn get(&self) -> Option<T> {
        let e = self.entry.as_ref()?;
        if self.expired || self.clock.now() - e.stored_at >= self.ttl {
            return None;
        }
        Some(e.value.clone())
    }

    pub fn set(&mut self, value: T) {
        self.entry = Some(Entry {
            value,
            stored_at: self.clock.now(),
        });
        self.expired = false;
    }

    /// Force the current value stale without dropping it.
    pub fn expire(&mut self) {
        self.expired = true;
    }

    /// Last stored value regardless of age.
    pub fn last_good(&self) -> Option<(T, DateTime<Utc>)> {
        self.entry.as_ref().map(|e| (e.value.clone(), e.stored_at))
    }

    pub fn is_fresh(&self) -> bool {
        self.get().is_some()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
