// src/analytics/kpi.rs
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analytics::momentum::delta_percent;
use crate::model::ClassifiedItem;
use crate::window::{current_and_previous, TimeWindow};

/// Item volume in one window against the preceding window of equal length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpi {
    pub window: TimeWindow,
    pub generated_at: DateTime<Utc>,
    pub current: usize,
    pub previous: usize,
    pub change: i64,
    pub delta_percent: f64,
}

pub fn kpi(items: &[ClassifiedItem], window: TimeWindow, now: DateTime<Utc>) -> Kpi {
    let (cur, prev) = current_and_previous(window, now);
    let (mut c, mut p) = (0usize, 0usize);
    for it in items {
        let ts = it.timestamp();
        if cur.contains(ts) {
            c += 1;
        } else if prev.contains(ts) {
            p += 1;
        }
    }
    Kpi {
        window,
        generated_at: now,
        current: c,
        previous: p,
        change: c as i64 - p as i64,
        delta_percent: delta_percent(c, p),
    }
}

pub fn kpis(items: &[ClassifiedItem], windows: &[TimeWindow], now: DateTime<Utc>) -> Vec<Kpi> {
    windows.iter().map(|w| kpi(items, *w, now)).collect()
}
