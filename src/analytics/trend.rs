// src/analytics/trend.rs
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analytics::risk::{ratio_score, ratios, round3};
use crate::model::ClassifiedItem;
use crate::window::{current_and_previous, TimeWindow};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub total: usize,
    pub incident_ratio: f64,
    pub low_confidence_ratio: f64,
    pub risk: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Trend {
    pub window: TimeWindow,
    pub generated_at: DateTime<Utc>,
    pub points: Vec<TrendPoint>,
}

/// Ratio-only risk per equal sub-bucket of the current window, oldest first.
pub fn trend(
    items: &[ClassifiedItem],
    window: TimeWindow,
    now: DateTime<Utc>,
    buckets: usize,
    low_confidence_threshold: f64,
) -> Trend {
    let (cur, _) = current_and_previous(window, now);
    let points = cur
        .split(buckets)
        .into_iter()
        .map(|r| {
            let inside: Vec<&ClassifiedItem> =
                items.iter().filter(|it| r.contains(it.timestamp())).collect();
            let (ir, lcr) = ratios(inside.iter().copied(), low_confidence_threshold);
            TrendPoint {
                start: r.start,
                end: r.end,
                total: inside.len(),
                incident_ratio: round3(ir),
                low_confidence_ratio: round3(lcr),
                risk: ratio_score(ir, lcr),
            }
        })
        .collect();

    Trend {
        window,
        generated_at: now,
        points,
    }
}
