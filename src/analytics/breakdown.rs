// src/analytics/breakdown.rs
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::aggregate::{count_by, count_by_many, top_n, with_percent, BreakdownEntry};
use crate::model::ClassifiedItem;
use crate::window::{current_and_previous, filter_range, TimeWindow};

/// Count-by summaries of the current window, one list per attribute.
#[derive(Debug, Clone, Serialize)]
pub struct Breakdowns {
    pub window: TimeWindow,
    pub generated_at: DateTime<Utc>,
    /// Items in the current window.
    pub total: usize,
    pub sources: Vec<BreakdownEntry>,
    pub regions: Vec<BreakdownEntry>,
    pub categories: Vec<BreakdownEntry>,
    pub tags: Vec<BreakdownEntry>,
    pub entities: Vec<BreakdownEntry>,
}

pub fn breakdowns(
    items: &[ClassifiedItem],
    window: TimeWindow,
    now: DateTime<Utc>,
    limit: usize,
) -> Breakdowns {
    let (cur_r, _) = current_and_previous(window, now);
    let cur = filter_range(items, &cur_r, ClassifiedItem::timestamp);
    let total = cur.len();
    let finish = |e: Vec<BreakdownEntry>| top_n(with_percent(e, total), limit);

    Breakdowns {
        window,
        generated_at: now,
        total,
        sources: finish(count_by(&cur, |it| it.source.as_str())),
        regions: finish(count_by(&cur, |it| it.region.as_str())),
        categories: finish(count_by(&cur, |it| it.category.as_str())),
        tags: finish(count_by_many(&cur, |it| it.tags.iter())),
        entities: finish(count_by_many(&cur, |it| it.entities.iter())),
    }
}
