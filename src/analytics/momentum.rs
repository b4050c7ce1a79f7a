// src/analytics/momentum.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::aggregate::{count_by_many, round1};
use crate::model::ClassifiedItem;
use crate::window::{current_and_previous, filter_range, TimeWindow};

/// `100` when the baseline is empty and something appeared, `0` when both are empty,
/// otherwise the relative change rounded to one decimal.
pub fn delta_percent(current: usize, previous: usize) -> f64 {
    match (current, previous) {
        (0, 0) => 0.0,
        (_, 0) => 100.0,
        (c, p) => round1(100.0 * (c as f64 - p as f64) / p as f64),
    }
}

/// Attribute an item is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Category,
    Source,
    Region,
    Entity,
    Tag,
}

impl Dimension {
    pub fn keys<'a>(&self, it: &'a ClassifiedItem) -> Vec<&'a str> {
        match self {
            Dimension::Category => vec![it.category.as_str()],
            Dimension::Source => vec![it.source.as_str()],
            Dimension::Region => vec![it.region.as_str()],
            Dimension::Entity => it.entities.iter().map(String::as_str).collect(),
            Dimension::Tag => it.tags.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MomentumEntry {
    pub name: String,
    pub current: usize,
    pub previous: usize,
    pub change: i64,
    pub delta_percent: f64,
}

impl MomentumEntry {
    pub fn new(name: impl Into<String>, current: usize, previous: usize) -> Self {
        Self {
            name: name.into(),
            current,
            previous,
            change: current as i64 - previous as i64,
            delta_percent: delta_percent(current, previous),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Momentum {
    pub window: TimeWindow,
    pub generated_at: DateTime<Utc>,
    pub dimension: Dimension,
    pub entries: Vec<MomentumEntry>,
}

/// Current vs previous window per distinct name, biggest movers first.
pub fn momentum(
    items: &[ClassifiedItem],
    dimension: Dimension,
    window: TimeWindow,
    now: DateTime<Utc>,
    limit: Option<usize>,
) -> Momentum {
    let (cur_r, prev_r) = current_and_previous(window, now);
    let cur = filter_range(items, &cur_r, ClassifiedItem::timestamp);
    let prev = filter_range(items, &prev_r, ClassifiedItem::timestamp);

    let cur_counts = count_by_many(&cur, |it| dimension.keys(it));
    let prev_counts = count_by_many(&prev, |it| dimension.keys(it));
    let prev_map: HashMap<&str, usize> =
        prev_counts.iter().map(|e| (e.name.as_str(), e.count)).collect();

    let mut entries: Vec<MomentumEntry> = cur_counts
        .iter()
        .map(|e| MomentumEntry::new(&e.name, e.count, prev_map.get(e.name.as_str()).copied().unwrap_or(0)))
        .collect();
    // names that vanished from the current window
    for e in &prev_counts {
        if !cur_counts.iter().any(|c| c.name == e.name) {
            entries.push(MomentumEntry::new(&e.name, 0, e.count));
        }
    }

    entries.sort_by(|a, b| b.delta_percent.abs().total_cmp(&a.delta_percent.abs()));
    if let Some(n) = limit {
        entries.truncate(n);
    }

    Momentum {
        window,
        generated_at: now,
        dimension,
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_percent_edges() {
        assert_eq!(delta_percent(0, 0), 0.0);
        assert_eq!(delta_percent(3, 0), 100.0);
        assert_eq!(delta_percent(0, 4), -100.0);
        assert_eq!(delta_percent(4, 3), 33.3);
        assert_eq!(delta_percent(5, 5), 0.0);
        assert_eq!(delta_percent(1, 3), -66.7);
    }

    #[test]
    fn entry_change_is_signed() {
        let e = MomentumEntry::new("OpenAI", 2, 5);
        assert_eq!(e.change, -3);
        assert_eq!(e.delta_percent, -60.0);
    }
}
