// src/analytics/alerts.rs
//! Per-category volume alerts on the windowed delta percentage.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analytics::momentum::delta_percent;
use crate::config::AlertConfig;
use crate::model::{Category, ClassifiedItem};
use crate::window::{current_and_previous, TimeWindow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertEntry {
    pub category: Category,
    pub direction: Direction,
    pub severity: Severity,
    pub current: usize,
    pub previous: usize,
    pub delta_percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Alerts {
    pub window: TimeWindow,
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<AlertEntry>,
}

impl Alerts {
    pub fn high_count(&self) -> usize {
        self.entries.iter().filter(|a| a.severity == Severity::High).count()
    }
}

/// Alert decision for one category's counts; `None` when not eligible.
pub fn evaluate(
    category: Category,
    current: usize,
    previous: usize,
    cfg: &AlertConfig,
) -> Option<AlertEntry> {
    if current == 0 && previous == 0 {
        return None;
    }
    if previous < cfg.min_baseline && current < cfg.min_baseline {
        return None;
    }
    let dp = delta_percent(current, previous);
    if dp.abs() < cfg.min_delta_pct {
        return None;
    }
    Some(AlertEntry {
        category,
        direction: if dp >= 0.0 { Direction::Up } else { Direction::Down },
        severity: if dp.abs() >= cfg.high_delta_pct {
            Severity::High
        } else {
            Severity::Medium
        },
        current,
        previous,
        delta_percent: dp,
    })
}

pub fn alerts(
    items: &[ClassifiedItem],
    window: TimeWindow,
    now: DateTime<Utc>,
    cfg: &AlertConfig,
) -> Alerts {
    let (cur_r, prev_r) = current_and_previous(window, now);
    let mut cur = [0usize; Category::ALL.len()];
    let mut prev = [0usize; Category::ALL.len()];
    for it in items {
        let Some(idx) = Category::ALL.iter().position(|c| *c == it.category) else {
            continue;
        };
        let ts = it.timestamp();
        if cur_r.contains(ts) {
            cur[idx] += 1;
        } else if prev_r.contains(ts) {
            prev[idx] += 1;
        }
    }

    let mut entries: Vec<AlertEntry> = Category::ALL
        .iter()
        .enumerate()
        .filter_map(|(i, c)| evaluate(*c, cur[i], prev[i], cfg))
        .collect();
    entries.sort_by(|a, b| b.delta_percent.abs().total_cmp(&a.delta_percent.abs()));

    Alerts {
        window,
        generated_at: now,
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> AlertConfig {
        AlertConfig::default()
    }

    #[test]
    fn flat_volume_is_quiet() {
        assert_eq!(evaluate(Category::Policy, 50, 50, &cfg()), None);
        assert_eq!(evaluate(Category::Policy, 0, 0, &cfg()), None);
    }

    #[test]
    fn tiny_counts_are_ignored() {
        assert_eq!(evaluate(Category::Funding, 2, 1, &cfg()), None);
    }

    #[test]
    fn new_category_reports_as_high() {
        let a = evaluate(Category::Incidents, 4, 0, &cfg()).unwrap();
        assert_eq!(a.delta_percent, 100.0);
        assert_eq!(a.direction, Direction::Up);
        assert_eq!(a.severity, Severity::High);
    }

    #[test]
    fn severity_thresholds() {
        let m = evaluate(Category::Research, 14, 10, &cfg()).unwrap();
        assert_eq!((m.severity, m.direction), (Severity::Medium, Direction::Up));
        let d = evaluate(Category::Research, 1, 10, &cfg()).unwrap();
        assert_eq!((d.severity, d.direction), (Severity::High, Direction::Down));
        assert_eq!(evaluate(Category::Research, 12, 10, &cfg()), None);
    }
}
