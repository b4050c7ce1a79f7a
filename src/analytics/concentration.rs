// src/analytics/concentration.rs
//! Herfindahl-Hirschman concentration over breakdown shares.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::aggregate::{count_by, total, BreakdownEntry};
use crate::analytics::Level;
use crate::model::ClassifiedItem;
use crate::window::{current_and_previous, filter_range, TimeWindow};

pub const HHI_MAX: u32 = 10_000;
pub const HHI_HIGH: u32 = 2_500;
pub const HHI_MEDIUM: u32 = 1_500;

/// `round(Σ (100·count/total)²)`; 0 for an empty breakdown.
pub fn hhi(entries: &[BreakdownEntry]) -> u32 {
    let t = total(entries);
    if t == 0 {
        return 0;
    }
    let sum: f64 = entries
        .iter()
        .map(|e| {
            let share = 100.0 * e.count as f64 / t as f64;
            share * share
        })
        .sum();
    (sum.round() as u32).min(HHI_MAX)
}

pub fn hhi_level(hhi: u32) -> Level {
    if hhi >= HHI_HIGH {
        Level::High
    } else if hhi >= HHI_MEDIUM {
        Level::Medium
    } else {
        Level::Low
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConcentrationIndex {
    pub hhi: u32,
    pub level: Level,
}

impl ConcentrationIndex {
    pub fn from_hhi(hhi: u32) -> Self {
        Self {
            hhi,
            level: hhi_level(hhi),
        }
    }

    pub fn of(entries: &[BreakdownEntry]) -> Self {
        Self::from_hhi(hhi(entries))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Concentration {
    pub window: TimeWindow,
    pub generated_at: DateTime<Utc>,
    pub source: ConcentrationIndex,
    pub region: ConcentrationIndex,
    pub category: ConcentrationIndex,
    /// Unweighted mean of the three.
    pub combined: ConcentrationIndex,
}

pub fn concentration(items: &[ClassifiedItem], window: TimeWindow, now: DateTime<Utc>) -> Concentration {
    let (cur_r, _) = current_and_previous(window, now);
    let cur = filter_range(items, &cur_r, ClassifiedItem::timestamp);

    let source = ConcentrationIndex::of(&count_by(&cur, |it| it.source.as_str()));
    let region = ConcentrationIndex::of(&count_by(&cur, |it| it.region.as_str()));
    let category = ConcentrationIndex::of(&count_by(&cur, |it| it.category.as_str()));
    let mean = (source.hhi + region.hhi + category.hhi) as f64 / 3.0;

    Concentration {
        window,
        generated_at: now,
        source,
        region,
        category,
        combined: ConcentrationIndex::from_hhi(mean.round() as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn even(n: usize) -> Vec<BreakdownEntry> {
        (0..n).map(|i| BreakdownEntry::new(format!("s{i}"), 7)).collect()
    }

    #[test]
    fn single_source_is_max() {
        let c = ConcentrationIndex::of(&[BreakdownEntry::new("Wire", 10)]);
        assert_eq!(c, ConcentrationIndex { hhi: 10_000, level: Level::High });
    }

    #[test]
    fn even_splits() {
        assert_eq!(hhi(&even(2)), 5_000);
        // exactly on the high threshold
        assert_eq!(ConcentrationIndex::of(&even(4)).level, Level::High);
        assert_eq!(ConcentrationIndex::of(&even(5)).level, Level::Medium);
        assert_eq!(ConcentrationIndex::of(&even(10)).level, Level::Low);
    }

    #[test]
    fn empty_is_zero_low() {
        assert_eq!(ConcentrationIndex::of(&[]), ConcentrationIndex { hhi: 0, level: Level::Low });
    }

    #[test]
    fn uneven_split_rounds() {
        // 1/3 and 2/3 → 1111.1 + 4444.4
        let e = vec![BreakdownEntry::new("a", 1), BreakdownEntry::new("b", 2)];
        assert_eq!(hhi(&e), 5_556);
    }
}
