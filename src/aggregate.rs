//! aggregate.rs — group-by-count, percent and top-N helpers shared by the analytics.

use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownEntry {
    pub name: String,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
}

impl BreakdownEntry {
    pub fn new(name: impl Into<String>, count: usize) -> Self {
        Self {
            name: name.into(),
            count,
            percent: None,
        }
    }
}

pub(crate) fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Group by one key per item. Sorted by count descending; ties keep first-seen order.
pub fn count_by<'a, T, F, K>(items: &'a [T], key: F) -> Vec<BreakdownEntry>
where
    F: Fn(&'a T) -> K,
    K: AsRef<str>,
{
    count_by_many(items, |it| std::iter::once(key(it)))
}

/// Group by zero or more keys per item (tags, entities). A key repeated within one
/// item counts once for that item.
pub fn count_by_many<'a, T, F, I, K>(items: &'a [T], keys: F) -> Vec<BreakdownEntry>
where
    F: Fn(&'a T) -> I,
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<BreakdownEntry> = Vec::new();
    for it in items {
        let mut seen_here: Vec<usize> = Vec::new();
        for k in keys(it) {
            let k = k.as_ref();
            let pos = match index.get(k) {
                Some(&p) => p,
                None => {
                    index.insert(k.to_string(), out.len());
                    out.push(BreakdownEntry::new(k, 0));
                    out.len() - 1
                }
            };
            if !seen_here.contains(&pos) {
                seen_here.push(pos);
                out[pos].count += 1;
            }
        }
    }
    // sort_by is stable
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

/// Attach `percent = round(100·count/total, 1)`; a zero total reports 0.
pub fn with_percent(entries: Vec<BreakdownEntry>, total: usize) -> Vec<BreakdownEntry> {
    let denom = total.max(1) as f64;
    entries
        .into_iter()
        .map(|mut e| {
            e.percent = Some(if total == 0 {
                0.0
            } else {
                round1(100.0 * e.count as f64 / denom)
            });
            e
        })
        .collect()
}

pub fn top_n(mut entries: Vec<BreakdownEntry>, n: usize) -> Vec<BreakdownEntry> {
    entries.truncate(n);
    entries
}

pub fn total(entries: &[BreakdownEntry]) -> usize {
    entries.iter().map(|e| e.count).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_by_sorts_desc_with_stable_ties() {
        let xs = ["b", "a", "c", "a", "b", "d"];
        let got = count_by(&xs, |s| *s);
        let names: Vec<_> = got.iter().map(|e| (e.name.as_str(), e.count)).collect();
        assert_eq!(names, vec![("b", 2), ("a", 2), ("c", 1), ("d", 1)]);
        assert_eq!(total(&got), xs.len());
    }

    #[test]
    fn count_by_many_counts_once_per_item() {
        let xs = vec![vec!["x", "y", "x"], vec!["y"], vec![]];
        let got = count_by_many(&xs, |v| v.iter().copied());
        assert_eq!(got, vec![BreakdownEntry::new("y", 2), BreakdownEntry::new("x", 1)]);
    }

    #[test]
    fn percent_and_zero_total() {
        let e = with_percent(vec![BreakdownEntry::new("a", 1), BreakdownEntry::new("b", 2)], 3);
        assert_eq!(e[0].percent, Some(33.3));
        assert_eq!(e[1].percent, Some(66.7));
        let z = with_percent(vec![BreakdownEntry::new("a", 0)], 0);
        assert_eq!(z[0].percent, Some(0.0));
    }

    #[test]
    fn top_n_truncates() {
        let e = count_by(&["a", "b", "c"], |s| *s);
        assert_eq!(top_n(e.clone(), 2).len(), 2);
        assert_eq!(top_n(e, 10).len(), 3);
    }
}
