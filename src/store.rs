//! store.rs — in-memory classified item store.
//!
//! Re-ingesting an item with a known id replaces the stored value in place (the
//! original position is kept). Over capacity, the oldest inserted items are dropped.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::model::ClassifiedItem;

/// Persistence collaborator for the classified collection.
pub trait ItemStore: Send + Sync {
    /// Insert or supersede; returns how many ids were new.
    fn upsert(&self, items: &[ClassifiedItem]) -> usize;
    /// All items in insertion order.
    fn all(&self) -> Vec<ClassifiedItem>;
    fn get(&self, id: &str) -> Option<ClassifiedItem>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
struct Inner {
    items: Vec<ClassifiedItem>,
    pos: HashMap<String, usize>,
}

impl Inner {
    fn reindex(&mut self) {
        self.pos = self
            .items
            .iter()
            .enumerate()
            .map(|(i, it)| (it.id.clone(), i))
            .collect();
    }
}

#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    cap: usize,
}

impl MemoryStore {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            cap: cap.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }
}

impl ItemStore for MemoryStore {
    fn upsert(&self, items: &[ClassifiedItem]) -> usize {
        let mut g = self.inner.write().unwrap_or_else(|p| p.into_inner());
        let mut added = 0;
        for it in items {
            match g.pos.get(&it.id).copied() {
                Some(i) => g.items[i] = it.clone(),
                None => {
                    let i = g.items.len();
                    g.pos.insert(it.id.clone(), i);
                    g.items.push(it.clone());
                    added += 1;
                }
            }
        }
        if g.items.len() > self.cap {
            let excess = g.items.len() - self.cap;
            g.items.drain(0..excess);
            g.reindex();
        }
        added
    }

    fn all(&self) -> Vec<ClassifiedItem> {
        self.inner
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .items
            .clone()
    }

    fn get(&self, id: &str) -> Option<ClassifiedItem> {
        let g = self.inner.read().unwrap_or_else(|p| p.into_inner());
        g.pos.get(id).map(|&i| g.items[i].clone())
    }

    fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(|p| p.into_inner()).items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Sentiment};
    use chrono::{TimeZone, Utc};

    fn item(id: &str, title: &str) -> ClassifiedItem {
        ClassifiedItem {
            id: id.into(),
            title: title.into(),
            url: format!("https://x.test/{id}"),
            source: "Wire".into(),
            category: Category::News,
            region: "Global".into(),
            language: "en".into(),
            sentiment: Sentiment::Neutral,
            entities: vec![],
            tags: vec![],
            confidence: 0.5,
            published_at: None,
            ingested_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            content_hash: String::new(),
        }
    }

    #[test]
    fn upsert_supersedes_by_id_in_place() {
        let s = MemoryStore::with_capacity(10);
        assert_eq!(s.upsert(&[item("a", "one"), item("b", "two")]), 2);
        assert_eq!(s.upsert(&[item("a", "one v2")]), 0);
        let all = s.all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "one v2");
        assert_eq!(s.get("b").map(|i| i.title), Some("two".into()));
    }

    #[test]
    fn capacity_drops_oldest() {
        let s = MemoryStore::with_capacity(2);
        s.upsert(&[item("a", "1"), item("b", "2"), item("c", "3")]);
        let ids: Vec<_> = s.all().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["b", "c"]);
        assert!(s.get("a").is_none());
        assert_eq!(s.get("c").map(|i| i.title), Some("3".into()));
    }
}
