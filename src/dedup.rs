//! # Deduplication
//! Exact pass (canonical URL / content hash) followed by a near-duplicate pass over
//! normalized titles. Order-preserving over the first occurrence; never errors.
//!
//! Near-duplicate rule, on titles lowercased and stripped to alphanumerics:
//! - both shorter than [`SHORT_TITLE_LEN`]: duplicates only when equal;
//! - otherwise: duplicate when the shorter title has at least [`MIN_CONTAINED_LEN`]
//!   characters and is contained in the longer one (covers clipped headlines and
//!   suffixed re-titles); a shorter title below that length must equal the longer one.
//!
//! An empty normalized title never matches anything.

use std::collections::HashSet;

use crate::model::{canonical_url, ClassifiedItem, RawCandidate};

pub const SHORT_TITLE_LEN: usize = 20;

/// Minimum normalized length for a title to absorb a longer one by containment.
pub const MIN_CONTAINED_LEN: usize = 12;

/// Identity fields the deduplicator needs.
pub trait Dedupable {
    fn dedup_url(&self) -> &str;
    fn dedup_hash(&self) -> Option<&str>;
    fn dedup_title(&self) -> &str;
}

impl Dedupable for RawCandidate {
    fn dedup_url(&self) -> &str {
        &self.url
    }
    fn dedup_hash(&self) -> Option<&str> {
        None
    }
    fn dedup_title(&self) -> &str {
        &self.title
    }
}

impl Dedupable for ClassifiedItem {
    fn dedup_url(&self) -> &str {
        &self.url
    }
    fn dedup_hash(&self) -> Option<&str> {
        Some(&self.content_hash)
    }
    fn dedup_title(&self) -> &str {
        &self.title
    }
}

/// Both passes. `|dedupe(x)| <= |x|` and `dedupe(dedupe(x)) == dedupe(x)`.
pub fn dedupe<T: Dedupable>(items: Vec<T>) -> Vec<T> {
    near_pass(exact_pass(items))
}

/// Drop any item whose canonical URL or content hash was already seen.
pub fn exact_pass<T: Dedupable>(items: Vec<T>) -> Vec<T> {
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut seen_hashes: HashSet<String> = HashSet::new();
    let mut keep = Vec::with_capacity(items.len());

    for it in items {
        let url = canonical_url(it.dedup_url());
        let url_dup = !url.is_empty() && seen_urls.contains(&url);
        let hash_dup = it.dedup_hash().is_some_and(|h| seen_hashes.contains(h));
        if url_dup || hash_dup {
            continue;
        }
        if !url.is_empty() {
            seen_urls.insert(url);
        }
        if let Some(h) = it.dedup_hash() {
            seen_hashes.insert(h.to_string());
        }
        keep.push(it);
    }
    keep
}

/// Drop items whose title is a near duplicate of an already kept title.
pub fn near_pass<T: Dedupable>(items: Vec<T>) -> Vec<T> {
    let mut kept_titles: Vec<String> = Vec::new();
    let mut keep = Vec::with_capacity(items.len());

    for it in items {
        let norm = normalize_title(it.dedup_title());
        if !norm.is_empty() && kept_titles.iter().any(|k| is_near_duplicate(k, &norm)) {
            continue;
        }
        if !norm.is_empty() {
            kept_titles.push(norm);
        }
        keep.push(it);
    }
    keep
}

/// Lowercase and keep only alphanumeric characters.
pub fn normalize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Compare two already-normalized titles.
pub fn is_near_duplicate(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    if long.chars().count() < SHORT_TITLE_LEN || short.chars().count() < MIN_CONTAINED_LEN {
        return short == long;
    }
    long.contains(short)
}
