// src/ingest/providers/mod.rs
//! Built-in source providers. Both read content handed to them (an inline fixture or
//! a local file); neither performs network I/O.

pub mod json;
pub mod rss;

pub use json::JsonFileProvider;
pub use rss::{parse_feed, RssProvider};

use std::sync::Arc;

use crate::config::FeedConfig;
use crate::ingest::types::SourceProvider;

/// Build one provider per configured feed, picking the format from the file extension.
pub fn from_feeds(feeds: &[FeedConfig]) -> Vec<Arc<dyn SourceProvider>> {
    feeds
        .iter()
        .map(|f| -> Arc<dyn SourceProvider> {
            let is_json = f
                .path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("json"));
            if is_json {
                Arc::new(JsonFileProvider::new(&f.name, &f.path).pre_filtered(f.pre_filtered))
            } else {
                Arc::new(RssProvider::from_path(&f.name, &f.path).pre_filtered(f.pre_filtered))
            }
        })
        .collect()
}
