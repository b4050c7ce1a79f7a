// src/ingest/providers/rss.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::histogram;
use quick_xml::de::from_str;
use serde::Deserialize;
use std::path::PathBuf;
use time::{format_description::well_known::Rfc2822, OffsetDateTime, UtcOffset};

use crate::ingest::types::SourceProvider;
use crate::model::RawCandidate;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
    #[serde(rename = "category", default)]
    categories: Vec<String>,
}

/// RFC 2822 `pubDate` → RFC 3339, so the pipeline parses one format. Unparseable dates
/// are passed through untouched and end up as "no timestamp".
fn normalize_pub_date(ts: &str) -> String {
    OffsetDateTime::parse(ts.trim(), &Rfc2822)
        .ok()
        .map(|dt| dt.to_offset(UtcOffset::UTC).unix_timestamp())
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| ts.to_string())
}

enum Content {
    Inline(String),
    File(PathBuf),
}

/// RSS 2.0 provider over an inline document or a local file.
pub struct RssProvider {
    name: String,
    content: Content,
    pre_filtered: bool,
}

impl RssProvider {
    pub fn from_fixture(name: &str, xml: &str) -> Self {
        Self {
            name: name.to_string(),
            content: Content::Inline(xml.to_string()),
            pre_filtered: false,
        }
    }

    pub fn from_path(name: &str, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            content: Content::File(path.into()),
            pre_filtered: false,
        }
    }

    /// Mark every item from this feed as already topic-filtered upstream.
    pub fn pre_filtered(mut self, yes: bool) -> Self {
        self.pre_filtered = yes;
        self
    }

    async fn read(&self) -> Result<String> {
        match &self.content {
            Content::Inline(s) => Ok(s.clone()),
            Content::File(p) => tokio::fs::read_to_string(p)
                .await
                .with_context(|| format!("reading rss feed {}", p.display())),
        }
    }
}

/// Parse an RSS document into candidates attributed to `source`.
pub fn parse_feed(xml: &str, source: &str, pre_filtered: bool) -> Result<Vec<RawCandidate>> {
    let rss: Rss = from_str(xml).context("parsing rss xml")?;
    let now = Utc::now();
    let out = rss
        .channel
        .item
        .into_iter()
        .filter_map(|it| {
            let title = it.title.unwrap_or_default();
            let url = it.link.unwrap_or_default();
            if title.trim().is_empty() || url.trim().is_empty() {
                return None;
            }
            let mut cand = RawCandidate::new(title, it.description.unwrap_or_default(), url, source)
                .pre_filtered(pre_filtered);
            cand.published = it.pub_date.as_deref().map(normalize_pub_date);
            cand.discovered = Some(now);
            // <category> elements are upstream keywords, not our labels; keep them as
            // entity hints.
            cand.entities = it.categories;
            Some(cand)
        })
        .collect();
    Ok(out)
}

#[async_trait]
impl SourceProvider for RssProvider {
    async fn fetch_latest(&self) -> Result<Vec<RawCandidate>> {
        let t0 = std::time::Instant::now();
        let xml = self.read().await?;
        let out = parse_feed(&xml, &self.name, self.pre_filtered)
            .with_context(|| format!("feed {}", self.name))?;
        histogram!("ingest_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        tracing::debug!(target: "ingest", provider = %self.name, items = out.len(), "rss parsed");
        Ok(out)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>t</title>
<item><title>OpenAI ships new model</title><link>https://x.test/a</link>
<pubDate>Mon, 02 Jun 2025 08:30:00 GMT</pubDate><description>&lt;p&gt;Details&lt;/p&gt;</description>
<category>OpenAI</category></item>
<item><title></title><link>https://x.test/empty</link></item>
<item><title>No date</title><link>https://x.test/b</link></item>
</channel></rss>"#;

    #[test]
    fn parses_items_and_skips_untitled() {
        let got = parse_feed(XML, "Wire", true).unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].source, "Wire");
        assert_eq!(got[0].published.as_deref(), Some("2025-06-02T08:30:00+00:00"));
        assert_eq!(got[0].entities, vec!["OpenAI"]);
        assert!(got[0].pre_filtered);
        assert_eq!(got[1].published, None);
    }

    #[test]
    fn bad_date_passes_through() {
        assert_eq!(normalize_pub_date("yesterday"), "yesterday");
    }

    #[tokio::test]
    async fn broken_xml_is_an_error() {
        let p = RssProvider::from_fixture("Broken", "<rss><channel>");
        assert!(p.fetch_latest().await.is_err());
    }
}
