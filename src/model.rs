//! model.rs — Core records flowing through the engine.
//!
//! `RawCandidate` is what collectors hand us; `ClassifiedItem` is the durable unit the
//! analytics layer consumes. Both are plain serde structs so they can be persisted or
//! shipped to a presentation layer unchanged.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Closed set of categories an item can land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Policy,
    Research,
    Industry,
    Funding,
    News,
    Incidents,
}

impl Category {
    /// Fixed evaluation order used by alerting and reports.
    pub const ALL: [Category; 6] = [
        Category::Policy,
        Category::Research,
        Category::Industry,
        Category::Funding,
        Category::News,
        Category::Incidents,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Policy => "policy",
            Category::Research => "research",
            Category::Industry => "industry",
            Category::Funding => "funding",
            Category::News => "news",
            Category::Incidents => "incidents",
        }
    }

    /// Case-insensitive parse; `None` for anything outside the closed set.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "policy" => Some(Category::Policy),
            "research" => Some(Category::Research),
            "industry" => Some(Category::Industry),
            "funding" => Some(Category::Funding),
            "news" => Some(Category::News),
            "incidents" | "incident" => Some(Category::Incidents),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Concerning,
}

/// Unclassified record from an external source. Consumed once by the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCandidate {
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub url: String,
    #[serde(default)]
    pub source: String,
    /// Raw publish timestamp as delivered by the source (RFC 3339, RFC 2822 or YYYY-MM-DD).
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub discovered: Option<DateTime<Utc>>,
    #[serde(default)]
    pub entities: Vec<String>,
    /// Source is trusted to already be in-domain; skips the inclusion test.
    #[serde(default)]
    pub pre_filtered: bool,
    #[serde(default)]
    pub language: Option<String>,
}

impl RawCandidate {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        url: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            url: url.into(),
            source: source.into(),
            ..Default::default()
        }
    }

    pub fn published(mut self, ts: impl Into<String>) -> Self {
        self.published = Some(ts.into());
        self
    }

    pub fn with_entities<I, S>(mut self, entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entities = entities.into_iter().map(Into::into).collect();
        self
    }

    pub fn pre_filtered(mut self, yes: bool) -> Self {
        self.pre_filtered = yes;
        self
    }
}

/// Classified, scored, deduplicated item. Immutable once built; a re-ingest
/// produces a new value with the same `id` that supersedes the old one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedItem {
    pub id: String,
    pub title: String,
    pub url: String,
    pub source: String,
    pub category: Category,
    pub region: String,
    pub language: String,
    pub sentiment: Sentiment,
    #[serde(default)]
    pub entities: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Always in [0, 1].
    pub confidence: f64,
    /// `None` when the source timestamp could not be parsed; such items never
    /// fall inside a time window.
    pub published_at: Option<DateTime<Utc>>,
    pub ingested_at: DateTime<Utc>,
    pub content_hash: String,
}

impl ClassifiedItem {
    /// Timestamp used for all window arithmetic.
    #[inline]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }
}

/// Canonical form of a URL for identity: trimmed, fragment and trailing slash
/// removed, scheme and host lowercased.
pub fn canonical_url(url: &str) -> String {
    let mut u = url.trim();
    if let Some(pos) = u.find('#') {
        u = &u[..pos];
    }
    let u = u.trim_end_matches('/');

    match u.find("://") {
        Some(scheme_end) => {
            let rest = &u[scheme_end + 3..];
            let host_end = rest.find('/').unwrap_or(rest.len());
            format!(
                "{}://{}{}",
                u[..scheme_end].to_ascii_lowercase(),
                rest[..host_end].to_ascii_lowercase(),
                &rest[host_end..]
            )
        }
        None => u.to_string(),
    }
}

/// Short hex digest (first `bytes` bytes of SHA-256).
pub(crate) fn short_hash(text: &str, bytes: usize) -> String {
    use std::fmt::Write as _;
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(bytes * 2);
    for b in digest.iter().take(bytes) {
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Stable item id derived from the canonical URL.
pub fn item_id(url: &str) -> String {
    short_hash(&canonical_url(url), 6)
}

/// Content hash over normalized title + body.
pub fn content_hash(title: &str, body: &str) -> String {
    let norm = format!("{}\n{}", title.trim().to_lowercase(), body.trim().to_lowercase());
    short_hash(&norm, 16)
}

/// Parse a source timestamp. Unparseable input yields `None` (never an error).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
