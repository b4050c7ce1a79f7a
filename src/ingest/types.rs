// src/ingest/types.rs
use anyhow::Result;
use serde::Serialize;

use crate::model::RawCandidate;

/// A content source the collector fans out to.
#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<RawCandidate>>;
    fn name(&self) -> &str;
}

/// Per-source outcome of one collection cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub source: String,
    pub ok: bool,
    pub fetched: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SourceReport {
    pub fn ok(source: impl Into<String>, fetched: usize) -> Self {
        Self {
            source: source.into(),
            ok: true,
            fetched,
            error: None,
        }
    }

    pub fn failed(source: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ok: false,
            fetched: 0,
            error: Some(error.into()),
        }
    }
}

/// Merged result of a fan-out: candidates from the branches that succeeded, in
/// provider order, plus one report per provider.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub candidates: Vec<RawCandidate>,
    pub reports: Vec<SourceReport>,
}

impl Collection {
    /// True when there was at least one provider and every one of them failed.
    pub fn all_failed(&self) -> bool {
        !self.reports.is_empty() && self.reports.iter().all(|r| !r.ok)
    }

    pub fn failed_count(&self) -> usize {
        self.reports.iter().filter(|r| !r.ok).count()
    }
}
