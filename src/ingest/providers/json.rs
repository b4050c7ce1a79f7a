// src/ingest/providers/json.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;

use crate::ingest::types::SourceProvider;
use crate::model::RawCandidate;

/// Reads a JSON array of candidates from disk on every fetch. A candidate without a
/// `source` is attributed to the provider name.
pub struct JsonFileProvider {
    name: String,
    path: PathBuf,
    pre_filtered: bool,
}

impl JsonFileProvider {
    pub fn new(name: &str, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            path: path.into(),
            pre_filtered: false,
        }
    }

    /// Mark every candidate from this file as already topic-filtered.
    pub fn pre_filtered(mut self, yes: bool) -> Self {
        self.pre_filtered = yes;
        self
    }
}

#[async_trait]
impl SourceProvider for JsonFileProvider {
    async fn fetch_latest(&self) -> Result<Vec<RawCandidate>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading {}", self.path.display()))?;
        let mut cands: Vec<RawCandidate> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        for c in &mut cands {
            if c.source.trim().is_empty() {
                c.source = self.name.clone();
            }
            c.pre_filtered |= self.pre_filtered;
        }
        Ok(cands)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn reads_candidates_and_fills_source() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            r#"[{{"title":"AI safety report","url":"https://x.test/1"}},
                {{"title":"Other","url":"https://x.test/2","source":"Lab Blog"}}]"#
        )
        .unwrap();
        let p = JsonFileProvider::new("Local", f.path());
        let got = p.fetch_latest().await.unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].source, "Local");
        assert_eq!(got[1].source, "Lab Blog");
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let p = JsonFileProvider::new("Local", "/nonexistent/feed.json");
        assert!(p.fetch_latest().await.is_err());
    }
}
