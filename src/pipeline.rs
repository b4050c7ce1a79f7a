//! # Classification Pipeline
//! Raw candidates → normalized → relevance-gated → classified → deduplicated.
//!
//! Pure apart from telemetry counters; the output keeps the relative order of the
//! first-seen input.

use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Serialize;
use tracing::{debug, info};

use crate::classify::{
    assign_category, classify_sentiment, confidence, detect_region, extract_entities, extract_tags,
    relevance, Rulebook,
};
use crate::dedup::dedupe;
use crate::ingest::normalize_text;
use crate::model::{content_hash, item_id, parse_timestamp, ClassifiedItem, RawCandidate};
use crate::telemetry::ensure_metrics_described;

pub const DEFAULT_LANGUAGE: &str = "en";

/// Per-run counters (also exported as metrics).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub candidates: usize,
    pub irrelevant: usize,
    pub duplicates: usize,
    pub classified: usize,
}

/// Build a `ClassifiedItem` from one (already relevance-checked) candidate.
pub fn classify_one(book: &Rulebook, cand: &RawCandidate, now: DateTime<Utc>) -> ClassifiedItem {
    let title = normalize_text(&cand.title);
    let body = normalize_text(&cand.body);

    let entities = extract_entities(book, &title, &body, &cand.entities);
    let confidence = confidence::score(book, &title, &body, &entities);

    ClassifiedItem {
        id: item_id(&cand.url),
        url: cand.url.trim().to_string(),
        source: cand.source.trim().to_string(),
        category: assign_category(book, &title, &body),
        region: detect_region(book, &title, &body),
        language: cand
            .language
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE)
            .to_ascii_lowercase(),
        sentiment: classify_sentiment(book, &title, &body),
        tags: extract_tags(book, &title, &body),
        entities,
        confidence,
        published_at: cand.published.as_deref().and_then(parse_timestamp),
        ingested_at: cand.discovered.unwrap_or(now),
        content_hash: content_hash(&title, &body),
        title,
    }
}

/// Run the full pipeline over a batch.
pub fn run(
    book: &Rulebook,
    candidates: Vec<RawCandidate>,
    now: DateTime<Utc>,
) -> (Vec<ClassifiedItem>, PipelineStats) {
    ensure_metrics_described();

    let mut stats = PipelineStats {
        candidates: candidates.len(),
        ..Default::default()
    };

    let mut classified = Vec::with_capacity(candidates.len());
    for cand in &candidates {
        let title = normalize_text(&cand.title);
        let body = normalize_text(&cand.body);
        if !relevance::evaluate(book, &title, &body, cand.pre_filtered).relevant {
            stats.irrelevant += 1;
            continue;
        }
        classified.push(classify_one(book, cand, now));
    }

    let before = classified.len();
    let kept = dedupe(classified);
    stats.duplicates = before - kept.len();
    stats.classified = kept.len();

    for it in &kept {
        debug!(
            target: "pipeline",
            id = %it.id,
            category = %it.category,
            region = %it.region,
            confidence = it.confidence,
            "classified"
        );
    }

    counter!("pipeline_candidates_total").increment(stats.candidates as u64);
    counter!("pipeline_irrelevant_total").increment(stats.irrelevant as u64);
    counter!("pipeline_duplicates_total").increment(stats.duplicates as u64);
    counter!("pipeline_classified_total").increment(stats.classified as u64);

    info!(
        target: "pipeline",
        candidates = stats.candidates,
        irrelevant = stats.irrelevant,
        duplicates = stats.duplicates,
        classified = stats.classified,
        "pipeline run"
    );

    (kept, stats)
}
