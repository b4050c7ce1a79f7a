// src/classify/relevance.rs
//! Relevance gate: noise blockers first, then the domain-keyword inclusion test.

use tracing::debug;

use super::rules::{joined, Rulebook};
use crate::model::short_hash;

/// Result of relevance evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relevance {
    pub relevant: bool,
    /// Inclusion rule ids that matched.
    pub matched: Vec<String>,
    pub reasons: Vec<String>,
}

/// Evaluate a record. Exclusion always wins; `pre_filtered` sources skip the
/// inclusion test but are still subject to exclusion.
pub fn evaluate(book: &Rulebook, title: &str, body: &str, pre_filtered: bool) -> Relevance {
    let text = joined(title, body);
    let mut rel = Relevance::default();

    // 1) Noise blockers
    let blockers: Vec<String> = book
        .noise
        .all_matches(&text)
        .map(|r| format!("blocker:{}", r.id))
        .collect();
    if !blockers.is_empty() {
        rel.reasons = blockers;
        log_verdict("blocked", &text, &rel);
        return rel;
    }

    // 2) Trusted sources
    if pre_filtered {
        rel.relevant = true;
        rel.reasons.push("pre_filtered".into());
        log_verdict("passed", &text, &rel);
        return rel;
    }

    // 3) Domain keywords
    rel.matched = book.domain.all_matches(&text).map(|r| r.id.clone()).collect();
    rel.relevant = !rel.matched.is_empty();
    rel.reasons.push(if rel.relevant {
        "domain_ok".into()
    } else {
        "domain_miss".into()
    });
    log_verdict(if rel.relevant { "passed" } else { "no_domain" }, &text, &rel);
    rel
}

/// Plain boolean form for a non-pre-filtered record.
pub fn is_relevant(book: &Rulebook, title: &str, body: &str) -> bool {
    evaluate(book, title, body, false).relevant
}

// Never log raw text, only a hashed id.
fn log_verdict(event: &str, text: &str, rel: &Relevance) {
    debug!(
        target: "pipeline",
        id = %short_hash(text, 6),
        event,
        matched = ?rel.matched,
        reasons = ?rel.reasons,
        "relevance"
    );
}
