// src/classify/confidence.rs
//! Confidence scoring plus the entity / tag extraction that feeds it.
//!
//! score = base + min(entities * ENTITY_BONUS, ENTITY_CAP)
//!              + min(critical_hits * KEYWORD_BONUS, KEYWORD_CAP)
//! clamped to [0, 1]. Monotonic in both counts up to the caps.

use super::rules::{joined, Rulebook};

pub const BASE_SCORE: f64 = 0.5;
pub const ENTITY_BONUS: f64 = 0.1;
pub const ENTITY_CAP: f64 = 0.3;
pub const KEYWORD_BONUS: f64 = 0.05;
pub const KEYWORD_CAP: f64 = 0.2;

/// Signals the scorer looks at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreInputs {
    pub entity_matches: usize,
    pub keyword_hits: usize,
}

impl ScoreInputs {
    pub fn new(entity_matches: usize, keyword_hits: usize) -> Self {
        Self {
            entity_matches,
            keyword_hits,
        }
    }
}

pub fn confidence(inputs: &ScoreInputs) -> f64 {
    let entity = (inputs.entity_matches as f64 * ENTITY_BONUS).min(ENTITY_CAP);
    let keyword = (inputs.keyword_hits as f64 * KEYWORD_BONUS).min(KEYWORD_CAP);
    round3(BASE_SCORE + entity + keyword).clamp(0.0, 1.0)
}

/// Score a record given the entities already matched for it.
pub fn score(book: &Rulebook, title: &str, body: &str, matched_entities: &[String]) -> f64 {
    let text = joined(title, body);
    let keyword_hits = book.critical.all_matches(&text).count();
    confidence(&ScoreInputs::new(matched_entities.len(), keyword_hits))
}

/// Monitored entities found in the text merged with the pre-known mentions.
/// Case-insensitive dedup, first-seen order (known mentions first).
pub fn extract_entities(book: &Rulebook, title: &str, body: &str, known: &[String]) -> Vec<String> {
    let text = joined(title, body);
    let mut out: Vec<String> = Vec::new();
    let detected = book.entities.all_matches(&text).map(|r| r.label.as_str());
    for name in known.iter().map(|s| s.trim()).chain(detected) {
        if name.is_empty() {
            continue;
        }
        if !out.iter().any(|e| e.eq_ignore_ascii_case(name)) {
            out.push(name.to_string());
        }
    }
    out
}

/// All topical tags whose rule matches, in table order.
pub fn extract_tags(book: &Rulebook, title: &str, body: &str) -> Vec<String> {
    let text = joined(title, body);
    let mut tags: Vec<String> = Vec::new();
    for r in book.tags.all_matches(&text) {
        if !tags.contains(&r.label) {
            tags.push(r.label.clone());
        }
    }
    tags
}

#[inline]
fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_without_signals() {
        assert!((confidence(&ScoreInputs::default()) - BASE_SCORE).abs() < 1e-9);
    }

    #[test]
    fn bonuses_are_capped_and_bounded() {
        let max = confidence(&ScoreInputs::new(50, 50));
        assert!((max - 1.0).abs() < 1e-9);
        assert!(max <= 1.0);
    }

    #[test]
    fn monotonic_in_each_input() {
        let mut prev = 0.0;
        for n in 0..10 {
            let c = confidence(&ScoreInputs::new(n, 0));
            assert!(c >= prev, "entity count {n}: {c} < {prev}");
            prev = c;
        }
        let mut prev = 0.0;
        for k in 0..10 {
            let c = confidence(&ScoreInputs::new(1, k));
            assert!(c >= prev, "keyword hits {k}: {c} < {prev}");
            prev = c;
        }
    }

    #[test]
    fn entities_merge_known_and_detected() {
        let book = Rulebook::builtin();
        let known = vec!["openai".to_string(), "Acme".to_string()];
        let ents = extract_entities(book, "OpenAI and Anthropic sign pact", "", &known);
        assert_eq!(ents, vec!["openai", "Acme", "Anthropic"]);
    }

    #[test]
    fn score_counts_entities_and_keywords() {
        let book = Rulebook::builtin();
        let ents = vec!["Anthropic".to_string()];
        let s = score(book, "Anthropic publishes generative AI study", "", &ents);
        // base 0.5 + 1 entity 0.1 + 1 keyword 0.05
        assert!((s - 0.65).abs() < 1e-9, "got {s}");
    }

    #[test]
    fn tags_collect_every_match() {
        let tags = extract_tags(Rulebook::builtin(), "Open-source LLM improves safety", "GPU budget");
        assert_eq!(tags, vec!["safety", "open-source", "compute", "models"]);
    }
}
