// src/ingest/mod.rs
//! Collection side of the engine: provider fan-out, text normalization, the TTL feed
//! cache and the periodic scheduler. Network transport is not handled here; providers
//! read content they are given (fixtures, files).

pub mod cache;
pub mod collector;
pub mod providers;
pub mod scheduler;
pub mod types;

use metrics::{counter, histogram};
use once_cell::sync::OnceCell;
use regex::Regex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

use crate::ingest::types::{Collection, SourceProvider, SourceReport};
use crate::model::RawCandidate;
use crate::telemetry::ensure_metrics_described;

pub const MAX_TEXT_CHARS: usize = 1500;

/// Clean a feed headline or summary for classification: markup and entities go away,
/// typographic punctuation folds to ASCII, whitespace collapses, and trailing
/// separators (`.` `,` `;` `:` and clipped ellipses) are dropped. A trailing `?` or
/// `!` is kept because it is part of how the headline reads.
pub fn normalize_text(s: &str) -> String {
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"));

    let decoded = html_escape::decode_html_entities(s);
    let untagged = re_tags.replace_all(&decoded, " ");
    let folded: String = untagged
        .chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' | '\u{00AB}' | '\u{00BB}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{2026}' => '.',
            other => other,
        })
        .collect();
    let collapsed = re_ws.replace_all(&folded, " ");

    collapsed
        .trim()
        .trim_end_matches(['.', ',', ';', ':'])
        .trim_end()
        .chars()
        .take(MAX_TEXT_CHARS)
        .collect()
}

/// Fan out to every provider concurrently. Each branch is isolated: an error, a
/// timeout or a panic is captured in its `SourceReport` and does not affect the
/// others. The result always carries exactly one report per provider.
pub async fn collect_all(providers: &[Arc<dyn SourceProvider>], timeout: Duration) -> Collection {
    ensure_metrics_described();

    let names: Vec<String> = providers.iter().map(|p| p.name().to_string()).collect();
    let mut set = JoinSet::new();
    for (idx, p) in providers.iter().enumerate() {
        let p = Arc::clone(p);
        set.spawn(async move {
            let t0 = Instant::now();
            let res = tokio::time::timeout(timeout, p.fetch_latest()).await;
            histogram!("ingest_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
            (idx, res)
        });
    }

    let mut branches: Vec<Option<(SourceReport, Vec<RawCandidate>)>> = vec![None; providers.len()];
    while let Some(joined) = set.join_next().await {
        let (idx, res) = match joined {
            Ok(v) => v,
            Err(e) => {
                // The slot stays empty and is reported below.
                tracing::warn!(target: "ingest", error = %e, "provider task aborted");
                continue;
            }
        };
        let name = &names[idx];
        let branch = match res {
            Ok(Ok(cands)) => (SourceReport::ok(name, cands.len()), cands),
            Ok(Err(e)) => {
                tracing::warn!(target: "ingest", provider = %name, error = ?e, "provider error");
                counter!("collector_source_errors_total").increment(1);
                (SourceReport::failed(name, format!("{e:#}")), Vec::new())
            }
            Err(_) => {
                tracing::warn!(target: "ingest", provider = %name, ?timeout, "provider timed out");
                counter!("collector_source_errors_total").increment(1);
                (SourceReport::failed(name, "timed out"), Vec::new())
            }
        };
        branches[idx] = Some(branch);
    }

    // Slots are indexed by provider, so the merge keeps provider order.
    let mut out = Collection::default();
    for (idx, slot) in branches.into_iter().enumerate() {
        let (report, mut cands) = slot.unwrap_or_else(|| {
            counter!("collector_source_errors_total").increment(1);
            (SourceReport::failed(&names[idx], "panicked"), Vec::new())
        });
        out.reports.push(report);
        out.candidates.append(&mut cands);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_text_collapses_ws_and_trailing_separators() {
        let s = "  Chip export rules,&nbsp;&nbsp; explained.  ";
        assert_eq!(normalize_text(s), "Chip export rules, explained");
        assert_eq!(normalize_text("Regulators weigh in on frontier models\u{2026}"), "Regulators weigh in on frontier models");
        assert_eq!(normalize_text("Key takeaways: "), "Key takeaways");
    }

    #[test]
    fn normalize_text_keeps_question_and_exclamation() {
        assert_eq!(normalize_text("Will the EU AI Act pass?"), "Will the EU AI Act pass?");
        assert_eq!(normalize_text("<b>It shipped!</b>"), "It shipped!");
    }

    #[test]
    fn normalize_text_folds_dashes() {
        assert_eq!(normalize_text("Nvidia \u{2014} new chips"), "Nvidia - new chips");
    }

    #[test]
    fn normalize_text_strips_tags_and_quotes() {
        let s = "<p>OpenAI&rsquo;s <b>new</b>\n\tmodel &ldquo;ships&rdquo;</p>";
        assert_eq!(normalize_text(s), "OpenAI's new model \"ships\"");
    }

    #[test]
    fn normalize_text_caps_length() {
        let long = "a".repeat(MAX_TEXT_CHARS + 50);
        assert_eq!(normalize_text(&long).chars().count(), MAX_TEXT_CHARS);
    }
}
