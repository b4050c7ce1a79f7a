// src/classify/sentiment.rs
//! Lexicon sentiment: count positive vs negative tokens, larger side wins.

use super::rules::{joined, Rulebook};
use crate::model::Sentiment;

/// Returns `(positive_hits, negative_hits)` over the lowercased token stream.
pub fn count_hits(book: &Rulebook, text: &str) -> (usize, usize) {
    let mut pos = 0usize;
    let mut neg = 0usize;
    for tok in tokenize(text) {
        if book.positive.contains(&tok) {
            pos += 1;
        }
        if book.negative.contains(&tok) {
            neg += 1;
        }
    }
    (pos, neg)
}

pub fn classify_sentiment(book: &Rulebook, title: &str, body: &str) -> Sentiment {
    let (pos, neg) = count_hits(book, &joined(title, body));
    match pos.cmp(&neg) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Concerning,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}

/// Alphanumeric tokens, lower-case.
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(title: &str, body: &str) -> Sentiment {
        classify_sentiment(Rulebook::builtin(), title, body)
    }

    #[test]
    fn majority_decides() {
        assert_eq!(s("Breakthrough in protein folding", "A milestone for science"), Sentiment::Positive);
        assert_eq!(s("Regulator warns of deepfake fraud", ""), Sentiment::Concerning);
    }

    #[test]
    fn ties_and_empty_are_neutral() {
        assert_eq!(s("", ""), Sentiment::Neutral);
        assert_eq!(s("Launch delayed by lawsuit", ""), Sentiment::Neutral);
    }

    #[test]
    fn repeated_words_count_each_time() {
        let (p, n) = count_hits(Rulebook::builtin(), "risk, risk and more RISK");
        assert_eq!((p, n), (0, 3));
    }
}
