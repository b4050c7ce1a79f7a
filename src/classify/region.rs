// src/classify/region.rs
//! Jurisdiction detection. Same first-match dispatch as categories, independent table.

use super::rules::{joined, Rulebook};

pub fn detect_region(book: &Rulebook, title: &str, body: &str) -> String {
    let text = joined(title, body);
    book.regions
        .first_match(&text)
        .map(|r| r.label.clone())
        .unwrap_or_else(|| book.fallback_region.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(title: &str) -> String {
        detect_region(Rulebook::builtin(), title, "")
    }

    #[test]
    fn detects_known_jurisdictions() {
        assert_eq!(region("Brussels finalises AI Act text"), "EU");
        assert_eq!(region("Ofcom opens consultation on chatbots"), "UK");
        assert_eq!(region("White House issues AI executive order"), "US");
        assert_eq!(region("Beijing labs release open model"), "China");
    }

    #[test]
    fn pronoun_us_is_not_the_united_states() {
        assert_eq!(region("Tell us what you think of this model"), "Global");
        assert_eq!(region("US senators question AI labs"), "US");
    }

    #[test]
    fn falls_back_when_unattributed() {
        assert_eq!(region("New model tops leaderboard"), "Global");
    }
}
