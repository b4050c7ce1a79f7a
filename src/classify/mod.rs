// src/classify/mod.rs
//! Classification stage: relevance gate, category / region / sentiment labels and the
//! confidence score, all driven by one compiled [`Rulebook`].

pub mod category;
pub mod confidence;
pub mod region;
pub mod relevance;
pub mod rules;
pub mod sentiment;

pub use category::assign_category;
pub use confidence::{extract_entities, extract_tags, ScoreInputs};
pub use region::detect_region;
pub use relevance::{is_relevant, Relevance};
pub use rules::Rulebook;
pub use sentiment::classify_sentiment;
