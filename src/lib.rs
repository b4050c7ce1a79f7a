// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod aggregate;
pub mod analytics;
pub mod classify;
pub mod config;
pub mod dedup;
pub mod ingest;
pub mod model;
pub mod pipeline;
pub mod store;
pub mod telemetry;
pub mod window;

// ---- Re-exports for stable public API ----
pub use analytics::{AnalyticsEngine, AnalyticsReport};
pub use classify::Rulebook;
pub use config::EngineConfig;
pub use ingest::collector::{Collector, Snapshot};
pub use model::{Category, ClassifiedItem, RawCandidate, Sentiment};
pub use window::TimeWindow;
