// src/analytics/risk.rs
//! Composite 0–100 risk score.
//!
//! `clamp(round(incident·30 + low_conf·25 + hhi/10000·25 + min(high_alerts·5, 20)))`

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analytics::Level;
use crate::model::{Category, ClassifiedItem};
use crate::window::TimeWindow;

pub const W_INCIDENT: f64 = 30.0;
pub const W_LOW_CONFIDENCE: f64 = 25.0;
pub const W_CONCENTRATION: f64 = 25.0;
pub const ALERT_POINTS: u32 = 5;
pub const ALERT_CAP: u32 = 20;

pub const INCIDENT_TRIGGER: f64 = 0.10;
pub const LOW_CONFIDENCE_TRIGGER: f64 = 0.20;

pub const NO_SIGNALS: &str = "no significant risk signals";

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RiskInputs {
    pub incident_ratio: f64,
    pub low_confidence_ratio: f64,
    pub combined_hhi: u32,
    pub combined_level: Option<Level>,
    pub high_alerts: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskIndex {
    pub window: TimeWindow,
    pub generated_at: DateTime<Utc>,
    pub score: u32,
    pub level: Level,
    pub incident_ratio: f64,
    pub low_confidence_ratio: f64,
    pub combined_hhi: u32,
    pub high_alerts: usize,
    /// Never empty.
    pub reasons: Vec<String>,
}

pub fn risk_level(score: u32) -> Level {
    if score >= 60 {
        Level::High
    } else if score >= 30 {
        Level::Medium
    } else {
        Level::Low
    }
}

fn clamp_score(raw: f64) -> u32 {
    raw.round().clamp(0.0, 100.0) as u32
}

/// Ratio-only sub-score used by trend buckets.
pub fn ratio_score(incident_ratio: f64, low_confidence_ratio: f64) -> u32 {
    clamp_score(incident_ratio * W_INCIDENT + low_confidence_ratio * W_LOW_CONFIDENCE)
}

pub fn risk_score(inp: &RiskInputs) -> u32 {
    let alerts = (inp.high_alerts as u32).saturating_mul(ALERT_POINTS).min(ALERT_CAP);
    clamp_score(
        inp.incident_ratio * W_INCIDENT
            + inp.low_confidence_ratio * W_LOW_CONFIDENCE
            + inp.combined_hhi as f64 / 10_000.0 * W_CONCENTRATION
            + alerts as f64,
    )
}

pub fn reasons(inp: &RiskInputs) -> Vec<String> {
    let mut out = Vec::new();
    if inp.incident_ratio > INCIDENT_TRIGGER {
        out.push(format!("incident share at {:.1}%", inp.incident_ratio * 100.0));
    }
    if inp.low_confidence_ratio > LOW_CONFIDENCE_TRIGGER {
        out.push(format!(
            "low-confidence share at {:.1}%",
            inp.low_confidence_ratio * 100.0
        ));
    }
    if inp.combined_level == Some(Level::High) {
        out.push(format!("high coverage concentration (HHI {})", inp.combined_hhi));
    }
    if inp.high_alerts > 0 {
        out.push(format!("{} high-severity alert(s)", inp.high_alerts));
    }
    if out.is_empty() {
        out.push(NO_SIGNALS.to_string());
    }
    out
}

/// `(incident_ratio, low_confidence_ratio)`; both 0 for an empty slice.
pub fn ratios<'a, I>(items: I, low_confidence_threshold: f64) -> (f64, f64)
where
    I: IntoIterator<Item = &'a ClassifiedItem>,
{
    let (mut n, mut incidents, mut low) = (0usize, 0usize, 0usize);
    for it in items {
        n += 1;
        if it.category == Category::Incidents {
            incidents += 1;
        }
        if it.confidence < low_confidence_threshold {
            low += 1;
        }
    }
    if n == 0 {
        return (0.0, 0.0);
    }
    (incidents as f64 / n as f64, low as f64 / n as f64)
}

pub(crate) fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

pub fn risk_index(inp: RiskInputs, window: TimeWindow, now: DateTime<Utc>) -> RiskIndex {
    let score = risk_score(&inp);
    RiskIndex {
        window,
        generated_at: now,
        score,
        level: risk_level(score),
        incident_ratio: round3(inp.incident_ratio),
        low_confidence_ratio: round3(inp.low_confidence_ratio),
        combined_hhi: inp.combined_hhi,
        high_alerts: inp.high_alerts,
        reasons: reasons(&inp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_inputs_are_low_with_fallback_reason() {
        let inp = RiskInputs::default();
        assert_eq!(risk_score(&inp), 0);
        assert_eq!(reasons(&inp), vec![NO_SIGNALS.to_string()]);
    }

    #[test]
    fn weighted_sum_and_alert_cap() {
        let inp = RiskInputs {
            incident_ratio: 0.5,
            low_confidence_ratio: 0.4,
            combined_hhi: 10_000,
            combined_level: Some(Level::High),
            high_alerts: 9,
        };
        // 15 + 10 + 25 + 20
        assert_eq!(risk_score(&inp), 70);
        assert_eq!(risk_level(70), Level::High);
        assert_eq!(reasons(&inp).len(), 4);
    }

    #[test]
    fn score_never_exceeds_100() {
        let inp = RiskInputs {
            incident_ratio: 1.0,
            low_confidence_ratio: 1.0,
            combined_hhi: 10_000,
            combined_level: Some(Level::High),
            high_alerts: 100,
        };
        assert_eq!(risk_score(&inp), 100);
    }

    #[test]
    fn level_thresholds() {
        assert_eq!(risk_level(29), Level::Low);
        assert_eq!(risk_level(30), Level::Medium);
        assert_eq!(risk_level(59), Level::Medium);
        assert_eq!(risk_level(60), Level::High);
    }

    #[test]
    fn ratio_score_ignores_concentration() {
        assert_eq!(ratio_score(0.2, 0.4), 16);
    }
}
