// src/analytics/mod.rs
//! Windowed analytics over a classified item collection.
//!
//! Every function here is total: an empty collection yields zeroed records, and items
//! without a timestamp are simply outside every window. Nothing is mutated; each call
//! allocates fresh output stamped with its window and generation time.

pub mod alerts;
pub mod breakdown;
pub mod concentration;
pub mod kpi;
pub mod momentum;
pub mod risk;
pub mod trend;

pub use alerts::{AlertEntry, Alerts, Direction, Severity};
pub use breakdown::Breakdowns;
pub use concentration::{Concentration, ConcentrationIndex};
pub use kpi::Kpi;
pub use momentum::{delta_percent, Dimension, Momentum, MomentumEntry};
pub use risk::{RiskIndex, RiskInputs};
pub use trend::{Trend, TrendPoint};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::config::{AlertConfig, AnalyticsConfig, EngineConfig};
use crate::model::ClassifiedItem;
use crate::window::{current_and_previous, filter_range, TimeWindow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

/// Everything the dashboard needs for one window.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub window: TimeWindow,
    pub generated_at: DateTime<Utc>,
    pub kpis: Vec<Kpi>,
    pub breakdowns: Breakdowns,
    pub momentum: Vec<Momentum>,
    pub concentration: Concentration,
    pub alerts: Alerts,
    pub risk: RiskIndex,
    pub trend: Trend,
}

/// Thresholds and limits bound once; the item collection is passed per call.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    pub analytics: AnalyticsConfig,
    pub alerts: AlertConfig,
}

impl AnalyticsEngine {
    pub fn new(analytics: AnalyticsConfig, alerts: AlertConfig) -> Self {
        Self { analytics, alerts }
    }

    pub fn from_config(cfg: &EngineConfig) -> Self {
        Self::new(cfg.analytics.clone(), cfg.alerts)
    }

    pub fn kpis(&self, items: &[ClassifiedItem], now: DateTime<Utc>) -> Vec<Kpi> {
        kpi::kpis(items, &self.analytics.kpi_windows, now)
    }

    pub fn breakdowns(
        &self,
        items: &[ClassifiedItem],
        window: TimeWindow,
        now: DateTime<Utc>,
        limit: Option<usize>,
    ) -> Breakdowns {
        breakdown::breakdowns(items, window, now, limit.unwrap_or(self.analytics.top_n))
    }

    pub fn momentum(
        &self,
        items: &[ClassifiedItem],
        dimension: Dimension,
        window: TimeWindow,
        now: DateTime<Utc>,
        limit: Option<usize>,
    ) -> Momentum {
        momentum::momentum(
            items,
            dimension,
            window,
            now,
            Some(limit.unwrap_or(self.analytics.top_n)),
        )
    }

    pub fn concentration(
        &self,
        items: &[ClassifiedItem],
        window: TimeWindow,
        now: DateTime<Utc>,
    ) -> Concentration {
        concentration::concentration(items, window, now)
    }

    pub fn alerts(&self, items: &[ClassifiedItem], window: TimeWindow, now: DateTime<Utc>) -> Alerts {
        alerts::alerts(items, window, now, &self.alerts)
    }

    /// Risk for the current window. Computes concentration and alerts when not supplied.
    pub fn risk(
        &self,
        items: &[ClassifiedItem],
        window: TimeWindow,
        now: DateTime<Utc>,
        concentration: Option<&Concentration>,
        alerts: Option<&Alerts>,
    ) -> RiskIndex {
        let (cur_r, _) = current_and_previous(window, now);
        let cur = filter_range(items, &cur_r, ClassifiedItem::timestamp);
        let (incident_ratio, low_confidence_ratio) =
            risk::ratios(cur.iter().copied(), self.analytics.low_confidence_threshold);

        let conc = match concentration {
            Some(c) => c.combined,
            None => self.concentration(items, window, now).combined,
        };
        let high_alerts = match alerts {
            Some(a) => a.high_count(),
            None => self.alerts(items, window, now).high_count(),
        };

        risk::risk_index(
            RiskInputs {
                incident_ratio,
                low_confidence_ratio,
                combined_hhi: conc.hhi,
                combined_level: Some(conc.level),
                high_alerts,
            },
            window,
            now,
        )
    }

    pub fn trend(&self, items: &[ClassifiedItem], window: TimeWindow, now: DateTime<Utc>) -> Trend {
        trend::trend(
            items,
            window,
            now,
            self.analytics.trend_buckets,
            self.analytics.low_confidence_threshold,
        )
    }

    pub fn report(&self, items: &[ClassifiedItem], window: TimeWindow, now: DateTime<Utc>) -> AnalyticsReport {
        let concentration = self.concentration(items, window, now);
        let alerts = self.alerts(items, window, now);
        let risk = self.risk(items, window, now, Some(&concentration), Some(&alerts));
        let momentum = [Dimension::Category, Dimension::Source, Dimension::Entity]
            .into_iter()
            .map(|d| self.momentum(items, d, window, now, None))
            .collect();

        let report = AnalyticsReport {
            window,
            generated_at: now,
            kpis: self.kpis(items, now),
            breakdowns: self.breakdowns(items, window, now, None),
            momentum,
            concentration,
            alerts,
            risk,
            trend: self.trend(items, window, now),
        };

        info!(
            target: "analytics",
            window = %window,
            items = report.breakdowns.total,
            risk = report.risk.score,
            alerts = report.alerts.entries.len(),
            "report built"
        );
        report
    }
}
