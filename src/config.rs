// src/config.rs
//! Engine configuration.
//!
//! Resolution: `$SIGNAL_CONFIG_PATH` → `config/engine.toml` → built-in defaults.
//! Every field has a default, so a partial file only overrides what it names.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::window::TimeWindow;

pub const ENV_CONFIG_PATH: &str = "SIGNAL_CONFIG_PATH";
const DEFAULT_CONFIG_FILE: &str = "config/engine.toml";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub analytics: AnalyticsConfig,
    pub alerts: AlertConfig,
    pub collector: CollectorConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Short windows reported as KPIs.
    pub kpi_windows: Vec<TimeWindow>,
    pub top_n: usize,
    /// Items scoring below this count as low-confidence.
    pub low_confidence_threshold: f64,
    pub trend_buckets: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            kpi_windows: vec![TimeWindow::M15, TimeWindow::H1, TimeWindow::D7],
            top_n: 10,
            low_confidence_threshold: 0.6,
            trend_buckets: 6,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct AlertConfig {
    /// Both windows below this count ⇒ not eligible.
    pub min_baseline: usize,
    pub min_delta_pct: f64,
    pub high_delta_pct: f64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            min_baseline: 3,
            min_delta_pct: 30.0,
            high_delta_pct: 80.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CollectorConfig {
    pub cache_ttl_secs: u64,
    pub fetch_timeout_secs: u64,
    pub interval_secs: u64,
    pub feeds: Vec<FeedConfig>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 1800,
            fetch_timeout_secs: 15,
            interval_secs: 600,
            feeds: Vec::new(),
        }
    }
}

impl CollectorConfig {
    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.cache_ttl_secs as i64)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

/// One local feed: `.json` files hold a candidate array, anything else is RSS.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FeedConfig {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub pre_filtered: bool,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    pub capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { capacity: 50_000 }
    }
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: EngineConfig = toml::from_str(s).context("parsing engine config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from an explicit path. Relative feed paths resolve against the file's directory.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading engine config from {}", path.display()))?;
        let mut cfg = Self::from_toml_str(&content)
            .with_context(|| format!("in {}", path.display()))?;
        if let Some(dir) = path.parent() {
            for f in &mut cfg.collector.feeds {
                if f.path.is_relative() {
                    f.path = dir.join(&f.path);
                }
            }
        }
        Ok(cfg)
    }

    /// Env var, then `config/engine.toml`, then defaults.
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        let p = PathBuf::from(DEFAULT_CONFIG_FILE);
        if p.exists() {
            return Self::load_from(&p);
        }
        Ok(Self::default())
    }

    fn validate(&self) -> Result<()> {
        let a = &self.analytics;
        if !(0.0..=1.0).contains(&a.low_confidence_threshold) {
            return Err(anyhow!("analytics.low_confidence_threshold must be within [0, 1]"));
        }
        if a.trend_buckets == 0 {
            return Err(anyhow!("analytics.trend_buckets must be at least 1"));
        }
        if self.alerts.high_delta_pct < self.alerts.min_delta_pct {
            return Err(anyhow!("alerts.high_delta_pct must not be below alerts.min_delta_pct"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = EngineConfig::from_toml_str(
            r#"
            [analytics]
            top_n = 5
            kpi_windows = ["1h", "24h"]

            [[collector.feeds]]
            name = "Lab Blog"
            path = "feeds/lab.xml"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.analytics.top_n, 5);
        assert_eq!(cfg.analytics.kpi_windows, vec![TimeWindow::H1, TimeWindow::H24]);
        assert_eq!(cfg.analytics.trend_buckets, 6);
        assert_eq!(cfg.alerts, AlertConfig::default());
        assert_eq!(cfg.collector.feeds.len(), 1);
        assert!(!cfg.collector.feeds[0].pre_filtered);
        assert_eq!(cfg.store.capacity, 50_000);
    }

    #[test]
    fn rejects_inverted_alert_thresholds() {
        let err = EngineConfig::from_toml_str("[alerts]\nmin_delta_pct = 90.0\nhigh_delta_pct = 50.0\n");
        assert!(err.is_err());
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallbacks() {
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();
        env::remove_var(ENV_CONFIG_PATH);

        assert_eq!(EngineConfig::load_default().unwrap(), EngineConfig::default());

        let p = tmp.path().join("custom.toml");
        fs::write(&p, "[store]\ncapacity = 7\n[[collector.feeds]]\nname = \"F\"\npath = \"f.json\"\n").unwrap();
        env::set_var(ENV_CONFIG_PATH, p.display().to_string());
        let cfg = EngineConfig::load_default().unwrap();
        assert_eq!(cfg.store.capacity, 7);
        assert_eq!(cfg.collector.feeds[0].path, tmp.path().join("f.json"));

        env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml").display().to_string());
        assert!(EngineConfig::load_default().is_err());
        env::remove_var(ENV_CONFIG_PATH);

        env::set_current_dir(&old).unwrap();
    }
}
