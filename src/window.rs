//! window.rs — symbolic time windows and the current/previous interval pair.
//!
//! Current interval = `[now − Δ, now)`, previous = `[now − 2Δ, now − Δ)`.
//! Items without a parseable timestamp never fall inside any window.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeWindow {
    M15,
    H1,
    H6,
    H24,
    D7,
    D30,
    D90,
    Y1,
    Y5,
}

impl TimeWindow {
    /// Fallback for unknown tokens.
    pub const DEFAULT: TimeWindow = TimeWindow::H24;

    pub const ALL: [TimeWindow; 9] = [
        TimeWindow::M15,
        TimeWindow::H1,
        TimeWindow::H6,
        TimeWindow::H24,
        TimeWindow::D7,
        TimeWindow::D30,
        TimeWindow::D90,
        TimeWindow::Y1,
        TimeWindow::Y5,
    ];

    /// Exact token match (case-insensitive); `None` when unknown.
    pub fn parse(token: &str) -> Option<Self> {
        let t = token.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|w| w.token() == t)
    }

    /// Lenient form: unknown tokens map to [`TimeWindow::DEFAULT`].
    pub fn from_token(token: &str) -> Self {
        Self::parse(token).unwrap_or_else(|| {
            tracing::debug!(target: "analytics", token, "unknown window token, using default");
            Self::DEFAULT
        })
    }

    pub fn token(&self) -> &'static str {
        match self {
            TimeWindow::M15 => "15m",
            TimeWindow::H1 => "1h",
            TimeWindow::H6 => "6h",
            TimeWindow::H24 => "24h",
            TimeWindow::D7 => "7d",
            TimeWindow::D30 => "30d",
            TimeWindow::D90 => "90d",
            TimeWindow::Y1 => "1y",
            TimeWindow::Y5 => "5y",
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            TimeWindow::M15 => Duration::minutes(15),
            TimeWindow::H1 => Duration::hours(1),
            TimeWindow::H6 => Duration::hours(6),
            TimeWindow::H24 => Duration::hours(24),
            TimeWindow::D7 => Duration::days(7),
            TimeWindow::D30 => Duration::days(30),
            TimeWindow::D90 => Duration::days(90),
            TimeWindow::Y1 => Duration::days(365),
            TimeWindow::Y5 => Duration::days(5 * 365),
        }
    }

    /// Window length in milliseconds.
    pub fn to_millis(&self) -> i64 {
        self.duration().num_milliseconds()
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl Serialize for TimeWindow {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.token())
    }
}

impl<'de> Deserialize<'de> for TimeWindow {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        TimeWindow::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown time window `{s}`")))
    }
}

/// `now − ts ≤ Δ`. A missing timestamp is never within a window.
pub fn within_window(ts: Option<DateTime<Utc>>, window: TimeWindow, now: DateTime<Utc>) -> bool {
    match ts {
        Some(t) => now - t <= window.duration(),
        None => false,
    }
}

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn contains(&self, ts: Option<DateTime<Utc>>) -> bool {
        ts.is_some_and(|t| t >= self.start && t < self.end)
    }

    pub fn length(&self) -> Duration {
        self.end - self.start
    }

    /// Split into `n` contiguous equal sub-ranges (the last absorbs rounding).
    pub fn split(&self, n: usize) -> Vec<TimeRange> {
        let n = n.max(1);
        let total_ms = self.length().num_milliseconds();
        let step = total_ms / n as i64;
        (0..n)
            .map(|i| {
                let start = self.start + Duration::milliseconds(step * i as i64);
                let end = if i + 1 == n {
                    self.end
                } else {
                    self.start + Duration::milliseconds(step * (i as i64 + 1))
                };
                TimeRange { start, end }
            })
            .collect()
    }
}

/// `(current, previous)` ranges of equal length, contiguous, ending at `now`.
pub fn current_and_previous(window: TimeWindow, now: DateTime<Utc>) -> (TimeRange, TimeRange) {
    let d = window.duration();
    let current = TimeRange {
        start: now - d,
        end: now,
    };
    let previous = TimeRange {
        start: now - d - d,
        end: now - d,
    };
    (current, previous)
}

/// Items whose timestamp falls in `range`.
pub fn filter_range<'a, T, F>(items: &'a [T], range: &TimeRange, ts: F) -> Vec<&'a T>
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    items.iter().filter(|it| range.contains(ts(it))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn tokens_roundtrip_and_unknown_falls_back() {
        for w in TimeWindow::ALL {
            assert_eq!(TimeWindow::from_token(w.token()), w);
        }
        assert_eq!(TimeWindow::from_token("2 weeks"), TimeWindow::H24);
        assert_eq!(TimeWindow::parse("7D"), Some(TimeWindow::D7));
        assert_eq!(TimeWindow::H1.to_millis(), 3_600_000);
    }

    #[test]
    fn within_window_seven_days() {
        let w = TimeWindow::D7;
        assert!(within_window(Some(now() - Duration::hours(1)), w, now()));
        assert!(!within_window(Some(now() - Duration::days(8)), w, now()));
        assert!(within_window(Some(now() - Duration::days(7)), w, now()));
        assert!(!within_window(None, w, now()));
    }

    #[test]
    fn current_and_previous_are_contiguous() {
        let (cur, prev) = current_and_previous(TimeWindow::H6, now());
        assert_eq!(cur.end, now());
        assert_eq!(prev.end, cur.start);
        assert_eq!(cur.length(), prev.length());
        // half-open: boundary belongs to current only
        assert!(cur.contains(Some(cur.start)));
        assert!(!prev.contains(Some(cur.start)));
        assert!(!cur.contains(Some(now())));
    }

    #[test]
    fn split_covers_range() {
        let (cur, _) = current_and_previous(TimeWindow::H24, now());
        let parts = cur.split(6);
        assert_eq!(parts.len(), 6);
        assert_eq!(parts[0].start, cur.start);
        assert_eq!(parts[5].end, cur.end);
        for pair in parts.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn serde_uses_tokens() {
        let v = serde_json::to_value(TimeWindow::D30).unwrap();
        assert_eq!(v, serde_json::json!("30d"));
        let back: TimeWindow = serde_json::from_value(serde_json::json!("1y")).unwrap();
        assert_eq!(back, TimeWindow::Y1);
        assert!(serde_json::from_value::<TimeWindow>(serde_json::json!("3w")).is_err());
    }
}
