use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub date: NaiveDate,
    pub clicks: u64,
    pub conversions: u64,
    pub cost: f64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub clicks: u64,
    pub conversions: u64,
    pub cost: f64,
    pub revenue: f64,
}

impl DailyAggregate {
    /// Conversions per click, 0.0 for a day without clicks.
    pub fn conversion_rate(&self) -> f64 {
        if self.clicks == 0 {
            0.0
        } else {
            self.conversions as f64 / self.clicks as f64
        }
    }
}

/// A daily aggregate whose conversions fell past the drop threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct DropDay {
    pub day: DailyAggregate,
    pub change_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Cause {
    #[serde(rename = "Tracking Broken")]
    TrackingBroken,
    #[serde(rename = "Traffic Paused")]
    TrafficPaused,
    #[serde(rename = "Website Issue")]
    WebsiteIssue,
}

impl Cause {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cause::TrackingBroken => "Tracking Broken",
            Cause::TrafficPaused => "Traffic Paused",
            Cause::WebsiteIssue => "Website Issue",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            Cause::TrackingBroken => "Check tag firing on /checkout page.",
            Cause::TrafficPaused => "Verify campaign status in Google Ads UI.",
            Cause::WebsiteIssue => "Review checkout logs and payment gateway.",
        }
    }

    pub fn action_steps(&self) -> &'static [&'static str; 3] {
        match self {
            Cause::TrackingBroken => &[
                "Check Google Tag firing on checkout page",
                "Verify GTM Container version is live",
                "Inspect browser console for 404/500 errors on conversion pixels",
            ],
            Cause::TrafficPaused => &[
                "Verify campaign status in Google Ads UI",
                "Check for Ad Disapprovals or Policy violations",
                "Review Budget caps and bid adjustments",
            ],
            Cause::WebsiteIssue => &[
                "Inspect payment gateway logs for failures",
                "Test checkout flow manually on Mobile and Desktop",
                "Check server logs for backend latency spikes",
            ],
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Incident {
    pub date: NaiveDate,
    pub drop_pct: f64,
    pub severity: Severity,
    pub cause: Cause,
    pub recommendation: String,
    pub revenue_at_risk: f64,
    pub action_steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImpactSummary {
    pub total_revenue_at_risk: f64,
    pub affected_days: usize,
    pub max_severity: Option<Severity>,
}
