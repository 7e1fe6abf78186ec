use tracing::trace;

use crate::config::{CauseConfig, SeverityConfig};
use crate::models::{Cause, Severity};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropFacts {
    pub clicks: u64,
    pub conversions: u64,
    pub cost: f64,
    /// Change in conversions, already rounded to 2 decimals.
    pub drop_pct: f64,
    pub avg_clicks: f64,
}

pub struct Rule<C, T> {
    pub name: &'static str,
    pub matches: fn(&DropFacts, &C) -> bool,
    pub outcome: T,
}

pub const SEVERITY_RULES: [Rule<SeverityConfig, Severity>; 3] = [
    Rule {
        name: "no conversions on heavy spend",
        matches: |facts, config| facts.conversions == 0 && facts.cost > config.critical_cost,
        outcome: Severity::Critical,
    },
    Rule {
        name: "drop past high threshold",
        matches: |facts, config| facts.drop_pct < config.high_drop_pct,
        outcome: Severity::High,
    },
    Rule {
        name: "drop past medium threshold",
        matches: |facts, config| facts.drop_pct < config.medium_drop_pct,
        outcome: Severity::Medium,
    },
];

pub const SEVERITY_FALLBACK: Severity = Severity::Low;

pub const CAUSE_RULES: [Rule<CauseConfig, Cause>; 2] = [
    Rule {
        name: "traffic flowing but conversions near zero",
        matches: |facts, config| {
            facts.clicks > config.tracking_min_clicks
                && facts.conversions < config.tracking_max_conversions
        },
        outcome: Cause::TrackingBroken,
    },
    Rule {
        name: "traffic well below average",
        matches: |facts, config| {
            (facts.clicks as f64) < config.traffic_paused_ratio * facts.avg_clicks
        },
        outcome: Cause::TrafficPaused,
    },
];

pub const CAUSE_FALLBACK: Cause = Cause::WebsiteIssue;

fn first_match<C, T: Copy>(rules: &[Rule<C, T>], facts: &DropFacts, config: &C, fallback: T) -> T {
    match rules.iter().find(|rule| (rule.matches)(facts, config)) {
        Some(rule) => {
            trace!(rule = rule.name, "classification rule matched");
            rule.outcome
        }
        None => fallback,
    }
}

pub fn classify_severity(facts: &DropFacts, config: &SeverityConfig) -> Severity {
    first_match(&SEVERITY_RULES, facts, config, SEVERITY_FALLBACK)
}

pub fn classify_cause(facts: &DropFacts, config: &CauseConfig) -> Cause {
    first_match(&CAUSE_RULES, facts, config, CAUSE_FALLBACK)
}
