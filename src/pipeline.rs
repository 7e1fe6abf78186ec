use std::io;

use tracing::{debug, warn};

use crate::aggregate;
use crate::classify::{self, DropFacts};
use crate::config::DiagnoseConfig;
use crate::detect;
use crate::error::Result;
use crate::ingest::RawTable;
use crate::models::{DropDay, Incident};
use crate::risk;

pub fn try_diagnose(table: &RawTable, config: &DiagnoseConfig) -> Result<Vec<Incident>> {
    let days = aggregate::aggregate_daily(table, &config.defaults)?;
    let scan = detect::detect_drops(&days, &config.detector);

    let incidents: Vec<Incident> = scan
        .drops
        .iter()
        .map(|drop| build_incident(drop, scan.avg_clicks, config))
        .collect();

    debug!(incidents = incidents.len(), "diagnosis complete");
    Ok(incidents)
}

/// Malformed input yields no incidents, so callers cannot tell a rejected
/// table from a healthy one. Use [`try_diagnose`] when that matters.
pub fn diagnose(table: &RawTable, config: &DiagnoseConfig) -> Vec<Incident> {
    match try_diagnose(table, config) {
        Ok(incidents) => incidents,
        Err(err) => {
            warn!(error = %err, "input rejected, reporting no incidents");
            Vec::new()
        }
    }
}

pub fn try_diagnose_reader<R: io::Read>(reader: R, config: &DiagnoseConfig) -> Result<Vec<Incident>> {
    let table = RawTable::from_reader(reader)?;
    try_diagnose(&table, config)
}

pub fn diagnose_reader<R: io::Read>(reader: R, config: &DiagnoseConfig) -> Vec<Incident> {
    match RawTable::from_reader(reader) {
        Ok(table) => diagnose(&table, config),
        Err(err) => {
            warn!(error = %err, "input could not be decoded, reporting no incidents");
            Vec::new()
        }
    }
}

fn build_incident(drop: &DropDay, avg_clicks: f64, config: &DiagnoseConfig) -> Incident {
    let day = &drop.day;
    let facts = DropFacts {
        clicks: day.clicks,
        conversions: day.conversions,
        cost: day.cost,
        drop_pct: round_pct(drop.change_pct),
        avg_clicks,
    };

    let severity = classify::classify_severity(&facts, &config.severity);
    let cause = classify::classify_cause(&facts, &config.cause);

    Incident {
        date: day.date,
        drop_pct: facts.drop_pct,
        severity,
        cause,
        recommendation: cause.recommendation().to_string(),
        revenue_at_risk: risk::revenue_at_risk(day),
        action_steps: cause.action_steps().iter().map(|step| step.to_string()).collect(),
    }
}

fn round_pct(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
