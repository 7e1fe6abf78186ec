use std::fmt::Write;
use std::io;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{ImpactSummary, Incident};

pub const STEP_SEPARATOR: &str = " | ";

pub fn summarize(incidents: &[Incident]) -> ImpactSummary {
    ImpactSummary {
        total_revenue_at_risk: incidents.iter().map(|incident| incident.revenue_at_risk).sum(),
        affected_days: incidents.len(),
        max_severity: incidents.iter().map(|incident| incident.severity).max(),
    }
}

pub fn render_alerts(incidents: &[Incident]) -> String {
    let mut output = String::new();

    if incidents.is_empty() {
        let _ = writeln!(output, "No significant drops detected.");
        return output;
    }

    for incident in incidents {
        let _ = writeln!(output);
        let _ = writeln!(output, "ALERT on {}", incident.date);
        let _ = writeln!(output, "Severity: {}", incident.severity);
        let _ = writeln!(output, "Drop: {:.2}%", incident.drop_pct);
        let _ = writeln!(output, "Revenue at Risk: ${:.2}", incident.revenue_at_risk);
        let _ = writeln!(output, "Likely cause: {}", incident.cause);
        let _ = writeln!(output, "Next Steps:");
        for (index, step) in incident.action_steps.iter().enumerate() {
            let _ = writeln!(output, "  {}. {}", index + 1, step);
        }
    }

    output
}

#[derive(Serialize)]
struct IncidentRow<'a> {
    date: NaiveDate,
    drop_pct: f64,
    severity: &'a str,
    cause: &'a str,
    recommendation: &'a str,
    revenue_at_risk: f64,
    action_steps: String,
}

/// Writes one CSV row per incident, action steps joined into a single cell.
pub fn write_csv<W: io::Write>(incidents: &[Incident], writer: W) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    if incidents.is_empty() {
        writer.write_record([
            "date",
            "drop_pct",
            "severity",
            "cause",
            "recommendation",
            "revenue_at_risk",
            "action_steps",
        ])?;
    }

    for incident in incidents {
        writer.serialize(IncidentRow {
            date: incident.date,
            drop_pct: incident.drop_pct,
            severity: incident.severity.as_str(),
            cause: incident.cause.as_str(),
            recommendation: &incident.recommendation,
            revenue_at_risk: incident.revenue_at_risk,
            action_steps: incident.action_steps.join(STEP_SEPARATOR),
        })?;
    }

    writer.flush()?;
    Ok(())
}

pub fn build_report(source: &str, incidents: &[Incident]) -> String {
    let summary = summarize(incidents);
    let mut output = String::new();

    let _ = writeln!(output, "# Conversion Drop Incident Report");
    let _ = writeln!(output, "Generated from {}", source);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Business Impact");
    let _ = writeln!(
        output,
        "- Revenue at risk: {:.2}",
        summary.total_revenue_at_risk
    );
    let _ = writeln!(output, "- Affected days: {}", summary.affected_days);
    let _ = writeln!(
        output,
        "- Priority level: {}",
        summary
            .max_severity
            .map(|severity| severity.as_str())
            .unwrap_or("NONE")
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Active Incidents");

    if incidents.is_empty() {
        let _ = writeln!(output, "No anomalies detected. Systems normal.");
        return output;
    }

    for incident in incidents {
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "### {} | {} | Drop: {:.2}% | Risk: {:.2}",
            incident.severity, incident.date, incident.drop_pct, incident.revenue_at_risk
        );
        let _ = writeln!(output, "- Likely cause: {}", incident.cause);
        let _ = writeln!(output, "- Recommendation: {}", incident.recommendation);
        let _ = writeln!(output, "- Next steps:");
        for step in incident.action_steps.iter() {
            let _ = writeln!(output, "  - [ ] {}", step);
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cause, Severity};

    fn sample_incident(day: u32, severity: Severity, cause: Cause, risk: f64) -> Incident {
        Incident {
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            drop_pct: -80.0,
            severity,
            cause,
            recommendation: cause.recommendation().to_string(),
            revenue_at_risk: risk,
            action_steps: cause.action_steps().iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn summary_totals_risk_and_picks_highest_severity() {
        let incidents = vec![
            sample_incident(2, Severity::Medium, Cause::WebsiteIssue, 120.5),
            sample_incident(3, Severity::Critical, Cause::TrackingBroken, 600.0),
            sample_incident(5, Severity::High, Cause::TrafficPaused, 0.0),
        ];

        let summary = summarize(&incidents);
        assert!((summary.total_revenue_at_risk - 720.5).abs() < 0.001);
        assert_eq!(summary.affected_days, 3);
        assert_eq!(summary.max_severity, Some(Severity::Critical));
    }

    #[test]
    fn empty_summary_has_no_severity() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_revenue_at_risk, 0.0);
        assert_eq!(summary.affected_days, 0);
        assert_eq!(summary.max_severity, None);
    }

    #[test]
    fn alerts_list_steps_in_order() {
        let incidents = vec![sample_incident(2, Severity::High, Cause::TrackingBroken, 42.0)];
        let output = render_alerts(&incidents);
        assert!(output.contains("ALERT on 2025-01-02"));
        assert!(output.contains("Severity: HIGH"));
        assert!(output.contains("Revenue at Risk: $42.00"));
        assert!(output.contains("Likely cause: Tracking Broken"));
        assert!(output.contains("  1. Check Google Tag firing on checkout page"));
        assert!(output.contains("  3. Inspect browser console"));
    }

    #[test]
    fn no_alerts_message() {
        assert_eq!(render_alerts(&[]), "No significant drops detected.\n");
    }

    #[test]
    fn csv_export_has_one_row_per_incident() {
        let incidents = vec![
            sample_incident(2, Severity::High, Cause::TrafficPaused, 10.0),
            sample_incident(4, Severity::Medium, Cause::WebsiteIssue, 0.0),
        ];
        let mut buffer = Vec::new();
        write_csv(&incidents, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "date,drop_pct,severity,cause,recommendation,revenue_at_risk,action_steps"
        );
        assert!(lines[1].starts_with("2025-01-02,-80.0,HIGH,Traffic Paused,"));
        assert!(lines[1].contains(
            "Verify campaign status in Google Ads UI | Check for Ad Disapprovals or Policy violations"
        ));
        assert!(lines[2].starts_with("2025-01-04,-80.0,MEDIUM,Website Issue,"));
    }

    #[test]
    fn csv_export_of_nothing_is_just_a_header() {
        let mut buffer = Vec::new();
        write_csv(&[], &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "date,drop_pct,severity,cause,recommendation,revenue_at_risk,action_steps\n"
        );
    }

    #[test]
    fn report_includes_impact_and_incidents() {
        let incidents = vec![
            sample_incident(2, Severity::High, Cause::TrackingBroken, 100.0),
            sample_incident(3, Severity::Medium, Cause::WebsiteIssue, 50.0),
        ];
        let report = build_report("traffic.csv", &incidents);
        assert!(report.contains("Generated from traffic.csv"));
        assert!(report.contains("- Revenue at risk: 150.00"));
        assert!(report.contains("- Affected days: 2"));
        assert!(report.contains("- Priority level: HIGH"));
        assert!(report.contains("### HIGH | 2025-01-02 | Drop: -80.00% | Risk: 100.00"));
        assert!(report.contains("- Recommendation: Review checkout logs and payment gateway."));
    }

    #[test]
    fn healthy_report_says_so() {
        let report = build_report("traffic.csv", &[]);
        assert!(report.contains("- Priority level: NONE"));
        assert!(report.contains("No anomalies detected. Systems normal."));
    }
}
