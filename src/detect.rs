use tracing::debug;

use crate::config::DetectorConfig;
use crate::models::{DailyAggregate, DropDay};

/// Result of scanning the daily series for conversion drops.
#[derive(Debug, Clone, PartialEq)]
pub struct DropScan {
    pub drops: Vec<DropDay>,
    /// Mean clicks across every day, not only the drop days.
    pub avg_clicks: f64,
}

/// Percentage change from a zero baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct UndefinedRate;

fn pct_change(previous: u64, current: u64) -> Result<f64, UndefinedRate> {
    if previous == 0 {
        return Err(UndefinedRate);
    }
    Ok((current as f64 - previous as f64) * 100.0 / previous as f64)
}

/// Day-over-day change in conversions for each day after the first.
pub fn change_pcts(days: &[DailyAggregate]) -> Vec<Option<f64>> {
    let mut changes = Vec::with_capacity(days.len());
    if days.is_empty() {
        return changes;
    }

    changes.push(None);
    for pair in days.windows(2) {
        changes.push(pct_change(pair[0].conversions, pair[1].conversions).ok());
    }
    changes
}

pub fn average_clicks(days: &[DailyAggregate]) -> f64 {
    if days.is_empty() {
        return 0.0;
    }
    let total: u128 = days.iter().map(|day| u128::from(day.clicks)).sum();
    total as f64 / days.len() as f64
}

/// Flags days whose conversions fell strictly below the configured threshold.
pub fn detect_drops(days: &[DailyAggregate], config: &DetectorConfig) -> DropScan {
    let drops: Vec<DropDay> = days
        .iter()
        .zip(change_pcts(days))
        .filter_map(|(day, change)| match change {
            Some(change_pct) if change_pct < config.drop_threshold_pct => {
                debug!(
                    date = %day.date,
                    change_pct,
                    conversion_rate = day.conversion_rate(),
                    "conversion drop"
                );
                Some(DropDay {
                    day: day.clone(),
                    change_pct,
                })
            }
            _ => None,
        })
        .collect();

    let avg_clicks = average_clicks(days);
    debug!(
        days = days.len(),
        drops = drops.len(),
        avg_clicks,
        "scanned daily conversions"
    );

    DropScan { drops, avg_clicks }
}
