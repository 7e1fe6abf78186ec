use crate::models::DailyAggregate;

/// Unrecovered spend for the day, `max(0, cost - revenue)`.
///
/// This is a proxy for the financial impact of a drop, not a model of the
/// revenue that was actually lost.
pub fn revenue_at_risk(day: &DailyAggregate) -> f64 {
    (day.cost - day.revenue).max(0.0)
}
