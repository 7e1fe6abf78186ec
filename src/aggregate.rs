use std::collections::BTreeMap;

use csv::StringRecord;
use tracing::debug;

use crate::config::MeasureDefaults;
use crate::error::{DiagnoseError, Result};
use crate::ingest::{self, RawTable};
use crate::models::{DailyAggregate, RawRow};

struct Columns {
    date: usize,
    clicks: usize,
    conversions: usize,
    cost: Option<usize>,
    revenue: Option<usize>,
}

impl Columns {
    fn resolve(table: &RawTable) -> Result<Self> {
        let required = |column: &'static str| {
            table
                .column(column)
                .ok_or(DiagnoseError::MissingColumn { column })
        };

        Ok(Self {
            date: required("date")?,
            clicks: required("clicks")?,
            conversions: required("conversions")?,
            cost: table.column("cost"),
            revenue: table.column("revenue"),
        })
    }
}

/// Sums every row into one aggregate per calendar date, ascending by date.
pub fn aggregate_daily(table: &RawTable, defaults: &MeasureDefaults) -> Result<Vec<DailyAggregate>> {
    let columns = Columns::resolve(table)?;
    let mut days: BTreeMap<chrono::NaiveDate, DailyAggregate> = BTreeMap::new();

    for (index, record) in table.records().iter().enumerate() {
        // 1-based, counting the header line
        let line = index + 2;
        let row = parse_row(record, line, &columns, defaults)?;
        let entry = days.entry(row.date).or_insert_with(|| DailyAggregate {
            date: row.date,
            clicks: 0,
            conversions: 0,
            cost: 0.0,
            revenue: 0.0,
        });

        entry.clicks = add_count(entry.clicks, row.clicks, line, "clicks", row.date)?;
        entry.conversions =
            add_count(entry.conversions, row.conversions, line, "conversions", row.date)?;
        entry.cost += row.cost;
        entry.revenue += row.revenue;
    }

    debug!(
        rows = table.records().len(),
        days = days.len(),
        "aggregated raw rows by date"
    );
    Ok(days.into_values().collect())
}

fn parse_row(
    record: &StringRecord,
    row: usize,
    columns: &Columns,
    defaults: &MeasureDefaults,
) -> Result<RawRow> {
    let date_value = record.get(columns.date).unwrap_or_default();
    let date = ingest::parse_date(date_value).ok_or_else(|| DiagnoseError::InvalidDate {
        row,
        value: date_value.to_string(),
    })?;

    Ok(RawRow {
        date,
        clicks: parse_count(record, row, columns.clicks, "clicks")?,
        conversions: parse_count(record, row, columns.conversions, "conversions")?,
        cost: parse_amount(record, row, columns.cost, "cost", defaults.cost)?,
        revenue: parse_amount(record, row, columns.revenue, "revenue", defaults.revenue)?,
    })
}

fn add_count(
    total: u64,
    value: u64,
    row: usize,
    column: &'static str,
    date: chrono::NaiveDate,
) -> Result<u64> {
    total
        .checked_add(value)
        .ok_or(DiagnoseError::Overflow { row, column, date })
}

fn parse_count(record: &StringRecord, row: usize, index: usize, column: &'static str) -> Result<u64> {
    let value = record.get(index).unwrap_or_default();
    value.parse::<u64>().map_err(|_| DiagnoseError::InvalidValue {
        row,
        column,
        value: value.to_string(),
    })
}

fn parse_amount(
    record: &StringRecord,
    row: usize,
    index: Option<usize>,
    column: &'static str,
    default: f64,
) -> Result<f64> {
    let value = match index.and_then(|index| record.get(index)) {
        Some(value) if !value.is_empty() => value,
        _ => return Ok(default),
    };

    match value.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(amount),
        _ => Err(DiagnoseError::InvalidValue {
            row,
            column,
            value: value.to_string(),
        }),
    }
}
