use std::io;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::Result;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// A decoded table with trimmed, lower-cased column names.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    headers: StringRecord,
    records: Vec<StringRecord>,
}

impl RawTable {
    pub fn new(headers: StringRecord, records: Vec<StringRecord>) -> Self {
        let headers = headers
            .iter()
            .map(|name| name.trim().to_lowercase())
            .collect();
        Self { headers, records }
    }

    #[cfg(test)]
    pub fn from_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        let records = rows.iter().map(|row| StringRecord::from(row.to_vec())).collect();
        Self::new(StringRecord::from(headers.to_vec()), records)
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);
        let headers = reader.headers()?.clone();
        let records = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self::new(headers, records))
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn records(&self) -> &[StringRecord] {
        &self.records
    }
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
                .map(|datetime| datetime.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_trimmed_and_lowercased() {
        let table = RawTable::from_reader(" Date , CLICKS,Conversions \n2025-01-01,10,1\n".as_bytes())
            .unwrap();
        assert_eq!(table.column("date"), Some(0));
        assert_eq!(table.column("clicks"), Some(1));
        assert_eq!(table.column("conversions"), Some(2));
        assert_eq!(table.column("cost"), None);
        assert_eq!(table.records().len(), 1);
    }

    #[test]
    fn cells_are_trimmed() {
        let table = RawTable::from_reader("date,clicks\n 2025-01-01 , 42 \n".as_bytes()).unwrap();
        let record = &table.records()[0];
        assert_eq!(record.get(0), Some("2025-01-01"));
        assert_eq!(record.get(1), Some("42"));
    }

    #[test]
    fn parses_supported_date_forms() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        assert_eq!(parse_date("2025-01-02"), Some(expected));
        assert_eq!(parse_date("2025/01/02"), Some(expected));
        assert_eq!(parse_date("01/02/2025"), Some(expected));
        assert_eq!(parse_date("2025-01-02 13:45:00"), Some(expected));
        assert_eq!(parse_date("2025-01-02T08:00:00"), Some(expected));
    }

    #[test]
    fn rejects_unparsable_dates() {
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2025-13-40"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn ragged_rows_are_kept_for_validation() {
        let table = RawTable::from_reader("date,clicks,conversions\n2025-01-01,10\n".as_bytes())
            .unwrap();
        assert_eq!(table.records()[0].get(2), None);
    }
}
