use thiserror::Error;

/// Input that cannot be turned into daily aggregates.
#[derive(Error, Debug)]
pub enum DiagnoseError {
    #[error("missing required column: {column}")]
    MissingColumn { column: &'static str },

    #[error("row {row}: cannot parse date {value:?}")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}: invalid {column} value {value:?}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: {column} total for {date} overflows")]
    Overflow {
        row: usize,
        column: &'static str,
        date: chrono::NaiveDate,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, DiagnoseError>;
