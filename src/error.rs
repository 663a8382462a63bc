use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpendingError {
    #[error("Invalid date '{value}': expected {expected}")]
    DateParse { value: String, expected: &'static str },

    #[error("Invalid month '{0}': must be 1-12 or a calendar month name")]
    InvalidMonth(String),

    #[error("Invalid year '{0}': must be a number")]
    InvalidYear(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid value '{value}' in column {column} at row {row}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Invalid rent split {0}: rent must be divided between at least one payer")]
    InvalidRentSplit(u32),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SpendingError>;
