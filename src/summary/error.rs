use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while building or querying a [`Summarizer`](super::Summarizer).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SummaryError {
    #[error("snapshot table is empty")]
    EmptyTable,

    #[error("duplicate snapshot for account '{name}' on {date}")]
    DuplicateSnapshot { name: String, date: NaiveDate },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for summary operations
pub type Result<T> = std::result::Result<T, SummaryError>;
