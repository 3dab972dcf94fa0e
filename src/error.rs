use arrow::error::ArrowError;
use thiserror::Error;

/// Errors raised by the survey core (column accounting, tabulation, loading rules).
#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("column not found: {0:?}")]
    ColumnNotFound(String),

    #[error("negative column index {0}")]
    NegativeColumn(i64),

    #[error("invalid column range '{0}'")]
    InvalidRange(String),

    #[error("expected column {0:?} is missing from the survey header")]
    MissingColumn(String),

    #[error("record {record} has {found} fields, header has {width}")]
    TooManyFields {
        record: usize,
        found: usize,
        width: usize,
    },

    #[error("column {0:?} does not hold text")]
    NotText(String),

    #[error("unsupported output format for '{0}'")]
    UnsupportedFormat(String),

    #[error("{0}")]
    Arrow(#[from] ArrowError),
}

pub type Result<T, E = SurveyError> = std::result::Result<T, E>;
