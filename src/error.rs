//! Error taxonomy for loading, filtering and aggregating trip data.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BikeshareError>;

#[derive(Debug, Error)]
pub enum BikeshareError {
    /// The city's data file could not be opened or read.
    #[error("data source unavailable: {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row (or the header) could not be parsed. The whole load is aborted.
    #[error("malformed data at line {line}: {message}")]
    DataError { line: u64, message: String },

    /// A city, month or weekday outside the supported vocabulary.
    #[error("invalid {field} value: {value:?}")]
    InvalidFilterValue { field: &'static str, value: String },

    /// A statistic that needs at least one record was asked of an empty view.
    #[error("cannot compute {statistic}: no matching records")]
    EmptyDataset { statistic: &'static str },
}

impl BikeshareError {
    pub(crate) fn data(line: u64, message: impl Into<String>) -> Self {
        BikeshareError::DataError {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn invalid(field: &'static str, value: &str) -> Self {
        BikeshareError::InvalidFilterValue {
            field,
            value: value.to_string(),
        }
    }

    pub(crate) fn empty(statistic: &'static str) -> Self {
        BikeshareError::EmptyDataset { statistic }
    }
}
