use std::io;

use thiserror::Error;

pub type Result<T, E = ScrapeError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// A layout column the page was expected to carry is absent from the row.
    #[error("column {column} ({field}) missing from a row of {width} cells")]
    MissingColumn {
        field: &'static str,
        column: String,
        width: usize,
    },

    #[error("{field}: `{value}` is not a number")]
    MalformedNumber { field: &'static str, value: String },

    #[error("{field}: `{value}` does not end in a currency code")]
    MalformedCurrency { field: &'static str, value: String },

    #[error("unrecognized currency symbol `{symbol}`")]
    UnknownCurrency { symbol: String },

    #[error("row {row}: {source}")]
    AtRow {
        row: usize,
        #[source]
        source: Box<ScrapeError>,
    },

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Account already exists: {0}")]
    DuplicateAccount(String),

    #[error("invalid update mode `{0}` (expected `update` or `add`)")]
    InvalidMode(String),

    #[error("unknown account field `{0}`")]
    InvalidField(String),

    #[error("{field}: invalid value `{value}`")]
    InvalidValue { field: &'static str, value: String },

    #[error("{field} cannot be accumulated")]
    UnsupportedAccumulate { field: &'static str },

    #[error("{field} overflowed while accumulating")]
    Overflow { field: &'static str },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(String),
}

impl ScrapeError {
    /// Attach the index of the offending row.
    pub fn at_row(self, row: usize) -> Self {
        ScrapeError::AtRow {
            row,
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_row_names_the_row_and_the_cause() {
        let err = ScrapeError::MalformedNumber {
            field: "balance",
            value: "n/a".into(),
        }
        .at_row(3);
        assert_eq!(err.to_string(), "row 3: balance: `n/a` is not a number");
        assert!(std::error::Error::source(&err).is_some());
    }
}
