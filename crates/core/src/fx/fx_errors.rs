use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while converting between currencies.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FxError {
    #[error("Exchange rate not found: {0}")]
    RateNotFound(String),

    #[error("Invalid exchange rate {rate} for {from}->{to} on {date}")]
    InvalidRate {
        from: String,
        to: String,
        date: NaiveDate,
        rate: String,
    },
}
