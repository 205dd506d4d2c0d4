//! Lotbook Core - lot accounting and capital gains for securities.
//!
//! Transactions are replayed per security into FIFO lots and a
//! moving-average pool, from which cost, realized and unrealized gains,
//! dividend statistics and money-weighted returns are derived. Prices and
//! exchange rates are read through the [`quotes::QuoteStore`] and
//! [`fx::CurrencyConverterTrait`] traits.

pub mod constants;
pub mod errors;
pub mod fx;
pub mod money;
pub mod portfolio;
pub mod quotes;
pub mod settings;
pub mod transactions;
pub mod utils;

#[cfg(test)]
mod testing;

pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
