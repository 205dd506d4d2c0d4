//! Lookup trait for historical prices.

use chrono::NaiveDate;

use super::model::SecurityPrice;

/// Read-only access to pre-loaded price history.
///
/// Returns the latest known price at or before `date`, or `None` when the
/// security has no price on or before that date.
pub trait QuoteStore: Send + Sync {
    fn latest_price(&self, security_id: &str, date: NaiveDate) -> Option<SecurityPrice>;
}
