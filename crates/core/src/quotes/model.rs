//! Quote domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Closing price of a security on a date, in the security's currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityPrice {
    pub date: NaiveDate,
    pub value: Decimal,
}

impl SecurityPrice {
    pub fn new(date: NaiveDate, value: Decimal) -> Self {
        SecurityPrice { date, value }
    }
}
