use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A historical exchange rate: one unit of `from_currency` buys `rate` units
/// of `to_currency` on `date`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub from_currency: String,
    pub to_currency: String,
    pub rate: Decimal,
    pub date: NaiveDate,
}

impl ExchangeRate {
    pub fn new(from: &str, to: &str, rate: Decimal, date: NaiveDate) -> Self {
        ExchangeRate {
            from_currency: from.to_string(),
            to_currency: to.to_string(),
            rate,
            date,
        }
    }

    /// Symbol of the pair, e.g. "EURUSD".
    pub fn symbol(&self) -> String {
        format!("{}{}", self.from_currency, self.to_currency)
    }
}
