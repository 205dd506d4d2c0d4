use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::quotes::SecurityPrice;

/// Mark-to-market of a position on one date.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Valuation {
    pub date: NaiveDate,
    pub shares: Decimal,
    /// Latest known price at or before `date`, in the security currency.
    pub price: Option<SecurityPrice>,
    /// Value in the term currency. `None` when shares are held but no price
    /// is known; an empty position is worth zero with or without a price.
    pub market_value: Option<Decimal>,
}

impl Valuation {
    pub fn is_available(&self) -> bool {
        self.market_value.is_some()
    }
}
