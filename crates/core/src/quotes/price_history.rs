use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use super::model::SecurityPrice;
use super::store::QuoteStore;

/// Price series per security held in memory.
#[derive(Debug, Default, Clone)]
pub struct PriceHistory {
    prices: HashMap<String, BTreeMap<NaiveDate, Decimal>>,
}

impl PriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the price of `security_id` on `date`.
    pub fn insert(&mut self, security_id: &str, date: NaiveDate, value: Decimal) {
        self.prices
            .entry(security_id.to_string())
            .or_default()
            .insert(date, value);
    }

    pub fn with_prices(
        mut self,
        security_id: &str,
        prices: impl IntoIterator<Item = (NaiveDate, Decimal)>,
    ) -> Self {
        for (date, value) in prices {
            self.insert(security_id, date, value);
        }
        self
    }

    pub fn price_count(&self, security_id: &str) -> usize {
        self.prices.get(security_id).map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.prices.values().all(BTreeMap::is_empty)
    }
}

impl QuoteStore for PriceHistory {
    fn latest_price(&self, security_id: &str, date: NaiveDate) -> Option<SecurityPrice> {
        self.prices
            .get(security_id)?
            .range(..=date)
            .next_back()
            .map(|(d, v)| SecurityPrice::new(*d, *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_latest_price_at_or_before_date() {
        let history = PriceHistory::new().with_prices(
            "SAP",
            vec![(date(2021, 1, 4), dec!(100)), (date(2021, 1, 6), dec!(104))],
        );

        assert_eq!(history.latest_price("SAP", date(2021, 1, 3)), None);
        assert_eq!(
            history.latest_price("SAP", date(2021, 1, 4)).unwrap().value,
            dec!(100)
        );
        let carried = history.latest_price("SAP", date(2021, 1, 5)).unwrap();
        assert_eq!(carried.value, dec!(100));
        assert_eq!(carried.date, date(2021, 1, 4));
        assert_eq!(
            history.latest_price("SAP", date(2021, 2, 1)).unwrap().value,
            dec!(104)
        );
    }

    #[test]
    fn test_unknown_security_has_no_price() {
        let history = PriceHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.latest_price("NOPE", date(2021, 1, 1)), None);
        assert_eq!(history.price_count("NOPE"), 0);
    }
}
