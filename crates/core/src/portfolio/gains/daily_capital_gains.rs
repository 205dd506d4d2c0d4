use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::capital_gains_calculation::unrealized_gain;
use crate::errors::{CalculatorError, Result};
use crate::fx::CurrencyConverterTrait;
use crate::money::Money;
use crate::portfolio::lots::{CostMethod, LotTracker};
use crate::portfolio::valuation::value_position;
use crate::quotes::QuoteStore;
use crate::transactions::{Security, Transaction};
use crate::utils::Interval;

/// Day-indexed realized and unrealized gains over an interval.
///
/// Index 0 is the interval start (the opening mark, no period transactions);
/// the last index is the interval end. Realized values are cumulative over
/// the period. Unrealized values are the level on each day relative to a
/// zero baseline, so their increments telescope to the closing level.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyCapitalGains {
    interval: Interval,
    term_currency: String,
    method: CostMethod,
    realized: Vec<Decimal>,
    unrealized: Vec<Option<Decimal>>,
}

impl DailyCapitalGains {
    /// An all-zero series, the neutral element of [`DailyCapitalGains::merge`].
    pub fn empty(interval: Interval, term_currency: &str, method: CostMethod) -> Self {
        let days = interval.len_days();
        DailyCapitalGains {
            interval,
            term_currency: term_currency.to_string(),
            method,
            realized: vec![Decimal::ZERO; days],
            unrealized: vec![Some(Decimal::ZERO); days],
        }
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn method(&self) -> CostMethod {
        self.method
    }

    pub fn term_currency(&self) -> &str {
        &self.term_currency
    }

    fn money(&self, amount: Decimal) -> Money {
        Money::new(amount, &self.term_currency)
    }

    /// Index of `date` clamped to the end; `None` before the start.
    fn index_up_to(&self, date: NaiveDate) -> Option<usize> {
        if date < self.interval.start {
            return None;
        }
        Some(
            self.interval
                .day_offset(date)
                .unwrap_or(self.realized.len().saturating_sub(1)),
        )
    }

    /// Latest available unrealized level strictly before `index`.
    fn previous_unrealized(&self, index: usize) -> Decimal {
        self.unrealized[..index]
            .iter()
            .rev()
            .find_map(|value| *value)
            .unwrap_or(Decimal::ZERO)
    }

    /// Realized gains booked on `date`.
    pub fn get_realized_gains(&self, date: NaiveDate) -> Money {
        let amount = match self.interval.day_offset(date) {
            Some(0) => self.realized[0],
            Some(i) => self.realized[i] - self.realized[i - 1],
            None => Decimal::ZERO,
        };
        self.money(amount)
    }

    /// Change of unrealized gains on `date`; `None` when the day has no price.
    ///
    /// Day 0 (`interval.start`) is not a period day: it returns the whole
    /// unrealized level built up before the period, so summing increments
    /// over the period days alone starts after it.
    pub fn get_unrealized_gains(&self, date: NaiveDate) -> Option<Money> {
        match self.interval.day_offset(date) {
            Some(i) => {
                let level = self.unrealized[i]?;
                Some(self.money(level - self.previous_unrealized(i)))
            }
            None => Some(Money::zero(&self.term_currency)),
        }
    }

    pub fn get_total_realized_gains_up_to(&self, date: NaiveDate) -> Money {
        match self.index_up_to(date) {
            Some(i) => self.money(self.realized[i]),
            None => Money::zero(&self.term_currency),
        }
    }

    pub fn get_total_unrealized_gains_up_to(&self, date: NaiveDate) -> Option<Money> {
        match self.index_up_to(date) {
            Some(i) => self.unrealized[i].map(|level| self.money(level)),
            None => Some(Money::zero(&self.term_currency)),
        }
    }

    pub fn get_total_realized_gains(&self) -> Money {
        self.get_total_realized_gains_up_to(self.interval.end)
    }

    pub fn get_total_unrealized_gains(&self) -> Option<Money> {
        self.get_total_unrealized_gains_up_to(self.interval.end)
    }

    /// Days on which a realized gain or loss was booked.
    pub fn get_dates_with_realized_gains(&self) -> Vec<NaiveDate> {
        self.interval
            .days()
            .into_iter()
            .filter(|day| !self.get_realized_gains(*day).is_zero())
            .collect()
    }

    /// Days on which the unrealized gain changed.
    pub fn get_dates_with_unrealized_gains(&self) -> Vec<NaiveDate> {
        self.interval
            .days()
            .into_iter()
            .filter(|day| {
                self.get_unrealized_gains(*day)
                    .is_some_and(|change| !change.is_zero())
            })
            .collect()
    }

    /// Adds two series over the same interval, currency and method. A day
    /// without an unrealized value in either series has none in the sum.
    pub fn merge(&self, other: &DailyCapitalGains) -> Result<DailyCapitalGains> {
        if self.interval != other.interval {
            return Err(CalculatorError::InvalidTransaction(format!(
                "Cannot merge daily series over {:?} and {:?}",
                self.interval, other.interval
            ))
            .into());
        }
        if self.term_currency != other.term_currency {
            return Err(CalculatorError::CurrencyMismatch {
                expected: self.term_currency.clone(),
                found: other.term_currency.clone(),
            }
            .into());
        }
        if self.method != other.method {
            return Err(CalculatorError::InvalidTransaction(
                "Cannot merge daily series of different cost methods".to_string(),
            )
            .into());
        }

        Ok(DailyCapitalGains {
            interval: self.interval,
            term_currency: self.term_currency.clone(),
            method: self.method,
            realized: self
                .realized
                .iter()
                .zip(&other.realized)
                .map(|(a, b)| a + b)
                .collect(),
            unrealized: self
                .unrealized
                .iter()
                .zip(&other.unrealized)
                .map(|(a, b)| Some((*a)? + (*b)?))
                .collect(),
        })
    }
}

/// Builds a [`DailyCapitalGains`] series with a single forward sweep.
pub struct DailyCapitalGainsCalculation<'a> {
    security: &'a Security,
    term_currency: &'a str,
    method: CostMethod,
    converter: &'a dyn CurrencyConverterTrait,
    quotes: &'a dyn QuoteStore,
}

impl<'a> DailyCapitalGainsCalculation<'a> {
    pub fn new(
        security: &'a Security,
        term_currency: &'a str,
        method: CostMethod,
        converter: &'a dyn CurrencyConverterTrait,
        quotes: &'a dyn QuoteStore,
    ) -> Self {
        DailyCapitalGainsCalculation {
            security,
            term_currency,
            method,
            converter,
            quotes,
        }
    }

    /// Sweeps the interval day by day. `transactions` must be sorted; those
    /// on or before the start only shape the opening lots, those after the
    /// end are ignored.
    pub fn calculate(
        &self,
        transactions: &[Transaction],
        interval: Interval,
    ) -> Result<DailyCapitalGains> {
        let split = transactions.partition_point(|t| interval.is_historical(t.trade_date()));
        let (historical, period) = transactions.split_at(split);

        let mut tracker = LotTracker::new(&self.security.id, self.term_currency)
            .replay(historical, self.converter)?;
        let mut pending = period
            .iter()
            .take_while(|t| !interval.is_after(t.trade_date()))
            .peekable();

        let days = interval.days();
        let mut realized = Vec::with_capacity(days.len());
        let mut unrealized = Vec::with_capacity(days.len());
        let mut realized_total = Decimal::ZERO;

        for day in days {
            let booked_before = tracker.disposals().len();
            while let Some(transaction) = pending.next_if(|t| t.trade_date() <= day) {
                tracker = tracker.apply(transaction, self.converter)?;
            }

            realized_total += tracker.disposals()[booked_before..]
                .iter()
                .map(|disposal| disposal.realized_gain(self.method))
                .sum::<Decimal>();
            realized.push(realized_total);

            let valuation = value_position(
                self.security,
                tracker.shares_held(),
                day,
                self.term_currency,
                self.quotes,
                self.converter,
            )?;
            unrealized.push(unrealized_gain(&tracker, &valuation, self.method));
        }

        Ok(DailyCapitalGains {
            interval,
            term_currency: self.term_currency.to_string(),
            method: self.method,
            realized,
            unrealized,
        })
    }
}
