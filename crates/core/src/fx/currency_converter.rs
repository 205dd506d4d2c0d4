use crate::fx::fx_errors::FxError;
use crate::fx::fx_model::ExchangeRate;
use crate::fx::fx_traits::CurrencyConverterTrait;
use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// In-memory exchange-rate table.
///
/// Rates are kept as one time series per currency pair, with inverses added
/// automatically. Lookups pick the nearest dated rate and chain pairs through
/// a breadth-first search when no direct pair exists.
#[derive(Debug, Default, Clone)]
pub struct CurrencyConverter {
    /// Currency -> directly connected currencies.
    adj: HashMap<String, HashSet<String>>,

    /// (from, to) -> rate series by date.
    rates: HashMap<(String, String), BTreeMap<NaiveDate, Decimal>>,
}

impl CurrencyConverter {
    /// Creates a converter from a list of rates. Non-positive rates are rejected.
    pub fn new(exchange_rates: Vec<ExchangeRate>) -> Result<Self, FxError> {
        let mut converter = CurrencyConverter::default();
        converter.add_historical_rates(exchange_rates)?;
        Ok(converter)
    }

    /// Adds historical rates together with their inverses.
    pub fn add_historical_rates(&mut self, rates: Vec<ExchangeRate>) -> Result<(), FxError> {
        for rate in rates {
            if rate.from_currency == rate.to_currency {
                continue;
            }
            if rate.rate <= Decimal::ZERO {
                return Err(FxError::InvalidRate {
                    from: rate.from_currency,
                    to: rate.to_currency,
                    date: rate.date,
                    rate: rate.rate.to_string(),
                });
            }

            let forward_pair = (rate.from_currency.clone(), rate.to_currency.clone());
            let inverse_pair = (rate.to_currency.clone(), rate.from_currency.clone());

            self.rates
                .entry(forward_pair)
                .or_default()
                .insert(rate.date, rate.rate);
            self.rates
                .entry(inverse_pair)
                .or_default()
                .insert(rate.date, Decimal::ONE / rate.rate);

            self.adj
                .entry(rate.from_currency.clone())
                .or_default()
                .insert(rate.to_currency.clone());
            self.adj
                .entry(rate.to_currency)
                .or_default()
                .insert(rate.from_currency);
        }
        Ok(())
    }

    /// Nearest dated rate for a directly connected pair. Ties between an
    /// earlier and a later rate resolve to the earlier one.
    fn get_direct_rate(&self, from: &str, to: &str, date: NaiveDate) -> Option<Decimal> {
        let history = self.rates.get(&(from.to_string(), to.to_string()))?;

        let prev = history.range(..=date).next_back();
        let next = history.range(date..).next();

        match (prev, next) {
            (Some((d1, r1)), Some((d2, r2))) => {
                if d1 == d2 {
                    return Some(*r1);
                }
                let dist_prev = (date - *d1).num_days().abs();
                let dist_next = (*d2 - date).num_days().abs();
                if dist_prev <= dist_next {
                    Some(*r1)
                } else {
                    Some(*r2)
                }
            }
            (Some((_, r)), None) => Some(*r),
            (None, Some((_, r))) => Some(*r),
            (None, None) => None,
        }
    }

    /// Finds the composite rate along the shortest currency path.
    fn find_rate(&self, from_currency: &str, to_currency: &str, date: NaiveDate) -> Option<Decimal> {
        let mut queue: VecDeque<(String, Decimal)> = VecDeque::new();
        let mut visited: HashSet<String> = HashSet::new();

        queue.push_back((from_currency.to_string(), Decimal::ONE));
        visited.insert(from_currency.to_string());

        while let Some((current, accumulated)) = queue.pop_front() {
            if current == to_currency {
                return Some(accumulated);
            }
            if let Some(neighbors) = self.adj.get(&current) {
                for neighbor in neighbors {
                    if visited.contains(neighbor) {
                        continue;
                    }
                    if let Some(rate) = self.get_direct_rate(&current, neighbor, date) {
                        visited.insert(neighbor.clone());
                        queue.push_back((neighbor.clone(), accumulated * rate));
                    }
                }
            }
        }
        None
    }
}

impl CurrencyConverterTrait for CurrencyConverter {
    fn get_rate(
        &self,
        from_currency: &str,
        to_currency: &str,
        date: NaiveDate,
    ) -> Result<Decimal, FxError> {
        if from_currency == to_currency {
            return Ok(Decimal::ONE);
        }
        self.find_rate(from_currency, to_currency, date)
            .ok_or_else(|| {
                debug!(
                    "No conversion path for {} -> {} on or near {}",
                    from_currency, to_currency, date
                );
                FxError::RateNotFound(format!(
                    "No conversion path found for {} -> {} on or near {}",
                    from_currency, to_currency, date
                ))
            })
    }
}
